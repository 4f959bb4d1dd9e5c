//! Session driver
//!
//! Owns the world and the progression store, feeds them clamped frame deltas,
//! and forwards events to the advisory collaborators. Collaborator failures are
//! logged and dropped after the frame has committed.

use crate::consts::MAX_FRAME_DT_MS;
use crate::error::ConfigError;
use crate::highscores::{HighScores, Leaderboard, timestamp_ms};
use crate::platform::{AudioSink, InputProvider, Renderer, Silent, Snapshot, SoundEffect};
use crate::profile::Profile;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, Progression, TickInput, World, tick};
use crate::tuning::Tuning;

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub score: u64,
    /// Whole meters flown
    pub distance: u64,
    pub enemies_killed: u32,
    /// Leaderboard rank after submission, if known
    pub rank: Option<usize>,
    pub new_personal_best: bool,
}

pub struct Session {
    world: World,
    progression: Progression,
    settings: Settings,
    profile: Profile,
    leaderboard: Box<dyn Leaderboard>,
    audio: Box<dyn AudioSink>,
    seed: u64,
    /// False until `start` and after `stop`; no frame runs while false
    running: bool,
    last_run: Option<RunSummary>,
}

impl Session {
    /// Validate the tuning and build an idle session on the menu
    pub fn new(
        tuning: Tuning,
        settings: Settings,
        profile: Profile,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let mut progression = Progression::new(&tuning, settings.difficulty);
        progression.set_personal_best(profile.personal_best);
        Ok(Self {
            world: World::new(tuning, seed),
            progression,
            settings,
            profile,
            leaderboard: Box::new(HighScores::load()),
            audio: Box::new(Silent),
            seed,
            running: false,
            last_run: None,
        })
    }

    pub fn with_leaderboard(mut self, leaderboard: impl Leaderboard + 'static) -> Self {
        self.leaderboard = Box::new(leaderboard);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// Begin a fresh run with the current seed
    pub fn start(&mut self) {
        self.world.reset(self.seed);
        self.progression.reset(self.settings.difficulty);
        self.progression.set_personal_best(self.profile.personal_best);
        self.progression.start();
        self.world.sync_player(self.progression.player());
        self.running = true;
        self.last_run = None;
        log::info!(
            "Run started (seed {:#x}, {} mode)",
            self.seed,
            self.settings.difficulty.as_str()
        );
    }

    /// Halt the frame loop. Frames after this are ignored until the next start.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Session stopped");
        }
        self.running = false;
    }

    /// Full reinitialization; `seed` replaces the current one when given
    pub fn restart(&mut self, seed: Option<u64>) {
        self.stop();
        if let Some(seed) = seed {
            self.seed = seed;
        }
        self.start();
    }

    pub fn pause(&mut self) {
        self.progression.pause();
    }

    pub fn resume(&mut self) {
        self.progression.resume();
    }

    /// Read input, advance one frame and dispatch its events. Returns the
    /// events raised during the frame.
    pub fn frame(&mut self, dt_ms: f32, input: &mut impl InputProvider) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }
        let tick_input = TickInput {
            target: input.target(),
        };
        self.update(dt_ms, &tick_input)
    }

    /// Advance one frame with explicit input
    pub fn update(&mut self, dt_ms: f32, input: &TickInput) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }
        let dt_ms = dt_ms.clamp(0.0, MAX_FRAME_DT_MS);
        tick(&mut self.world, &mut self.progression, input, dt_ms);

        let events = self.world.drain_events();
        for event in &events {
            self.dispatch(event);
        }
        events
    }

    /// Hand the committed frame to a renderer
    pub fn render(&self, renderer: &mut impl Renderer) {
        renderer.render(&self.snapshot());
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(&self.world, &self.progression)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> GamePhase {
        self.progression.phase()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace and persist the settings. Audio picks them up immediately,
    /// difficulty on the next start.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if let Err(e) = self.settings.save() {
            log::warn!("Could not save settings: {}", e);
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Summary of the most recent finished run
    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }

    fn dispatch(&mut self, event: &GameEvent) {
        let volume = self.settings.effective_sfx_volume();
        if volume > 0.0 {
            if let Some(effect) = SoundEffect::for_event(event) {
                if let Err(e) = self.audio.play(effect, volume) {
                    log::warn!("Dropped {:?}: {}", effect, e);
                }
            }
        }

        match event {
            GameEvent::LevelUp { level } => log::debug!("Reached level {}", level),
            GameEvent::GameOver { score, distance } => self.finish_run(*score, *distance),
            _ => {}
        }
    }

    /// Submit the run, update the personal best and stop the loop
    fn finish_run(&mut self, score: u64, distance: u64) {
        let rank = match self
            .leaderboard
            .submit(&self.profile.username, distance, timestamp_ms())
        {
            Ok(rank) => rank,
            Err(e) => {
                log::warn!("Leaderboard submission failed: {}", e);
                None
            }
        };

        let new_personal_best = self.profile.record_distance(distance);
        if new_personal_best {
            log::info!("New personal best: {} m", distance);
            if let Err(e) = self.profile.save() {
                log::warn!("Could not save profile: {}", e);
            }
        }

        self.last_run = Some(RunSummary {
            score,
            distance,
            enemies_killed: self.progression.progress().enemies_killed,
            rank,
            new_personal_best,
        });
        self.stop();
    }
}
