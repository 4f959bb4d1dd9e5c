//! Sky Force entry point
//!
//! Web builds export a small wasm-bindgen handle the page drives from
//! requestAnimationFrame. Native builds run a headless autopilot session.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use sky_force::sim::TickInput;
    use sky_force::{DifficultyMode, Profile, Session, Settings, Tuning};

    /// Game handle owned by the page
    #[wasm_bindgen]
    pub struct SkyForce {
        session: Session,
        input: TickInput,
    }

    #[wasm_bindgen]
    impl SkyForce {
        #[wasm_bindgen(constructor)]
        pub fn new(seed: u64) -> Result<SkyForce, JsValue> {
            let session = Session::new(Tuning::default(), Settings::load(), Profile::load(), seed)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(Self {
                session,
                input: TickInput::default(),
            })
        }

        pub fn start(&mut self) {
            self.session.start();
        }

        pub fn stop(&mut self) {
            self.session.stop();
        }

        pub fn restart(&mut self, seed: u64) {
            self.session.restart(Some(seed));
        }

        pub fn pause(&mut self) {
            self.session.pause();
        }

        pub fn resume(&mut self) {
            self.session.resume();
        }

        /// Pointer/touch position already mapped to field coordinates
        pub fn set_target(&mut self, x: f32, y: f32) {
            self.input.target = Some(Vec2::new(x, y));
        }

        pub fn clear_target(&mut self) {
            self.input.target = None;
        }

        /// "easy", "normal" or "hard"; applies from the next start
        pub fn set_difficulty(&mut self, name: &str) -> bool {
            let Some(difficulty) = DifficultyMode::parse(name) else {
                log::warn!("Unknown difficulty {:?}", name);
                return false;
            };
            let settings = Settings {
                difficulty,
                ..self.session.settings().clone()
            };
            self.session.set_settings(settings);
            true
        }

        pub fn set_muted(&mut self, muted: bool) {
            let settings = Settings {
                muted,
                ..self.session.settings().clone()
            };
            self.session.set_settings(settings);
        }

        /// Advance one frame; returns the frame's events as JSON
        pub fn frame(&mut self, dt_ms: f32) -> String {
            let events = self.session.update(dt_ms, &self.input);
            serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
        }

        /// Committed frame as JSON for the canvas renderer
        pub fn snapshot(&self) -> String {
            serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|_| "{}".to_string())
        }

        pub fn is_running(&self) -> bool {
            self.session.is_running()
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Sky Force (web) ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::{Parser, ValueEnum};
    use glam::Vec2;

    use sky_force::consts::DEFAULT_SEED;
    use sky_force::sim::{GameEvent, HasBody, TickInput};
    use sky_force::{DifficultyMode, Profile, Session, Settings, Tuning};

    #[derive(Clone, Copy, Debug, ValueEnum)]
    enum CliDifficulty {
        Easy,
        Normal,
        Hard,
    }

    impl From<CliDifficulty> for DifficultyMode {
        fn from(value: CliDifficulty) -> Self {
            match value {
                CliDifficulty::Easy => DifficultyMode::Easy,
                CliDifficulty::Normal => DifficultyMode::Normal,
                CliDifficulty::Hard => DifficultyMode::Hard,
            }
        }
    }

    #[derive(Parser, Debug)]
    #[command(name = "sky-force")]
    #[command(about = "Headless Sky Force run driven by a simple autopilot")]
    struct Cli {
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = CliDifficulty::Normal)]
        difficulty: CliDifficulty,
        /// JSON balance override (any subset of fields)
        #[arg(long)]
        tuning: Option<PathBuf>,
        #[arg(long, default_value = "PILOT")]
        username: String,
        /// Frame delta fed to the session (ms)
        #[arg(long, default_value_t = 16.0)]
        frame_ms: f32,
        /// Stop after this much simulated time even if still alive
        #[arg(long, default_value_t = 300.0)]
        max_seconds: f32,
        /// Print the final snapshot HUD as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    }

    /// Chase the lowest enemy, sidestep bullets about to land
    fn autopilot(session: &Session) -> TickInput {
        let world = session.world();
        let Some(player) = world.player.as_ref() else {
            return TickInput::default();
        };
        let center = player.body.center();
        let cruise_y = world.tuning.field_height - 80.0;

        let mut x = world
            .enemies
            .iter()
            .filter(|e| e.is_active())
            .max_by(|a, b| a.body.pos.y.total_cmp(&b.body.pos.y))
            .map(|e| e.body.center().x)
            .unwrap_or(world.tuning.field_width / 2.0);

        let threat = world.enemy_bullets.iter().find(|b| {
            let c = b.body.center();
            b.is_active() && (c.x - x).abs() < 24.0 && c.y < center.y && center.y - c.y < 120.0
        });
        if let Some(bullet) = threat {
            let side = if bullet.body.center().x > world.tuning.field_width / 2.0 {
                -1.0
            } else {
                1.0
            };
            x += side * 48.0;
        }

        TickInput {
            target: Some(Vec2::new(x, cruise_y)),
        }
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        let tuning = match &cli.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Tuning::from_json(&json).with_context(|| format!("loading {}", path.display()))?
            }
            None => Tuning::default(),
        };
        let settings = Settings {
            difficulty: cli.difficulty.into(),
            ..Settings::load()
        };

        let mut session = Session::new(tuning, settings, Profile::new(cli.username.clone()), cli.seed)?;
        session.start();

        let max_frames = (cli.max_seconds * 1000.0 / cli.frame_ms.max(1.0)).ceil() as u64;
        let mut frames = 0u64;
        while session.is_running() && frames < max_frames {
            let input = autopilot(&session);
            for event in session.update(cli.frame_ms, &input) {
                match event {
                    GameEvent::TierChanged { tier } => log::info!("Tier {}", tier),
                    GameEvent::LevelUp { level } => log::info!("Level {}", level),
                    _ => {}
                }
            }
            frames += 1;
        }
        session.stop();

        let snapshot = session.snapshot();
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&snapshot.hud)?);
        } else {
            let hud = &snapshot.hud;
            println!(
                "{} flew {} m | score {} | level {} | kills {} | health {}/{}",
                session.profile().username,
                hud.distance,
                hud.score,
                hud.level,
                hud.enemies_killed,
                hud.health,
                hud.max_health
            );
            if let Some(run) = session.last_run() {
                println!("Game over. Leaderboard rank: {:?}", run.rank);
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Sky Force (native) starting...");
    headless::run()
}
