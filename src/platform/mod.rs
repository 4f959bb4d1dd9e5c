//! Platform abstraction layer
//!
//! Contracts between the simulation and the host:
//! - Input (pointer target in field coordinates)
//! - Rendering (read-only snapshot after each frame)
//! - Audio (fire-and-forget sound cues)

use glam::Vec2;
use serde::Serialize;

use crate::error::CollaboratorError;
use crate::sim::{
    Bullet, Effect, Enemy, GameEvent, GamePhase, Missile, Player, Prop, PropType, Progression,
    RescuePlane, World,
};

/// Supplies the current pointer target, read once at the start of each frame
pub trait InputProvider {
    fn target(&mut self) -> Option<Vec2>;
}

/// Fixed or absent target (tests, idle menus)
impl InputProvider for Option<Vec2> {
    fn target(&mut self) -> Option<Vec2> {
        *self
    }
}

/// Draws a frame. Never sees mutable simulation state; enemy health bars read
/// `Enemy::displayed_health`.
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot<'_>);
}

/// Plays sound cues. Errors are logged by the session and otherwise ignored.
pub trait AudioSink {
    /// `volume` is the effective sfx gain in 0..=1
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), CollaboratorError>;
}

/// Audio sink that drops everything
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundEffect {
    EnemyKill,
    PlayerHit,
    PickupShield,
    PickupNuke,
    PickupMissile,
    PickupRescue,
    LevelUp,
    GameOver,
}

impl SoundEffect {
    /// Cue for a gameplay event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::EnemyKilled { .. } => Some(SoundEffect::EnemyKill),
            GameEvent::PlayerDamaged { .. } => Some(SoundEffect::PlayerHit),
            GameEvent::PropCollected { prop_type } => Some(match prop_type {
                PropType::Shield => SoundEffect::PickupShield,
                PropType::Nuke => SoundEffect::PickupNuke,
                PropType::Missile => SoundEffect::PickupMissile,
                PropType::Rescue => SoundEffect::PickupRescue,
            }),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::EnemyEscaped { .. }
            | GameEvent::PlayerHealed { .. }
            | GameEvent::TierChanged { .. } => None,
        }
    }
}

/// HUD numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub health: i32,
    pub max_health: i32,
    pub level: u32,
    pub experience: u64,
    pub exp_to_next_level: u64,
    pub fire_rate: f32,
    pub bullet_lanes: u32,
    /// Whole meters flown
    pub distance: u64,
    pub tier: u32,
    pub enemies_killed: u32,
    pub personal_best: u64,
    /// Show the personal best marker (set, and not yet beaten this run)
    pub chasing_personal_best: bool,
    /// 0 when no shield is up
    pub shield_remaining_ms: f64,
}

/// Read-only view of one committed frame
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub field: Vec2,
    pub now_ms: f64,
    pub bg_offset: f32,
    pub player: Option<&'a Player>,
    pub enemies: &'a [Enemy],
    pub player_bullets: &'a [Bullet],
    pub enemy_bullets: &'a [Bullet],
    pub props: &'a [Prop],
    pub effects: &'a [Effect],
    pub missiles: &'a [Missile],
    pub rescue_planes: &'a [RescuePlane],
    pub hud: Hud,
}

impl<'a> Snapshot<'a> {
    pub fn capture(world: &'a World, progression: &Progression) -> Self {
        let stats = progression.player();
        let distance = progression.progress().distance.floor() as u64;
        let personal_best = progression.personal_best();
        let shield_remaining_ms = if progression.shield_active(world.now_ms) {
            stats.shield_end_ms - world.now_ms
        } else {
            0.0
        };

        Self {
            phase: progression.phase(),
            field: Vec2::new(world.tuning.field_width, world.tuning.field_height),
            now_ms: world.now_ms,
            bg_offset: world.bg_offset,
            player: world.player.as_ref(),
            enemies: &world.enemies,
            player_bullets: &world.player_bullets,
            enemy_bullets: &world.enemy_bullets,
            props: &world.props,
            effects: &world.effects,
            missiles: &world.missiles,
            rescue_planes: &world.rescue_planes,
            hud: Hud {
                score: stats.score,
                health: stats.health.max(0),
                max_health: stats.max_health,
                level: stats.level,
                experience: stats.experience,
                exp_to_next_level: stats.exp_to_next_level,
                fire_rate: stats.fire_rate,
                bullet_lanes: stats.bullet_lanes,
                distance,
                tier: progression.difficulty().tier,
                enemies_killed: progression.progress().enemies_killed,
                personal_best,
                chasing_personal_best: personal_best > 0 && distance < personal_best,
                shield_remaining_ms,
            },
        }
    }
}
