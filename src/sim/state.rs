//! World state
//!
//! Everything the tick owns between frames: entity lists, the sim clock, the
//! seeded RNG and the pending event queue. Persistent player progress lives in
//! the progression store instead.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Bullet, Effect, Enemy, Missile, Player, Prop, RescuePlane};
use super::events::GameEvent;
use super::factory::EntityFactory;
use super::progression::PlayerStats;
use super::spawner::EnemySpawner;
use crate::tuning::Tuning;

/// Complete simulation world for one session
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub factory: EntityFactory,
    pub spawner: EnemySpawner,
    /// None before the first start
    pub player: Option<Player>,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub props: Vec<Prop>,
    pub effects: Vec<Effect>,
    pub missiles: Vec<Missile>,
    pub rescue_planes: Vec<RescuePlane>,
    /// Starfield scroll, wraps at field height
    pub bg_offset: f32,
    /// Simulation clock (ms since session start)
    pub now_ms: f64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl World {
    /// Empty world with no player
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            factory: EntityFactory::new(),
            spawner: EnemySpawner::new(),
            player: None,
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            props: Vec::new(),
            effects: Vec::new(),
            missiles: Vec::new(),
            rescue_planes: Vec::new(),
            bg_offset: 0.0,
            now_ms: 0.0,
            events: Vec::new(),
        }
    }

    /// Wipe every list and counter, reseed, and place a fresh player at the
    /// bottom center of the field.
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.factory.reset();
        self.spawner.reset();
        self.player = None;
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.props.clear();
        self.effects.clear();
        self.missiles.clear();
        self.rescue_planes.clear();
        self.bg_offset = 0.0;
        self.now_ms = 0.0;
        self.events.clear();

        let t = &self.tuning;
        let pos = Vec2::new(
            t.field_width / 2.0 - t.player.width / 2.0,
            t.field_height - t.player.height - t.player.spawn_margin,
        );
        self.player = Some(self.factory.player(&self.tuning, pos));
    }

    /// Copy store-owned stats onto the player entity
    pub fn sync_player(&mut self, stats: &PlayerStats) {
        if let Some(player) = self.player.as_mut() {
            player.health = stats.health;
            player.max_health = stats.max_health;
            player.fire_rate = stats.fire_rate;
            player.bullet_lanes = stats.bullet_lanes;
            player.bullet_damage = stats.bullet_damage;
            player.has_shield = stats.has_shield;
            player.shield_end_ms = stats.shield_end_ms;
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Center of the play field
    pub fn field_center(&self) -> Vec2 {
        Vec2::new(self.tuning.field_width, self.tuning.field_height) * 0.5
    }

    /// Live enemy count
    pub fn active_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.body.is_active()).count()
    }
}
