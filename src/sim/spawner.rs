//! Timer-driven enemy spawner

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, EnemyType};
use super::factory::EntityFactory;
use super::progression::Difficulty;
use crate::tuning::Tuning;

/// Cumulative draw thresholds: LARGE below 0.1, MEDIUM below 0.4, SMALL above
const LARGE_THRESHOLD: f32 = 0.1;
const MEDIUM_THRESHOLD: f32 = 0.4;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemySpawner {
    /// Accumulated time since the last spawn (ms)
    timer_ms: f32,
}

impl EnemySpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.timer_ms = 0.0;
    }

    pub fn timer_ms(&self) -> f32 {
        self.timer_ms
    }

    /// Accumulate `dt_ms`; emit at most one enemy once the difficulty-scaled
    /// interval has elapsed.
    pub fn update<R: Rng>(
        &mut self,
        dt_ms: f32,
        difficulty: &Difficulty,
        tuning: &Tuning,
        factory: &mut EntityFactory,
        rng: &mut R,
    ) -> Option<Enemy> {
        self.timer_ms += dt_ms;
        let interval = tuning.spawn_interval_ms / difficulty.spawn_rate_multiplier;
        if self.timer_ms < interval {
            return None;
        }
        self.timer_ms = 0.0;
        Some(self.spawn(difficulty, tuning, factory, rng))
    }

    fn spawn<R: Rng>(
        &self,
        difficulty: &Difficulty,
        tuning: &Tuning,
        factory: &mut EntityFactory,
        rng: &mut R,
    ) -> Enemy {
        let enemy_type = select_enemy_type(rng.random::<f32>());
        let stats = tuning.enemies.get(enemy_type);
        // Start just above the visible field so it scrolls in
        let x = rng.random::<f32>() * (tuning.field_width - stats.width);
        let y = -stats.height;
        factory.enemy(
            tuning,
            Vec2::new(x, y),
            enemy_type,
            difficulty.enemy_health_multiplier,
            difficulty.enemy_damage_multiplier,
        )
    }
}

/// Map a uniform roll in [0, 1) to an enemy type (10% / 30% / 60%)
pub fn select_enemy_type(roll: f32) -> EnemyType {
    if roll < LARGE_THRESHOLD {
        EnemyType::Large
    } else if roll < MEDIUM_THRESHOLD {
        EnemyType::Medium
    } else {
        EnemyType::Small
    }
}
