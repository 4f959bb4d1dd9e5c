//! Entity construction
//!
//! Pure constructors: every entity comes out fully populated and active with a
//! fresh id. The id counter is the only state and restarts with each session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{
    Body, Bullet, BulletOwner, Effect, EffectKind, Enemy, EnemyType, EntityId, Missile, Player,
    Prop, PropType, RescuePlane, RescueState,
};
use crate::tuning::Tuning;

/// Monotonic id source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityFactory {
    next_id: u32,
}

impl Default for EntityFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityFactory {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Restart ids at 1 (new session)
    pub fn reset(&mut self) {
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn player(&mut self, tuning: &Tuning, pos: Vec2) -> Player {
        let t = &tuning.player;
        Player {
            body: Body::new(
                self.next_entity_id(),
                pos,
                Vec2::new(t.width, t.height),
                Vec2::ZERO,
            ),
            health: t.max_health,
            max_health: t.max_health,
            fire_rate: t.initial_fire_rate,
            bullet_lanes: 1,
            bullet_damage: t.bullet_damage,
            last_fire_ms: None,
            has_shield: false,
            shield_end_ms: 0.0,
        }
    }

    /// Enemy with health/damage scaled (and floored) by the current difficulty
    pub fn enemy(
        &mut self,
        tuning: &Tuning,
        pos: Vec2,
        enemy_type: EnemyType,
        health_multiplier: f32,
        damage_multiplier: f32,
    ) -> Enemy {
        let stats = tuning.enemies.get(enemy_type);
        // Never spawn an enemy that is already dead
        let health = ((stats.health as f32 * health_multiplier).floor() as i32).max(1);
        Enemy {
            body: Body::new(
                self.next_entity_id(),
                pos,
                Vec2::new(stats.width, stats.height),
                Vec2::new(0.0, stats.speed),
            ),
            enemy_type,
            health,
            max_health: health,
            damage: (stats.damage as f32 * damage_multiplier).floor() as i32,
            score_value: stats.score,
            fire_rate: stats.fire_rate,
            last_fire_ms: None,
        }
    }

    /// Bullet centered horizontally on `center_x`
    pub fn bullet(
        &mut self,
        tuning: &Tuning,
        center_x: f32,
        y: f32,
        owner: BulletOwner,
        damage: i32,
        vel_y: f32,
    ) -> Bullet {
        let size = tuning.bullet_size;
        Bullet {
            body: Body::new(
                self.next_entity_id(),
                Vec2::new(center_x - size / 2.0, y),
                Vec2::splat(size),
                Vec2::new(0.0, vel_y),
            ),
            damage,
            owner,
        }
    }

    /// Prop centered horizontally on `center_x`, falling
    pub fn prop(&mut self, tuning: &Tuning, center_x: f32, y: f32, prop_type: PropType) -> Prop {
        let t = &tuning.props;
        Prop {
            body: Body::new(
                self.next_entity_id(),
                Vec2::new(center_x - t.width / 2.0, y),
                Vec2::new(t.width, t.height),
                Vec2::new(0.0, t.speed),
            ),
            prop_type,
        }
    }

    pub fn missile(&mut self, tuning: &Tuning, start: Vec2, end: Vec2, damage: i32) -> Missile {
        Missile {
            body: Body::new(
                self.next_entity_id(),
                start,
                Vec2::splat(tuning.missile.size),
                Vec2::ZERO,
            ),
            damage,
            start,
            end,
            progress: 0.0,
            hit_enemies: Vec::new(),
        }
    }

    /// Rescue plane entering from below the field at `x`
    pub fn rescue_plane(
        &mut self,
        tuning: &Tuning,
        x: f32,
        heal_amount: i32,
        target_y: f32,
    ) -> RescuePlane {
        let t = &tuning.rescue;
        RescuePlane {
            body: Body::new(
                self.next_entity_id(),
                Vec2::new(x, tuning.field_height + t.entry_offset),
                Vec2::new(t.width, t.height),
                Vec2::new(0.0, -t.speed),
            ),
            heal_amount,
            target_y,
            state: RescueState::Arriving,
        }
    }

    pub fn effect(&mut self, tuning: &Tuning, kind: EffectKind, pos: Vec2, now_ms: f64) -> Effect {
        let timing = tuning.effects.timing(kind);
        Effect {
            id: self.next_entity_id(),
            pos,
            kind,
            frame: 0,
            max_frames: timing.max_frames,
            start_ms: now_ms,
            duration_ms: timing.duration_ms,
        }
    }
}
