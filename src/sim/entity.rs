//! Entity records
//!
//! Plain data for everything that lives on the play field. Entities are never
//! removed mid-frame: handlers flip `active` off and the end-of-frame purge
//! drops them, so lists stay stable while they are being iterated.

use glam::Vec2;
use serde::{Deserialize, Serialize, Serializer};

/// Session-unique entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Physical state shared by every collidable entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    /// px/s
    pub vel: Vec2,
    active: bool,
}

impl Body {
    pub fn new(id: EntityId, pos: Vec2, size: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            size,
            vel,
            active: true,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark dead. There is no way back.
    #[inline]
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Move by velocity over `dt_ms`
    pub fn integrate(&mut self, dt_ms: f32) {
        self.pos += self.vel * (dt_ms / 1000.0);
    }
}

/// Anything with a body
pub trait HasBody {
    fn body(&self) -> &Body;

    fn is_active(&self) -> bool {
        self.body().is_active()
    }

    fn rect(&self) -> Rect {
        self.body().rect()
    }
}

macro_rules! impl_has_body {
    ($($ty:ty),* $(,)?) => {
        $(impl HasBody for $ty {
            #[inline]
            fn body(&self) -> &Body {
                &self.body
            }
        })*
    };
}

impl_has_body!(Player, Enemy, Bullet, Prop, Missile, RescuePlane);

/// Shared auto-fire rule: ready once `1000 / rate` ms have passed since the
/// last shot. Something that has never fired is always ready.
pub fn fire_ready(last_fire_ms: Option<f64>, fire_rate: f32, now_ms: f64) -> bool {
    match last_fire_ms {
        None => true,
        Some(last) => now_ms - last >= 1000.0 / fire_rate as f64,
    }
}

fn clamp_non_negative<S: Serializer>(health: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i32((*health).max(0))
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub health: i32,
    pub max_health: i32,
    /// Shots per second
    pub fire_rate: f32,
    pub bullet_lanes: u32,
    pub bullet_damage: i32,
    pub last_fire_ms: Option<f64>,
    pub has_shield: bool,
    /// Absolute sim time the shield runs out
    pub shield_end_ms: f64,
}

impl Player {
    /// Shield is up and not yet expired
    pub fn shield_active(&self, now_ms: f64) -> bool {
        self.has_shield && now_ms < self.shield_end_ms
    }

    pub fn can_fire(&self, now_ms: f64) -> bool {
        fire_ready(self.last_fire_ms, self.fire_rate, now_ms)
    }
}

/// Enemy size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnemyType {
    Small,
    Medium,
    Large,
}

/// Result of a single damage application to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Enemy was already dead; nothing changed
    Ignored,
    Damaged,
    /// This hit moved the enemy from alive to dead
    Killed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub enemy_type: EnemyType,
    /// May dip below zero on overkill. Read it through `displayed_health`.
    #[serde(serialize_with = "clamp_non_negative")]
    pub(crate) health: i32,
    pub max_health: i32,
    /// Contact damage
    pub damage: i32,
    pub score_value: u32,
    pub fire_rate: f32,
    pub last_fire_ms: Option<f64>,
}

impl Enemy {
    /// Apply damage. Reports `Killed` exactly once, on the hit that crosses
    /// zero; later hits on a dead enemy are ignored.
    pub fn take_hit(&mut self, damage: i32) -> HitOutcome {
        if !self.body.is_active() || self.health <= 0 {
            return HitOutcome::Ignored;
        }
        self.health -= damage;
        if self.health <= 0 {
            self.body.deactivate();
            HitOutcome::Killed
        } else {
            HitOutcome::Damaged
        }
    }

    /// Health as shown to renderers and the HUD, never negative
    pub fn displayed_health(&self) -> i32 {
        self.health.max(0)
    }

    pub fn can_fire(&self, now_ms: f64) -> bool {
        fire_ready(self.last_fire_ms, self.fire_rate, now_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
    pub damage: i32,
    pub owner: BulletOwner,
}

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropType {
    Shield,
    Nuke,
    Missile,
    Rescue,
}

impl PropType {
    /// Drop-roll order
    pub const ALL: [PropType; 4] = [
        PropType::Shield,
        PropType::Nuke,
        PropType::Missile,
        PropType::Rescue,
    ];
}

/// A collectible power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prop {
    pub body: Body,
    pub prop_type: PropType,
}

/// Straight-line missile from the barrage power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub body: Body,
    pub damage: i32,
    pub start: Vec2,
    pub end: Vec2,
    /// Fraction of the path covered, 0..1
    pub progress: f32,
    /// Enemies already damaged by this missile
    pub hit_enemies: Vec<EntityId>,
}

impl Missile {
    pub fn path_length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Advance along the path. Returns false (and deactivates) once the end is
    /// reached.
    pub fn advance(&mut self, dt_ms: f32, speed: f32) -> bool {
        let length = self.path_length();
        if length <= f32::EPSILON {
            self.body.deactivate();
            return false;
        }
        self.progress += speed * (dt_ms / 1000.0) / length;
        if self.progress >= 1.0 {
            self.body.deactivate();
            return false;
        }
        self.body.pos = self.start.lerp(self.end, self.progress);
        true
    }

    /// Record a hit on `enemy`. Returns false if this pair already connected.
    pub fn record_hit(&mut self, enemy: EntityId) -> bool {
        if self.hit_enemies.contains(&enemy) {
            return false;
        }
        self.hit_enemies.push(enemy);
        true
    }
}

/// Rescue plane lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RescueState {
    /// Climbing toward the target altitude
    Arriving,
    /// Parked at the target since `since_ms`; heal already applied
    Healing { since_ms: f64 },
    /// Climbing off the top of the field
    Leaving,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescuePlane {
    pub body: Body,
    pub heal_amount: i32,
    pub target_y: f32,
    pub state: RescueState,
}

/// Cosmetic effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Explosion,
    Nuke,
    MissileTrail,
    Heal,
}

/// Time-based visual effect. Frame is derived from elapsed sim time, never
/// from frame count, so pacing doesn't depend on the host's refresh rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub id: EntityId,
    pub pos: Vec2,
    pub kind: EffectKind,
    pub frame: u32,
    pub max_frames: u32,
    pub start_ms: f64,
    pub duration_ms: f32,
}

impl Effect {
    /// Recompute the animation frame for `now_ms`
    pub fn update(&mut self, now_ms: f64) {
        let elapsed = (now_ms - self.start_ms).max(0.0);
        if elapsed >= self.duration_ms as f64 {
            self.frame = self.max_frames;
        } else {
            let t = elapsed / self.duration_ms as f64;
            self.frame = ((t * self.max_frames as f64) as u32).min(self.max_frames);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.max_frames
    }
}
