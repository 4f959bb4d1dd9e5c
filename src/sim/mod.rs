//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulation clock only (no wall time)
//! - Seeded RNG only
//! - Stable iteration order (insertion order, purged at end of frame)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod events;
pub mod factory;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, aabb_intersects, detect_collisions};
pub use entity::{
    Body, Bullet, BulletOwner, Effect, EffectKind, Enemy, EnemyType, EntityId, HasBody,
    HitOutcome, Missile, Player, Prop, PropType, Rect, RescuePlane, RescueState,
};
pub use events::{GameEvent, KillCause};
pub use factory::EntityFactory;
pub use progression::{
    DamageOutcome, Difficulty, GamePhase, PlayerStats, Progress, Progression,
};
pub use spawner::EnemySpawner;
pub use state::World;
pub use tick::{TickInput, apply_prop_effect, tick};
