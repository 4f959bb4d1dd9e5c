//! Discrete gameplay events
//!
//! The tick appends these as things happen; the session drains them once per
//! frame and forwards them to the advisory collaborators (audio, logging).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EnemyType, EntityId, PropType};

/// What finished off an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KillCause {
    Bullet,
    Missile,
    Nuke,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Death transition; fires once per enemy
    EnemyKilled {
        id: EntityId,
        enemy_type: EnemyType,
        score: u32,
        pos: Vec2,
        cause: KillCause,
    },
    /// Left through the bottom edge; no reward
    EnemyEscaped { id: EntityId, enemy_type: EnemyType },
    PlayerDamaged { amount: i32, remaining: i32 },
    PropCollected { prop_type: PropType },
    PlayerHealed { amount: i32 },
    LevelUp { level: u32 },
    TierChanged { tier: u32 },
    /// Run over; `distance` in whole meters
    GameOver { score: u64, distance: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let event = GameEvent::PropCollected {
            prop_type: PropType::Nuke,
        };
        let json = serde_json::to_value(&event).expect("event serializes");
        assert_eq!(json["type"], "prop_collected");
        assert_eq!(json["prop_type"], "NUKE");
    }
}
