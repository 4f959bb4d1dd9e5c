//! Data-driven game balance
//!
//! Every number the simulation uses lives here. `Tuning::default()` is the
//! shipped balance; a JSON override may replace any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::entity::{EffectKind, EnemyType, PropType};

/// Player craft balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub max_health: i32,
    /// Shots per second at level 1
    pub initial_fire_rate: f32,
    /// Fire rate cap; reaching it converts further upgrades into lanes
    pub max_fire_rate: f32,
    pub bullet_damage: i32,
    /// Added to bullet damage for every level above 1
    pub damage_per_level: i32,
    /// px/s, upward
    pub bullet_speed: f32,
    /// Horizontal gap between parallel lanes (px)
    pub lane_spacing: f32,
    /// Distance from the bottom edge at spawn (px)
    pub spawn_margin: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 32.0,
            max_health: 100,
            initial_fire_rate: 2.0,
            max_fire_rate: 10.0,
            bullet_damage: 10,
            damage_per_level: 2,
            bullet_speed: 400.0,
            lane_spacing: 15.0,
            spawn_margin: 50.0,
        }
    }
}

/// Base stats for one enemy type (before difficulty scaling)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyStats {
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub damage: i32,
    pub score: u32,
    /// px/s, downward
    pub speed: f32,
    /// Shots per second
    pub fire_rate: f32,
}

/// Per-type enemy table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub small: EnemyStats,
    pub medium: EnemyStats,
    pub large: EnemyStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            small: EnemyStats {
                width: 24.0,
                height: 24.0,
                health: 20,
                damage: 10,
                score: 10,
                speed: 80.0,
                fire_rate: 0.5,
            },
            medium: EnemyStats {
                width: 32.0,
                height: 32.0,
                health: 50,
                damage: 20,
                score: 30,
                speed: 60.0,
                fire_rate: 0.8,
            },
            large: EnemyStats {
                width: 48.0,
                height: 48.0,
                health: 100,
                damage: 30,
                score: 50,
                speed: 40.0,
                fire_rate: 1.0,
            },
        }
    }
}

impl EnemyTable {
    pub fn get(&self, enemy_type: EnemyType) -> &EnemyStats {
        match enemy_type {
            EnemyType::Small => &self.small,
            EnemyType::Medium => &self.medium,
            EnemyType::Large => &self.large,
        }
    }
}

/// Drop probability per prop type, rolled in this order on every kill
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DropChances {
    pub shield: f32,
    pub nuke: f32,
    pub missile: f32,
    pub rescue: f32,
}

impl Default for DropChances {
    fn default() -> Self {
        Self {
            shield: 0.1,
            nuke: 0.1,
            missile: 0.1,
            rescue: 0.1,
        }
    }
}

impl DropChances {
    pub fn get(&self, prop_type: PropType) -> f32 {
        match prop_type {
            PropType::Shield => self.shield,
            PropType::Nuke => self.nuke,
            PropType::Missile => self.missile,
            PropType::Rescue => self.rescue,
        }
    }

    pub fn total(&self) -> f32 {
        self.shield + self.nuke + self.missile + self.rescue
    }
}

/// Pickup balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropTuning {
    pub width: f32,
    pub height: f32,
    /// Fall speed (px/s)
    pub speed: f32,
    pub shield_duration_ms: f32,
    pub drop_chances: DropChances,
}

impl Default for PropTuning {
    fn default() -> Self {
        Self {
            width: 24.0,
            height: 24.0,
            speed: 100.0,
            shield_duration_ms: 10_000.0,
            drop_chances: DropChances::default(),
        }
    }
}

/// Missile barrage balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileTuning {
    /// Missile damage = player bullet damage * this
    pub damage_multiplier: i32,
    /// px/s along the corner-to-corner path
    pub speed: f32,
    pub size: f32,
    /// Per-frame probability of leaving a trail puff
    pub trail_chance: f32,
}

impl Default for MissileTuning {
    fn default() -> Self {
        Self {
            damage_multiplier: 3,
            speed: 600.0,
            size: 16.0,
            trail_chance: 0.3,
        }
    }
}

/// Rescue plane balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RescueTuning {
    /// Fraction of max health restored
    pub heal_percent: f32,
    pub width: f32,
    pub height: f32,
    /// px/s, upward
    pub speed: f32,
    /// How far below the field the plane enters (px)
    pub entry_offset: f32,
    /// Hover time between healing and leaving (ms)
    pub heal_hold_ms: f32,
    /// Cosmetic heal puffs spawned over the player
    pub heal_particles: u32,
}

impl Default for RescueTuning {
    fn default() -> Self {
        Self {
            heal_percent: 0.3,
            width: 32.0,
            height: 32.0,
            speed: 150.0,
            entry_offset: 50.0,
            heal_hold_ms: 500.0,
            heal_particles: 5,
        }
    }
}

/// Distance-driven difficulty growth
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    /// Meters per tier
    pub distance_per_tier: f64,
    pub health_per_tier: f32,
    pub damage_per_tier: f32,
    pub spawn_rate_per_tier: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            distance_per_tier: 1000.0,
            health_per_tier: 0.2,
            damage_per_tier: 0.15,
            spawn_rate_per_tier: 0.3,
        }
    }
}

/// Experience curve and per-level upgrades
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeTuning {
    pub base_exp: u64,
    /// Threshold growth per level (exp_for(level) = base * growth^(level-1))
    pub exp_growth: f64,
    pub fire_rate_step: f32,
    pub max_lanes: u32,
}

impl Default for UpgradeTuning {
    fn default() -> Self {
        Self {
            base_exp: 10,
            exp_growth: 1.2,
            fire_rate_step: 1.0,
            max_lanes: 4,
        }
    }
}

/// Frame count and wall duration of a cosmetic effect
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EffectTiming {
    pub max_frames: u32,
    pub duration_ms: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub explosion: EffectTiming,
    pub nuke: EffectTiming,
    pub missile_trail: EffectTiming,
    pub heal: EffectTiming,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            explosion: EffectTiming {
                max_frames: 8,
                duration_ms: 500.0,
            },
            nuke: EffectTiming {
                max_frames: 16,
                duration_ms: 1000.0,
            },
            missile_trail: EffectTiming {
                max_frames: 6,
                duration_ms: 300.0,
            },
            heal: EffectTiming {
                max_frames: 10,
                duration_ms: 800.0,
            },
        }
    }
}

impl EffectTuning {
    pub fn timing(&self, kind: EffectKind) -> EffectTiming {
        match kind {
            EffectKind::Explosion => self.explosion,
            EffectKind::Nuke => self.nuke,
            EffectKind::MissileTrail => self.missile_trail,
            EffectKind::Heal => self.heal,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,
    pub player: PlayerTuning,
    pub enemies: EnemyTable,
    pub spawn_interval_ms: f32,
    pub enemy_bullet_speed: f32,
    pub enemy_bullet_damage: i32,
    /// Square bullet edge (px)
    pub bullet_size: f32,
    pub props: PropTuning,
    pub missile: MissileTuning,
    pub rescue: RescueTuning,
    pub difficulty: DifficultyTuning,
    pub upgrade: UpgradeTuning,
    /// Meters flown per second
    pub flight_speed: f32,
    /// Starfield scroll (px per ms)
    pub scroll_speed: f32,
    pub effects: EffectTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: 360.0,
            field_height: 640.0,
            player: PlayerTuning::default(),
            enemies: EnemyTable::default(),
            spawn_interval_ms: 2000.0,
            enemy_bullet_speed: 200.0,
            enemy_bullet_damage: 10,
            bullet_size: 8.0,
            props: PropTuning::default(),
            missile: MissileTuning::default(),
            rescue: RescueTuning::default(),
            difficulty: DifficultyTuning::default(),
            upgrade: UpgradeTuning::default(),
            flight_speed: 100.0,
            scroll_speed: 0.1,
            effects: EffectTuning::default(),
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTuning {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn require_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTuning {
            field,
            reason: format!("must be within [0, 1], got {value}"),
        })
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("field_width", self.field_width as f64)?;
        require_positive("field_height", self.field_height as f64)?;
        require_positive("player.width", self.player.width as f64)?;
        require_positive("player.height", self.player.height as f64)?;
        require_positive("player.max_health", self.player.max_health as f64)?;
        require_positive("player.initial_fire_rate", self.player.initial_fire_rate as f64)?;
        require_positive("player.max_fire_rate", self.player.max_fire_rate as f64)?;
        if self.player.initial_fire_rate > self.player.max_fire_rate {
            return Err(ConfigError::InvalidTuning {
                field: "player.initial_fire_rate",
                reason: "exceeds player.max_fire_rate".to_string(),
            });
        }
        for (field, stats) in [
            ("enemies.small", &self.enemies.small),
            ("enemies.medium", &self.enemies.medium),
            ("enemies.large", &self.enemies.large),
        ] {
            require_positive(field, stats.width as f64)?;
            require_positive(field, stats.height as f64)?;
            require_positive(field, stats.fire_rate as f64)?;
            if stats.width > self.field_width {
                return Err(ConfigError::InvalidTuning {
                    field,
                    reason: "wider than the play field".to_string(),
                });
            }
        }
        require_positive("spawn_interval_ms", self.spawn_interval_ms as f64)?;
        require_positive("missile.speed", self.missile.speed as f64)?;
        require_positive("flight_speed", self.flight_speed as f64)?;
        require_positive(
            "difficulty.distance_per_tier",
            self.difficulty.distance_per_tier,
        )?;
        if self.upgrade.base_exp == 0 {
            return Err(ConfigError::InvalidTuning {
                field: "upgrade.base_exp",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.upgrade.exp_growth.is_nan() || self.upgrade.exp_growth < 1.0 {
            return Err(ConfigError::InvalidTuning {
                field: "upgrade.exp_growth",
                reason: format!("must be >= 1, got {}", self.upgrade.exp_growth),
            });
        }
        if self.upgrade.max_lanes == 0 {
            return Err(ConfigError::InvalidTuning {
                field: "upgrade.max_lanes",
                reason: "must be at least 1".to_string(),
            });
        }
        let chances = &self.props.drop_chances;
        require_probability("props.drop_chances.shield", chances.shield)?;
        require_probability("props.drop_chances.nuke", chances.nuke)?;
        require_probability("props.drop_chances.missile", chances.missile)?;
        require_probability("props.drop_chances.rescue", chances.rescue)?;
        require_probability("props.drop_chances", chances.total())?;
        require_probability("missile.trail_chance", self.missile.trail_chance)?;
        require_probability("rescue.heal_percent", self.rescue.heal_percent)?;
        Ok(())
    }
}
