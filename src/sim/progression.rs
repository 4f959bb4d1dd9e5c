//! Progression store
//!
//! Single source of truth for everything that persists across frames: score,
//! health, level, distance, difficulty tier and the session phase. The tick
//! only changes it through the named operations below, which keep health
//! clamped and fire game over exactly once.

use serde::{Deserialize, Serialize};

use crate::settings::DifficultyMode;
use crate::tuning::{DifficultyTuning, PlayerTuning, Tuning, UpgradeTuning};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Waiting on the start screen
    Menu,
    Playing,
    Paused,
    /// Run ended; terminal until reset
    GameOver,
}

/// Player-facing stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub health: i32,
    pub max_health: i32,
    pub score: u64,
    pub level: u32,
    pub experience: u64,
    pub exp_to_next_level: u64,
    pub fire_rate: f32,
    pub bullet_lanes: u32,
    pub bullet_damage: i32,
    pub has_shield: bool,
    pub shield_end_ms: f64,
}

/// Run counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Meters flown
    pub distance: f64,
    pub enemies_killed: u32,
    pub play_time_ms: f64,
}

/// Current tier and the enemy multipliers derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub tier: u32,
    pub enemy_health_multiplier: f32,
    pub enemy_damage_multiplier: f32,
    pub spawn_rate_multiplier: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            tier: 1,
            enemy_health_multiplier: 1.0,
            enemy_damage_multiplier: 1.0,
            spawn_rate_multiplier: 1.0,
        }
    }
}

impl Difficulty {
    /// Multipliers for `tier` under `mode`
    pub fn for_tier(tier: u32, mode: DifficultyMode, rules: &DifficultyTuning) -> Self {
        let base = mode.base_multipliers();
        let steps = tier.saturating_sub(1) as f32;
        Self {
            tier,
            enemy_health_multiplier: base.health * (1.0 + steps * rules.health_per_tier),
            enemy_damage_multiplier: base.damage * (1.0 + steps * rules.damage_per_tier),
            spawn_rate_multiplier: base.spawn_rate * (1.0 + steps * rules.spawn_rate_per_tier),
        }
    }
}

/// What a damage request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Shield absorbed it
    Blocked,
    /// Player already at zero; nothing changed
    Ignored,
    Damaged { remaining: i32 },
    /// This hit took the player to zero and ended the run
    Lethal,
}

/// Rules the store needs, copied out of `Tuning` at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Rules {
    player: PlayerTuning,
    upgrade: UpgradeTuning,
    difficulty: DifficultyTuning,
    shield_duration_ms: f32,
}

/// Injected progression context for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    phase: GamePhase,
    player: PlayerStats,
    progress: Progress,
    difficulty: Difficulty,
    mode: DifficultyMode,
    /// Loaded from the profile; read-only for the simulation
    personal_best: u64,
    rules: Rules,
}

impl Progression {
    pub fn new(tuning: &Tuning, mode: DifficultyMode) -> Self {
        let rules = Rules {
            player: tuning.player.clone(),
            upgrade: tuning.upgrade.clone(),
            difficulty: tuning.difficulty.clone(),
            shield_duration_ms: tuning.props.shield_duration_ms,
        };
        Self {
            phase: GamePhase::Menu,
            player: initial_stats(&rules),
            progress: Progress::default(),
            difficulty: Difficulty::for_tier(1, mode, &rules.difficulty),
            mode,
            personal_best: 0,
            rules,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn player(&self) -> &PlayerStats {
        &self.player
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn mode(&self) -> DifficultyMode {
        self.mode
    }

    pub fn personal_best(&self) -> u64 {
        self.personal_best
    }

    pub fn set_personal_best(&mut self, distance: u64) {
        self.personal_best = distance;
    }

    // === Phase ===

    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
        }
    }

    pub fn end_game(&mut self) {
        self.phase = GamePhase::GameOver;
    }

    /// Back to the menu with fresh stats. `mode` applies to the next run.
    pub fn reset(&mut self, mode: DifficultyMode) {
        self.mode = mode;
        self.phase = GamePhase::Menu;
        self.player = initial_stats(&self.rules);
        self.progress = Progress::default();
        self.difficulty = Difficulty::for_tier(1, mode, &self.rules.difficulty);
    }

    // === Player ===

    pub fn add_score(&mut self, points: u64) {
        self.player.score += points;
    }

    /// Grant experience and settle every level-up it pays for. Returns the
    /// number of levels gained.
    pub fn add_experience(&mut self, exp: u64) -> u32 {
        let p = &mut self.player;
        let player_rules = &self.rules.player;
        let upgrade = &self.rules.upgrade;

        p.experience += exp;
        let mut gained = 0;
        while p.experience >= p.exp_to_next_level {
            p.experience -= p.exp_to_next_level;
            p.level += 1;
            gained += 1;

            if p.fire_rate < player_rules.max_fire_rate {
                p.fire_rate = (p.fire_rate + upgrade.fire_rate_step).min(player_rules.max_fire_rate);
            } else if p.bullet_lanes < upgrade.max_lanes {
                // Capped: trade rate for another lane and climb again
                p.fire_rate = player_rules.max_fire_rate / 2.0;
                p.bullet_lanes += 1;
            }

            p.bullet_damage = bullet_damage_for_level(player_rules, p.level);
            p.exp_to_next_level = exp_for_level(upgrade, p.level);
        }
        if gained > 0 {
            log::debug!(
                "Level up x{} -> {} (rate {}, lanes {}, dmg {})",
                gained,
                p.level,
                p.fire_rate,
                p.bullet_lanes,
                p.bullet_damage
            );
        }
        gained
    }

    /// Apply damage unless the shield is up at `now_ms`
    pub fn take_damage(&mut self, damage: i32, now_ms: f64) -> DamageOutcome {
        if self.shield_active(now_ms) {
            return DamageOutcome::Blocked;
        }
        if self.player.health <= 0 {
            return DamageOutcome::Ignored;
        }
        self.player.health = (self.player.health - damage.max(0)).max(0);
        if self.player.health == 0 {
            self.end_game();
            DamageOutcome::Lethal
        } else {
            DamageOutcome::Damaged {
                remaining: self.player.health,
            }
        }
    }

    /// Restore health up to max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.player.health;
        self.player.health = (before + amount.max(0)).min(self.player.max_health);
        self.player.health - before
    }

    pub fn shield_active(&self, now_ms: f64) -> bool {
        self.player.has_shield && now_ms < self.player.shield_end_ms
    }

    /// Raise the shield; a second pickup restarts the timer instead of stacking
    pub fn activate_shield(&mut self, now_ms: f64) {
        self.player.has_shield = true;
        self.player.shield_end_ms = now_ms + self.rules.shield_duration_ms as f64;
    }

    pub fn deactivate_shield(&mut self) {
        self.player.has_shield = false;
        self.player.shield_end_ms = 0.0;
    }

    /// Drop the shield if it has run out. Returns true if it expired now.
    pub fn expire_shield(&mut self, now_ms: f64) -> bool {
        if self.player.has_shield && now_ms >= self.player.shield_end_ms {
            self.deactivate_shield();
            true
        } else {
            false
        }
    }

    // === Progress ===

    pub fn advance_distance(&mut self, meters: f64) {
        self.progress.distance += meters.max(0.0);
    }

    pub fn advance_play_time(&mut self, dt_ms: f64) {
        self.progress.play_time_ms += dt_ms.max(0.0);
    }

    pub fn increment_kills(&mut self) {
        self.progress.enemies_killed += 1;
    }

    // === Difficulty ===

    /// Recompute the tier from distance. Tiers only go up. Returns the new tier
    /// when it changed.
    pub fn update_difficulty(&mut self) -> Option<u32> {
        let tier = tier_for_distance(self.progress.distance, &self.rules.difficulty);
        if tier <= self.difficulty.tier {
            return None;
        }
        self.difficulty = Difficulty::for_tier(tier, self.mode, &self.rules.difficulty);
        Some(tier)
    }
}

fn initial_stats(rules: &Rules) -> PlayerStats {
    PlayerStats {
        health: rules.player.max_health,
        max_health: rules.player.max_health,
        score: 0,
        level: 1,
        experience: 0,
        exp_to_next_level: exp_for_level(&rules.upgrade, 1),
        fire_rate: rules.player.initial_fire_rate,
        bullet_lanes: 1,
        bullet_damage: rules.player.bullet_damage,
        has_shield: false,
        shield_end_ms: 0.0,
    }
}

/// Experience needed to clear `level`
pub fn exp_for_level(upgrade: &UpgradeTuning, level: u32) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    let needed = (upgrade.base_exp as f64 * upgrade.exp_growth.powi(exponent)).floor();
    (needed as u64).max(1)
}

/// Bullet damage is a pure function of level
pub fn bullet_damage_for_level(player: &PlayerTuning, level: u32) -> i32 {
    player.bullet_damage + level.saturating_sub(1) as i32 * player.damage_per_level
}

/// `floor(distance / distance_per_tier) + 1`
pub fn tier_for_distance(distance: f64, rules: &DifficultyTuning) -> u32 {
    (distance.max(0.0) / rules.distance_per_tier).floor() as u32 + 1
}
