//! Collision detection
//!
//! Detection only: `detect_collisions` reports overlapping pairs and never
//! touches state. The tick applies the results afterward, so a bullet that
//! overlaps two enemies in one frame is reported against both before either
//! one reacts.

use super::entity::{Bullet, Enemy, HasBody, Player, Prop, Rect};

/// Half-open AABB overlap. Touching edges do not count.
#[inline]
pub fn aabb_intersects(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.right() && a.right() > b.pos.x && a.pos.y < b.bottom() && a.bottom() > b.pos.y
}

/// Overlap between two live entities
#[inline]
pub fn bodies_overlap(a: &impl HasBody, b: &impl HasBody) -> bool {
    aabb_intersects(&a.rect(), &b.rect())
}

/// Categorized hits for one frame. Entries are indices into the slices passed
/// to `detect_collisions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// (player bullet, enemy) pairs; a bullet may appear more than once
    pub player_bullet_hits: Vec<(usize, usize)>,
    /// Enemy bullets touching the player
    pub enemy_bullet_hits: Vec<usize>,
    /// Enemies rammed by the player
    pub body_collisions: Vec<usize>,
    /// Props under the player
    pub pickups: Vec<usize>,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        self.player_bullet_hits.is_empty()
            && self.enemy_bullet_hits.is_empty()
            && self.body_collisions.is_empty()
            && self.pickups.is_empty()
    }
}

/// Single detection pass over every live entity
pub fn detect_collisions(
    player: &Player,
    enemies: &[Enemy],
    player_bullets: &[Bullet],
    enemy_bullets: &[Bullet],
    props: &[Prop],
    now_ms: f64,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    // Player bullets vs enemies (no early exit per bullet)
    for (b_idx, bullet) in player_bullets.iter().enumerate() {
        if !bullet.is_active() {
            continue;
        }
        for (e_idx, enemy) in enemies.iter().enumerate() {
            if enemy.is_active() && bodies_overlap(bullet, enemy) {
                report.player_bullet_hits.push((b_idx, e_idx));
            }
        }
    }

    if !player.is_active() {
        return report;
    }

    let shielded = player.shield_active(now_ms);

    if !shielded {
        // Enemy bullets vs player
        for (idx, bullet) in enemy_bullets.iter().enumerate() {
            if bullet.is_active() && bodies_overlap(bullet, player) {
                report.enemy_bullet_hits.push(idx);
            }
        }

        // Player vs enemy bodies
        for (idx, enemy) in enemies.iter().enumerate() {
            if enemy.is_active() && bodies_overlap(player, enemy) {
                report.body_collisions.push(idx);
            }
        }
    }

    // Pickups ignore the shield
    for (idx, prop) in props.iter().enumerate() {
        if prop.is_active() && bodies_overlap(player, prop) {
            report.pickups.push(idx);
        }
    }

    report
}
