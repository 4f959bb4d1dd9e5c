//! Per-frame simulation tick
//!
//! Advances the world by one variable frame delta. Steps run in a fixed
//! order; later steps read state earlier steps have already committed.

use glam::Vec2;
use rand::Rng;

use super::collision::{bodies_overlap, detect_collisions};
use super::entity::{BulletOwner, EffectKind, HasBody, HitOutcome, PropType, RescueState};
use super::events::{GameEvent, KillCause};
use super::progression::{DamageOutcome, GamePhase, Progression};
use super::state::World;
use crate::consts::MAX_FRAME_DT_MS;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch position in field coordinates, None when nothing is pressed
    pub target: Option<Vec2>,
}

/// Advance the world by `dt_ms`, clamped to `[0, MAX_FRAME_DT_MS]`. Does
/// nothing unless the run is in progress.
pub fn tick(world: &mut World, progression: &mut Progression, input: &TickInput, dt_ms: f32) {
    if !progression.is_playing() || world.player.is_none() {
        return;
    }
    let dt_ms = dt_ms.clamp(0.0, MAX_FRAME_DT_MS);
    world.now_ms += dt_ms as f64;

    // Distance, play time, tier
    progression.advance_distance(world.tuning.flight_speed as f64 * dt_ms as f64 / 1000.0);
    progression.advance_play_time(dt_ms as f64);
    if let Some(tier) = progression.update_difficulty() {
        log::info!("Difficulty tier {} at {:.0} m", tier, progression.progress().distance);
        world.events.push(GameEvent::TierChanged { tier });
    }

    world.bg_offset =
        (world.bg_offset + dt_ms * world.tuning.scroll_speed) % world.tuning.field_height;

    world.sync_player(progression.player());
    track_player(world, input.target);
    player_fire(world);

    let difficulty = progression.difficulty().clone();
    if let Some(enemy) = world.spawner.update(
        dt_ms,
        &difficulty,
        &world.tuning,
        &mut world.factory,
        &mut world.rng,
    ) {
        world.enemies.push(enemy);
    }

    update_enemies(world, difficulty.enemy_damage_multiplier, dt_ms);
    update_bullets(world, dt_ms);
    update_props(world, dt_ms);
    update_effects(world);
    update_missiles(world, progression, dt_ms);
    update_rescue_planes(world, progression, dt_ms);

    resolve_collisions(world, progression);

    if progression.expire_shield(world.now_ms) {
        log::debug!("Shield expired at {:.0} ms", world.now_ms);
    }
    world.sync_player(progression.player());

    purge(world);

    if progression.phase() == GamePhase::GameOver {
        let score = progression.player().score;
        let distance = progression.progress().distance.floor() as u64;
        log::info!("Game over: {} m, score {}", distance, score);
        world.events.push(GameEvent::GameOver { score, distance });
    }
}

/// Snap the player to the pointer, clamped inside the field
fn track_player(world: &mut World, target: Option<Vec2>) {
    let field = Vec2::new(world.tuning.field_width, world.tuning.field_height);
    let (Some(player), Some(target)) = (world.player.as_mut(), target) else {
        return;
    };
    let size = player.body.size;
    player.body.pos = (target - size * 0.5).clamp(Vec2::ZERO, field - size);
}

/// One bullet per lane, spread evenly around the player's centerline
fn player_fire(world: &mut World) {
    let now = world.now_ms;
    let Some(player) = world.player.as_mut() else {
        return;
    };
    if !player.is_active() || !player.can_fire(now) {
        return;
    }
    player.last_fire_ms = Some(now);

    let lanes = player.bullet_lanes.max(1);
    let spacing = world.tuning.player.lane_spacing;
    let start_x = player.body.center().x - (lanes - 1) as f32 * spacing / 2.0;
    let y = player.body.pos.y;
    let damage = player.bullet_damage;
    let vel_y = -world.tuning.player.bullet_speed;

    for lane in 0..lanes {
        let x = start_x + lane as f32 * spacing;
        let bullet = world
            .factory
            .bullet(&world.tuning, x, y, BulletOwner::Player, damage, vel_y);
        world.player_bullets.push(bullet);
    }
}

fn update_enemies(world: &mut World, damage_multiplier: f32, dt_ms: f32) {
    let now = world.now_ms;
    let field_height = world.tuning.field_height;
    let bullet_damage = (world.tuning.enemy_bullet_damage as f32 * damage_multiplier).floor() as i32;
    let bullet_speed = world.tuning.enemy_bullet_speed;

    for enemy in world.enemies.iter_mut().filter(|e| e.is_active()) {
        enemy.body.integrate(dt_ms);

        if enemy.can_fire(now) {
            enemy.last_fire_ms = Some(now);
            let rect = enemy.rect();
            let bullet = world.factory.bullet(
                &world.tuning,
                rect.center().x,
                rect.bottom(),
                BulletOwner::Enemy,
                bullet_damage,
                bullet_speed,
            );
            world.enemy_bullets.push(bullet);
        }

        // Escaped, not killed
        if enemy.body.pos.y > field_height {
            enemy.body.deactivate();
            world.events.push(GameEvent::EnemyEscaped {
                id: enemy.body.id,
                enemy_type: enemy.enemy_type,
            });
        }
    }
}

fn update_bullets(world: &mut World, dt_ms: f32) {
    let field_height = world.tuning.field_height;
    for bullet in world
        .player_bullets
        .iter_mut()
        .chain(world.enemy_bullets.iter_mut())
        .filter(|b| b.is_active())
    {
        bullet.body.integrate(dt_ms);
        if bullet.body.pos.y < -bullet.body.size.y || bullet.body.pos.y > field_height {
            bullet.body.deactivate();
        }
    }
}

fn update_props(world: &mut World, dt_ms: f32) {
    let field_height = world.tuning.field_height;
    for prop in world.props.iter_mut().filter(|p| p.is_active()) {
        prop.body.integrate(dt_ms);
        if prop.body.pos.y > field_height {
            prop.body.deactivate();
        }
    }
}

fn update_effects(world: &mut World) {
    let now = world.now_ms;
    for effect in &mut world.effects {
        effect.update(now);
    }
    world.effects.retain(|e| !e.is_finished());
}

fn update_missiles(world: &mut World, progression: &mut Progression, dt_ms: f32) {
    let now = world.now_ms;
    let speed = world.tuning.missile.speed;
    let trail_chance = world.tuning.missile.trail_chance;
    let mut kills = Vec::new();

    for missile in world.missiles.iter_mut() {
        if !missile.is_active() || !missile.advance(dt_ms, speed) {
            continue;
        }

        if world.rng.random::<f32>() < trail_chance {
            let trail = world
                .factory
                .effect(&world.tuning, EffectKind::MissileTrail, missile.body.pos, now);
            world.effects.push(trail);
        }

        for (idx, enemy) in world.enemies.iter_mut().enumerate() {
            if !enemy.is_active() || !bodies_overlap(&*missile, &*enemy) {
                continue;
            }
            if !missile.record_hit(enemy.body.id) {
                continue;
            }
            let blast = world
                .factory
                .effect(&world.tuning, EffectKind::Explosion, enemy.body.center(), now);
            world.effects.push(blast);
            if enemy.take_hit(missile.damage) == HitOutcome::Killed {
                kills.push(idx);
            }
        }
    }

    for idx in kills {
        award_kill(world, progression, idx, KillCause::Missile);
    }
    world.missiles.retain(|m| m.is_active());
}

fn update_rescue_planes(world: &mut World, progression: &mut Progression, dt_ms: f32) {
    let now = world.now_ms;
    let hold_ms = world.tuning.rescue.heal_hold_ms as f64;
    let mut heals = Vec::new();

    for plane in world.rescue_planes.iter_mut().filter(|p| p.is_active()) {
        match plane.state {
            RescueState::Arriving => {
                plane.body.integrate(dt_ms);
                if plane.body.pos.y <= plane.target_y {
                    plane.body.pos.y = plane.target_y;
                    plane.state = RescueState::Healing { since_ms: now };
                    heals.push(plane.heal_amount);
                }
            }
            RescueState::Healing { since_ms } => {
                if now - since_ms >= hold_ms {
                    plane.state = RescueState::Leaving;
                }
            }
            RescueState::Leaving => {
                plane.body.integrate(dt_ms);
                if plane.body.pos.y < -plane.body.size.y {
                    plane.body.deactivate();
                }
            }
        }
    }

    for amount in heals {
        rescue_heal(world, progression, amount);
    }
    world.rescue_planes.retain(|p| p.is_active());
}

/// One-shot heal from a rescue plane plus the cosmetic puffs over the player
fn rescue_heal(world: &mut World, progression: &mut Progression, amount: i32) {
    let Some(rect) = world.player.as_ref().filter(|p| p.is_active()).map(|p| p.rect()) else {
        return;
    };
    if progression.player().health <= 0 {
        return;
    }
    let healed = progression.heal(amount);
    world.events.push(GameEvent::PlayerHealed { amount: healed });

    let now = world.now_ms;
    for _ in 0..world.tuning.rescue.heal_particles {
        let offset = Vec2::new(world.rng.random::<f32>(), world.rng.random::<f32>()) * rect.size;
        let puff = world
            .factory
            .effect(&world.tuning, EffectKind::Heal, rect.pos + offset, now);
        world.effects.push(puff);
    }
}

fn resolve_collisions(world: &mut World, progression: &mut Progression) {
    let Some(player) = world.player.as_ref() else {
        return;
    };
    let report = detect_collisions(
        player,
        &world.enemies,
        &world.player_bullets,
        &world.enemy_bullets,
        &world.props,
        world.now_ms,
    );
    if report.is_empty() {
        return;
    }

    for (b_idx, e_idx) in report.player_bullet_hits {
        let bullet = &mut world.player_bullets[b_idx];
        bullet.body.deactivate();
        let damage = bullet.damage;

        let enemy = &mut world.enemies[e_idx];
        if enemy.take_hit(damage) == HitOutcome::Killed {
            let center = enemy.body.center();
            spawn_effect(world, EffectKind::Explosion, center);
            award_kill(world, progression, e_idx, KillCause::Bullet);
        }
    }

    for b_idx in report.enemy_bullet_hits {
        let bullet = &mut world.enemy_bullets[b_idx];
        bullet.body.deactivate();
        let damage = bullet.damage;
        damage_player(world, progression, damage);
    }

    for e_idx in report.body_collisions {
        let enemy = &mut world.enemies[e_idx];
        // Already shot down earlier this frame
        if !enemy.is_active() {
            continue;
        }
        enemy.body.deactivate();
        let (center, damage) = (enemy.body.center(), enemy.damage);
        spawn_effect(world, EffectKind::Explosion, center);
        damage_player(world, progression, damage);
    }

    for p_idx in report.pickups {
        let prop = &mut world.props[p_idx];
        prop.body.deactivate();
        let prop_type = prop.prop_type;
        log::debug!("Picked up {:?}", prop_type);
        world.events.push(GameEvent::PropCollected { prop_type });
        apply_prop_effect(world, progression, prop_type);
    }
}

/// Route damage through the store and report what happened
fn damage_player(world: &mut World, progression: &mut Progression, amount: i32) {
    match progression.take_damage(amount, world.now_ms) {
        DamageOutcome::Blocked | DamageOutcome::Ignored => {}
        DamageOutcome::Damaged { remaining } => {
            world.events.push(GameEvent::PlayerDamaged { amount, remaining });
        }
        DamageOutcome::Lethal => {
            world.events.push(GameEvent::PlayerDamaged {
                amount,
                remaining: 0,
            });
        }
    }
}

/// Shared reward path for every kill: score, experience, kill count and
/// (except for the nuke) a drop roll. The caller has already seen the enemy
/// cross into death via `take_hit`.
fn award_kill(world: &mut World, progression: &mut Progression, idx: usize, cause: KillCause) {
    let Some(enemy) = world.enemies.get(idx) else {
        return;
    };
    let (id, enemy_type, score, pos) = (
        enemy.body.id,
        enemy.enemy_type,
        enemy.score_value,
        enemy.body.center(),
    );

    progression.add_score(score as u64);
    let levels = progression.add_experience(score as u64);
    progression.increment_kills();

    world.events.push(GameEvent::EnemyKilled {
        id,
        enemy_type,
        score,
        pos,
        cause,
    });
    if levels > 0 {
        world.events.push(GameEvent::LevelUp {
            level: progression.player().level,
        });
    }

    if cause != KillCause::Nuke {
        try_drop_prop(world, pos);
    }
}

/// Single uniform roll walked over the cumulative drop table
fn try_drop_prop(world: &mut World, pos: Vec2) {
    let roll = world.rng.random::<f32>();
    let chances = &world.tuning.props.drop_chances;
    let mut cumulative = 0.0;
    for prop_type in PropType::ALL {
        cumulative += chances.get(prop_type);
        if roll < cumulative {
            let prop = world.factory.prop(&world.tuning, pos.x, pos.y, prop_type);
            world.props.push(prop);
            return;
        }
    }
}

fn spawn_effect(world: &mut World, kind: EffectKind, pos: Vec2) {
    let effect = world.factory.effect(&world.tuning, kind, pos, world.now_ms);
    world.effects.push(effect);
}

/// Apply a collected power-up
pub fn apply_prop_effect(world: &mut World, progression: &mut Progression, prop_type: PropType) {
    match prop_type {
        PropType::Shield => {
            progression.activate_shield(world.now_ms);
            world.sync_player(progression.player());
        }
        PropType::Nuke => detonate_nuke(world, progression),
        PropType::Missile => launch_missiles(world, progression),
        PropType::Rescue => call_rescue(world, progression),
    }
}

/// Kill every live enemy through the normal reward path and clear enemy fire
fn detonate_nuke(world: &mut World, progression: &mut Progression) {
    for idx in 0..world.enemies.len() {
        let enemy = &mut world.enemies[idx];
        if !enemy.is_active() {
            continue;
        }
        let remaining = enemy.displayed_health();
        if enemy.take_hit(remaining) == HitOutcome::Killed {
            let center = enemy.body.center();
            spawn_effect(world, EffectKind::Explosion, center);
            award_kill(world, progression, idx, KillCause::Nuke);
        }
    }
    for bullet in &mut world.enemy_bullets {
        bullet.body.deactivate();
    }
    let center = world.field_center();
    spawn_effect(world, EffectKind::Nuke, center);
}

/// Four missiles, one from each corner toward the opposite corner
fn launch_missiles(world: &mut World, progression: &Progression) {
    let damage = progression.player().bullet_damage * world.tuning.missile.damage_multiplier;
    let (w, h) = (world.tuning.field_width, world.tuning.field_height);
    let paths = [
        (Vec2::new(0.0, 0.0), Vec2::new(w, h)),
        (Vec2::new(w, 0.0), Vec2::new(0.0, h)),
        (Vec2::new(0.0, h), Vec2::new(w, 0.0)),
        (Vec2::new(w, h), Vec2::new(0.0, 0.0)),
    ];
    for (start, end) in paths {
        let missile = world.factory.missile(&world.tuning, start, end, damage);
        world.missiles.push(missile);
    }
}

/// Rescue plane under the player, healing a share of max health on arrival
fn call_rescue(world: &mut World, progression: &Progression) {
    let Some(pos) = world.player.as_ref().map(|p| p.body.pos) else {
        return;
    };
    let max_health = progression.player().max_health;
    let heal = (max_health as f32 * world.tuning.rescue.heal_percent).floor() as i32;
    let plane = world.factory.rescue_plane(&world.tuning, pos.x, heal, pos.y);
    world.rescue_planes.push(plane);
}

/// Drop everything that died this frame
fn purge(world: &mut World) {
    world.enemies.retain(|e| e.is_active());
    world.player_bullets.retain(|b| b.is_active());
    world.enemy_bullets.retain(|b| b.is_active());
    world.props.retain(|p| p.is_active());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DifficultyMode;
    use crate::sim::entity::EnemyType;
    use crate::tuning::{DropChances, Tuning};

    fn playing(seed: u64) -> (World, Progression) {
        let tuning = Tuning::default();
        let mut world = World::new(tuning.clone(), seed);
        world.reset(seed);
        let mut progression = Progression::new(&tuning, DifficultyMode::Normal);
        progression.start();
        world.sync_player(progression.player());
        (world, progression)
    }

    fn add_enemy(world: &mut World, x: f32, y: f32, enemy_type: EnemyType) -> usize {
        let enemy = world
            .factory
            .enemy(&world.tuning, Vec2::new(x, y), enemy_type, 1.0, 1.0);
        world.enemies.push(enemy);
        world.enemies.len() - 1
    }

    fn count_events(world: &World, pred: impl Fn(&GameEvent) -> bool) -> usize {
        world.events.iter().filter(|e| pred(e)).count()
    }

    fn set_drops(world: &mut World, shield: f32, nuke: f32, missile: f32, rescue: f32) {
        world.tuning.props.drop_chances = DropChances {
            shield,
            nuke,
            missile,
            rescue,
        };
    }

    fn dropped(world: &World, prop_type: PropType) -> usize {
        world
            .props
            .iter()
            .filter(|p| p.prop_type == prop_type)
            .count()
    }

    #[test]
    fn test_nuke_clears_field() {
        let (mut world, mut progression) = playing(1);
        let types = [
            EnemyType::Small,
            EnemyType::Small,
            EnemyType::Medium,
            EnemyType::Medium,
            EnemyType::Large,
        ];
        for (i, t) in types.into_iter().enumerate() {
            add_enemy(&mut world, 10.0 + i as f32 * 60.0, 100.0, t);
        }
        let expected: u64 = world.enemies.iter().map(|e| e.score_value as u64).sum();
        assert_eq!(expected, 130);
        for x in [50.0, 150.0] {
            let bullet = world
                .factory
                .bullet(&world.tuning, x, 300.0, BulletOwner::Enemy, 10, 200.0);
            world.enemy_bullets.push(bullet);
        }

        apply_prop_effect(&mut world, &mut progression, PropType::Nuke);

        assert_eq!(world.active_enemies(), 0);
        assert_eq!(progression.player().score, expected);
        assert_eq!(progression.progress().enemies_killed, 5);
        assert!(world.enemy_bullets.iter().all(|b| !b.is_active()));
        assert!(world.props.is_empty(), "nuke kills never drop props");
        assert!(world.effects.iter().any(|e| e.kind == EffectKind::Nuke));
        assert_eq!(
            count_events(&world, |e| matches!(
                e,
                GameEvent::EnemyKilled {
                    cause: KillCause::Nuke,
                    ..
                }
            )),
            5
        );
    }

    #[test]
    fn test_missile_hits_enemy_once() {
        let (mut world, mut progression) = playing(2);
        let idx = add_enemy(&mut world, 100.0, 100.0, EnemyType::Large);
        world.enemies[idx].body.vel = Vec2::ZERO;
        let missile = world.factory.missile(
            &world.tuning,
            Vec2::new(110.0, 100.0),
            Vec2::new(110.0, 700.0),
            30,
        );
        world.missiles.push(missile);

        // 6 px per frame keeps the missile inside the enemy for several frames
        for _ in 0..5 {
            world.now_ms += 10.0;
            update_missiles(&mut world, &mut progression, 10.0);
        }
        assert_eq!(world.enemies[idx].displayed_health(), 70);
        assert_eq!(world.missiles.len(), 1);
        assert_eq!(world.missiles[0].hit_enemies.len(), 1);
    }

    #[test]
    fn test_rescue_heals_once_across_arrival_frames() {
        let (mut world, mut progression) = playing(3);
        progression.take_damage(50, 0.0);

        let start_y = world.tuning.field_height + world.tuning.rescue.entry_offset;
        // 15 px per 100 ms frame: reaches the target on the third frame
        let plane = world
            .factory
            .rescue_plane(&world.tuning, 100.0, 30, start_y - 40.0);
        world.rescue_planes.push(plane);

        let mut health = Vec::new();
        for _ in 0..5 {
            world.now_ms += 100.0;
            update_rescue_planes(&mut world, &mut progression, 100.0);
            health.push(progression.player().health);
        }
        assert_eq!(health, vec![50, 50, 80, 80, 80]);
        assert_eq!(
            count_events(&world, |e| matches!(e, GameEvent::PlayerHealed { .. })),
            1
        );
        assert_eq!(
            world
                .effects
                .iter()
                .filter(|e| e.kind == EffectKind::Heal)
                .count(),
            5
        );
        assert!(matches!(
            world.rescue_planes[0].state,
            RescueState::Healing { since_ms } if since_ms == 300.0
        ));

        // Hold elapses, then it climbs away
        for _ in 0..3 {
            world.now_ms += 100.0;
            update_rescue_planes(&mut world, &mut progression, 100.0);
        }
        assert_eq!(world.rescue_planes[0].state, RescueState::Leaving);
        assert_eq!(progression.player().health, 80);
    }

    #[test]
    fn test_two_lethal_bullets_score_once() {
        let (mut world, mut progression) = playing(4);
        let idx = add_enemy(&mut world, 100.0, 100.0, EnemyType::Small);
        let center_x = world.enemies[idx].body.center().x;
        for _ in 0..2 {
            let bullet = world
                .factory
                .bullet(&world.tuning, center_x, 110.0, BulletOwner::Player, 20, 0.0);
            world.player_bullets.push(bullet);
        }

        resolve_collisions(&mut world, &mut progression);

        assert_eq!(progression.player().score, 10);
        assert_eq!(progression.progress().enemies_killed, 1);
        assert!(world.player_bullets.iter().all(|b| !b.is_active()));
        assert_eq!(
            count_events(&world, |e| matches!(e, GameEvent::EnemyKilled { .. })),
            1
        );
    }

    #[test]
    fn test_missile_then_bullet_same_frame_scores_once() {
        let (mut world, mut progression) = playing(14);
        let idx = add_enemy(&mut world, 100.0, 100.0, EnemyType::Small);
        world.enemies[idx].body.vel = Vec2::ZERO;
        let center_x = world.enemies[idx].body.center().x;
        let missile = world.factory.missile(
            &world.tuning,
            Vec2::new(110.0, 100.0),
            Vec2::new(110.0, 700.0),
            30,
        );
        world.missiles.push(missile);
        let bullet = world
            .factory
            .bullet(&world.tuning, center_x, 110.0, BulletOwner::Player, 50, 0.0);
        world.player_bullets.push(bullet);

        tick(&mut world, &mut progression, &TickInput::default(), 16.0);

        assert_eq!(progression.player().score, 10);
        assert_eq!(progression.progress().enemies_killed, 1);
        assert_eq!(
            count_events(&world, |e| matches!(e, GameEvent::EnemyKilled { .. })),
            1
        );
        assert_eq!(
            count_events(&world, |e| matches!(
                e,
                GameEvent::EnemyKilled {
                    cause: KillCause::Missile,
                    ..
                }
            )),
            1
        );
    }

    #[test]
    fn test_drop_table_walked_in_order() {
        let (mut world, _) = playing(15);
        let at = Vec2::new(100.0, 100.0);

        // Shield comes first, so an overlapping nuke chance is never reached
        set_drops(&mut world, 1.0, 1.0, 0.0, 0.0);
        for _ in 0..20 {
            try_drop_prop(&mut world, at);
        }
        assert_eq!(dropped(&world, PropType::Shield), 20);

        world.props.clear();
        set_drops(&mut world, 0.0, 0.0, 0.0, 1.0);
        for _ in 0..20 {
            try_drop_prop(&mut world, at);
        }
        assert_eq!(dropped(&world, PropType::Rescue), 20);
        assert_eq!(world.props.len(), 20);
    }

    #[test]
    fn test_drop_roll_past_table_drops_nothing() {
        let (mut world, _) = playing(16);
        let at = Vec2::new(100.0, 100.0);

        set_drops(&mut world, 0.0, 0.0, 0.0, 0.0);
        for _ in 0..50 {
            try_drop_prop(&mut world, at);
        }
        assert!(world.props.is_empty());

        // Half the rolls land in nuke/missile, the rest fall off the end
        set_drops(&mut world, 0.0, 0.25, 0.25, 0.0);
        for _ in 0..400 {
            try_drop_prop(&mut world, at);
        }
        let (nukes, missiles) = (
            dropped(&world, PropType::Nuke),
            dropped(&world, PropType::Missile),
        );
        assert_eq!(dropped(&world, PropType::Shield), 0);
        assert_eq!(dropped(&world, PropType::Rescue), 0);
        assert!(nukes > 0 && missiles > 0);
        assert!(world.props.len() < 400);
        assert_eq!(nukes + missiles, world.props.len());
    }

    #[test]
    fn test_missile_kill_rolls_for_drop() {
        let (mut world, mut progression) = playing(17);
        set_drops(&mut world, 1.0, 0.0, 0.0, 0.0);
        let idx = add_enemy(&mut world, 100.0, 100.0, EnemyType::Small);
        world.enemies[idx].body.vel = Vec2::ZERO;
        let missile = world.factory.missile(
            &world.tuning,
            Vec2::new(110.0, 100.0),
            Vec2::new(110.0, 700.0),
            30,
        );
        world.missiles.push(missile);

        world.now_ms += 10.0;
        update_missiles(&mut world, &mut progression, 10.0);

        assert_eq!(progression.progress().enemies_killed, 1);
        assert_eq!(world.props.len(), 1);
        assert_eq!(world.props[0].prop_type, PropType::Shield);
    }

    #[test]
    fn test_oversized_delta_is_capped() {
        let (mut world, mut progression) = playing(18);
        tick(&mut world, &mut progression, &TickInput::default(), 5_000.0);
        assert_eq!(world.now_ms, MAX_FRAME_DT_MS as f64);
        // 100 m/s for one capped frame
        assert!((progression.progress().distance - 10.0).abs() < 1e-6);

        tick(&mut world, &mut progression, &TickInput::default(), -40.0);
        assert_eq!(world.now_ms, MAX_FRAME_DT_MS as f64);
    }

    #[test]
    fn test_escaped_enemy_awards_nothing() {
        let (mut world, progression) = playing(5);
        let bottom = world.tuning.field_height - 1.0;
        add_enemy(&mut world, 100.0, bottom, EnemyType::Small);

        update_enemies(&mut world, 1.0, 100.0);

        assert_eq!(world.active_enemies(), 0);
        assert_eq!(progression.player().score, 0);
        assert_eq!(progression.progress().enemies_killed, 0);
        assert_eq!(
            count_events(&world, |e| matches!(e, GameEvent::EnemyEscaped { .. })),
            1
        );
    }

    #[test]
    fn test_enemy_bullet_damage_scaled_and_floored() {
        let (mut world, _) = playing(6);
        add_enemy(&mut world, 100.0, 100.0, EnemyType::Small);
        update_enemies(&mut world, 1.15, 16.0);
        assert_eq!(world.enemy_bullets.len(), 1);
        assert_eq!(world.enemy_bullets[0].damage, 11);
    }

    #[test]
    fn test_shield_blocks_then_expires() {
        let (mut world, mut progression) = playing(7);
        progression.activate_shield(world.now_ms);
        world.sync_player(progression.player());

        let center = world.player.as_ref().map(|p| p.body.center()).unwrap_or_default();
        let bullet = world
            .factory
            .bullet(&world.tuning, center.x, center.y, BulletOwner::Enemy, 10, 0.0);
        world.enemy_bullets.push(bullet);
        resolve_collisions(&mut world, &mut progression);
        assert_eq!(progression.player().health, 100);

        world.now_ms = 10_000.0;
        assert!(progression.expire_shield(world.now_ms));
        world.sync_player(progression.player());
        resolve_collisions(&mut world, &mut progression);
        assert_eq!(progression.player().health, 90);
    }

    #[test]
    fn test_body_collision_after_kill_is_skipped() {
        let (mut world, mut progression) = playing(8);
        let pos = world.player.as_ref().map(|p| p.body.pos).unwrap_or_default();
        let idx = add_enemy(&mut world, pos.x, pos.y, EnemyType::Small);
        let center_x = world.enemies[idx].body.center().x;
        let bullet = world
            .factory
            .bullet(&world.tuning, center_x, pos.y, BulletOwner::Player, 50, 0.0);
        world.player_bullets.push(bullet);

        resolve_collisions(&mut world, &mut progression);

        assert_eq!(progression.player().health, 100);
        assert_eq!(progression.progress().enemies_killed, 1);
    }

    #[test]
    fn test_lanes_spread_around_centerline() {
        let (mut world, _) = playing(9);
        if let Some(player) = world.player.as_mut() {
            player.bullet_lanes = 3;
        }
        player_fire(&mut world);
        let xs: Vec<f32> = world
            .player_bullets
            .iter()
            .map(|b| b.rect().center().x)
            .collect();
        assert_eq!(xs, vec![165.0, 180.0, 195.0]);

        // Not ready again until 1000 / rate ms have passed
        player_fire(&mut world);
        assert_eq!(world.player_bullets.len(), 3);
    }

    #[test]
    fn test_tracking_clamps_to_field() {
        let (mut world, _) = playing(10);
        track_player(&mut world, Some(Vec2::new(-50.0, 1000.0)));
        let pos = world.player.as_ref().map(|p| p.body.pos);
        assert_eq!(pos, Some(Vec2::new(0.0, 608.0)));

        track_player(&mut world, None);
        let pos = world.player.as_ref().map(|p| p.body.pos);
        assert_eq!(pos, Some(Vec2::new(0.0, 608.0)));
    }

    #[test]
    fn test_missile_volley_from_corners() {
        let (mut world, mut progression) = playing(11);
        apply_prop_effect(&mut world, &mut progression, PropType::Missile);
        assert_eq!(world.missiles.len(), 4);
        assert!(world.missiles.iter().all(|m| m.damage == 30));
        assert_eq!(world.missiles[1].start, Vec2::new(360.0, 0.0));
        assert_eq!(world.missiles[1].end, Vec2::new(0.0, 640.0));
    }

    #[test]
    fn test_game_over_emitted_once() {
        let (mut world, mut progression) = playing(12);
        progression.take_damage(95, 0.0);
        let center = world.player.as_ref().map(|p| p.body.center()).unwrap_or_default();
        let bullet = world
            .factory
            .bullet(&world.tuning, center.x, center.y, BulletOwner::Enemy, 10, 0.0);
        world.enemy_bullets.push(bullet);

        tick(&mut world, &mut progression, &TickInput::default(), 16.0);
        assert_eq!(progression.phase(), GamePhase::GameOver);
        assert_eq!(progression.player().health, 0);

        let now = world.now_ms;
        tick(&mut world, &mut progression, &TickInput::default(), 16.0);
        assert_eq!(world.now_ms, now, "no updates after game over");
        assert_eq!(
            count_events(&world, |e| matches!(e, GameEvent::GameOver { .. })),
            1
        );
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed| {
            let (mut world, mut progression) = playing(seed);
            for frame in 0..600 {
                let x = 180.0 + 150.0 * (frame as f32 * 0.02).sin();
                let input = TickInput {
                    target: Some(Vec2::new(x, 560.0)),
                };
                tick(&mut world, &mut progression, &input, 16.0);
            }
            let positions: Vec<Vec2> = world.enemies.iter().map(|e| e.body.pos).collect();
            (
                progression.player().score,
                progression.progress().enemies_killed,
                progression.player().health,
                positions,
            )
        };
        assert_eq!(run(42), run(42));
    }
}
