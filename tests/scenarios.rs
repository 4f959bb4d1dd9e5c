//! End-to-end scenarios through the public API

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use sky_force::sim::{
    BulletOwner, Difficulty, EnemySpawner, EnemyType, GameEvent, HasBody, Progression, PropType,
    RescueState, TickInput, World, apply_prop_effect, tick,
};
use sky_force::{DifficultyMode, HighScores, Profile, Session, Settings, Tuning};

fn playing(seed: u64) -> (World, Progression) {
    let tuning = Tuning::default();
    let mut world = World::new(tuning.clone(), seed);
    world.reset(seed);
    let mut progression = Progression::new(&tuning, DifficultyMode::Normal);
    progression.start();
    world.sync_player(progression.player());
    (world, progression)
}

fn weave(frame: u32) -> TickInput {
    let x = 180.0 + 140.0 * (frame as f32 * 0.015).sin();
    TickInput {
        target: Some(Vec2::new(x, 560.0)),
    }
}

#[test]
fn nuke_clears_a_crowded_field() {
    let (mut world, mut progression) = playing(100);
    let layout = [
        (20.0, EnemyType::Small),
        (80.0, EnemyType::Medium),
        (150.0, EnemyType::Large),
        (230.0, EnemyType::Small),
        (290.0, EnemyType::Medium),
    ];
    for (x, enemy_type) in layout {
        let enemy = world
            .factory
            .enemy(&world.tuning, Vec2::new(x, 60.0), enemy_type, 1.0, 1.0);
        world.enemies.push(enemy);
    }
    let bullet = world
        .factory
        .bullet(&world.tuning, 100.0, 200.0, BulletOwner::Enemy, 10, 200.0);
    world.enemy_bullets.push(bullet);
    let total: u64 = world.enemies.iter().map(|e| e.score_value as u64).sum();

    apply_prop_effect(&mut world, &mut progression, PropType::Nuke);

    assert_eq!(world.active_enemies(), 0);
    assert_eq!(progression.player().score, total);
    assert_eq!(progression.progress().enemies_killed, 5);
    assert!(world.enemy_bullets.iter().all(|b| !b.is_active()));
}

#[test]
fn spawner_matches_type_weights() {
    let tuning = Tuning::default();
    let difficulty = Difficulty::default();
    let mut factory = sky_force::sim::EntityFactory::new();
    let mut rng = Pcg32::seed_from_u64(2024);
    let mut spawner = EnemySpawner::new();

    let (mut large, mut medium, mut small) = (0u32, 0u32, 0u32);
    for _ in 0..10_000 {
        match spawner
            .update(tuning.spawn_interval_ms, &difficulty, &tuning, &mut factory, &mut rng)
            .map(|e| e.enemy_type)
        {
            Some(EnemyType::Large) => large += 1,
            Some(EnemyType::Medium) => medium += 1,
            Some(EnemyType::Small) => small += 1,
            None => panic!("a full interval always spawns"),
        }
    }
    assert!((800..=1200).contains(&large), "large {large}");
    assert!((2700..=3300).contains(&medium), "medium {medium}");
    assert!((5600..=6400).contains(&small), "small {small}");
}

#[test]
fn score_and_kills_match_kill_events_over_a_long_run() {
    for seed in [1u64, 7, 99] {
        let (mut world, mut progression) = playing(seed);
        let mut kill_score = 0u64;
        let mut kills = 0u32;
        let mut tier = 1;

        for frame in 0..6_000 {
            tick(&mut world, &mut progression, &weave(frame), 16.0);
            let stats = progression.player();
            assert!(stats.health >= 0 && stats.health <= stats.max_health);
            assert!(stats.experience < stats.exp_to_next_level);
            assert!(progression.difficulty().tier >= tier);
            tier = progression.difficulty().tier;

            for event in world.drain_events() {
                if let GameEvent::EnemyKilled { score, .. } = event {
                    kill_score += score as u64;
                    kills += 1;
                }
            }
            if !progression.is_playing() {
                break;
            }
        }

        assert_eq!(progression.player().score, kill_score, "seed {seed}");
        assert_eq!(progression.progress().enemies_killed, kills, "seed {seed}");
        assert!(world.enemies.iter().all(|e| e.is_active() && e.displayed_health() > 0));
    }
}

#[test]
fn shield_pickup_absorbs_incoming_fire() {
    let (mut world, mut progression) = playing(5);
    let center = world
        .player
        .as_ref()
        .map(|p| p.body.center())
        .unwrap_or_default();
    let prop = world
        .factory
        .prop(&world.tuning, center.x, center.y - 12.0, PropType::Shield);
    world.props.push(prop);

    tick(&mut world, &mut progression, &TickInput::default(), 16.0);
    assert!(progression.shield_active(world.now_ms));

    for _ in 0..10 {
        let bullet = world
            .factory
            .bullet(&world.tuning, center.x, center.y, BulletOwner::Enemy, 25, 0.0);
        world.enemy_bullets.push(bullet);
        tick(&mut world, &mut progression, &TickInput::default(), 16.0);
    }
    assert_eq!(progression.player().health, 100);
}

#[test]
fn rescue_plane_heals_once_then_leaves() {
    let (mut world, mut progression) = playing(6);
    progression.take_damage(60, 0.0);
    apply_prop_effect(&mut world, &mut progression, PropType::Rescue);
    assert_eq!(world.rescue_planes.len(), 1);

    let mut heals = 0;
    let mut saw_leaving = false;
    for _ in 0..400 {
        tick(&mut world, &mut progression, &TickInput::default(), 16.0);
        heals += world
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHealed { .. }))
            .count();
        saw_leaving |= world
            .rescue_planes
            .iter()
            .any(|p| p.state == RescueState::Leaving);
        if !progression.is_playing() {
            break;
        }
    }
    assert_eq!(heals, 1);
    assert!(saw_leaving);
}

#[test]
fn finished_session_lands_on_the_leaderboard() {
    let mut session = Session::new(
        Tuning::default(),
        Settings::default(),
        Profile::new("GOOSE"),
        31,
    )
    .expect("valid tuning")
    .with_leaderboard(HighScores::new());
    session.start();

    // Stand still in the middle of the lane until something gets through
    let mut frames = 0;
    while session.is_running() && frames < 200_000 {
        session.update(100.0, &TickInput::default());
        frames += 1;
    }

    assert!(!session.is_running());
    let run = session.last_run().expect("run ended");
    assert!(run.distance > 0);
    assert_eq!(run.rank, Some(1));
    assert_eq!(session.profile().personal_best, run.distance);
    assert_eq!(session.snapshot().hud.health, 0);
}
