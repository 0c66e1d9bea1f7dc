use std::sync::Arc;

use roomcrawl_core::{
    ArtifactKind, CellCoord, Command, DifficultyProfile, Direction, DungeonLayout, EnemyKind,
    Event, PlayerStats, RoomTemplate, SessionStatus,
};
use roomcrawl_world::{apply, query, World};

fn single_room(source: &str) -> DungeonLayout {
    let template = Arc::new(RoomTemplate::parse("start", source).expect("valid template"));
    let mut layout = DungeonLayout::new(1, CellCoord::new(0, 0));
    assert!(layout.place(CellCoord::new(0, 0), template));
    layout
}

fn profile(enemy_health: f32, boss_health: f32) -> DifficultyProfile {
    DifficultyProfile {
        player_health: 6,
        boss_health,
        enemy_health,
        enemy_shot_delay: 10,
        enemy_speed: 2,
    }
}

fn start(layout: DungeonLayout, profile: DifficultyProfile, stats: PlayerStats) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::StartSession {
            layout,
            profile,
            stats,
            seed: 11,
        },
        &mut events,
    );
    world
}

fn run_ticks(world: &mut World, ticks: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        apply(world, Command::Tick, &mut events);
    }
    events
}

#[test]
fn lethal_player_bullet_removes_the_enemy_and_decrements_the_count() {
    let layout = single_room("0\n.......\n.@...E.\n.......\n.....E.\n");
    let profile = profile(10.0, 200.0);
    let stats = PlayerStats {
        damage: 10.0,
        coef: 1.0,
        ..PlayerStats::starting(&profile)
    };
    let mut world = start(layout, profile, stats);
    let before = query::current_room(&world).expect("room").live_enemies();
    assert_eq!(before, 2);

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::FirePlayer {
            direction: Direction::Right,
        },
        &mut events,
    );
    events.extend(run_ticks(&mut world, 60));

    let room = query::current_room(&world).expect("room");
    assert_eq!(room.live_enemies(), before - 1);
    assert_eq!(query::enemy_view(&world).len(), 1);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyKilled { kind: EnemyKind::Grunt, .. })));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::DoorsUpdated { .. })));
}

#[test]
fn clearing_the_last_enemy_recomputes_doors_once() {
    let layout = single_room("0\n###^###\n#.....#\n#@...E#\n#.....#\n#######\n");
    let profile = profile(10.0, 200.0);
    let stats = PlayerStats {
        damage: 10.0,
        ..PlayerStats::starting(&profile)
    };
    let mut world = start(layout, profile, stats);

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::FirePlayer {
            direction: Direction::Right,
        },
        &mut events,
    );
    events.extend(run_ticks(&mut world, 60));

    let door_updates = events
        .iter()
        .filter(|event| matches!(event, Event::DoorsUpdated { .. }))
        .count();
    assert_eq!(door_updates, 1);
    assert!(events.contains(&Event::RoomCleared {
        room: CellCoord::new(0, 0)
    }));
    assert_eq!(query::current_room(&world).expect("room").live_enemies(), 0);
}

#[test]
fn survivable_hit_reports_remaining_health() {
    let layout = single_room("0\n.......\n.@...E.\n.......\n");
    let profile = profile(50.0, 200.0);
    let mut world = start(layout, profile, PlayerStats::starting(&profile));

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::FirePlayer {
            direction: Direction::Right,
        },
        &mut events,
    );
    events.extend(run_ticks(&mut world, 60));

    let enemy = query::enemy_view(&world)
        .into_vec()
        .pop()
        .expect("enemy survives");
    assert!((enemy.health - 46.5).abs() < 1e-4);
    assert!(events.iter().any(|event| matches!(event, Event::EnemyDamaged { .. })));
}

#[test]
fn enemy_bullets_cost_one_health_and_can_end_the_run() {
    let layout = single_room("0\n.E.\n...\n.@.\n");
    let profile = profile(50.0, 200.0);
    let stats = PlayerStats {
        health: 1,
        ..PlayerStats::starting(&profile)
    };
    let mut world = start(layout, profile, stats);
    let enemy = query::enemy_view(&world)
        .iter()
        .next()
        .map(|snapshot| snapshot.id)
        .expect("enemy spawned");

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::AimEnemy {
            enemy,
            direction: Direction::Down,
        },
        &mut events,
    );
    events.extend(run_ticks(&mut world, 40));

    assert!(events.contains(&Event::PlayerDamaged { health: 0 }));
    assert!(events.contains(&Event::GameOver));
    assert_eq!(query::status(&world), SessionStatus::GameOver);

    let frozen = query::tick_index(&world);
    let _ = run_ticks(&mut world, 5);
    assert_eq!(query::tick_index(&world), frozen);
}

#[test]
fn enemy_fires_on_its_own_cadence() {
    let layout = single_room("0\n.E.\n...\n...\n...\n.@.\n");
    let profile = DifficultyProfile {
        enemy_shot_delay: 3,
        ..profile(50.0, 200.0)
    };
    let mut world = start(layout, profile, PlayerStats::starting(&profile));
    let enemy = query::enemy_view(&world)
        .iter()
        .next()
        .map(|snapshot| snapshot.id)
        .expect("enemy spawned");

    let mut fired = 0;
    for _ in 0..7 {
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AimEnemy {
                enemy,
                direction: Direction::Down,
            },
            &mut events,
        );
        fired += events
            .iter()
            .filter(|event| matches!(event, Event::BulletFired { .. }))
            .count();
    }
    assert_eq!(fired, 3);
}

#[test]
fn boss_death_spawns_the_prize_and_collecting_it_wins() {
    let mut rows = vec!["...............".to_owned(); 11];
    rows[1] = ".......B.......".to_owned();
    rows[5] = ".......@.......".to_owned();
    let source = format!("0\n{}\n", rows.join("\n"));
    let profile = profile(50.0, 1.0);
    let mut world = start(single_room(&source), profile, PlayerStats::starting(&profile));
    assert!(query::current_room(&world).expect("room").boss_present());

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::FirePlayer {
            direction: Direction::Up,
        },
        &mut events,
    );
    events.extend(run_ticks(&mut world, 40));

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyKilled { kind: EnemyKind::Boss, .. })));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ArtifactSpawned {
            kind: ArtifactKind::Prize,
            ..
        }
    )));
    assert!(events.contains(&Event::Victory));
    assert_eq!(query::status(&world), SessionStatus::Victory);
    assert!(!query::current_room(&world).expect("room").boss_present());
}

#[test]
fn walking_onto_an_artifact_applies_its_effect() {
    let layout = single_room("0\n.....\n.@A..\n.....\n");
    let profile = profile(50.0, 200.0);
    let starting = PlayerStats::starting(&profile);
    let mut world = start(layout, profile, starting);
    assert_eq!(query::artifacts(&world).len(), 1);

    let mut events = Vec::new();
    for _ in 0..4 {
        apply(
            &mut world,
            Command::MovePlayer {
                direction: Direction::Right,
            },
            &mut events,
        );
        apply(&mut world, Command::Tick, &mut events);
    }

    let collected = events
        .iter()
        .find_map(|event| match event {
            Event::ArtifactCollected { kind, stats, .. } => Some((*kind, *stats)),
            _ => None,
        })
        .expect("artifact collected");
    let mut expected = starting;
    expected.apply_artifact(&collected.0.effect());
    assert_eq!(collected.1, expected);
    assert_eq!(query::player_stats(&world), expected);
    assert!(query::artifacts(&world).is_empty());
    assert_eq!(query::current_room(&world).expect("room").live_artifacts(), 0);
}
