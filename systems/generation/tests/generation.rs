use std::collections::{HashSet, VecDeque};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use roomcrawl_core::{CellCoord, Direction, DungeonLayout, RoomTemplate, SpecialRoom, TemplatePool};
use roomcrawl_system_generation::{AttemptFailure, Config, DungeonGenerator, GenerationError};

fn template(name: &str, exits: &str) -> RoomTemplate {
    RoomTemplate::parse(name, &format!("{exits}\n##^##\n<...>\n##v##\n")).expect("valid template")
}

fn pool(regular: &[(&str, &str)]) -> TemplatePool {
    let mut templates = vec![
        template("start", "0 1 2 3"),
        template("boss_room", "0 1 2 3"),
        template("artifact_room", "0 1 2 3"),
        template("shop", "0 1 2 3"),
    ];
    templates.extend(regular.iter().map(|(name, exits)| template(name, exits)));
    TemplatePool::from_templates(templates).expect("complete pool")
}

fn mixed_pool() -> TemplatePool {
    pool(&[
        ("cross", "0 1 2 3"),
        ("vertical", "0 2"),
        ("horizontal", "1 3"),
        ("tee", "1 2 3"),
        ("corner", "0 1"),
        ("bend", "2 3"),
    ])
}

fn generate(pool: &TemplatePool, config: Config, seed: u64) -> DungeonLayout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    DungeonGenerator::new(config)
        .generate(pool, &mut rng)
        .expect("generation succeeds")
}

fn reachable_through_reciprocal_exits(layout: &DungeonLayout) -> HashSet<CellCoord> {
    let mut seen = HashSet::from([layout.start()]);
    let mut queue = VecDeque::from([layout.start()]);
    while let Some(cell) = queue.pop_front() {
        let Some(room) = layout.get(cell) else {
            continue;
        };
        for direction in Direction::ALL {
            let Some(next) = layout.neighbor(cell, direction) else {
                continue;
            };
            let connected = room.allows_exit(direction)
                && layout
                    .get(next)
                    .is_some_and(|neighbor| neighbor.allows_exit(direction.opposite()));
            if connected && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

#[test]
fn every_room_is_reachable_from_the_start() {
    let pool = mixed_pool();
    for seed in 0..16 {
        let layout = generate(&pool, Config::new(5), seed);
        assert_eq!(layout.side(), 12);
        assert_eq!(layout.start(), CellCoord::new(5, 5));
        assert_eq!(layout.room_count(), 1 + 4 * 5);

        let reachable = reachable_through_reciprocal_exits(&layout);
        assert_eq!(reachable.len(), layout.room_count(), "seed {seed}");
    }
}

#[test]
fn each_special_room_appears_once() {
    let pool = mixed_pool();
    for seed in 0..8 {
        let layout = generate(&pool, Config::new(4), seed);
        for room in SpecialRoom::ALL {
            let count = layout
                .rooms()
                .filter(|(_, template)| template.name() == room.template_name())
                .count();
            assert_eq!(count, 1, "{room:?} with seed {seed}");
        }
        let starts = layout
            .rooms()
            .filter(|(_, template)| template.name() == "start")
            .count();
        assert_eq!(starts, 1);
    }
}

#[test]
fn first_room_of_every_arm_follows_the_main_direction() {
    let pool = mixed_pool();
    let layout = generate(&pool, Config::new(3), 9);
    for direction in Direction::ALL {
        let next = layout
            .neighbor(layout.start(), direction)
            .expect("inside the map");
        assert!(layout.is_occupied(next), "{direction:?}");
    }
}

#[test]
fn arm_length_one_puts_specials_next_to_the_start() {
    let pool = mixed_pool();
    let layout = generate(&pool, Config::new(1), 21);
    assert_eq!(layout.room_count(), 5);

    let names: Vec<&str> = Direction::ALL
        .iter()
        .filter_map(|direction| layout.neighbor(layout.start(), *direction))
        .filter_map(|cell| layout.get(cell))
        .map(|template| template.name())
        .collect();
    for room in SpecialRoom::ALL {
        assert!(names.contains(&room.template_name()));
    }
}

#[test]
fn same_seed_yields_the_same_layout() {
    let pool = mixed_pool();
    let first = generate(&pool, Config::new(5), 1234);
    let second = generate(&pool, Config::new(5), 1234);
    assert_eq!(first, second);
}

#[test]
fn dead_end_templates_exhaust_every_attempt() {
    let pool = pool(&[("vertical", "0 2")]);
    let config = Config {
        max_attempts: 3,
        ..Config::new(2)
    };
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let error = DungeonGenerator::new(config)
        .generate(&pool, &mut rng)
        .expect_err("horizontal arms cannot be entered");
    let GenerationError::AttemptsExhausted { attempts, last } = error;
    assert_eq!(attempts, 3);
    assert!(matches!(last, AttemptFailure::NoFittingTemplate { .. }));
}

#[test]
fn incompatible_special_room_discards_the_attempt() {
    let templates = vec![
        template("start", "0 1 2 3"),
        template("boss_room", "0"),
        template("artifact_room", "0"),
        template("shop", "0"),
        template("cross", "0 1 2 3"),
    ];
    let pool = TemplatePool::from_templates(templates).expect("complete pool");
    let config = Config {
        max_attempts: 4,
        ..Config::new(1)
    };
    let mut rng = ChaCha8Rng::seed_from_u64(77);

    let error = DungeonGenerator::new(config)
        .generate(&pool, &mut rng)
        .expect_err("at most one arm can reach an up-only room");
    let GenerationError::AttemptsExhausted { last, .. } = error;
    assert!(matches!(last, AttemptFailure::IncompatibleSpecialRoom { .. }));
}
