use std::sync::Arc;

use roomcrawl_core::{
    CellCoord, Command, DifficultyProfile, Direction, DungeonLayout, Event, OccupancyView,
    Pathfinder, PixelRect, PlayerStats, RoomTemplate, Route,
};
use roomcrawl_system_enemy_ai::EnemyAi;
use roomcrawl_world::{apply, query, World};

fn profile(enemy_speed: i32) -> DifficultyProfile {
    DifficultyProfile {
        enemy_speed,
        ..DifficultyProfile::default()
    }
}

fn start(source: &str, profile: DifficultyProfile) -> World {
    let template = Arc::new(RoomTemplate::parse("start", source).expect("valid template"));
    let mut layout = DungeonLayout::new(1, CellCoord::new(0, 0));
    assert!(layout.place(CellCoord::new(0, 0), template));

    let mut world = World::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::StartSession {
            layout,
            profile,
            stats: PlayerStats::starting(&profile),
            seed: 3,
        },
        &mut events,
    );
    world
}

fn tick<P: Pathfinder>(world: &mut World, ai: &mut EnemyAi<P>) -> Vec<Event> {
    let player = query::player(world).expect("player").rect;
    let mut commands = Vec::new();
    {
        let grid = query::occupancy_view(world).expect("room");
        ai.steer(&query::enemy_view(world), &player, grid, &mut commands);
    }
    let mut events = Vec::new();
    for command in commands.drain(..) {
        apply(world, command, &mut events);
    }

    ai.aim(&query::enemy_view(world), &player, &mut commands);
    commands.push(Command::Tick);
    for command in commands {
        apply(world, command, &mut events);
    }
    events
}

fn enemy_rect(world: &World) -> PixelRect {
    query::enemy_view(world)
        .iter()
        .next()
        .map(|enemy| enemy.rect)
        .expect("enemy present")
}

#[test]
fn enemy_advances_one_cell_toward_the_player() {
    let mut world = start("0\nE..\n...\n...\n@..\n", profile(50));
    let mut ai = EnemyAi::new();
    assert_eq!(enemy_rect(&world), PixelRect::new(0, 0, 50, 50));

    let events = tick(&mut world, &mut ai);

    assert_eq!(enemy_rect(&world), PixelRect::new(0, 50, 50, 50));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::EnemyAdvanced { to, .. } if *to == PixelRect::new(0, 50, 50, 50)
    )));
}

#[test]
fn enemy_walks_around_walls() {
    let mut world = start("0\nE#...\n.#...\n...@.\n", profile(50));
    let mut ai = EnemyAi::new();

    let _ = tick(&mut world, &mut ai);
    assert_eq!(enemy_rect(&world), PixelRect::new(0, 50, 50, 50));
    let _ = tick(&mut world, &mut ai);
    assert_eq!(enemy_rect(&world), PixelRect::new(0, 100, 50, 50));
    let _ = tick(&mut world, &mut ai);
    assert_eq!(enemy_rect(&world), PixelRect::new(50, 100, 50, 50));
}

#[test]
fn slow_enemies_take_several_ticks_per_cell() {
    let mut world = start("0\nE..\n...\n...\n@..\n", profile(2));
    let mut ai = EnemyAi::new();
    for _ in 0..5 {
        let _ = tick(&mut world, &mut ai);
    }
    assert_eq!(enemy_rect(&world), PixelRect::new(0, 10, 50, 50));
}

#[test]
fn enemies_never_step_into_the_player() {
    let mut world = start("0\nE..\n@..\n", profile(50));
    let mut ai = EnemyAi::new();
    let events = tick(&mut world, &mut ai);

    assert_eq!(enemy_rect(&world), PixelRect::new(0, 0, 50, 50));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::EnemyAdvanced { .. })));
}

#[test]
fn aligned_enemy_fires_at_the_player() {
    let mut world = start("0\nE..\n...\n...\n@..\n", profile(2));
    let mut ai = EnemyAi::new();
    let events = tick(&mut world, &mut ai);

    assert!(events.iter().any(|event| matches!(
        event,
        Event::BulletFired {
            direction: Direction::Down,
            ..
        }
    )));
}

#[test]
fn misaligned_enemy_goes_idle() {
    let mut world = start("0\n...E\n....\n....\n@...\n", profile(0));
    let mut ai = EnemyAi::new();
    let events = tick(&mut world, &mut ai);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::BulletFired { .. })));
    assert!(query::bullets(&world).is_empty());
}

struct Stubborn;

impl Pathfinder for Stubborn {
    fn find_path(
        &mut self,
        _grid: OccupancyView<'_>,
        _start: CellCoord,
        _goal: CellCoord,
    ) -> Route {
        Route::Unreachable
    }
}

#[test]
fn unreachable_routes_leave_enemies_in_place() {
    let mut world = start("0\nE..\n...\n...\n@..\n", profile(50));
    let mut ai = EnemyAi::with_pathfinder(Stubborn);
    let _ = tick(&mut world, &mut ai);
    let _ = tick(&mut world, &mut ai);

    assert_eq!(enemy_rect(&world), PixelRect::new(0, 0, 50, 50));
}
