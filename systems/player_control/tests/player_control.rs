use std::sync::Arc;

use roomcrawl_core::{
    AnimationKey, CellCoord, Command, DifficultyProfile, Direction, DungeonLayout, Event,
    InputFrame, Key, PlayerStats, RoomTemplate,
};
use roomcrawl_system_player_control::PlayerControl;
use roomcrawl_world::{apply, query, World};

fn start(source: &str) -> World {
    let template = Arc::new(RoomTemplate::parse("start", source).expect("valid template"));
    let mut layout = DungeonLayout::new(1, CellCoord::new(0, 0));
    assert!(layout.place(CellCoord::new(0, 0), template));
    let profile = DifficultyProfile::default();

    let mut world = World::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::StartSession {
            layout,
            profile,
            stats: PlayerStats::starting(&profile),
            seed: 1,
        },
        &mut events,
    );
    world
}

fn step(world: &mut World, control: &mut PlayerControl, input: &InputFrame) -> Vec<Event> {
    let mut commands = Vec::new();
    control.handle(input, &query::player_stats(world), &mut commands);
    commands.push(Command::Tick);

    let mut events = Vec::new();
    for command in commands {
        apply(world, command, &mut events);
    }
    events
}

#[test]
fn held_key_moves_the_player_by_its_speed() {
    let mut world = start("0\n.....\n.@...\n.....\n");
    let mut control = PlayerControl::new();
    let before = query::player(&world).expect("player").rect;

    let input = InputFrame::holding(&[Key::Move(Direction::Right)]);
    let _ = step(&mut world, &mut control, &input);
    let _ = step(&mut world, &mut control, &input);

    let player = query::player(&world).expect("player");
    assert_eq!(player.rect.x(), before.x() + 10);
    assert_eq!(player.rect.y(), before.y());
    assert_eq!(player.animation.key, AnimationKey::Run);
}

#[test]
fn diagonal_input_slides_along_a_wall() {
    let mut world = start("0\n#####\n#@..#\n#...#\n#####\n");
    let mut control = PlayerControl::new();
    let before = query::player(&world).expect("player").rect;

    let input = InputFrame::holding(&[Key::Move(Direction::Up), Key::Move(Direction::Right)]);
    for _ in 0..4 {
        let _ = step(&mut world, &mut control, &input);
    }

    let after = query::player(&world).expect("player").rect;
    assert_eq!(after.y(), before.y());
    assert_eq!(after.x(), before.x() + 20);
}

#[test]
fn releasing_keys_returns_the_player_to_idle() {
    let mut world = start("0\n.....\n.@...\n.....\n");
    let mut control = PlayerControl::new();
    let _ = step(
        &mut world,
        &mut control,
        &InputFrame::holding(&[Key::Move(Direction::Down)]),
    );

    let release = InputFrame {
        released: vec![Key::Move(Direction::Down)],
        ..InputFrame::default()
    };
    let _ = step(&mut world, &mut control, &release);

    let player = query::player(&world).expect("player");
    assert_eq!(player.animation.key, AnimationKey::Stay);
    assert_eq!(player.animation.facing, Direction::Down);
}

#[test]
fn held_fire_key_spawns_bullets_on_the_cooldown() {
    let mut world = start("0\n.......\n.@.....\n.......\n");
    let mut control = PlayerControl::new();
    let input = InputFrame::holding(&[Key::Shoot(Direction::Right)]);
    let cooldown = query::player_stats(&world).cooldown;

    let mut fired = 0;
    for _ in 0..cooldown + 1 {
        fired += step(&mut world, &mut control, &input)
            .iter()
            .filter(|event| matches!(event, Event::BulletFired { .. }))
            .count();
    }
    assert_eq!(fired, 2);
}
