#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns per-tick keyboard input into player commands.

use roomcrawl_core::{Command, Direction, InputFrame, Key, PlayerStats};

/// Movement keys are applied in this order each tick.
const MOVE_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

/// Only the first held shooting key in this order fires.
const SHOOT_PRIORITY: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

/// Translates held keys into movement and fire commands and tracks the shot cooldown.
#[derive(Debug, Default)]
pub struct PlayerControl {
    shot_counter: u64,
}

impl PlayerControl {
    /// Creates a controller whose first shot is immediate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks elapsed since the last key-down edge.
    #[must_use]
    pub const fn shot_counter(&self) -> u64 {
        self.shot_counter
    }

    /// Forgets the cooldown, e.g. when a new session starts.
    pub fn reset(&mut self) {
        self.shot_counter = 0;
    }

    /// Emits the commands for one tick of input.
    ///
    /// Any key-down edge resets the cooldown counter so the first shot after a
    /// press fires at once; a shot is allowed whenever the counter is a
    /// multiple of the player's cooldown.
    pub fn handle(&mut self, input: &InputFrame, stats: &PlayerStats, out: &mut Vec<Command>) {
        if !input.pressed.is_empty() {
            self.shot_counter = 0;
        }
        if !input.released.is_empty() {
            out.push(Command::ReleaseMovement);
        }

        for direction in MOVE_ORDER {
            if input.is_held(Key::Move(direction)) {
                out.push(Command::MovePlayer { direction });
            }
        }

        let cooldown = u64::try_from(stats.cooldown.max(1)).unwrap_or(1);
        if let Some(direction) = SHOOT_PRIORITY
            .into_iter()
            .find(|direction| input.is_held(Key::Shoot(*direction)))
        {
            if self.shot_counter % cooldown == 0 {
                out.push(Command::FirePlayer { direction });
            }
        }

        self.shot_counter = self.shot_counter.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcrawl_core::DifficultyProfile;

    fn stats(cooldown: i32) -> PlayerStats {
        PlayerStats {
            cooldown,
            ..PlayerStats::starting(&DifficultyProfile::default())
        }
    }

    fn fired(control: &mut PlayerControl, input: &InputFrame, stats: &PlayerStats) -> bool {
        let mut out = Vec::new();
        control.handle(input, stats, &mut out);
        out.iter()
            .any(|command| matches!(command, Command::FirePlayer { .. }))
    }

    #[test]
    fn movement_keys_are_applied_in_fixed_order() {
        let mut control = PlayerControl::new();
        let input = InputFrame::holding(&[
            Key::Move(Direction::Right),
            Key::Move(Direction::Up),
            Key::Move(Direction::Left),
        ]);
        let mut out = Vec::new();
        control.handle(&input, &stats(21), &mut out);
        assert_eq!(
            out,
            vec![
                Command::MovePlayer {
                    direction: Direction::Up
                },
                Command::MovePlayer {
                    direction: Direction::Left
                },
                Command::MovePlayer {
                    direction: Direction::Right
                },
            ]
        );
    }

    #[test]
    fn only_the_highest_priority_shot_fires() {
        let mut control = PlayerControl::new();
        let input =
            InputFrame::holding(&[Key::Shoot(Direction::Left), Key::Shoot(Direction::Right)]);
        let mut out = Vec::new();
        control.handle(&input, &stats(21), &mut out);
        assert_eq!(
            out,
            vec![Command::FirePlayer {
                direction: Direction::Right
            }]
        );
    }

    #[test]
    fn holding_fire_respects_the_cooldown() {
        let mut control = PlayerControl::new();
        let stats = stats(3);
        let input = InputFrame::holding(&[Key::Shoot(Direction::Up)]);
        let shots: Vec<bool> = (0..7).map(|_| fired(&mut control, &input, &stats)).collect();
        assert_eq!(shots, vec![true, false, false, true, false, false, true]);
    }

    #[test]
    fn a_key_press_resets_the_cooldown() {
        let mut control = PlayerControl::new();
        let stats = stats(5);
        let hold = InputFrame::holding(&[Key::Shoot(Direction::Up)]);
        assert!(fired(&mut control, &hold, &stats));
        assert!(!fired(&mut control, &hold, &stats));

        let press = InputFrame {
            held: vec![Key::Shoot(Direction::Down)],
            pressed: vec![Key::Shoot(Direction::Down)],
            released: vec![Key::Shoot(Direction::Up)],
        };
        let mut out = Vec::new();
        control.handle(&press, &stats, &mut out);
        assert_eq!(
            out,
            vec![
                Command::ReleaseMovement,
                Command::FirePlayer {
                    direction: Direction::Down
                },
            ]
        );
        assert_eq!(control.shot_counter(), 1);
    }
}
