//! Animation selection shared by the world and presentation.

use std::time::Duration;

use crate::Direction;

/// Animation clip families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationKey {
    /// Standing still.
    Stay,
    /// Walking.
    Run,
    /// Firing.
    Shoot,
}

/// Clip family plus facing direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationState {
    /// Clip family.
    pub key: AnimationKey,
    /// Direction the entity faces.
    pub facing: Direction,
}

impl AnimationState {
    /// Standing still, facing `facing`.
    #[must_use]
    pub const fn idle(facing: Direction) -> Self {
        Self {
            key: AnimationKey::Stay,
            facing,
        }
    }

    /// Walking toward `facing`.
    #[must_use]
    pub const fn running(facing: Direction) -> Self {
        Self {
            key: AnimationKey::Run,
            facing,
        }
    }

    /// Firing toward `facing`.
    #[must_use]
    pub const fn shooting(facing: Direction) -> Self {
        Self {
            key: AnimationKey::Shoot,
            facing,
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::idle(Direction::Down)
    }
}

/// Steps through a clip's frames using elapsed wall time.
///
/// The player only tracks indices; frame images and their durations live with
/// the presentation layer and are passed in on every advance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePlayer {
    index: usize,
    elapsed: Duration,
    reversed: bool,
    running: bool,
}

impl FramePlayer {
    /// Creates a player that starts on the first frame and moves forward.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index: 0,
            elapsed: Duration::ZERO,
            reversed: false,
            running: true,
        }
    }

    /// Creates a player that walks its frames backwards.
    #[must_use]
    pub const fn reversed() -> Self {
        Self {
            index: 0,
            elapsed: Duration::ZERO,
            reversed: true,
            running: true,
        }
    }

    /// Index of the frame currently shown.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Whether the player advances on [`FramePlayer::advance`].
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Freezes the current frame.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resumes advancing.
    pub fn play(&mut self) {
        self.running = true;
    }

    /// Returns to the first frame and clears accumulated time.
    pub fn restart(&mut self) {
        self.index = 0;
        self.elapsed = Duration::ZERO;
    }

    /// Accumulates `dt` and moves at most one frame once the current frame's
    /// duration has been exceeded. Returns the frame index to draw.
    pub fn advance(&mut self, dt: Duration, durations: &[Duration]) -> usize {
        let count = durations.len();
        if count == 0 {
            self.restart();
            return 0;
        }
        if self.index >= count {
            self.restart();
        }
        if !self.running {
            return self.index;
        }

        self.elapsed += dt;
        if self.elapsed > durations[self.index] {
            self.index = if self.reversed {
                (self.index + count - 1) % count
            } else {
                (self.index + 1) % count
            };
            self.elapsed = Duration::ZERO;
        }
        self.index
    }
}

impl Default for FramePlayer {
    fn default() -> Self {
        Self::new()
    }
}
