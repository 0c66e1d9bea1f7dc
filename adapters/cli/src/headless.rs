//! Windowless rendering backend and a scripted input source.

use std::time::Duration;

use anyhow::Result;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use roomcrawl_core::{AudioCue, Direction, InputFrame, Key};
use roomcrawl_rendering::{AudioSink, Presentation, RenderingBackend, Scene};
use tracing::{debug, trace};

/// Backend that runs a fixed number of frames without drawing anything.
#[derive(Debug)]
pub(crate) struct HeadlessBackend<I> {
    frames: u64,
    frame_time: Duration,
    input: I,
}

impl<I> HeadlessBackend<I>
where
    I: Iterator<Item = InputFrame>,
{
    pub(crate) fn new(frames: u64, frame_time: Duration, input: I) -> Self {
        Self {
            frames,
            frame_time,
            input,
        }
    }
}

impl<I> RenderingBackend for HeadlessBackend<I>
where
    I: Iterator<Item = InputFrame>,
{
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, InputFrame, &mut Scene),
    {
        debug!(
            title = %presentation.window_title,
            frames = self.frames,
            "headless backend started"
        );
        let mut scene = presentation.scene;
        for _ in 0..self.frames {
            let Some(input) = self.input.next() else {
                break;
            };
            update_scene(self.frame_time, input, &mut scene);
        }
        Ok(())
    }
}

/// Pseudo-random key presses that hold each choice for a while.
///
/// Every `hold` frames one movement key and at most one fire key are drawn;
/// the frames in between keep them held, and press and release edges are
/// reported on the frame the choice changes.
#[derive(Debug)]
pub(crate) struct ScriptedInput {
    rng: ChaCha8Rng,
    hold: u32,
    elapsed: u32,
    held: Vec<Key>,
}

impl ScriptedInput {
    pub(crate) fn new(seed: u64, hold: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            hold: hold.max(1),
            elapsed: 0,
            held: Vec::new(),
        }
    }

    fn draw_keys(&mut self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(2);
        if let Some(direction) = Direction::ALL.choose(&mut self.rng) {
            keys.push(Key::Move(*direction));
        }
        if self.rng.gen_bool(0.75) {
            if let Some(direction) = Direction::ALL.choose(&mut self.rng) {
                keys.push(Key::Shoot(*direction));
            }
        }
        keys
    }
}

impl Iterator for ScriptedInput {
    type Item = InputFrame;

    fn next(&mut self) -> Option<InputFrame> {
        if self.elapsed % self.hold != 0 {
            self.elapsed += 1;
            return Some(InputFrame::holding(&self.held));
        }
        self.elapsed = 1;

        let next = self.draw_keys();
        let pressed = next
            .iter()
            .filter(|key| !self.held.contains(*key))
            .copied()
            .collect();
        let released = self
            .held
            .iter()
            .filter(|key| !next.contains(*key))
            .copied()
            .collect();
        self.held = next;
        Some(InputFrame {
            held: self.held.clone(),
            pressed,
            released,
        })
    }
}

/// Audio sink that logs cues instead of playing them.
#[derive(Debug, Default)]
pub(crate) struct LoggingAudio {
    played: u64,
}

impl LoggingAudio {
    pub(crate) const fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LoggingAudio {
    fn play(&mut self, cue: AudioCue) {
        trace!(?cue, "audio cue");
        self.played += 1;
    }
}
