#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded dungeon generation that walks four arms out of the start room.
//!
//! Every arm begins with `straight_steps` rooms along its main direction and
//! then wanders through the exits of the room placed last. Corridor rooms are
//! drawn from the regular templates of a [`TemplatePool`]; the last room of
//! three arms is a special room.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use roomcrawl_core::{CellCoord, Direction, DungeonLayout, RoomTemplate, SpecialRoom, TemplatePool};
use thiserror::Error;
use tracing::{debug, warn};

/// Tunables for [`DungeonGenerator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Rooms placed along each arm, which also fixes the map side to `2N + 2`.
    pub arm_length: u32,
    /// Leading rooms of every arm that follow the arm's main direction.
    pub straight_steps: u32,
    /// Template draws allowed for one corridor cell before the attempt is discarded.
    pub max_template_draws: u32,
    /// Direction draws allowed for one step before the attempt is discarded.
    pub max_direction_draws: u32,
    /// Whole-map attempts before generation gives up.
    pub max_attempts: u32,
}

impl Config {
    /// Creates a configuration with the given arm length and default draw caps.
    #[must_use]
    pub const fn new(arm_length: u32) -> Self {
        Self {
            arm_length,
            straight_steps: 1,
            max_template_draws: 256,
            max_direction_draws: 64,
            max_attempts: 32,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Reason a single attempt was discarded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AttemptFailure {
    /// No drawn direction led to a free cell.
    #[error("no free direction out of {cell:?}")]
    NoFreeDirection {
        /// Cell the walk was stuck in.
        cell: CellCoord,
    },
    /// No drawn regular template fit the cell.
    #[error("no regular template fits {cell:?} entered towards {direction:?}")]
    NoFittingTemplate {
        /// Cell being filled.
        cell: CellCoord,
        /// Direction the walk moved to reach the cell.
        direction: Direction,
    },
    /// The special template has no exit back towards the arm.
    #[error("{room:?} room cannot be entered towards {direction:?}")]
    IncompatibleSpecialRoom {
        /// Special room assigned to the arm.
        room: SpecialRoom,
        /// Direction the walk moved to reach the arm's end.
        direction: Direction,
    },
    /// A straight step ran into a room placed by an earlier arm or off the map.
    #[error("cell {direction:?} of {cell:?} is not free")]
    CellTaken {
        /// Cell the step started from.
        cell: CellCoord,
        /// Direction of the step.
        direction: Direction,
    },
}

/// Errors reported by [`DungeonGenerator::generate`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Every attempt was discarded.
    #[error("dungeon generation failed after {attempts} attempts: {last}")]
    AttemptsExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Reason the final attempt was discarded.
        last: AttemptFailure,
    },
}

/// Builds [`DungeonLayout`] values from a template pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct DungeonGenerator {
    config: Config,
}

impl DungeonGenerator {
    /// Creates a generator using `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Generates a layout, retrying the whole map when an attempt dead-ends.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        pool: &TemplatePool,
        rng: &mut R,
    ) -> Result<DungeonLayout, GenerationError> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.try_layout(pool, rng) {
                Ok(layout) => {
                    debug!(
                        attempt,
                        rooms = layout.room_count(),
                        side = layout.side(),
                        "dungeon generated"
                    );
                    return Ok(layout);
                }
                Err(failure) => {
                    warn!(attempt, reason = %failure, "discarding dungeon attempt");
                    if attempt >= attempts {
                        return Err(GenerationError::AttemptsExhausted {
                            attempts,
                            last: failure,
                        });
                    }
                    attempt += 1;
                }
            }
        }
    }

    fn try_layout<R: Rng + ?Sized>(
        &self,
        pool: &TemplatePool,
        rng: &mut R,
    ) -> Result<DungeonLayout, AttemptFailure> {
        let mut layout = DungeonLayout::with_arm_length(self.config.arm_length);
        let start = layout.start();
        let _ = layout.place(start, Arc::clone(pool.start()));

        let specials = assign_special_rooms(rng);
        for main in Direction::ALL {
            self.walk_arm(&mut layout, pool, main, specials[main.index()], rng)?;
        }
        Ok(layout)
    }

    fn walk_arm<R: Rng + ?Sized>(
        &self,
        layout: &mut DungeonLayout,
        pool: &TemplatePool,
        main: Direction,
        special: Option<SpecialRoom>,
        rng: &mut R,
    ) -> Result<(), AttemptFailure> {
        let mut cursor = layout.start();
        let mut previous = Arc::clone(pool.start());

        for step in 0..self.config.arm_length {
            let (direction, cell) = if step < self.config.straight_steps {
                let cell = layout
                    .neighbor(cursor, main)
                    .filter(|next| !layout.is_occupied(*next))
                    .ok_or(AttemptFailure::CellTaken {
                        cell: cursor,
                        direction: main,
                    })?;
                (main, cell)
            } else {
                self.draw_direction(layout, &previous, cursor, main, rng)?
            };

            let last_step = step + 1 == self.config.arm_length;
            let template = match special {
                Some(room) if last_step => {
                    let template = pool.special(room);
                    if !template.allows_exit(direction.opposite()) {
                        return Err(AttemptFailure::IncompatibleSpecialRoom { room, direction });
                    }
                    Arc::clone(template)
                }
                _ => {
                    let continues_straight = step + 1 < self.config.straight_steps;
                    let required_exit = continues_straight.then_some(main);
                    self.draw_template(layout, pool, cell, direction, required_exit, rng)?
                }
            };

            debug!(
                arm = ?main,
                step,
                column = cell.column(),
                row = cell.row(),
                template = template.name(),
                "placed room"
            );
            let _ = layout.place(cell, Arc::clone(&template));
            previous = template;
            cursor = cell;
        }
        Ok(())
    }

    fn draw_direction<R: Rng + ?Sized>(
        &self,
        layout: &DungeonLayout,
        previous: &RoomTemplate,
        cursor: CellCoord,
        main: Direction,
        rng: &mut R,
    ) -> Result<(Direction, CellCoord), AttemptFailure> {
        for _ in 0..self.config.max_direction_draws {
            let Some(&direction) = previous.exits().choose(rng) else {
                break;
            };
            if direction.opposite() == main {
                continue;
            }
            if let Some(cell) = layout
                .neighbor(cursor, direction)
                .filter(|next| !layout.is_occupied(*next))
            {
                return Ok((direction, cell));
            }
        }
        Err(AttemptFailure::NoFreeDirection { cell: cursor })
    }

    fn draw_template<R: Rng + ?Sized>(
        &self,
        layout: &DungeonLayout,
        pool: &TemplatePool,
        cell: CellCoord,
        direction: Direction,
        required_exit: Option<Direction>,
        rng: &mut R,
    ) -> Result<Arc<RoomTemplate>, AttemptFailure> {
        for _ in 0..self.config.max_template_draws {
            let Some(template) = pool.regular().choose(rng) else {
                break;
            };
            let fits = template.allows_exit(direction.opposite())
                && required_exit.map_or(true, |exit| template.allows_exit(exit))
                && has_available_neighbor(layout, template, cell);
            if fits {
                return Ok(Arc::clone(template));
            }
        }
        Err(AttemptFailure::NoFittingTemplate { cell, direction })
    }
}

/// Assigns the three special rooms to three distinct directions; the fourth stays `None`.
fn assign_special_rooms<R: Rng + ?Sized>(rng: &mut R) -> [Option<SpecialRoom>; 4] {
    let mut order = Direction::ALL;
    order.shuffle(rng);
    let mut specials = [None; 4];
    for (direction, room) in order.into_iter().zip(SpecialRoom::ALL) {
        specials[direction.index()] = Some(room);
    }
    specials
}

/// Whether some exit of `template`, placed at `cell`, leads to a free in-bounds cell.
#[must_use]
pub fn has_available_neighbor(
    layout: &DungeonLayout,
    template: &RoomTemplate,
    cell: CellCoord,
) -> bool {
    template.exits().iter().any(|exit| {
        layout
            .neighbor(cell, *exit)
            .is_some_and(|next| !layout.is_occupied(next))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn template(name: &str, exits: &str) -> Arc<RoomTemplate> {
        Arc::new(RoomTemplate::parse(name, &format!("{exits}\n#^#\n<.>\n#v#\n")).expect("valid"))
    }

    #[test]
    fn special_rooms_take_three_distinct_directions() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let specials = assign_special_rooms(&mut rng);
            assert_eq!(specials.iter().filter(|slot| slot.is_none()).count(), 1);
            for room in SpecialRoom::ALL {
                assert_eq!(specials.iter().filter(|slot| **slot == Some(room)).count(), 1);
            }
        }
    }

    #[test]
    fn available_neighbor_ignores_occupied_and_outside_cells() {
        let mut layout = DungeonLayout::new(2, CellCoord::new(0, 0));
        let corner = CellCoord::new(0, 0);
        let up_left = template("ul", "0 3");
        assert!(!has_available_neighbor(&layout, &up_left, corner));

        let down = template("down", "2");
        assert!(has_available_neighbor(&layout, &down, corner));
        assert!(layout.place(CellCoord::new(0, 1), template("filler", "0")));
        assert!(!has_available_neighbor(&layout, &down, corner));
    }
}
