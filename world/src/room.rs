//! Per-cell room state: static occupancy, doors, and live occupant counters.

use std::sync::Arc;

use roomcrawl_core::{CellCoord, Direction, Occupancy, OccupancyView, RoomTemplate};

/// A room template bound to one map cell.
///
/// Occupancy is derived once from the template. Door existence comes from the
/// template as well; whether a door is closed is recomputed by the owning map.
#[derive(Clone, Debug)]
pub struct RoomModel {
    template: Arc<RoomTemplate>,
    occupancy: Vec<Occupancy>,
    doors: [Option<CellCoord>; 4],
    door_closed: [bool; 4],
    live_enemies: u32,
    live_artifacts: u32,
    boss_present: bool,
    entered: bool,
}

impl RoomModel {
    /// Instantiates room state for `template`. All doors start closed.
    #[must_use]
    pub fn new(template: Arc<RoomTemplate>) -> Self {
        let occupancy = template.occupancy();
        let doors = Direction::ALL.map(|direction| template.door(direction));
        Self {
            template,
            occupancy,
            doors,
            door_closed: [true; 4],
            live_enemies: 0,
            live_artifacts: 0,
            boss_present: false,
            entered: false,
        }
    }

    /// Template the room was built from.
    #[must_use]
    pub fn template(&self) -> &Arc<RoomTemplate> {
        &self.template
    }

    /// Static passability grid handed to pathfinding.
    #[must_use]
    pub fn occupancy_view(&self) -> OccupancyView<'_> {
        OccupancyView::new(&self.occupancy, self.template.columns(), self.template.rows())
    }

    /// Cell of the door on `direction`, if the template has one.
    #[must_use]
    pub fn door(&self, direction: Direction) -> Option<CellCoord> {
        self.doors[direction.index()]
    }

    /// Closed state of the door on `direction`, `None` when there is no door.
    #[must_use]
    pub fn door_closed(&self, direction: Direction) -> Option<bool> {
        self.door(direction)
            .map(|_| self.door_closed[direction.index()])
    }

    /// Closed state for all four sides indexed by [`Direction::index`].
    #[must_use]
    pub fn door_states(&self) -> [Option<bool>; 4] {
        Direction::ALL.map(|direction| self.door_closed(direction))
    }

    /// Enemies, boss included, still alive in the room.
    #[must_use]
    pub const fn live_enemies(&self) -> u32 {
        self.live_enemies
    }

    /// Artifacts still lying in the room.
    #[must_use]
    pub const fn live_artifacts(&self) -> u32 {
        self.live_artifacts
    }

    /// Whether a boss is currently alive in the room.
    #[must_use]
    pub const fn boss_present(&self) -> bool {
        self.boss_present
    }

    /// Whether the room has been entered, which also means its markers spawned.
    #[must_use]
    pub const fn has_been_entered(&self) -> bool {
        self.entered
    }

    /// Whether enemies or artifacts keep the doors shut.
    #[must_use]
    pub const fn has_live_occupants(&self) -> bool {
        self.live_enemies > 0 || self.live_artifacts > 0
    }

    /// Marks the room entered. Returns `true` only for the first entry.
    pub(crate) fn mark_entered(&mut self) -> bool {
        let first = !self.entered;
        self.entered = true;
        first
    }

    pub(crate) fn add_enemy(&mut self, boss: bool) {
        self.live_enemies += 1;
        self.boss_present |= boss;
    }

    pub(crate) fn add_artifact(&mut self) {
        self.live_artifacts += 1;
    }

    /// Decrements the enemy counter. Returns `true` when it just reached zero.
    pub(crate) fn remove_enemy(&mut self, boss: bool) -> bool {
        if boss {
            self.boss_present = false;
        }
        decrement(&mut self.live_enemies)
    }

    /// Decrements the artifact counter. Returns `true` when it just reached zero.
    pub(crate) fn remove_artifact(&mut self) -> bool {
        decrement(&mut self.live_artifacts)
    }

    pub(crate) fn set_door_closed(&mut self, direction: Direction, closed: bool) {
        self.door_closed[direction.index()] = closed;
    }
}

fn decrement(counter: &mut u32) -> bool {
    match *counter {
        0 => false,
        1 => {
            *counter = 0;
            true
        }
        _ => {
            *counter -= 1;
            false
        }
    }
}

/// Closed state of a door on `direction` given the room's occupants and its neighbour.
#[must_use]
pub fn door_is_closed(
    has_live_occupants: bool,
    neighbor: Option<&RoomTemplate>,
    direction: Direction,
) -> bool {
    has_live_occupants
        || neighbor.map_or(true, |room| !room.allows_exit(direction.opposite()))
}
