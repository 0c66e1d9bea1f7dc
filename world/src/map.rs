//! The dungeon map: room models on a square grid and the current position.

use std::sync::Arc;

use roomcrawl_core::{
    CellCoord, Direction, DungeonLayout, PixelRect, RoomTemplate, DOOR_OVERLAP_RATIO, TILE_LENGTH,
};

use crate::room::{door_is_closed, RoomModel};

/// Room models keyed by map cell plus the cell the player currently stands in.
#[derive(Clone, Debug)]
pub struct DungeonMap {
    side: u32,
    rooms: Vec<Option<RoomModel>>,
    current: CellCoord,
}

impl DungeonMap {
    /// Instantiates a room model for every occupied layout cell and recomputes every door.
    #[must_use]
    pub fn from_layout(layout: &DungeonLayout) -> Self {
        let side = layout.side();
        let count = usize::try_from(side).unwrap_or(0).pow(2);
        let mut rooms: Vec<Option<RoomModel>> = vec![None; count];
        let width = usize::try_from(side).unwrap_or(0);
        for (cell, template) in layout.rooms() {
            if let Some(index) = index(width, cell) {
                rooms[index] = Some(RoomModel::new(Arc::clone(template)));
            }
        }

        let mut map = Self {
            side,
            rooms,
            current: layout.start(),
        };
        map.update_all_doors();
        map
    }

    /// Number of cells along each axis.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Map cell the player currently stands in.
    #[must_use]
    pub const fn current(&self) -> CellCoord {
        self.current
    }

    /// Room at `cell`; out-of-bounds cells are absent.
    #[must_use]
    pub fn room(&self, cell: CellCoord) -> Option<&RoomModel> {
        if cell.column() >= self.side || cell.row() >= self.side {
            return None;
        }
        let width = usize::try_from(self.side).ok()?;
        index(width, cell)
            .and_then(|offset| self.rooms.get(offset))
            .and_then(Option::as_ref)
    }

    pub(crate) fn room_mut(&mut self, cell: CellCoord) -> Option<&mut RoomModel> {
        if cell.column() >= self.side || cell.row() >= self.side {
            return None;
        }
        let width = usize::try_from(self.side).ok()?;
        index(width, cell)
            .and_then(|offset| self.rooms.get_mut(offset))
            .and_then(Option::as_mut)
    }

    /// Room the player currently stands in.
    #[must_use]
    pub fn current_room(&self) -> Option<&RoomModel> {
        self.room(self.current)
    }

    pub(crate) fn current_room_mut(&mut self) -> Option<&mut RoomModel> {
        self.room_mut(self.current)
    }

    /// Occupied cells with their rooms in row-major order.
    pub fn rooms(&self) -> impl Iterator<Item = (CellCoord, &RoomModel)> + '_ {
        let side = self.side.max(1);
        self.rooms.iter().enumerate().filter_map(move |(offset, slot)| {
            let offset = u32::try_from(offset).ok()?;
            slot.as_ref()
                .map(|room| (CellCoord::new(offset % side, offset / side), room))
        })
    }

    /// Template of the room adjacent to `cell` in `direction`.
    #[must_use]
    pub fn neighbor_template(
        &self,
        cell: CellCoord,
        direction: Direction,
    ) -> Option<&Arc<RoomTemplate>> {
        cell.step(direction)
            .and_then(|next| self.room(next))
            .map(RoomModel::template)
    }

    /// Recomputes the closed flag of every door of the room at `cell`.
    ///
    /// A door is closed while the room holds live enemies or artifacts, when
    /// no room lies behind it, or when that room has no reciprocal exit.
    pub fn update_doors(&mut self, cell: CellCoord) {
        let neighbors: [Option<Arc<RoomTemplate>>; 4] =
            Direction::ALL.map(|direction| self.neighbor_template(cell, direction).cloned());
        let Some(room) = self.room_mut(cell) else {
            return;
        };
        let occupied = room.has_live_occupants();
        for direction in Direction::ALL {
            if room.door(direction).is_none() {
                continue;
            }
            let closed = door_is_closed(
                occupied,
                neighbors[direction.index()].as_deref(),
                direction,
            );
            room.set_door_closed(direction, closed);
        }
    }

    /// Recomputes doors for every room on the map.
    pub fn update_all_doors(&mut self) {
        let cells: Vec<CellCoord> = self.rooms().map(|(cell, _)| cell).collect();
        for cell in cells {
            self.update_doors(cell);
        }
    }

    /// Tests the player's box against the current room's doors in
    /// `Up, Right, Down, Left` order.
    ///
    /// The first door overlapped at half scale whose neighbour exists moves the
    /// current position one cell. The returned direction is the side of the
    /// new room the player entered through.
    pub fn check_door(&mut self, player: &PixelRect) -> Option<Direction> {
        let room = self.current_room()?;
        let crossed = Direction::ALL.into_iter().find(|direction| {
            let Some(door) = room.door(*direction) else {
                return false;
            };
            let door_rect = PixelRect::at_cell(door, TILE_LENGTH, 0);
            door_rect.intersects_scaled(player, DOOR_OVERLAP_RATIO)
                && self.neighbor_template(self.current, *direction).is_some()
        })?;

        let next = self.current.step(crossed)?;
        self.current = next;
        Some(crossed.opposite())
    }
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
