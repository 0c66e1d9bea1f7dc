//! Breadth-first routing over a room's static occupancy grid.

use roomcrawl_core::{CellCoord, Occupancy, OccupancyView, Pathfinder, Route};

const UNVISITED: i32 = -2;
const BLOCKED: i32 = -1;

/// Expansion order used both when relaxing neighbours and when walking back from the goal.
const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Frontier-rescan breadth-first search used by enemy AI.
///
/// Every frontier level rescans the whole grid for cells carrying the current
/// distance and relaxes their unvisited neighbours. The search stops as soon
/// as a level relaxes nothing or the goal has a distance. Paths are rebuilt
/// from the goal by stepping into the first neighbour, in `Right, Down, Left,
/// Up` order, whose distance is exactly one less.
///
/// The distance buffer is reused between queries; nothing else carries over.
#[derive(Clone, Debug, Default)]
pub struct GridPathfinder {
    distances: Vec<i32>,
}

impl GridPathfinder {
    /// Creates a pathfinder with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance recorded for `cell` by the most recent query.
    ///
    /// `-1` marks blocking cells and `-2` cells the search never reached.
    #[must_use]
    pub fn last_distance(&self, columns: u32, cell: CellCoord) -> Option<i32> {
        let width = usize::try_from(columns).ok()?;
        index(width, cell).and_then(|offset| self.distances.get(offset).copied())
    }

    fn flood(&mut self, grid: &OccupancyView<'_>, start: CellCoord, goal: CellCoord, width: usize) {
        let (columns, rows) = grid.dimensions();

        self.distances.clear();
        self.distances.extend(grid.iter().map(|occupancy| match occupancy {
            Occupancy::Blocking => BLOCKED,
            Occupancy::Passable => UNVISITED,
        }));
        if let Some(start_index) = index(width, start) {
            self.distances[start_index] = 0;
        }
        let Some(goal_index) = index(width, goal) else {
            return;
        };

        let mut counter = 0;
        loop {
            let mut relaxed = false;
            for row in 0..rows {
                for column in 0..columns {
                    let cell = CellCoord::new(column, row);
                    let Some(cell_index) = index(width, cell) else {
                        continue;
                    };
                    if self.distances[cell_index] != counter {
                        continue;
                    }
                    for neighbor in neighbors(cell, columns, rows) {
                        let Some(neighbor_index) = index(width, neighbor) else {
                            continue;
                        };
                        if self.distances[neighbor_index] == UNVISITED {
                            self.distances[neighbor_index] = counter + 1;
                            relaxed = true;
                        }
                    }
                }
            }
            counter += 1;
            if !relaxed || self.distances[goal_index] != UNVISITED {
                break;
            }
        }
    }

    fn walk_back(&self, goal: CellCoord, columns: u32, rows: u32, width: usize) -> Vec<CellCoord> {
        let mut path = Vec::new();
        let mut cell = goal;
        let mut counter = index(width, goal).map_or(0, |offset| self.distances[offset]);

        while counter > 0 {
            path.push(cell);
            counter -= 1;
            let next = neighbors(cell, columns, rows).find(|neighbor| {
                index(width, *neighbor).map(|offset| self.distances[offset]) == Some(counter)
            });
            match next {
                Some(next) => cell = next,
                None => break,
            }
        }
        path
    }
}

impl Pathfinder for GridPathfinder {
    fn find_path(&mut self, grid: OccupancyView<'_>, start: CellCoord, goal: CellCoord) -> Route {
        assert!(grid.contains(start), "route start {start:?} lies outside the room");
        assert!(grid.contains(goal), "route goal {goal:?} lies outside the room");

        let (columns, rows) = grid.dimensions();
        let width = usize::try_from(columns).unwrap_or(0);
        self.flood(&grid, start, goal, width);

        match self.last_distance(columns, goal) {
            Some(distance) if distance >= 0 => {
                Route::Found(self.walk_back(goal, columns, rows, width))
            }
            _ => Route::Unreachable,
        }
    }
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    NEIGHBOR_OFFSETS.into_iter().filter_map(move |(dx, dy)| {
        let column = cell.column().checked_add_signed(dx)?;
        let row = cell.row().checked_add_signed(dy)?;
        (column < width && row < height).then(|| CellCoord::new(column, row))
    })
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> (Vec<Occupancy>, u32, u32) {
        let columns = rows.first().map_or(0, |row| row.len()) as u32;
        let cells = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|glyph| match glyph {
                '#' => Occupancy::Blocking,
                _ => Occupancy::Passable,
            })
            .collect();
        (cells, columns, rows.len() as u32)
    }

    #[test]
    fn open_column_routes_straight_down() {
        let (cells, columns, rows) = grid(&["...", "...", "...", "..."]);
        let view = OccupancyView::new(&cells, columns, rows);
        let mut pathfinder = GridPathfinder::new();

        let route = pathfinder.find_path(view, CellCoord::new(0, 0), CellCoord::new(0, 3));

        assert_eq!(
            route,
            Route::Found(vec![
                CellCoord::new(0, 3),
                CellCoord::new(0, 2),
                CellCoord::new(0, 1),
            ])
        );
        assert_eq!(route.first_step(), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn ties_resolve_right_then_down() {
        let (cells, columns, rows) = grid(&["..", ".."]);
        let view = OccupancyView::new(&cells, columns, rows);
        let mut pathfinder = GridPathfinder::new();

        let route = pathfinder.find_path(view, CellCoord::new(1, 1), CellCoord::new(0, 0));

        assert_eq!(
            route,
            Route::Found(vec![CellCoord::new(0, 0), CellCoord::new(1, 0)])
        );
    }

    #[test]
    fn walls_lengthen_the_route() {
        let (cells, columns, rows) = grid(&["...", "##.", "..."]);
        let view = OccupancyView::new(&cells, columns, rows);
        let mut pathfinder = GridPathfinder::new();

        let route = pathfinder.find_path(view, CellCoord::new(0, 0), CellCoord::new(0, 2));

        assert_eq!(route.len(), 6);
        assert_eq!(route.first_step(), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn sealed_goal_is_unreachable() {
        let (cells, columns, rows) = grid(&["..#.", "..#.", "..#."]);
        let view = OccupancyView::new(&cells, columns, rows);
        let mut pathfinder = GridPathfinder::new();

        let route = pathfinder.find_path(view, CellCoord::new(0, 0), CellCoord::new(3, 1));

        assert!(route.is_unreachable());
        assert_eq!(
            pathfinder.last_distance(columns, CellCoord::new(3, 1)),
            Some(UNVISITED)
        );
        assert_eq!(
            pathfinder.last_distance(columns, CellCoord::new(2, 0)),
            Some(BLOCKED)
        );
    }

    #[test]
    fn same_cell_yields_an_empty_route() {
        let (cells, columns, rows) = grid(&["..", ".."]);
        let view = OccupancyView::new(&cells, columns, rows);
        let mut pathfinder = GridPathfinder::new();

        let route = pathfinder.find_path(view, CellCoord::new(1, 0), CellCoord::new(1, 0));

        assert_eq!(route, Route::Found(Vec::new()));
        assert_eq!(route.first_step(), None);
    }

    #[test]
    fn route_length_matches_manhattan_distance_in_open_rooms() {
        let (cells, columns, rows) = grid(&["......", "......", "......", "......"]);
        let view = OccupancyView::new(&cells, columns, rows);
        let mut pathfinder = GridPathfinder::new();

        for row in 0..rows {
            for column in 0..columns {
                let goal = CellCoord::new(column, row);
                let start = CellCoord::new(2, 1);
                let route = pathfinder.find_path(view, start, goal);
                assert_eq!(route.len() as u32, start.manhattan_distance(goal));
            }
        }
    }

    #[test]
    #[should_panic(expected = "outside the room")]
    fn out_of_bounds_start_panics() {
        let (cells, columns, rows) = grid(&[".."]);
        let view = OccupancyView::new(&cells, columns, rows);
        let _ = GridPathfinder::new().find_path(view, CellCoord::new(5, 0), CellCoord::new(0, 0));
    }
}
