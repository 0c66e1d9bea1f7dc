#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy decision making: chase the player along grid routes and fire when aligned.
//!
//! Routes are recomputed for every enemy on every tick. The pathfinder is a
//! type parameter so a caching implementation can be swapped in without
//! touching the simulation.

use roomcrawl_core::{
    Command, Direction, EnemyView, OccupancyView, Pathfinder, PixelRect, ALIGNMENT_TOLERANCE,
    ENTITY_EXTENT,
};
use roomcrawl_world::GridPathfinder;

/// Pure system that steers enemies toward the player.
#[derive(Debug, Default)]
pub struct EnemyAi<P = GridPathfinder> {
    pathfinder: P,
}

impl EnemyAi<GridPathfinder> {
    /// Creates the system backed by the breadth-first grid pathfinder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: Pathfinder> EnemyAi<P> {
    /// Creates the system backed by a custom pathfinder.
    #[must_use]
    pub fn with_pathfinder(pathfinder: P) -> Self {
        Self { pathfinder }
    }

    /// Emits one [`Command::StepEnemy`] per enemy that has a route to the player.
    ///
    /// Enemies are visited in id order. Enemies standing on the player's cell,
    /// or whose route is blocked, stay put.
    pub fn steer(
        &mut self,
        enemies: &EnemyView,
        player: &PixelRect,
        grid: OccupancyView<'_>,
        out: &mut Vec<Command>,
    ) {
        let Some(goal) = player.cell().filter(|cell| grid.contains(*cell)) else {
            return;
        };

        for enemy in enemies.iter() {
            let Some(start) = enemy.rect.cell().filter(|cell| grid.contains(*cell)) else {
                continue;
            };
            if let Some(waypoint) = self.pathfinder.find_path(grid, start, goal).first_step() {
                out.push(Command::StepEnemy {
                    enemy: enemy.id,
                    waypoint,
                });
            }
        }
    }

    /// Emits an aim or idle command per enemy depending on its alignment with the player.
    ///
    /// Call after the steering commands have been applied so alignment is
    /// judged from the enemies' new positions.
    pub fn aim(&self, enemies: &EnemyView, player: &PixelRect, out: &mut Vec<Command>) {
        for enemy in enemies.iter() {
            match firing_direction(&enemy.rect, player) {
                Some(direction) => out.push(Command::AimEnemy {
                    enemy: enemy.id,
                    direction,
                }),
                None => out.push(Command::IdleEnemy { enemy: enemy.id }),
            }
        }
    }

    /// Runs [`EnemyAi::steer`] and [`EnemyAi::aim`] against the same snapshot.
    pub fn handle(
        &mut self,
        enemies: &EnemyView,
        player: &PixelRect,
        grid: OccupancyView<'_>,
        out: &mut Vec<Command>,
    ) {
        self.steer(enemies, player, grid, out);
        self.aim(enemies, player, out);
    }
}

/// Direction an enemy at `enemy` fires in, or `None` when it is not aligned.
///
/// A column match within the tolerance wins over a row match; level
/// positions fire up or left.
#[must_use]
pub fn firing_direction(enemy: &PixelRect, player: &PixelRect) -> Option<Direction> {
    let column_band = player.x() - ALIGNMENT_TOLERANCE..=player.x() + ALIGNMENT_TOLERANCE;
    if column_band.contains(&enemy.x()) {
        return Some(if player.y() <= enemy.y() {
            Direction::Up
        } else {
            Direction::Down
        });
    }

    let row_band = player.y() - ENTITY_EXTENT..=player.y() + ENTITY_EXTENT;
    if row_band.contains(&enemy.y()) {
        return Some(if player.x() <= enemy.x() {
            Direction::Left
        } else {
            Direction::Right
        });
    }
    None
}
