#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Roomcrawl engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable snapshots and
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then reports [`Event`]
//! values describing what actually happened. Adapters consume the same events
//! to drive audio cues and presentation.

mod animation;
mod stats;
mod template;

use serde::{Deserialize, Serialize};

pub use animation::{AnimationKey, AnimationState, FramePlayer};
pub use stats::{ArtifactEffect, ArtifactKind, Difficulty, DifficultyProfile, PlayerStats};
pub use template::{
    DungeonLayout, Glyph, PoolError, RoomTemplate, SpecialRoom, TemplateError, TemplatePool,
};

/// Side length of a square room tile measured in pixels.
pub const TILE_LENGTH: i32 = 50;

/// Side length of the bounding box shared by players, enemies and artifacts.
pub const ENTITY_EXTENT: i32 = 50;

/// Side length of a bullet's bounding box.
pub const BULLET_EXTENT: i32 = 10;

/// Distance travelled by enemy bullets on every tick.
pub const ENEMY_BULLET_SPEED: i32 = 5;

/// Horizontal slack allowed when an enemy checks for vertical alignment with the player.
pub const ALIGNMENT_TOLERANCE: i32 = 10;

/// Offset applied to artifacts relative to the origin of their spawn cell.
pub const ARTIFACT_INSET: i32 = 10;

/// Room cell that receives the winning artifact once the boss falls.
pub const WINNING_ARTIFACT_CELL: CellCoord = CellCoord::new(7, 5);

/// Overlap ratio used when testing whether the player stands inside a door.
pub const DOOR_OVERLAP_RATIO: f32 = 0.5;

/// Cardinal directions used for doors, movement, and firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing column indices.
    Right,
    /// Toward increasing row indices.
    Down,
    /// Toward decreasing column indices.
    Left,
}

impl Direction {
    /// All directions in their canonical `Up, Right, Down, Left` order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Numeric encoding used by level files (`0` = up through `3` = left).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Decodes a level-file direction number.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Up),
            1 => Some(Self::Right),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            _ => None,
        }
    }

    /// Direction pointing the opposite way, `(d + 2) mod 4`.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Unit offset `(dx, dy)` in screen orientation.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Whether the direction moves along the vertical axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Used both for cells inside a room and for rooms inside the dungeon map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring cell one step in `direction`, or `None` when it would underflow.
    ///
    /// Upper bounds are the caller's concern since only the owning grid knows them.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(CellCoord::new(column, row))
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Axis-aligned rectangle in room pixel space.
///
/// Every collision test in the simulation goes through this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl PixelRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `extent` anchored at the origin of `cell`, shifted by `inset`.
    #[must_use]
    pub fn at_cell(cell: CellCoord, extent: i32, inset: i32) -> Self {
        let x = i32::try_from(cell.column()).unwrap_or(i32::MAX / TILE_LENGTH) * TILE_LENGTH;
        let y = i32::try_from(cell.row()).unwrap_or(i32::MAX / TILE_LENGTH) * TILE_LENGTH;
        Self::new(x + inset, y + inset, extent, extent)
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Horizontal size.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Vertical size.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Centre point, rounded toward the top-left.
    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Copy of the rectangle moved by the provided offset.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Copy of the rectangle moved `distance` pixels in `direction`.
    #[must_use]
    pub const fn stepped(self, direction: Direction, distance: i32) -> Self {
        let (dx, dy) = direction.offset();
        self.translated(dx * distance, dy * distance)
    }

    /// Copy of the rectangle grown by `dx`/`dy` around its centre.
    ///
    /// Negative values shrink it; odd values bias toward the top-left the same
    /// way integer halving does.
    #[must_use]
    pub const fn inflated(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x - dx / 2,
            self.y - dy / 2,
            self.width + dx,
            self.height + dy,
        )
    }

    /// Reports whether the interiors of two rectangles overlap.
    ///
    /// Rectangles that merely share an edge do not intersect.
    #[must_use]
    pub const fn intersects(&self, other: &PixelRect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Intersection test after scaling both rectangles by `ratio` around their centres.
    #[must_use]
    pub fn intersects_scaled(&self, other: &PixelRect, ratio: f32) -> bool {
        self.scaled(ratio).intersects(&other.scaled(ratio))
    }

    fn scaled(self, ratio: f32) -> Self {
        let dx = (self.width as f32 * ratio - self.width as f32) as i32;
        let dy = (self.height as f32 * ratio - self.height as f32) as i32;
        self.inflated(dx, dy)
    }

    /// Grid cell containing the top-left corner, or `None` for negative coordinates.
    #[must_use]
    pub fn cell(&self) -> Option<CellCoord> {
        let column = u32::try_from(self.x.div_euclid(TILE_LENGTH)).ok()?;
        let row = u32::try_from(self.y.div_euclid(TILE_LENGTH)).ok()?;
        Some(CellCoord::new(column, row))
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an artifact lying in a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(u32);

impl ArtifactId {
    /// Creates a new artifact identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Tier of a hostile entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Regular room enemy spawned from `E` markers.
    Grunt,
    /// Boss spawned from `B` markers; its death yields the winning artifact.
    Boss,
}

/// Entity group a bullet is allowed to damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageGroup {
    /// Fired by the player; hurts enemies and the boss.
    Enemies,
    /// Fired by enemies; hurts the player.
    Player,
}

/// Static tile materials that make up a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Walkable ground.
    Floor,
    /// Solid wall.
    Wall,
    /// Boulder; behaves like a wall.
    Rock,
    /// Pit that the player cannot cross but bullets fly over.
    Hole,
    /// Door on the given side of the room.
    Door(Direction),
}

impl TileKind {
    /// Whether the tile blocks walkers before any door state is applied.
    #[must_use]
    pub const fn blocks_player(self) -> bool {
        matches!(self, Self::Wall | Self::Rock | Self::Hole)
    }

    /// Whether bullets are destroyed when they overlap the tile.
    #[must_use]
    pub const fn blocks_bullets(self) -> bool {
        matches!(self, Self::Wall | Self::Rock | Self::Door(_))
    }

    /// Whether the tile is hazardous to the player.
    #[must_use]
    pub const fn damages_player(self) -> bool {
        matches!(self, Self::Hole)
    }
}

/// Per-cell passability used by grid pathfinding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupancy {
    /// Cell may be traversed.
    Passable,
    /// Cell is a wall, rock, hole or door.
    Blocking,
}

/// Read-only view into a room's static occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Occupancy],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [Occupancy], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Occupancy recorded for the cell, if it lies inside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Occupancy> {
        if !self.contains(cell) {
            return None;
        }
        let index = usize::try_from(cell.row()).ok()? * usize::try_from(self.columns).ok()?
            + usize::try_from(cell.column()).ok()?;
        self.cells.get(index).copied()
    }

    /// Reports whether the cell exists and can be traversed.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.get(cell) == Some(Occupancy::Passable)
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Occupancy> + 'a {
        self.cells.iter().copied()
    }
}

/// Outcome of a grid routing query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// No 4-connected path exists between the endpoints.
    Unreachable,
    /// Cells ordered from the goal back toward the start, excluding the start.
    ///
    /// Empty when start and goal coincide.
    Found(Vec<CellCoord>),
}

impl Route {
    /// Cells of the route, goal first; empty when unreachable.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        match self {
            Self::Unreachable => &[],
            Self::Found(cells) => cells,
        }
    }

    /// First cell to step into when leaving the start, if any.
    #[must_use]
    pub fn first_step(&self) -> Option<CellCoord> {
        self.cells().last().copied()
    }

    /// Number of steps between start and goal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells().len()
    }

    /// Whether the route has no steps to take.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells().is_empty()
    }

    /// Whether the goal could not be reached at all.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable)
    }
}

/// Grid routing seam used by enemy AI.
///
/// Implementations may cache internally, but must answer every query as if
/// computed from scratch against the provided grid.
pub trait Pathfinder {
    /// Computes a shortest 4-connected route from `start` to `goal`.
    ///
    /// # Panics
    ///
    /// Implementations panic when either endpoint lies outside the grid.
    fn find_path(&mut self, grid: OccupancyView<'_>, start: CellCoord, goal: CellCoord) -> Route;
}

/// Discrete sound triggers emitted for the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// A player bullet struck an enemy.
    EnemyHit,
    /// An enemy bullet struck the player.
    PlayerHit,
    /// The player fired.
    ShootByHero,
    /// An enemy fired.
    ShootByEnemy,
    /// The player picked up an artifact.
    ArtifactPickup,
}

/// Session-level lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    /// No dungeon installed yet.
    #[default]
    Idle,
    /// The player is alive and exploring.
    Playing,
    /// The player's health dropped to zero.
    GameOver,
    /// The winning artifact was collected.
    Victory,
}

/// Logical input keys understood by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Walk in the given direction.
    Move(Direction),
    /// Fire in the given direction.
    Shoot(Direction),
}

impl Key {
    /// Direction carried by the key.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Move(direction) | Self::Shoot(direction) => direction,
        }
    }
}

/// Input snapshot gathered by adapters for a single tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Keys currently held down.
    pub held: Vec<Key>,
    /// Keys that went down since the previous tick.
    pub pressed: Vec<Key>,
    /// Keys that went up since the previous tick.
    pub released: Vec<Key>,
}

impl InputFrame {
    /// Input frame with only the provided keys held and no edges.
    #[must_use]
    pub fn holding(keys: &[Key]) -> Self {
        Self {
            held: keys.to_vec(),
            ..Self::default()
        }
    }

    /// Reports whether the key is currently held.
    #[must_use]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a freshly generated dungeon and spawns the player in its start room.
    StartSession {
        /// Room templates placed on the map grid.
        layout: DungeonLayout,
        /// Numbers that scale enemies for this run.
        profile: DifficultyProfile,
        /// Stat block the player begins with.
        stats: PlayerStats,
        /// Seed for artifact draws inside rooms.
        seed: u64,
    },
    /// Resets the player's animation to idle after a direction key is released.
    ReleaseMovement,
    /// Attempts to move the player one speed step in the given direction.
    MovePlayer {
        /// Direction of travel.
        direction: Direction,
    },
    /// Spawns a player bullet travelling in the given direction.
    FirePlayer {
        /// Direction the bullet travels.
        direction: Direction,
    },
    /// Attempts to move an enemy toward the pixel origin of a room cell.
    StepEnemy {
        /// Enemy attempting to move.
        enemy: EnemyId,
        /// Room cell the enemy heads for.
        waypoint: CellCoord,
    },
    /// Faces an aligned enemy toward the player and fires when its cadence allows.
    AimEnemy {
        /// Enemy taking aim.
        enemy: EnemyId,
        /// Direction toward the player.
        direction: Direction,
    },
    /// Returns an unaligned enemy to its idle animation.
    IdleEnemy {
        /// Enemy that lost sight of the player.
        enemy: EnemyId,
    },
    /// Advances bullets, resolves combat and pickups, and checks door transitions.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A dungeon was installed and a new run began.
    SessionStarted {
        /// Number of rooms placed on the map.
        rooms: usize,
        /// Map cell of the start room.
        start: CellCoord,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// The player arrived in a room.
    RoomEntered {
        /// Map cell of the room.
        room: CellCoord,
        /// Side of the room the player came in through, `None` for the initial spawn.
        entered_from: Option<Direction>,
        /// Whether enemies and artifacts were spawned by this entry.
        first_visit: bool,
    },
    /// Door states of the current room were recomputed.
    DoorsUpdated {
        /// Map cell of the room.
        room: CellCoord,
        /// Closed flag per door indexed by [`Direction::index`], `None` where no door exists.
        closed: [Option<bool>; 4],
    },
    /// The player changed position.
    PlayerMoved {
        /// Bounding box before the move.
        from: PixelRect,
        /// Bounding box after the move.
        to: PixelRect,
    },
    /// An enemy was created from a room marker.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Tier of the enemy.
        kind: EnemyKind,
        /// Room cell of the marker.
        cell: CellCoord,
    },
    /// An enemy changed position.
    EnemyAdvanced {
        /// Enemy that moved.
        enemy: EnemyId,
        /// Bounding box before the move.
        from: PixelRect,
        /// Bounding box after the move.
        to: PixelRect,
    },
    /// A bullet entered play.
    BulletFired {
        /// Identifier assigned to the bullet.
        bullet: BulletId,
        /// Group the bullet may damage.
        damages: DamageGroup,
        /// Direction of travel.
        direction: Direction,
    },
    /// A bullet left play after hitting something or leaving the room.
    BulletDestroyed {
        /// Bullet that was removed.
        bullet: BulletId,
    },
    /// An enemy survived a hit.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Health left after the hit.
        health: f32,
    },
    /// An enemy's health dropped to zero and it was removed.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Tier of the enemy.
        kind: EnemyKind,
    },
    /// The current room has no live enemies or artifacts left.
    RoomCleared {
        /// Map cell of the room.
        room: CellCoord,
    },
    /// The player was hit by an enemy bullet.
    PlayerDamaged {
        /// Health left after the hit.
        health: i32,
    },
    /// An artifact appeared in the current room.
    ArtifactSpawned {
        /// Identifier assigned to the artifact.
        artifact: ArtifactId,
        /// Which artifact it is.
        kind: ArtifactKind,
        /// Room cell it occupies.
        cell: CellCoord,
    },
    /// The player picked up an artifact.
    ArtifactCollected {
        /// Artifact that was picked up.
        artifact: ArtifactId,
        /// Which artifact it was.
        kind: ArtifactKind,
        /// Player stats after the effect was applied.
        stats: PlayerStats,
    },
    /// Sound trigger for the audio collaborator.
    Audio {
        /// Cue to play.
        cue: AudioCue,
    },
    /// The player died.
    GameOver,
    /// The winning artifact was collected.
    Victory,
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Bounding box of the player.
    pub rect: PixelRect,
    /// Active animation variant.
    pub animation: AnimationState,
    /// Current stat block.
    pub stats: PlayerStats,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Tier of the enemy.
    pub kind: EnemyKind,
    /// Bounding box of the enemy.
    pub rect: PixelRect,
    /// Remaining health.
    pub health: f32,
    /// Active animation variant.
    pub animation: AnimationState,
}

/// Read-only snapshot describing all enemies in the current room.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a room tile used for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSnapshot {
    /// Room cell of the tile.
    pub cell: CellCoord,
    /// Material of the tile.
    pub kind: TileKind,
    /// Whether the tile currently stops walkers; reflects door state.
    pub blocks_player: bool,
}

/// Immutable representation of a bullet used for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BulletSnapshot {
    /// Identifier of the bullet.
    pub id: BulletId,
    /// Bounding box of the bullet.
    pub rect: PixelRect,
    /// Direction of travel.
    pub direction: Direction,
    /// Group the bullet may damage.
    pub damages: DamageGroup,
}

/// Immutable representation of an artifact used for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArtifactSnapshot {
    /// Identifier of the artifact.
    pub id: ArtifactId,
    /// Which artifact it is.
    pub kind: ArtifactKind,
    /// Bounding box of the artifact.
    pub rect: PixelRect,
}
