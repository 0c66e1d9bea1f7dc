//! Room templates, the template pool, and the dungeon layout grid.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;

use crate::{CellCoord, Direction, Occupancy, TileKind};

/// Single character of a room template grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// `.` walkable floor.
    Floor,
    /// `#` wall.
    Wall,
    /// `@` player spawn, used by the start room.
    PlayerSpawn,
    /// `E` regular enemy spawn.
    EnemySpawn,
    /// `B` boss spawn.
    BossSpawn,
    /// `A` random artifact spawn.
    ArtifactSpawn,
    /// `R` rock.
    Rock,
    /// `0` hole.
    Hole,
    /// `^`, `>`, `v` or `<` door on that side.
    Door(Direction),
}

impl Glyph {
    /// Decodes a template character.
    #[must_use]
    pub const fn from_char(glyph: char) -> Option<Self> {
        Some(match glyph {
            '.' => Self::Floor,
            '#' => Self::Wall,
            '@' => Self::PlayerSpawn,
            'E' => Self::EnemySpawn,
            'B' => Self::BossSpawn,
            'A' => Self::ArtifactSpawn,
            'R' => Self::Rock,
            '0' => Self::Hole,
            '^' => Self::Door(Direction::Up),
            '>' => Self::Door(Direction::Right),
            'v' => Self::Door(Direction::Down),
            '<' => Self::Door(Direction::Left),
            _ => return None,
        })
    }

    /// Character used for the glyph in level files.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => '#',
            Self::PlayerSpawn => '@',
            Self::EnemySpawn => 'E',
            Self::BossSpawn => 'B',
            Self::ArtifactSpawn => 'A',
            Self::Rock => 'R',
            Self::Hole => '0',
            Self::Door(Direction::Up) => '^',
            Self::Door(Direction::Right) => '>',
            Self::Door(Direction::Down) => 'v',
            Self::Door(Direction::Left) => '<',
        }
    }

    /// Tile placed under the glyph. Spawn markers sit on floor.
    #[must_use]
    pub const fn tile(self) -> TileKind {
        match self {
            Self::Wall => TileKind::Wall,
            Self::Rock => TileKind::Rock,
            Self::Hole => TileKind::Hole,
            Self::Door(direction) => TileKind::Door(direction),
            Self::Floor
            | Self::PlayerSpawn
            | Self::EnemySpawn
            | Self::BossSpawn
            | Self::ArtifactSpawn => TileKind::Floor,
        }
    }

    /// Static passability used for enemy routing. Doors always block.
    #[must_use]
    pub const fn occupancy(self) -> Occupancy {
        match self {
            Self::Wall | Self::Rock | Self::Hole | Self::Door(_) => Occupancy::Blocking,
            _ => Occupancy::Passable,
        }
    }
}

/// Problems found while parsing a room template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The file is empty or its first line is blank.
    #[error("template `{name}` has no exit line")]
    MissingExitLine {
        /// Template name.
        name: String,
    },
    /// An exit token is not a number between 0 and 3.
    #[error("template `{name}` declares invalid exit `{token}`")]
    InvalidExit {
        /// Template name.
        name: String,
        /// Offending token.
        token: String,
    },
    /// No grid rows follow the exit line.
    #[error("template `{name}` has no grid rows")]
    EmptyGrid {
        /// Template name.
        name: String,
    },
    /// A grid character is not part of the level alphabet.
    #[error("template `{name}` has unknown glyph `{glyph}` at column {column}, row {row}")]
    UnknownGlyph {
        /// Template name.
        name: String,
        /// Offending character.
        glyph: char,
        /// Zero-based column.
        column: u32,
        /// Zero-based row.
        row: u32,
    },
}

/// Immutable room layout loaded from a level file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomTemplate {
    name: String,
    exits: Vec<Direction>,
    columns: u32,
    rows: u32,
    glyphs: Vec<Glyph>,
}

impl RoomTemplate {
    /// Parses the level-file text of a template.
    ///
    /// The first line lists exit directions; the remaining lines form the grid.
    /// Rows are trimmed, short rows are padded with floor, and trailing blank
    /// lines are ignored.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        let name = name.into();
        let mut lines = source.trim_end().lines();

        let exit_line = match lines.next() {
            Some(line) if !line.trim().is_empty() => line,
            _ => return Err(TemplateError::MissingExitLine { name }),
        };
        let mut exits = Vec::new();
        for token in exit_line.split_whitespace() {
            let direction = token
                .parse::<usize>()
                .ok()
                .and_then(Direction::from_index)
                .ok_or_else(|| TemplateError::InvalidExit {
                    name: name.clone(),
                    token: token.to_owned(),
                })?;
            if !exits.contains(&direction) {
                exits.push(direction);
            }
        }

        let rows: Vec<&str> = lines.map(str::trim).collect();
        if rows.is_empty() {
            return Err(TemplateError::EmptyGrid { name });
        }
        let width = rows
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut glyphs = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let mut count = 0;
            for (column_index, glyph) in row.chars().enumerate() {
                let Some(decoded) = Glyph::from_char(glyph) else {
                    return Err(TemplateError::UnknownGlyph {
                        name,
                        glyph,
                        column: saturating_u32(column_index),
                        row: saturating_u32(row_index),
                    });
                };
                glyphs.push(decoded);
                count += 1;
            }
            glyphs.extend(std::iter::repeat(Glyph::Floor).take(width - count));
        }

        Ok(Self {
            name,
            exits,
            columns: saturating_u32(width),
            rows: saturating_u32(rows.len()),
            glyphs,
        })
    }

    /// Name the template was loaded under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Two-letter tag used by the ASCII map dump.
    #[must_use]
    pub fn abbreviation(&self) -> String {
        self.name.chars().take(2).collect()
    }

    /// Directions the template declares as valid exits.
    #[must_use]
    pub fn exits(&self) -> &[Direction] {
        &self.exits
    }

    /// Whether the template declares `direction` as an exit.
    #[must_use]
    pub fn allows_exit(&self, direction: Direction) -> bool {
        self.exits.contains(&direction)
    }

    /// Number of columns in the padded grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Glyph at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn glyph(&self, cell: CellCoord) -> Option<Glyph> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let index = usize::try_from(cell.row()).ok()? * usize::try_from(self.columns).ok()?
            + usize::try_from(cell.column()).ok()?;
        self.glyphs.get(index).copied()
    }

    /// Every cell with its glyph in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Glyph)> + '_ {
        let columns = self.columns.max(1);
        self.glyphs.iter().enumerate().map(move |(index, glyph)| {
            let index = saturating_u32(index);
            (CellCoord::new(index % columns, index / columns), *glyph)
        })
    }

    /// First door cell on the given side, scanning row-major.
    #[must_use]
    pub fn door(&self, direction: Direction) -> Option<CellCoord> {
        self.cells()
            .find(|(_, glyph)| *glyph == Glyph::Door(direction))
            .map(|(cell, _)| cell)
    }

    /// Cell of the `@` marker, if present.
    #[must_use]
    pub fn player_spawn(&self) -> Option<CellCoord> {
        self.cells()
            .find(|(_, glyph)| *glyph == Glyph::PlayerSpawn)
            .map(|(cell, _)| cell)
    }

    /// Row-major passability grid derived from the glyphs.
    #[must_use]
    pub fn occupancy(&self) -> Vec<Occupancy> {
        self.glyphs.iter().map(|glyph| glyph.occupancy()).collect()
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Named rooms placed at the end of three of the four arms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialRoom {
    /// Room holding the boss.
    Boss,
    /// Room holding a free artifact.
    Artifact,
    /// Room holding the shop.
    Shop,
}

impl SpecialRoom {
    /// Every special room.
    pub const ALL: [SpecialRoom; 3] = [SpecialRoom::Boss, SpecialRoom::Artifact, SpecialRoom::Shop];

    /// Template name the room is loaded from.
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Boss => "boss_room",
            Self::Artifact => "artifact_room",
            Self::Shop => "shop",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Boss => 0,
            Self::Artifact => 1,
            Self::Shop => 2,
        }
    }
}

/// Problems assembling a template pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// A required named template was not supplied.
    #[error("template pool is missing `{name}`")]
    MissingTemplate {
        /// Name of the missing template.
        name: String,
    },
    /// Two templates share a name.
    #[error("template `{name}` was supplied twice")]
    DuplicateTemplate {
        /// Name that appeared twice.
        name: String,
    },
    /// Only named templates were supplied.
    #[error("template pool has no regular rooms")]
    NoRegularTemplates,
}

/// Templates available to dungeon generation.
#[derive(Clone, Debug)]
pub struct TemplatePool {
    start: Arc<RoomTemplate>,
    specials: [Arc<RoomTemplate>; 3],
    regular: Vec<Arc<RoomTemplate>>,
}

impl TemplatePool {
    /// Name of the template placed at the centre of every map.
    pub const START_TEMPLATE: &'static str = "start";

    /// Sorts templates into the start room, special rooms, and regular rooms.
    pub fn from_templates(
        templates: impl IntoIterator<Item = RoomTemplate>,
    ) -> Result<Self, PoolError> {
        let mut named: HashMap<String, Arc<RoomTemplate>> = HashMap::new();
        let mut regular = Vec::new();
        let mut seen = Vec::new();

        for template in templates {
            let name = template.name().to_owned();
            if seen.contains(&name) {
                return Err(PoolError::DuplicateTemplate { name });
            }
            seen.push(name.clone());

            let reserved = name == Self::START_TEMPLATE
                || SpecialRoom::ALL
                    .iter()
                    .any(|special| special.template_name() == name);
            if reserved {
                let _ = named.insert(name, Arc::new(template));
            } else {
                regular.push(Arc::new(template));
            }
        }

        let mut take = |name: &str| {
            named
                .remove(name)
                .ok_or_else(|| PoolError::MissingTemplate {
                    name: name.to_owned(),
                })
        };
        let start = take(Self::START_TEMPLATE)?;
        let specials = [
            take(SpecialRoom::Boss.template_name())?,
            take(SpecialRoom::Artifact.template_name())?,
            take(SpecialRoom::Shop.template_name())?,
        ];
        if regular.is_empty() {
            return Err(PoolError::NoRegularTemplates);
        }

        Ok(Self {
            start,
            specials,
            regular,
        })
    }

    /// Template placed at the map centre.
    #[must_use]
    pub fn start(&self) -> &Arc<RoomTemplate> {
        &self.start
    }

    /// Template for the given special room.
    #[must_use]
    pub fn special(&self, room: SpecialRoom) -> &Arc<RoomTemplate> {
        &self.specials[room.slot()]
    }

    /// Templates drawn at random for corridor rooms.
    #[must_use]
    pub fn regular(&self) -> &[Arc<RoomTemplate>] {
        &self.regular
    }
}

/// Square grid of optional room templates produced by dungeon generation.
///
/// Once a cell holds a template it never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DungeonLayout {
    side: u32,
    start: CellCoord,
    cells: Vec<Option<Arc<RoomTemplate>>>,
}

impl DungeonLayout {
    /// Creates an empty layout of `side` × `side` cells.
    #[must_use]
    pub fn new(side: u32, start: CellCoord) -> Self {
        let count = usize::try_from(side).unwrap_or(0).pow(2);
        Self {
            side,
            start,
            cells: vec![None; count],
        }
    }

    /// Creates the `(2N + 2)`-sided layout used for arm length `N`, starting at `(N, N)`.
    #[must_use]
    pub fn with_arm_length(arm_length: u32) -> Self {
        Self::new(
            arm_length.saturating_mul(2).saturating_add(2),
            CellCoord::new(arm_length, arm_length),
        )
    }

    /// Number of cells along each axis.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Cell holding the start room.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.side && cell.row() < self.side
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let side = usize::try_from(self.side).ok()?;
        Some(usize::try_from(cell.row()).ok()? * side + usize::try_from(cell.column()).ok()?)
    }

    /// Template placed at `cell`; out-of-bounds cells are treated as empty.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&Arc<RoomTemplate>> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Whether a template already sits at `cell`.
    #[must_use]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.get(cell).is_some()
    }

    /// In-bounds neighbour of `cell` in `direction`.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        cell.step(direction).filter(|next| self.contains(*next))
    }

    /// Places `template` at `cell`. Returns `false` without changes when the
    /// cell is out of bounds or already occupied.
    pub fn place(&mut self, cell: CellCoord, template: Arc<RoomTemplate>) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        match self.cells.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(template);
                true
            }
            _ => false,
        }
    }

    /// Occupied cells with their templates in row-major order.
    pub fn rooms(&self) -> impl Iterator<Item = (CellCoord, &Arc<RoomTemplate>)> + '_ {
        let side = self.side.max(1);
        self.cells.iter().enumerate().filter_map(move |(index, slot)| {
            let index = saturating_u32(index);
            slot.as_ref()
                .map(|template| (CellCoord::new(index % side, index / side), template))
        })
    }

    /// Number of placed rooms.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.cells.iter().filter(|slot| slot.is_some()).count()
    }
}
