#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Roomcrawl adapters.
//!
//! A [`Scene`] is a flat snapshot of the current room captured from world
//! queries. Backends present scenes, play [`AudioCue`]s through an
//! [`AudioSink`], and pick animation frames with an [`Animator`] fed by an
//! [`AnimationSource`].

use std::{collections::HashMap, error::Error, fmt, time::Duration};

use anyhow::Result as AnyResult;
use glam::Vec2;
use roomcrawl_core::{
    AnimationState, ArtifactId, ArtifactKind, AudioCue, BulletId, CellCoord, DamageGroup,
    Direction, EnemyId, EnemyKind, Event, FramePlayer, InputFrame, PixelRect, PlayerStats,
    SessionStatus, TileKind, TILE_LENGTH,
};
use roomcrawl_world::{query, query::MinimapCell, World};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fill color for a tile; open doors are drawn lighter than closed ones.
#[must_use]
pub fn tile_color(kind: TileKind, blocks_player: bool) -> Color {
    match kind {
        TileKind::Floor => Color::from_rgb_u8(58, 52, 46),
        TileKind::Wall => Color::from_rgb_u8(24, 22, 30),
        TileKind::Rock => Color::from_rgb_u8(96, 90, 84),
        TileKind::Hole => Color::from_rgb_u8(8, 8, 8),
        TileKind::Door(_) => {
            let door = Color::from_rgb_u8(110, 70, 40);
            if blocks_player {
                door
            } else {
                door.lighten(0.5)
            }
        }
    }
}

/// Static room tile positioned in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTile {
    /// Room cell of the tile.
    pub cell: CellCoord,
    /// Material of the tile.
    pub kind: TileKind,
    /// Whether the tile currently stops walkers.
    pub blocks_player: bool,
    /// Top-left corner in world units.
    pub position: Vec2,
    /// Fill color.
    pub color: Color,
}

/// What a [`SceneSprite`] depicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// The player character.
    Player,
    /// An enemy of the given tier.
    Enemy {
        /// Identifier of the enemy.
        id: EnemyId,
        /// Tier of the enemy.
        kind: EnemyKind,
    },
    /// A bullet in flight.
    Bullet {
        /// Identifier of the bullet.
        id: BulletId,
        /// Group the bullet hurts.
        damages: DamageGroup,
    },
    /// An artifact lying on the floor.
    Artifact {
        /// Identifier of the artifact.
        id: ArtifactId,
        /// Which artifact it is.
        kind: ArtifactKind,
    },
}

/// Movable entity positioned in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSprite {
    /// What the sprite depicts.
    pub kind: SpriteKind,
    /// Top-left corner in world units.
    pub position: Vec2,
    /// Width and height in world units.
    pub size: Vec2,
    /// Animation variant for animated actors.
    pub animation: Option<AnimationState>,
    /// Frame index chosen by the [`Animator`].
    pub frame: usize,
}

impl SceneSprite {
    fn new(kind: SpriteKind, rect: PixelRect, animation: Option<AnimationState>) -> Self {
        Self {
            kind,
            position: Vec2::new(rect.x() as f32, rect.y() as f32),
            size: Vec2::new(rect.width() as f32, rect.height() as f32),
            animation,
            frame: 0,
        }
    }

    /// Centre of the sprite in world units.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }
}

/// Heads-up display data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Player stat block.
    pub stats: PlayerStats,
    /// Whether the run is in progress or over.
    pub status: SessionStatus,
    /// Ticks simulated in the current run.
    pub tick: u64,
}

/// Snapshot of the current room ready for presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Room width in tiles.
    pub columns: u32,
    /// Room height in tiles.
    pub rows: u32,
    /// Side of one tile in world units.
    pub tile_length: f32,
    /// Every tile of the room in row-major order.
    pub tiles: Vec<SceneTile>,
    /// Player first, then enemies, artifacts, and bullets.
    pub sprites: Vec<SceneSprite>,
    /// Stats and run status.
    pub hud: Hud,
    /// Rooms around the current one.
    pub minimap: Vec<MinimapCell>,
}

impl Scene {
    /// Radius of the minimap overlay in rooms, horizontally and vertically.
    pub const MINIMAP_RADIUS: (u32, u32) = (1, 1);

    /// Captures the room the player currently occupies.
    pub fn capture(world: &World) -> Result<Self, RenderingError> {
        let player = query::player(world).ok_or(RenderingError::NoActiveRoom)?;
        let (columns, rows) = query::occupancy_view(world)
            .map(|view| view.dimensions())
            .ok_or(RenderingError::NoActiveRoom)?;

        let tile_length = TILE_LENGTH as f32;
        let tiles = query::tiles(world)
            .into_iter()
            .map(|tile| SceneTile {
                cell: tile.cell,
                kind: tile.kind,
                blocks_player: tile.blocks_player,
                position: Vec2::new(tile.cell.column() as f32, tile.cell.row() as f32)
                    * tile_length,
                color: tile_color(tile.kind, tile.blocks_player),
            })
            .collect();

        let mut sprites = vec![SceneSprite::new(
            SpriteKind::Player,
            player.rect,
            Some(player.animation),
        )];
        sprites.extend(query::enemy_view(world).iter().map(|enemy| {
            SceneSprite::new(
                SpriteKind::Enemy {
                    id: enemy.id,
                    kind: enemy.kind,
                },
                enemy.rect,
                Some(enemy.animation),
            )
        }));
        sprites.extend(query::artifacts(world).into_iter().map(|artifact| {
            SceneSprite::new(
                SpriteKind::Artifact {
                    id: artifact.id,
                    kind: artifact.kind,
                },
                artifact.rect,
                None,
            )
        }));
        sprites.extend(query::bullets(world).into_iter().map(|bullet| {
            SceneSprite::new(
                SpriteKind::Bullet {
                    id: bullet.id,
                    damages: bullet.damages,
                },
                bullet.rect,
                None,
            )
        }));

        let (radius_x, radius_y) = Self::MINIMAP_RADIUS;
        Ok(Self {
            columns,
            rows,
            tile_length,
            tiles,
            sprites,
            hud: Hud {
                stats: player.stats,
                status: query::status(world),
                tick: query::tick_index(world),
            },
            minimap: query::minimap(world, radius_x, radius_y),
        })
    }

    /// Width of the room in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Height of the room in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Draws the scene as text, one character per tile.
    ///
    /// Sprites are stamped onto the tile under their centre in the order
    /// bullets, artifacts, enemies, player. Closed doors show as `+`.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let columns = usize::try_from(self.columns).unwrap_or(0);
        let rows = usize::try_from(self.rows).unwrap_or(0);
        let mut grid = vec![vec![' '; columns]; rows];
        for tile in &self.tiles {
            if let Some(slot) = self.slot(&mut grid, tile.position + Vec2::splat(1.0)) {
                *slot = tile_char(tile.kind, tile.blocks_player);
            }
        }
        for sprite in self.sprites.iter().rev() {
            if let Some(slot) = self.slot(&mut grid, sprite.center()) {
                *slot = sprite_char(sprite.kind);
            }
        }

        let mut out = String::with_capacity((columns + 1) * rows);
        for row in grid {
            out.extend(row);
            out.push('\n');
        }
        out
    }

    fn slot<'a>(&self, grid: &'a mut [Vec<char>], point: Vec2) -> Option<&'a mut char> {
        if point.x < 0.0 || point.y < 0.0 || self.tile_length <= f32::EPSILON {
            return None;
        }
        let column = (point.x / self.tile_length) as usize;
        let row = (point.y / self.tile_length) as usize;
        grid.get_mut(row).and_then(|cells| cells.get_mut(column))
    }
}

fn tile_char(kind: TileKind, blocks_player: bool) -> char {
    match kind {
        TileKind::Floor => '.',
        TileKind::Wall => '#',
        TileKind::Rock => 'R',
        TileKind::Hole => '0',
        TileKind::Door(_) if blocks_player => '+',
        TileKind::Door(direction) => match direction {
            Direction::Up => '^',
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
        },
    }
}

fn sprite_char(kind: SpriteKind) -> char {
    match kind {
        SpriteKind::Player => '@',
        SpriteKind::Enemy {
            kind: EnemyKind::Grunt,
            ..
        } => 'E',
        SpriteKind::Enemy {
            kind: EnemyKind::Boss,
            ..
        } => 'B',
        SpriteKind::Artifact { .. } => 'A',
        SpriteKind::Bullet { .. } => '*',
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Roomcrawl scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and the input captured for the frame, and refreshes the scene before it
    /// is presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, InputFrame, &mut Scene);
}

/// Receives sound triggers.
pub trait AudioSink {
    /// Plays a single cue.
    fn play(&mut self, cue: AudioCue);
}

/// Forwards every [`Event::Audio`] in `events` to `sink`. Returns the number of cues played.
pub fn dispatch_audio<S: AudioSink + ?Sized>(events: &[Event], sink: &mut S) -> usize {
    let mut played = 0;
    for event in events {
        if let Event::Audio { cue } = event {
            sink.play(*cue);
            played += 1;
        }
    }
    played
}

/// Animated actor families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Actor {
    /// The player character.
    Player,
    /// A regular enemy.
    Grunt,
    /// The boss.
    Boss,
}

/// Supplies frame durations for every clip.
pub trait AnimationSource {
    /// Frame durations of the clip for `actor` in `state`. An empty slice means a still image.
    fn durations(&self, actor: Actor, state: AnimationState) -> &[Duration];
}

/// Same clip length for every actor and state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformAnimations {
    frames: Vec<Duration>,
}

impl UniformAnimations {
    /// `count` frames of `frame` each.
    #[must_use]
    pub fn new(count: usize, frame: Duration) -> Self {
        Self {
            frames: vec![frame; count],
        }
    }
}

impl AnimationSource for UniformAnimations {
    fn durations(&self, _actor: Actor, _state: AnimationState) -> &[Duration] {
        &self.frames
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TrackKey {
    Player,
    Enemy(EnemyId),
}

#[derive(Clone, Debug)]
struct Track {
    state: AnimationState,
    player: FramePlayer,
}

/// One [`FramePlayer`] per animated sprite, restarted whenever its state changes.
#[derive(Debug, Default)]
pub struct Animator {
    tracks: HashMap<TrackKey, Track>,
}

impl Animator {
    /// Creates an animator with no tracks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sprites currently tracked.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.tracks.len()
    }

    /// Advances every animated sprite by `dt` and writes the frame index into the scene.
    ///
    /// Tracks of sprites that left the scene are dropped.
    pub fn update<A: AnimationSource + ?Sized>(
        &mut self,
        scene: &mut Scene,
        dt: Duration,
        source: &A,
    ) {
        let mut seen = Vec::new();
        for sprite in &mut scene.sprites {
            let Some(state) = sprite.animation else {
                continue;
            };
            let (key, actor) = match sprite.kind {
                SpriteKind::Player => (TrackKey::Player, Actor::Player),
                SpriteKind::Enemy { id, kind } => (
                    TrackKey::Enemy(id),
                    match kind {
                        EnemyKind::Grunt => Actor::Grunt,
                        EnemyKind::Boss => Actor::Boss,
                    },
                ),
                SpriteKind::Bullet { .. } | SpriteKind::Artifact { .. } => continue,
            };
            seen.push(key);

            let track = self.tracks.entry(key).or_insert_with(|| Track {
                state,
                player: FramePlayer::new(),
            });
            if track.state != state {
                track.state = state;
                track.player.restart();
            }
            sprite.frame = track.player.advance(dt, source.durations(actor, state));
        }
        self.tracks.retain(|key, _| seen.contains(key));
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// No session is running, so there is no room to draw.
    NoActiveRoom,
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveRoom => write!(f, "no room is active; start a session first"),
        }
    }
}

impl Error for RenderingError {}
