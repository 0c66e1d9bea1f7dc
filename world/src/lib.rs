#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Roomcrawl.
//!
//! The world owns the dungeon map, the entities of the room the player is in,
//! and the player's stats. It changes only through [`apply`], which executes a
//! [`Command`] and reports the outcome as [`Event`] values. Systems observe the
//! world through the read-only [`query`] module.

mod entities;
mod map;
mod navigation;
mod room;

use std::sync::Arc;

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use roomcrawl_core::{
    AnimationState, ArtifactId, ArtifactKind, AudioCue, BulletId, CellCoord, Command,
    DamageGroup, DifficultyProfile, Direction, DungeonLayout, EnemyId, EnemyKind, Event, Glyph,
    PixelRect, PlayerStats, RoomTemplate, SessionStatus, ARTIFACT_INSET, BULLET_EXTENT,
    ENEMY_BULLET_SPEED, ENTITY_EXTENT, TILE_LENGTH, WINNING_ARTIFACT_CELL,
};
use tracing::{debug, info};

use entities::{bullet_origin, ActiveRoom, Artifact, Bullet, Enemy, Player, Tile};

pub use map::DungeonMap;
pub use navigation::GridPathfinder;
pub use room::{door_is_closed, RoomModel};

/// Represents the authoritative Roomcrawl world state.
#[derive(Debug)]
pub struct World {
    map: Option<DungeonMap>,
    active: Option<ActiveRoom>,
    profile: DifficultyProfile,
    stats: PlayerStats,
    status: SessionStatus,
    rng: ChaCha8Rng,
    tick_index: u64,
    next_enemy_id: u32,
    next_bullet_id: u32,
    next_artifact_id: u32,
}

impl World {
    /// Creates an idle world with no dungeon installed.
    #[must_use]
    pub fn new() -> Self {
        let profile = DifficultyProfile::default();
        Self {
            map: None,
            active: None,
            profile,
            stats: PlayerStats::starting(&profile),
            status: SessionStatus::Idle,
            rng: ChaCha8Rng::seed_from_u64(0),
            tick_index: 0,
            next_enemy_id: 0,
            next_bullet_id: 0,
            next_artifact_id: 0,
        }
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    fn allocate_bullet_id(&mut self) -> BulletId {
        let id = BulletId::new(self.next_bullet_id);
        self.next_bullet_id = self.next_bullet_id.wrapping_add(1);
        id
    }

    fn allocate_artifact_id(&mut self) -> ArtifactId {
        let id = ArtifactId::new(self.next_artifact_id);
        self.next_artifact_id = self.next_artifact_id.wrapping_add(1);
        id
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Everything except [`Command::StartSession`] is ignored unless a run is in
/// progress.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartSession {
            layout,
            profile,
            stats,
            seed,
        } => start_session(world, &layout, profile, stats, seed, out_events),
        _ if world.status != SessionStatus::Playing => {}
        Command::ReleaseMovement => {
            if let Some(active) = world.active.as_mut() {
                active.player.animation = AnimationState::idle(active.player.animation.facing);
            }
        }
        Command::MovePlayer { direction } => move_player(world, direction, out_events),
        Command::FirePlayer { direction } => fire_player(world, direction, out_events),
        Command::StepEnemy { enemy, waypoint } => step_enemy(world, enemy, waypoint, out_events),
        Command::AimEnemy { enemy, direction } => aim_enemy(world, enemy, direction, out_events),
        Command::IdleEnemy { enemy } => {
            if let Some(found) = world
                .active
                .as_mut()
                .and_then(|active| active.enemy_mut(enemy))
            {
                found.animation = AnimationState::idle(found.animation.facing);
            }
        }
        Command::Tick => tick(world, out_events),
    }
}

fn start_session(
    world: &mut World,
    layout: &DungeonLayout,
    profile: DifficultyProfile,
    stats: PlayerStats,
    seed: u64,
    out_events: &mut Vec<Event>,
) {
    *world = World {
        map: Some(DungeonMap::from_layout(layout)),
        profile,
        stats,
        status: SessionStatus::Playing,
        rng: ChaCha8Rng::seed_from_u64(seed),
        ..World::new()
    };
    info!(
        rooms = layout.room_count(),
        seed,
        health = stats.health,
        "session started"
    );
    out_events.push(Event::SessionStarted {
        rooms: layout.room_count(),
        start: layout.start(),
    });
    enter_room(world, None, out_events);
}

/// Rebuilds the active entity containers for the map's current room.
fn enter_room(world: &mut World, entered_from: Option<Direction>, out_events: &mut Vec<Event>) {
    let Some(map) = world.map.as_mut() else {
        return;
    };
    let cell = map.current();
    let Some(room) = map.current_room_mut() else {
        return;
    };
    let first_visit = room.mark_entered();
    let template = Arc::clone(room.template());

    let spawn = player_spawn(&template, entered_from);
    let player = Player {
        rect: PixelRect::at_cell(spawn, ENTITY_EXTENT, 0),
        animation: AnimationState::default(),
    };
    let mut active = ActiveRoom::new(cell, template.columns(), template.rows(), player);
    let mut spawned_enemies = Vec::new();
    let mut spawned_artifacts = 0;

    for (tile_cell, glyph) in template.cells() {
        let kind = glyph.tile();
        active.tiles.push(Tile {
            cell: tile_cell,
            kind,
            rect: PixelRect::at_cell(tile_cell, TILE_LENGTH, 0),
            blocks_player: kind.blocks_player(),
        });
        if !first_visit {
            continue;
        }

        match glyph {
            Glyph::EnemySpawn | Glyph::BossSpawn => {
                let (kind, health) = if glyph == Glyph::BossSpawn {
                    (EnemyKind::Boss, world.profile.boss_health)
                } else {
                    (EnemyKind::Grunt, world.profile.enemy_health)
                };
                let id = world.allocate_enemy_id();
                active.enemies.push(Enemy {
                    id,
                    kind,
                    rect: PixelRect::at_cell(tile_cell, ENTITY_EXTENT, 0),
                    health,
                    speed: world.profile.enemy_speed,
                    animation: AnimationState::default(),
                    shot_counter: 0,
                });
                spawned_enemies.push(kind);
                out_events.push(Event::EnemySpawned {
                    enemy: id,
                    kind,
                    cell: tile_cell,
                });
            }
            Glyph::ArtifactSpawn => {
                let Some(kind) = ArtifactKind::RANDOM_POOL.choose(&mut world.rng).copied() else {
                    continue;
                };
                let id = world.allocate_artifact_id();
                active.artifacts.push(Artifact {
                    id,
                    kind,
                    rect: PixelRect::at_cell(tile_cell, ENTITY_EXTENT, ARTIFACT_INSET),
                });
                spawned_artifacts += 1;
                out_events.push(Event::ArtifactSpawned {
                    artifact: id,
                    kind,
                    cell: tile_cell,
                });
            }
            _ => {}
        }
    }

    let Some(map) = world.map.as_mut() else {
        return;
    };
    if let Some(room) = map.current_room_mut() {
        for kind in &spawned_enemies {
            room.add_enemy(*kind == EnemyKind::Boss);
        }
        for _ in 0..spawned_artifacts {
            room.add_artifact();
        }
    }
    debug!(
        room = template.name(),
        column = cell.column(),
        row = cell.row(),
        enemies = spawned_enemies.len(),
        artifacts = spawned_artifacts,
        "room instantiated"
    );
    out_events.push(Event::RoomEntered {
        room: cell,
        entered_from,
        first_visit,
    });
    refresh_doors(map, &mut active, out_events);
    world.active = Some(active);
}

/// Cell the player appears in: beside the door they came through, on `@` for
/// the initial spawn, or the room centre when neither exists.
fn player_spawn(template: &RoomTemplate, entered_from: Option<Direction>) -> CellCoord {
    let inside =
        |cell: &CellCoord| cell.column() < template.columns() && cell.row() < template.rows();
    let preferred = match entered_from {
        Some(direction) => template
            .door(direction)
            .and_then(|door| door.step(direction.opposite())),
        None => template.player_spawn(),
    };
    preferred
        .filter(inside)
        .unwrap_or_else(|| CellCoord::new(template.columns() / 2, template.rows() / 2))
}

/// Recomputes the current room's doors and mirrors them onto the door tiles.
fn refresh_doors(map: &mut DungeonMap, active: &mut ActiveRoom, out_events: &mut Vec<Event>) {
    let cell = active.cell;
    map.update_doors(cell);
    let Some(room) = map.room(cell) else {
        return;
    };
    let closed = room.door_states();
    active.sync_doors(closed);
    out_events.push(Event::DoorsUpdated { room: cell, closed });
}

fn move_player(world: &mut World, direction: Direction, out_events: &mut Vec<Event>) {
    let speed = world.stats.speed;
    let Some(active) = world.active.as_mut() else {
        return;
    };
    active.player.animation = AnimationState::running(direction);
    let from = active.player.rect;
    let candidate = from.stepped(direction, speed);
    if active.player_can_occupy(&candidate) {
        active.player.rect = candidate;
        out_events.push(Event::PlayerMoved {
            from,
            to: candidate,
        });
    }
}

fn fire_player(world: &mut World, direction: Direction, out_events: &mut Vec<Event>) {
    let speed = world.stats.bullet_speed;
    let id = world.allocate_bullet_id();
    let Some(active) = world.active.as_mut() else {
        return;
    };
    active.player.animation = AnimationState::shooting(direction);
    active.bullets.push(Bullet {
        id,
        rect: bullet_origin(&active.player.rect, BULLET_EXTENT),
        direction,
        speed,
        damages: DamageGroup::Enemies,
    });
    out_events.push(Event::BulletFired {
        bullet: id,
        damages: DamageGroup::Enemies,
        direction,
    });
    out_events.push(Event::Audio {
        cue: AudioCue::ShootByHero,
    });
}

fn step_enemy(world: &mut World, enemy: EnemyId, waypoint: CellCoord, out_events: &mut Vec<Event>) {
    let Some(active) = world.active.as_mut() else {
        return;
    };
    let Some(current) = active.enemy(enemy).copied() else {
        return;
    };
    let target_x = i32::try_from(waypoint.column()).unwrap_or(i32::MAX / TILE_LENGTH) * TILE_LENGTH;
    let target_y = i32::try_from(waypoint.row()).unwrap_or(i32::MAX / TILE_LENGTH) * TILE_LENGTH;

    let mut rect = current.rect;
    let mut facing = None;
    for vertical in [true, false] {
        let remaining = if vertical {
            target_y - rect.y()
        } else {
            target_x - rect.x()
        };
        if remaining == 0 {
            continue;
        }
        let direction = match (vertical, remaining > 0) {
            (true, true) => Direction::Down,
            (true, false) => Direction::Up,
            (false, true) => Direction::Right,
            (false, false) => Direction::Left,
        };
        let distance = current.speed.min(remaining.abs());
        if distance <= 0 {
            continue;
        }
        let candidate = rect.stepped(direction, distance);
        if active.enemy_can_occupy(enemy, &candidate) {
            rect = candidate;
            facing = Some(direction);
        }
    }

    let Some(facing) = facing else {
        return;
    };
    if let Some(moving) = active.enemy_mut(enemy) {
        moving.rect = rect;
        moving.animation = AnimationState::running(facing);
    }
    out_events.push(Event::EnemyAdvanced {
        enemy,
        from: current.rect,
        to: rect,
    });
}

fn aim_enemy(world: &mut World, enemy: EnemyId, direction: Direction, out_events: &mut Vec<Event>) {
    let delay = world.profile.enemy_shot_delay.max(1);
    let id = world.allocate_bullet_id();
    let Some(active) = world.active.as_mut() else {
        return;
    };
    let Some(shooter) = active.enemy_mut(enemy) else {
        return;
    };
    shooter.animation = AnimationState::shooting(direction);
    let fires = shooter.shot_counter % delay == 0;
    shooter.shot_counter = shooter.shot_counter.wrapping_add(1);
    if !fires {
        return;
    }

    let origin = bullet_origin(&shooter.rect, BULLET_EXTENT);
    active.bullets.push(Bullet {
        id,
        rect: origin,
        direction,
        speed: ENEMY_BULLET_SPEED,
        damages: DamageGroup::Player,
    });
    out_events.push(Event::BulletFired {
        bullet: id,
        damages: DamageGroup::Player,
        direction,
    });
    out_events.push(Event::Audio {
        cue: AudioCue::ShootByEnemy,
    });
}

fn tick(world: &mut World, out_events: &mut Vec<Event>) {
    world.tick_index = world.tick_index.saturating_add(1);
    out_events.push(Event::TimeAdvanced {
        tick: world.tick_index,
    });

    advance_bullets(world, out_events);
    if world.status == SessionStatus::Playing {
        collect_artifacts(world, out_events);
    }
    if world.status == SessionStatus::Playing {
        check_transition(world, out_events);
    }
}

/// Moves every bullet, then resolves hits against its damage group, walls,
/// and the room bounds, in that order.
fn advance_bullets(world: &mut World, out_events: &mut Vec<Event>) {
    let attack = world.stats.attack();
    let Some(active) = world.active.as_mut() else {
        return;
    };

    let mut killed = Vec::new();
    let mut survivors = Vec::with_capacity(active.bullets.len());
    for mut bullet in std::mem::take(&mut active.bullets) {
        bullet.rect = bullet.rect.stepped(bullet.direction, bullet.speed);

        let hit = match bullet.damages {
            DamageGroup::Enemies => {
                let target = active
                    .enemies
                    .iter()
                    .position(|enemy| enemy.rect.intersects(&bullet.rect));
                match target {
                    Some(index) => {
                        let enemy = &mut active.enemies[index];
                        enemy.health -= attack;
                        out_events.push(Event::Audio {
                            cue: AudioCue::EnemyHit,
                        });
                        if enemy.health <= 0.0 {
                            let removed = active.enemies.remove(index);
                            out_events.push(Event::EnemyKilled {
                                enemy: removed.id,
                                kind: removed.kind,
                            });
                            killed.push(removed.kind);
                        } else {
                            out_events.push(Event::EnemyDamaged {
                                enemy: enemy.id,
                                health: enemy.health,
                            });
                        }
                        true
                    }
                    None => false,
                }
            }
            DamageGroup::Player => {
                let struck = active.player.rect.intersects(&bullet.rect);
                if struck {
                    world.stats.health -= 1;
                    out_events.push(Event::Audio {
                        cue: AudioCue::PlayerHit,
                    });
                    out_events.push(Event::PlayerDamaged {
                        health: world.stats.health,
                    });
                }
                struck
            }
        };

        if hit || active.bullet_hits_wall(&bullet.rect) || !bullet.rect.intersects(&active.bounds) {
            out_events.push(Event::BulletDestroyed { bullet: bullet.id });
        } else {
            survivors.push(bullet);
        }
    }
    active.bullets = survivors;

    for kind in killed {
        enemy_removed(world, kind, out_events);
    }

    if world.stats.health <= 0 && world.status == SessionStatus::Playing {
        world.status = SessionStatus::GameOver;
        info!(tick = world.tick_index, "player died");
        out_events.push(Event::GameOver);
    }
}

/// Updates room counters after a kill, spawning the prize when the boss falls.
fn enemy_removed(world: &mut World, kind: EnemyKind, out_events: &mut Vec<Event>) {
    let boss = kind == EnemyKind::Boss;
    let prize_id = boss.then(|| world.allocate_artifact_id());
    let (Some(map), Some(active)) = (world.map.as_mut(), world.active.as_mut()) else {
        return;
    };
    let Some(room) = map.room_mut(active.cell) else {
        return;
    };

    let cleared = room.remove_enemy(boss);
    if let Some(id) = prize_id {
        room.add_artifact();
        active.artifacts.push(Artifact {
            id,
            kind: ArtifactKind::Prize,
            rect: PixelRect::at_cell(WINNING_ARTIFACT_CELL, ENTITY_EXTENT, ARTIFACT_INSET),
        });
        info!("boss defeated");
        out_events.push(Event::ArtifactSpawned {
            artifact: id,
            kind: ArtifactKind::Prize,
            cell: WINNING_ARTIFACT_CELL,
        });
    }
    if cleared {
        occupants_cleared(map, active, out_events);
    }
}

/// Runs the single door recompute that follows a counter reaching zero.
fn occupants_cleared(map: &mut DungeonMap, active: &mut ActiveRoom, out_events: &mut Vec<Event>) {
    refresh_doors(map, active, out_events);
    let cell = active.cell;
    if map.room(cell).is_some_and(|room| !room.has_live_occupants()) {
        debug!(column = cell.column(), row = cell.row(), "room cleared");
        out_events.push(Event::RoomCleared { room: cell });
    }
}

fn collect_artifacts(world: &mut World, out_events: &mut Vec<Event>) {
    let (Some(map), Some(active)) = (world.map.as_mut(), world.active.as_mut()) else {
        return;
    };

    while let Some(index) = active
        .artifacts
        .iter()
        .position(|artifact| artifact.rect.intersects(&active.player.rect))
    {
        let artifact = active.artifacts.remove(index);
        world.stats.apply_artifact(&artifact.kind.effect());
        debug!(artifact = artifact.kind.name(), "artifact collected");
        out_events.push(Event::Audio {
            cue: AudioCue::ArtifactPickup,
        });
        out_events.push(Event::ArtifactCollected {
            artifact: artifact.id,
            kind: artifact.kind,
            stats: world.stats,
        });

        let cleared = map
            .room_mut(active.cell)
            .is_some_and(|room| room.remove_artifact());
        if cleared {
            occupants_cleared(map, active, out_events);
        }

        if artifact.kind.is_winning() {
            world.status = SessionStatus::Victory;
            info!(tick = world.tick_index, "winning artifact collected");
            out_events.push(Event::Victory);
            return;
        }
    }
}

fn check_transition(world: &mut World, out_events: &mut Vec<Event>) {
    let (Some(map), Some(active)) = (world.map.as_mut(), world.active.as_ref()) else {
        return;
    };
    let Some(entered_from) = map.check_door(&active.player.rect) else {
        return;
    };
    let room = map.current();
    info!(
        column = room.column(),
        row = room.row(),
        entered_from = ?entered_from,
        "room transition"
    );
    enter_room(world, Some(entered_from), out_events);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use roomcrawl_core::{
        ArtifactSnapshot, BulletSnapshot, CellCoord, DifficultyProfile, EnemySnapshot, EnemyView,
        OccupancyView, PixelRect, PlayerSnapshot, PlayerStats, SessionStatus, TileSnapshot,
    };

    use super::{DungeonMap, RoomModel, World};

    /// Lifecycle state of the current run.
    #[must_use]
    pub fn status(world: &World) -> SessionStatus {
        world.status
    }

    /// Number of ticks processed since the run started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Difficulty numbers in effect for the run.
    #[must_use]
    pub fn difficulty(world: &World) -> DifficultyProfile {
        world.profile
    }

    /// The player's current stat block, for HUD display.
    #[must_use]
    pub fn player_stats(world: &World) -> PlayerStats {
        world.stats
    }

    /// Dungeon map, once a run has started.
    #[must_use]
    pub fn map(world: &World) -> Option<&DungeonMap> {
        world.map.as_ref()
    }

    /// Map cell of the room the player stands in.
    #[must_use]
    pub fn current_cell(world: &World) -> Option<CellCoord> {
        world.map.as_ref().map(DungeonMap::current)
    }

    /// Room model of the room the player stands in.
    #[must_use]
    pub fn current_room(world: &World) -> Option<&RoomModel> {
        world.map.as_ref().and_then(DungeonMap::current_room)
    }

    /// Static passability grid of the current room.
    #[must_use]
    pub fn occupancy_view(world: &World) -> Option<OccupancyView<'_>> {
        current_room(world).map(RoomModel::occupancy_view)
    }

    /// Pixel extent of the current room.
    #[must_use]
    pub fn room_bounds(world: &World) -> Option<PixelRect> {
        world.active.as_ref().map(|active| active.bounds)
    }

    /// Snapshot of the player, if a room is active.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world.active.as_ref().map(|active| PlayerSnapshot {
            rect: active.player.rect,
            animation: active.player.animation,
            stats: world.stats,
        })
    }

    /// Captures a read-only view of the enemies in the current room.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .active
            .iter()
            .flat_map(|active| active.enemies.iter())
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                rect: enemy.rect,
                health: enemy.health,
                animation: enemy.animation,
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Bullets in flight, in firing order.
    #[must_use]
    pub fn bullets(world: &World) -> Vec<BulletSnapshot> {
        world
            .active
            .iter()
            .flat_map(|active| active.bullets.iter())
            .map(|bullet| BulletSnapshot {
                id: bullet.id,
                rect: bullet.rect,
                direction: bullet.direction,
                damages: bullet.damages,
            })
            .collect()
    }

    /// Artifacts lying in the current room.
    #[must_use]
    pub fn artifacts(world: &World) -> Vec<ArtifactSnapshot> {
        world
            .active
            .iter()
            .flat_map(|active| active.artifacts.iter())
            .map(|artifact| ArtifactSnapshot {
                id: artifact.id,
                kind: artifact.kind,
                rect: artifact.rect,
            })
            .collect()
    }

    /// Tiles of the current room in row-major order.
    #[must_use]
    pub fn tiles(world: &World) -> Vec<TileSnapshot> {
        world
            .active
            .iter()
            .flat_map(|active| active.tiles.iter())
            .map(|tile| TileSnapshot {
                cell: tile.cell,
                kind: tile.kind,
                blocks_player: tile.blocks_player,
            })
            .collect()
    }

    /// One cell of the minimap overlay.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MinimapCell {
        /// Map cell of the room.
        pub room: CellCoord,
        /// Column offset from the current room.
        pub dx: i32,
        /// Row offset from the current room.
        pub dy: i32,
        /// Whether this is the room the player stands in.
        pub current: bool,
        /// Whether the player has been inside the room.
        pub explored: bool,
        /// Whether the room still holds enemies or artifacts.
        pub has_live_occupants: bool,
    }

    /// Occupied map cells within `radius_x` columns and `radius_y` rows of the
    /// current room, row by row.
    #[must_use]
    pub fn minimap(world: &World, radius_x: u32, radius_y: u32) -> Vec<MinimapCell> {
        let Some(map) = world.map.as_ref() else {
            return Vec::new();
        };
        let current = map.current();
        let rx = i64::from(radius_x);
        let ry = i64::from(radius_y);
        let mut cells = Vec::new();
        for dy in -ry..=ry {
            for dx in -rx..=rx {
                let column = i64::from(current.column()) + dx;
                let row = i64::from(current.row()) + dy;
                let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
                    continue;
                };
                let cell = CellCoord::new(column, row);
                let Some(room) = map.room(cell) else {
                    continue;
                };
                cells.push(MinimapCell {
                    room: cell,
                    dx: i32::try_from(dx).unwrap_or(0),
                    dy: i32::try_from(dy).unwrap_or(0),
                    current: cell == current,
                    explored: room.has_been_entered(),
                    has_live_occupants: room.has_live_occupants(),
                });
            }
        }
        cells
    }
}
