//! Transient entity containers for the room the player currently occupies.
//!
//! The containers are rebuilt from the room template on every transition and
//! discarded when the player leaves.

use roomcrawl_core::{
    AnimationState, ArtifactId, ArtifactKind, BulletId, CellCoord, DamageGroup, Direction,
    EnemyId, EnemyKind, PixelRect, TileKind, TILE_LENGTH,
};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Tile {
    pub(crate) cell: CellCoord,
    pub(crate) kind: TileKind,
    pub(crate) rect: PixelRect,
    pub(crate) blocks_player: bool,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Player {
    pub(crate) rect: PixelRect,
    pub(crate) animation: AnimationState,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) rect: PixelRect,
    pub(crate) health: f32,
    pub(crate) speed: i32,
    pub(crate) animation: AnimationState,
    pub(crate) shot_counter: u32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Bullet {
    pub(crate) id: BulletId,
    pub(crate) rect: PixelRect,
    pub(crate) direction: Direction,
    pub(crate) speed: i32,
    pub(crate) damages: DamageGroup,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Artifact {
    pub(crate) id: ArtifactId,
    pub(crate) kind: ArtifactKind,
    pub(crate) rect: PixelRect,
}

/// Everything that lives in the current room for as long as the player stays.
#[derive(Clone, Debug)]
pub(crate) struct ActiveRoom {
    pub(crate) cell: CellCoord,
    pub(crate) bounds: PixelRect,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) player: Player,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) bullets: Vec<Bullet>,
    pub(crate) artifacts: Vec<Artifact>,
}

impl ActiveRoom {
    pub(crate) fn new(cell: CellCoord, columns: u32, rows: u32, player: Player) -> Self {
        let width = i32::try_from(columns).unwrap_or(i32::MAX / TILE_LENGTH) * TILE_LENGTH;
        let height = i32::try_from(rows).unwrap_or(i32::MAX / TILE_LENGTH) * TILE_LENGTH;
        Self {
            cell,
            bounds: PixelRect::new(0, 0, width, height),
            tiles: Vec::new(),
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    /// Copies door closed flags onto the door tiles.
    pub(crate) fn sync_doors(&mut self, closed: [Option<bool>; 4]) {
        for tile in &mut self.tiles {
            if let TileKind::Door(direction) = tile.kind {
                tile.blocks_player = closed[direction.index()].unwrap_or(true);
            }
        }
    }

    fn blocked_by_tiles(&self, rect: &PixelRect) -> bool {
        self.tiles
            .iter()
            .any(|tile| tile.blocks_player && tile.rect.intersects(rect))
    }

    /// Whether the player may occupy `rect`: no blocking tile, no enemy.
    pub(crate) fn player_can_occupy(&self, rect: &PixelRect) -> bool {
        !self.blocked_by_tiles(rect)
            && !self
                .enemies
                .iter()
                .any(|enemy| enemy.rect.intersects(rect))
    }

    /// Whether enemy `mover` may occupy `rect`: no other enemy, no blocking tile, not the player.
    pub(crate) fn enemy_can_occupy(&self, mover: EnemyId, rect: &PixelRect) -> bool {
        !self
            .enemies
            .iter()
            .any(|enemy| enemy.id != mover && enemy.rect.intersects(rect))
            && !self.blocked_by_tiles(rect)
            && !self.player.rect.intersects(rect)
    }

    /// Whether a bullet at `rect` hits a tile that stops bullets.
    pub(crate) fn bullet_hits_wall(&self, rect: &PixelRect) -> bool {
        self.tiles
            .iter()
            .any(|tile| tile.kind.blocks_bullets() && tile.rect.intersects(rect))
    }

    pub(crate) fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub(crate) fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }
}

/// Box of side `extent` centred on `shooter`, used for freshly fired bullets.
pub(crate) fn bullet_origin(shooter: &PixelRect, extent: i32) -> PixelRect {
    let (center_x, center_y) = shooter.center();
    PixelRect::new(center_x - extent / 2, center_y - extent / 2, extent, extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcrawl_core::{BULLET_EXTENT, ENTITY_EXTENT};

    fn room_with_wall() -> ActiveRoom {
        let player = Player {
            rect: PixelRect::at_cell(CellCoord::new(0, 0), ENTITY_EXTENT, 0),
            animation: AnimationState::default(),
        };
        let mut room = ActiveRoom::new(CellCoord::new(0, 0), 4, 4, player);
        room.tiles.push(Tile {
            cell: CellCoord::new(2, 0),
            kind: TileKind::Wall,
            rect: PixelRect::at_cell(CellCoord::new(2, 0), TILE_LENGTH, 0),
            blocks_player: true,
        });
        room.tiles.push(Tile {
            cell: CellCoord::new(0, 2),
            kind: TileKind::Hole,
            rect: PixelRect::at_cell(CellCoord::new(0, 2), TILE_LENGTH, 0),
            blocks_player: true,
        });
        room
    }

    #[test]
    fn walls_block_walkers_and_bullets() {
        let room = room_with_wall();
        let touching = PixelRect::new(51, 0, 50, 50);
        assert!(!room.player_can_occupy(&touching));
        assert!(room.player_can_occupy(&PixelRect::new(50, 0, 50, 50)));
        assert!(room.bullet_hits_wall(&PixelRect::new(100, 20, 10, 10)));
    }

    #[test]
    fn holes_let_bullets_pass() {
        let room = room_with_wall();
        assert!(!room.player_can_occupy(&PixelRect::new(0, 60, 50, 50)));
        assert!(!room.bullet_hits_wall(&PixelRect::new(20, 120, 10, 10)));
    }

    #[test]
    fn bullets_start_at_the_shooter_centre() {
        let origin = bullet_origin(&PixelRect::new(100, 50, 50, 50), BULLET_EXTENT);
        assert_eq!(origin, PixelRect::new(120, 70, 10, 10));
    }
}
