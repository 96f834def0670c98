//! Background tiles. Each tile is one viewport-sized image cell of the map.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::api::types::TileId;
use crate::assets::image::{ImageHandle, Readiness};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    #[default]
    Normal,
    /// Determines the initial viewport position.
    Start,
    /// Pattern used to fill holes in the map.
    Void,
}

#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    /// Column and row in the map grid. Unused for the void tile.
    pub grid: IVec2,
    /// Viewport velocity adopted when the viewport enters this cell.
    pub velocity: Option<IVec2>,
    pub image: ImageHandle,
    pub kind: TileKind,
}

impl Tile {
    pub fn new(grid: IVec2, columns: i32, image: ImageHandle) -> Self {
        Self {
            id: Self::grid_id(grid, columns),
            grid,
            velocity: None,
            image,
            kind: TileKind::Normal,
        }
    }

    pub fn void(image: ImageHandle) -> Self {
        Self {
            id: TileId::VOID,
            grid: IVec2::ZERO,
            velocity: None,
            image,
            kind: TileKind::Void,
        }
    }

    pub fn with_kind(mut self, kind: TileKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_velocity(mut self, velocity: IVec2) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Row-major id of a grid cell.
    pub fn grid_id(grid: IVec2, columns: i32) -> TileId {
        TileId(grid.y * columns + grid.x)
    }

    pub fn readiness(&self) -> Readiness {
        self.image.readiness()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_row_major() {
        let t = Tile::new(IVec2::new(2, 3), 5, ImageHandle::pending("a.png"));
        assert_eq!(t.id, TileId(17));
        assert_eq!(t.readiness(), Readiness::Loading);
    }

    #[test]
    fn void_tile_has_reserved_id() {
        let t = Tile::void(ImageHandle::pending("void.png"));
        assert_eq!(t.id, TileId::VOID);
        assert_eq!(t.kind, TileKind::Void);
    }
}
