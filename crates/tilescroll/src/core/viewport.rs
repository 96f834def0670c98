use glam::IVec2;

use crate::api::types::Rect;

/// The visible window over the scrolling map.
///
/// The map is `game_size` tiles, each tile exactly one viewport in size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Top-left corner in map pixels.
    pub pos: IVec2,
    /// Pixels per simulation tick.
    pub vel: IVec2,
    /// Visible size in pixels (also the tile size).
    pub dimension: IVec2,
    /// Map size in tiles.
    pub game_size: IVec2,
    cell: IVec2,
}

impl Viewport {
    pub fn new(dimension: IVec2, game_size: IVec2) -> Self {
        Self {
            pos: IVec2::ZERO,
            vel: IVec2::ZERO,
            dimension,
            game_size,
            cell: IVec2::ZERO,
        }
    }

    pub fn with_vel(mut self, vel: IVec2) -> Self {
        self.vel = vel;
        self
    }

    /// Map size in pixels.
    pub fn map_size(&self) -> IVec2 {
        self.dimension.saturating_mul(self.game_size)
    }

    /// Move the top-left corner, clamped to `[0, map - 1]` on both axes.
    pub fn set_position(&mut self, pos: IVec2) {
        let max = self.map_size().saturating_sub(IVec2::ONE).max(IVec2::ZERO);
        self.pos = pos.clamp(IVec2::ZERO, max);
    }

    /// Apply velocity once.
    pub fn move_by_velocity(&mut self) {
        self.set_position(self.pos.saturating_add(self.vel));
    }

    /// Visible region in map pixels.
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.dimension)
    }

    /// Whole map in map pixels.
    pub fn map_rect(&self) -> Rect {
        Rect::from_pos_size(IVec2::ZERO, self.map_size())
    }

    /// Map cell under the top-left corner.
    pub fn grid_cell(&self) -> IVec2 {
        self.pos / self.dimension.max(IVec2::ONE)
    }

    /// The new cell if the top-left corner moved into a different one since the last call.
    pub fn take_cell_change(&mut self) -> Option<IVec2> {
        let cell = self.grid_cell();
        if cell == self.cell {
            return None;
        }
        self.cell = cell;
        Some(cell)
    }

    /// Place the viewport on a grid cell without reporting a cell change.
    pub fn place_on_cell(&mut self, cell: IVec2) {
        self.set_position(cell.saturating_mul(self.dimension));
        self.cell = self.grid_cell();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(IVec2::new(100, 80), IVec2::new(3, 2))
    }

    #[test]
    fn map_size_in_pixels() {
        assert_eq!(viewport().map_size(), IVec2::new(300, 160));
    }

    #[test]
    fn oversized_map_saturates() {
        let mut vp = Viewport::new(IVec2::new(100_000, 100_000), IVec2::new(100_000, 1))
            .with_vel(IVec2::new(i32::MAX, 0));
        assert_eq!(vp.map_size(), IVec2::new(i32::MAX, 100_000));
        vp.move_by_velocity();
        vp.move_by_velocity();
        assert_eq!(vp.pos, IVec2::new(i32::MAX - 1, 0));
    }

    #[test]
    fn negative_position_clamps_to_zero() {
        let mut vp = viewport();
        vp.set_position(IVec2::new(-5, -40));
        assert_eq!(vp.pos, IVec2::ZERO);
    }

    #[test]
    fn position_clamps_to_last_map_pixel() {
        let mut vp = viewport();
        vp.set_position(IVec2::new(1000, 1000));
        assert_eq!(vp.pos, IVec2::new(299, 159));
    }

    #[test]
    fn move_stays_within_bounds() {
        let mut vp = viewport().with_vel(IVec2::new(70, -3));
        for _ in 0..10 {
            vp.move_by_velocity();
            assert!(vp.pos.x >= 0 && vp.pos.x <= 299);
            assert!(vp.pos.y >= 0 && vp.pos.y <= 159);
        }
        assert_eq!(vp.pos, IVec2::new(299, 0));
    }

    #[test]
    fn cell_change_reported_once() {
        let mut vp = viewport().with_vel(IVec2::new(60, 0));
        vp.move_by_velocity();
        assert_eq!(vp.take_cell_change(), None);
        vp.move_by_velocity();
        assert_eq!(vp.take_cell_change(), Some(IVec2::new(1, 0)));
        assert_eq!(vp.take_cell_change(), None);
    }

    #[test]
    fn place_on_cell_aligns_to_tile() {
        let mut vp = viewport();
        vp.place_on_cell(IVec2::new(2, 1));
        assert_eq!(vp.pos, IVec2::new(200, 80));
        assert_eq!(vp.take_cell_change(), None);
    }
}
