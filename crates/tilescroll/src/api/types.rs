use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for a live sprite in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u32);

/// Identifier of a background tile: `row * map_columns + column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub i32);

impl TileId {
    /// Reserved id of the "void" filler tile.
    pub const VOID: TileId = TileId(-1);
}

/// Position of a trigger in the registry's trigger list.
/// Triggers are never removed, so the index stays valid for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(pub usize);

/// Selector into the behavior table. `BehaviorId::NONE` always resolves to a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BehaviorId(pub u32);

impl BehaviorId {
    pub const NONE: BehaviorId = BehaviorId(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// A sound event emitted by behavior hooks.
/// The numeric value is the id of a sound declared in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

/// Axis-aligned rectangle in map pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: IVec2, size: IVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn pos(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.w, self.h)
    }

    /// Saturates at `i32::MAX`.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Saturates at `i32::MAX`.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Bounding-box test with inclusive edges: rectangles that merely touch overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }

    /// Clip to `other`. Returns `None` when the result has no area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0)))
    }
}

/// Interaction flags of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mode {
    /// Non-zero when the sprite takes part in impact handling.
    pub impactful: i32,
    /// Non-zero when the sprite deals damage.
    pub force: i32,
    /// Non-zero when the sprite can be damaged.
    pub damageable: i32,
    /// Sprites on the same channel never damage each other.
    pub channel: i32,
}

/// Energy and remaining lives of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vitality {
    pub energy: i32,
    pub lives: i32,
}

impl Default for Vitality {
    fn default() -> Self {
        Self { energy: 1, lives: 1 }
    }
}
