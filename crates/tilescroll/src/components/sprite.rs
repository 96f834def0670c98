use std::sync::Arc;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{BehaviorId, Mode, Rect, SpriteId, Vitality};
use crate::assets::image::{Image, OpacityMask};
use crate::components::animation::Animation;

/// Behavior selectors of a sprite, resolved through the behavior table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Behaviors {
    pub movement: BehaviorId,
    pub impact: BehaviorId,
    pub damage: BehaviorId,
    pub created: BehaviorId,
    pub destroyed: BehaviorId,
}

/// A live, movable, collidable entity.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: SpriteId,
    pub name: String,
    /// Group tag, e.g. `"player"`.
    pub kind: String,
    /// Id of the prototype this sprite was spawned from.
    pub prototype: String,
    /// Top-left corner in map pixels.
    pub pos: IVec2,
    /// Pixels per simulation tick.
    pub vel: IVec2,
    /// Size of one animation cell (or the whole image).
    pub dimension: IVec2,
    /// Recorded only; draw order follows the registry.
    pub layer: i32,
    pub vitality: Vitality,
    pub mode: Mode,
    /// Inactive sprites are skipped and removed at the end of the tick.
    pub active: bool,
    pub animation: Option<Animation>,
    pub image: Option<Arc<Image>>,
    pub mask: Option<Arc<OpacityMask>>,
    pub behaviors: Behaviors,
}

impl Sprite {
    pub fn new(id: SpriteId) -> Self {
        Self {
            id,
            name: String::new(),
            kind: String::new(),
            prototype: String::new(),
            pos: IVec2::ZERO,
            vel: IVec2::ZERO,
            dimension: IVec2::ZERO,
            layer: 1,
            vitality: Vitality::default(),
            mode: Mode::default(),
            active: true,
            animation: None,
            image: None,
            mask: None,
            behaviors: Behaviors::default(),
        }
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_pos(mut self, pos: IVec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_vel(mut self, vel: IVec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_dimension(mut self, dimension: IVec2) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_vitality(mut self, vitality: Vitality) -> Self {
        self.vitality = vitality;
        self
    }

    pub fn with_behaviors(mut self, behaviors: Behaviors) -> Self {
        self.behaviors = behaviors;
        self
    }

    /// Attach an image and its mask; the dimension becomes the image size.
    pub fn with_image(mut self, image: Arc<Image>) -> Self {
        self.dimension = image.size();
        self.mask = Some(Arc::new(OpacityMask::from_image(&image)));
        self.image = Some(image);
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Bounding box in map pixels.
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.dimension)
    }

    /// Apply velocity once. Positions saturate at the `i32` range.
    pub fn advance(&mut self) {
        self.pos = self.pos.saturating_add(self.vel);
    }

    pub fn is_alive(&self) -> bool {
        self.vitality.energy > 0
    }

    /// The part of the image currently displayed.
    pub fn source_rect(&self) -> Rect {
        let cell = match &self.animation {
            Some(anim) => IVec2::new(anim.frame as i32, anim.row as i32),
            None => IVec2::ZERO,
        };
        Rect::from_pos_size(cell * self.dimension, self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::{AnimationDef, Direction};

    #[test]
    fn builder_and_bounds() {
        let s = Sprite::new(SpriteId(1))
            .with_kind("player")
            .with_pos(IVec2::new(5, 6))
            .with_dimension(IVec2::new(10, 20));
        assert_eq!(s.bounds(), Rect::new(5, 6, 10, 20));
        assert!(s.active);
        assert!(s.is_alive());
    }

    #[test]
    fn with_image_sets_dimension_and_mask() {
        let s = Sprite::new(SpriteId(2)).with_image(Arc::new(Image::new(12, 7)));
        assert_eq!(s.dimension, IVec2::new(12, 7));
        assert_eq!(s.mask.as_ref().unwrap().width(), 12);
    }

    #[test]
    fn advance_saturates_instead_of_wrapping() {
        let mut s = Sprite::new(SpriteId(4))
            .with_pos(IVec2::new(i32::MAX - 5, 0))
            .with_vel(IVec2::new(10, 0));
        s.advance();
        assert_eq!(s.pos.x, i32::MAX);
    }

    #[test]
    fn advance_applies_velocity() {
        let mut s = Sprite::new(SpriteId(3)).with_vel(IVec2::new(2, -1));
        s.advance();
        s.advance();
        assert_eq!(s.pos, IVec2::new(4, -2));
    }

    #[test]
    fn source_rect_follows_animation_cell() {
        let mut anim = Animation::new(AnimationDef { frames: 4, rows: 2, delay_ms: 10 });
        anim.start(2, 1, Direction::Forward, -1);
        let s = Sprite::new(SpriteId(4))
            .with_dimension(IVec2::new(8, 8))
            .with_animation(anim);
        assert_eq!(s.source_rect(), Rect::new(16, 8, 8, 8));
    }
}
