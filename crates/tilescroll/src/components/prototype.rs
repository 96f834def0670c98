use std::sync::{Arc, OnceLock};

use crate::assets::image::{Image, ImageHandle, OpacityMask, Readiness};
use crate::components::animation::AnimationDef;

/// Immutable template that sprites are spawned from.
#[derive(Debug)]
pub struct SpritePrototype {
    pub id: String,
    pub image: ImageHandle,
    pub animation: Option<AnimationDef>,
    mask: OnceLock<Arc<OpacityMask>>,
}

impl SpritePrototype {
    pub fn new(id: impl Into<String>, image: ImageHandle) -> Self {
        Self {
            id: id.into(),
            image,
            animation: None,
            mask: OnceLock::new(),
        }
    }

    pub fn with_animation(mut self, animation: AnimationDef) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn readiness(&self) -> Readiness {
        self.image.readiness()
    }

    pub fn loaded_image(&self) -> Option<&Arc<Image>> {
        self.image.image()
    }

    /// Opacity mask of the whole sheet, built on first use once the image is ready.
    pub fn mask(&self) -> Option<Arc<OpacityMask>> {
        let image = self.image.image()?;
        Some(
            self.mask
                .get_or_init(|| Arc::new(OpacityMask::from_image(image)))
                .clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::image::Rgba;

    #[test]
    fn mask_waits_for_image() {
        let handle = ImageHandle::pending("ship.png");
        let proto = SpritePrototype::new("ship", handle.clone());
        assert!(proto.mask().is_none());

        handle.complete(Ok(Image::solid(2, 2, Rgba::BLACK)));
        let mask = proto.mask().unwrap();
        assert_eq!(mask.at(1, 1), 255);
        assert!(Arc::ptr_eq(&mask, &proto.mask().unwrap()));
    }
}
