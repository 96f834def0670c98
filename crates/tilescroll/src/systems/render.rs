use glam::IVec2;

use crate::api::game::{Buffering, GameConfig};
use crate::api::types::Rect;
use crate::assets::image::Rgba;
use crate::core::registry::EntityRegistry;
use crate::renderer::raster::RasterSurface;
use crate::renderer::surface::{Fill, Surface};

/// Composes background tiles and sprites into a frame.
/// The buffering strategy is fixed when the blitter is built.
pub struct Blitter {
    back: Option<RasterSurface>,
    fallback: Rgba,
    void_fill: bool,
}

impl Blitter {
    pub fn new(config: &GameConfig, viewport_size: IVec2) -> Self {
        let back = match config.buffering {
            Buffering::Direct => None,
            Buffering::Double => Some(RasterSurface::new(
                viewport_size.x.max(0) as u32,
                viewport_size.y.max(0) as u32,
            )),
        };
        Self {
            back,
            fallback: config.fallback_color,
            void_fill: config.void_fill,
        }
    }

    pub fn is_double_buffered(&self) -> bool {
        self.back.is_some()
    }

    /// Draw one frame onto `target`.
    pub fn draw(&mut self, registry: &EntityRegistry, target: &mut dyn Surface) {
        let fill = self.hole_fill(registry);
        match self.back.as_mut() {
            Some(back) => {
                // opaque, so the copy below replaces the previous frame
                back.clear(self.fallback);
                draw_frame(registry, back, &fill);
                let image = back.image();
                target.draw_image_region(image, Rect::from_pos_size(IVec2::ZERO, image.size()), IVec2::ZERO);
            }
            None => draw_frame(registry, target, &fill),
        }
    }

    fn hole_fill(&self, registry: &EntityRegistry) -> Fill {
        if self.void_fill {
            if let Some(img) = registry.void_tile().and_then(|t| t.image.image()) {
                return Fill::Pattern(img.clone());
            }
        }
        Fill::Solid(self.fallback)
    }
}

fn draw_frame(registry: &EntityRegistry, surface: &mut dyn Surface, fill: &Fill) {
    draw_background(registry, surface, fill);
    draw_sprites(registry, surface);
}

/// Draw the up to four map cells the viewport straddles.
///
/// The viewport is exactly one tile in size, so its top-left corner splits
/// the screen into quadrants taken from the cell under the corner and its
/// right, lower and diagonal neighbours.
pub fn draw_background(registry: &EntityRegistry, surface: &mut dyn Surface, fill: &Fill) {
    let vp = &registry.viewport;
    let tile = vp.dimension;
    if tile.x <= 0 || tile.y <= 0 {
        return;
    }
    let cell = vp.grid_cell();
    let offset = IVec2::new(vp.pos.x % tile.x, vp.pos.y % tile.y);
    let rest = tile - offset;

    let quadrants = [
        (IVec2::ZERO, Rect::from_pos_size(offset, rest)),
        (IVec2::X, Rect::new(0, offset.y, offset.x, rest.y)),
        (IVec2::Y, Rect::new(offset.x, 0, rest.x, offset.y)),
        (IVec2::ONE, Rect::new(0, 0, offset.x, offset.y)),
    ];

    for (step, src) in quadrants {
        if src.w <= 0 || src.h <= 0 {
            continue;
        }
        let dest = IVec2::new(
            if step.x == 0 { 0 } else { rest.x },
            if step.y == 0 { 0 } else { rest.y },
        );
        match registry.tile_at(cell + step).and_then(|t| t.image.image()) {
            Some(img) => surface.draw_image_region(img, src, dest),
            None => surface.fill_rect(Rect::from_pos_size(dest, src.size()), fill),
        }
    }
}

/// Draw active sprites in registry order, relative to the viewport.
pub fn draw_sprites(registry: &EntityRegistry, surface: &mut dyn Surface) {
    let origin = registry.viewport.pos;
    for sprite in registry.sprites().iter().filter(|s| s.active) {
        if let Some(img) = &sprite.image {
            surface.draw_image_region(img, sprite.source_rect(), sprite.pos - origin);
        }
    }
}
