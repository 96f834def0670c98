use glam::IVec2;

use crate::api::types::Rect;
use crate::assets::image::{Image, Rgba};
use crate::renderer::surface::{Fill, Surface};

/// CPU-side RGBA surface. Used as the off-screen buffer and for headless runs.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: Image,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: Image::new(width, height),
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn into_image(self) -> Image {
        self.image
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.image.pixel(x, y)
    }

    pub fn clear(&mut self, color: Rgba) {
        self.image = Image::solid(self.image.width(), self.image.height(), color);
    }

    fn blend(&mut self, x: i32, y: i32, src: Rgba) {
        match src.a {
            0 => {}
            255 => self.image.set_pixel(x, y, src),
            a => {
                let Some(dst) = self.image.pixel(x, y) else {
                    return;
                };
                let a = a as u32;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
                let out_a = a + dst.a as u32 * (255 - a) / 255;
                self.image.set_pixel(
                    x,
                    y,
                    Rgba::new(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b), out_a as u8),
                );
            }
        }
    }

    fn clip(&self, rect: Rect) -> Option<Rect> {
        rect.intersection(&Rect::from_pos_size(IVec2::ZERO, self.size()))
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> IVec2 {
        self.image.size()
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        let Some(area) = self.clip(rect) else {
            return;
        };
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let color = match fill {
                    Fill::Solid(c) => *c,
                    Fill::Pattern(img) => {
                        let size = img.size().max(IVec2::ONE);
                        img.pixel(x.rem_euclid(size.x), y.rem_euclid(size.y))
                            .unwrap_or(Rgba::TRANSPARENT)
                    }
                };
                self.blend(x, y, color);
            }
        }
    }

    fn draw_image_region(&mut self, image: &Image, src: Rect, dest: IVec2) {
        let Some(src) = src.intersection(&Rect::from_pos_size(IVec2::ZERO, image.size())) else {
            return;
        };
        let Some(area) = self.clip(Rect::from_pos_size(dest, src.size())) else {
            return;
        };
        let shift = src.pos() - dest;
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(color) = image.pixel(x + shift.x, y + shift.y) {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const RED: Rgba = Rgba::new(255, 0, 0, 255);
    const BLUE: Rgba = Rgba::new(0, 0, 255, 255);

    #[test]
    fn solid_fill_is_clipped() {
        let mut s = RasterSurface::new(4, 4);
        s.fill_rect(Rect::new(2, 2, 10, 10), &Fill::Solid(RED));
        assert_eq!(s.pixel(3, 3), Some(RED));
        assert_eq!(s.pixel(1, 1), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn pattern_repeats_from_origin() {
        let mut tile = Image::new(2, 1);
        tile.set_pixel(0, 0, RED);
        tile.set_pixel(1, 0, BLUE);
        let mut s = RasterSurface::new(5, 1);
        s.fill_rect(Rect::new(1, 0, 4, 1), &Fill::Pattern(Arc::new(tile)));
        assert_eq!(s.pixel(1, 0), Some(BLUE));
        assert_eq!(s.pixel(2, 0), Some(RED));
        assert_eq!(s.pixel(4, 0), Some(RED));
    }

    #[test]
    fn draw_region_copies_sub_rect() {
        let mut img = Image::new(4, 4);
        img.set_pixel(2, 1, RED);
        let mut s = RasterSurface::new(4, 4);
        s.draw_image_region(&img, Rect::new(2, 1, 2, 2), IVec2::new(0, 3));
        assert_eq!(s.pixel(0, 3), Some(RED));
        assert_eq!(s.pixel(1, 3), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn transparent_pixels_keep_background() {
        let mut s = RasterSurface::new(2, 2);
        s.clear(BLUE);
        s.draw_image_region(&Image::new(2, 2), Rect::new(0, 0, 2, 2), IVec2::ZERO);
        assert_eq!(s.pixel(0, 0), Some(BLUE));
    }

    #[test]
    fn half_alpha_blends() {
        let mut s = RasterSurface::new(1, 1);
        s.clear(Rgba::new(0, 0, 0, 255));
        s.fill_rect(Rect::new(0, 0, 1, 1), &Fill::Solid(Rgba::new(255, 255, 255, 128)));
        let p = s.pixel(0, 0).unwrap();
        assert!(p.r > 120 && p.r < 135);
        assert_eq!(p.a, 255);
    }
}
