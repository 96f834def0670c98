//! Drawing target contract.
//!
//! The engine composes frames through this trait only. A window, canvas or
//! GPU texture can back it; [`RasterSurface`](super::raster::RasterSurface)
//! is the in-memory implementation.
//!
//! ```ignore
//! struct Canvas { /* ... */ }
//!
//! impl Surface for Canvas {
//!     fn size(&self) -> IVec2 { /* ... */ }
//!     fn fill_rect(&mut self, rect: Rect, fill: &Fill) { /* ... */ }
//!     fn draw_image_region(&mut self, image: &Image, src: Rect, dest: IVec2) { /* ... */ }
//! }
//! ```

use std::sync::Arc;

use glam::IVec2;

use crate::api::types::Rect;
use crate::assets::image::{Image, Rgba};

/// How a filled rectangle is painted.
#[derive(Debug, Clone)]
pub enum Fill {
    Solid(Rgba),
    /// Image repeated from the surface origin.
    Pattern(Arc<Image>),
}

pub trait Surface {
    /// Size in pixels.
    fn size(&self) -> IVec2;

    /// Paint `rect`, clipped to the surface.
    fn fill_rect(&mut self, rect: Rect, fill: &Fill);

    /// Copy the `src` part of `image` with its top-left at `dest`,
    /// blending over what is already there.
    fn draw_image_region(&mut self, image: &Image, src: Rect, dest: IVec2);
}
