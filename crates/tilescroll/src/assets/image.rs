//! Decoded RGBA images, opacity masks and asynchronous image handles.

use std::sync::{Arc, OnceLock};

use bytemuck::{Pod, Zeroable};
use glam::IVec2;

use crate::api::error::ImageLoadError;

/// One RGBA8 pixel. Layout matches the byte order produced by decoders.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A decoded image held in memory, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Image {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self::solid(width, height, Rgba::TRANSPARENT)
    }

    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wrap raw RGBA8 bytes. Returns `None` if the length does not match the size.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: bytemuck::cast_slice(bytes).to_vec(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

/// Per-pixel alpha of an image, used by pixel-accurate collision.
#[derive(Debug, Clone, PartialEq)]
pub struct OpacityMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl OpacityMask {
    pub fn from_image(image: &Image) -> Self {
        Self {
            width: image.width,
            height: image.height,
            alpha: image.pixels.iter().map(|p| p.a).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha at `(x, y)`; coordinates outside the mask read as transparent.
    pub fn at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return 0;
        }
        self.alpha[y as usize * self.width as usize + x as usize]
    }
}

/// Load state of an image handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Loading,
    Ready,
    Failed,
}

/// Shared handle to an image that may still be decoding on another thread.
/// The slot is written once, by whoever finishes the load.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    name: Arc<str>,
    slot: Arc<OnceLock<Result<Arc<Image>, ImageLoadError>>>,
}

impl ImageHandle {
    pub fn pending(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            slot: Arc::new(OnceLock::new()),
        }
    }

    pub fn ready(name: impl Into<Arc<str>>, image: Image) -> Self {
        let handle = Self::pending(name);
        handle.complete(Ok(image));
        handle
    }

    pub fn failed(name: impl Into<Arc<str>>, error: ImageLoadError) -> Self {
        let handle = Self::pending(name);
        handle.complete(Err(error));
        handle
    }

    /// Store the load result. Later completions are ignored.
    pub fn complete(&self, result: Result<Image, ImageLoadError>) {
        if self.slot.set(result.map(Arc::new)).is_err() {
            log::debug!("image `{}` completed twice; keeping first result", self.name);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn readiness(&self) -> Readiness {
        match self.slot.get() {
            None => Readiness::Loading,
            Some(Ok(_)) => Readiness::Ready,
            Some(Err(_)) => Readiness::Failed,
        }
    }

    pub fn image(&self) -> Option<&Arc<Image>> {
        self.slot.get().and_then(|r| r.as_ref().ok())
    }

    pub fn error(&self) -> Option<&ImageLoadError> {
        self.slot.get().and_then(|r| r.as_ref().err())
    }
}
