//! Image sources. Decoding happens off the game thread; the engine only
//! observes the resulting [`ImageHandle`]s.

use std::collections::HashMap;
use std::path::PathBuf;
use std::thread;

use crate::api::error::ImageLoadError;
use crate::assets::image::{Image, ImageHandle};

/// Starts loading an image and returns its handle immediately.
pub trait ImageLoader {
    fn load(&self, path: &str) -> ImageHandle;
}

/// Decodes PNG files from disk, one background thread per image.
pub struct FileImageLoader {
    root: PathBuf,
}

impl FileImageLoader {
    /// Paths passed to [`ImageLoader::load`] are resolved relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, path: &str) -> ImageHandle {
        let handle = ImageHandle::pending(path);
        let full = self.root.join(path);
        let slot = handle.clone();
        let spawned = thread::Builder::new()
            .name(format!("decode {path}"))
            .spawn(move || {
                let result = image::open(&full)
                    .map_err(ImageLoadError::from)
                    .and_then(|img| decode_rgba(img.to_rgba8()));
                if let Err(e) = &result {
                    log::error!("image `{}`: {}", full.display(), e);
                }
                slot.complete(result);
            });
        if let Err(e) = spawned {
            handle.complete(Err(ImageLoadError::Thread(e)));
        }
        handle
    }
}

/// Serves images registered up front. Unknown paths resolve to failed handles.
#[derive(Default)]
pub struct MemoryImageLoader {
    images: HashMap<String, Image>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, image: Image) {
        self.images.insert(path.into(), image);
    }

    /// Decode PNG bytes and register them under `path`.
    pub fn insert_png(&mut self, path: impl Into<String>, bytes: &[u8]) -> Result<(), ImageLoadError> {
        let img = image::load_from_memory(bytes)?;
        self.insert(path, decode_rgba(img.to_rgba8())?);
        Ok(())
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, path: &str) -> ImageHandle {
        match self.images.get(path) {
            Some(img) => ImageHandle::ready(path, img.clone()),
            None => ImageHandle::failed(path, ImageLoadError::NotRegistered(path.to_string())),
        }
    }
}

fn decode_rgba(rgba: image::RgbaImage) -> Result<Image, ImageLoadError> {
    let (width, height) = rgba.dimensions();
    Image::from_rgba_bytes(width, height, rgba.as_raw())
        .ok_or(ImageLoadError::BufferSize { width, height })
}
