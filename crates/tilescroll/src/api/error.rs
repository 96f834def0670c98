//! Error types for level loading, asset readiness and engine control.

use std::time::Duration;

use thiserror::Error;

/// A level description that cannot be turned into a registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed level description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{0}` must be greater than zero")]
    NotPositive(&'static str),

    #[error("duplicate prototype id `{0}`")]
    DuplicatePrototype(String),

    #[error("duplicate sound id {0}")]
    DuplicateSound(u32),

    #[error("sound {id} has volume {volume}, expected 0..=100")]
    InvalidVolume { id: u32, volume: u32 },

    #[error("{tiles} tiles of {tile_px} px along {axis} overflow the map coordinate range")]
    MapTooLarge { axis: &'static str, tiles: i32, tile_px: i32 },

    #[error("duplicate map tile at ({x}, {y})")]
    DuplicateTile { x: i32, y: i32 },

    #[error("map tile ({x}, {y}) lies outside the {columns}x{rows} game area")]
    TileOutOfRange { x: i32, y: i32, columns: i32, rows: i32 },

    #[error("more than one `{0}` map declared")]
    DuplicateSpecialTile(&'static str),

    #[error("map `{0}` has no position")]
    MissingTilePosition(String),

    #[error("prototype `{id}` declares a degenerate animation ({frames} frames x {rows} rows)")]
    InvalidAnimation { id: String, frames: u32, rows: u32 },

    #[error("trigger {trigger} event `{event}` references unknown prototype `{prototype}`")]
    UnknownPrototype {
        trigger: usize,
        event: String,
        prototype: String,
    },

    #[error("coordinate trigger {0} has no box")]
    MissingTriggerBox(usize),
}

/// An image that never became usable.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load image `{name}`: {reason}")]
    Failed { name: String, reason: String },

    #[error("{pending} image(s) still loading")]
    NotReady { pending: usize },

    #[error("gave up after {waited:?} with {pending} image(s) still loading")]
    Timeout { waited: Duration, pending: usize },
}

/// Why a single image could not be produced.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("no image registered under `{0}`")]
    NotRegistered(String),

    #[error("unexpected pixel buffer size for {width}x{height} image")]
    BufferSize { width: u32, height: u32 },

    #[error("could not start decoder thread: {0}")]
    Thread(#[from] std::io::Error),
}

/// Errors surfaced by the engine's public operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("unknown prototype `{0}`")]
    UnknownPrototype(String),

    #[error("image of prototype `{0}` is not ready")]
    PrototypeNotReady(String),

    #[error("trigger {0} does not exist")]
    UnknownTrigger(usize),

    #[error("`{0}` must be greater than zero")]
    ZeroSpeed(&'static str),
}
