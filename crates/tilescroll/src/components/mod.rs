pub mod animation;
pub mod prototype;
pub mod sprite;
pub mod tile;
pub mod trigger;
