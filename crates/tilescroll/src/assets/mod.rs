pub mod image;
pub mod level;
pub mod loader;
pub mod registry;
