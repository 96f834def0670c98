pub mod animation;
pub mod collision;
pub mod movement;
pub mod render;
pub mod trigger;
