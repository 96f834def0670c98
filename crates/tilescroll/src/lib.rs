pub mod api;
pub mod assets;
pub mod behavior;
pub mod components;
pub mod core;
pub mod input;
pub mod renderer;
pub mod runner;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::error::{AssetError, ConfigError, EngineError, ImageLoadError};
pub use api::game::{Border, Buffering, CollisionAccuracy, EngineContext, GameConfig, Gameplay};
pub use api::types::{BehaviorId, Mode, Rect, SoundEvent, SpriteId, TileId, TriggerId, Vitality};
pub use assets::image::{Image, ImageHandle, OpacityMask, Readiness, Rgba};
pub use assets::level::LevelDescription;
pub use assets::loader::{FileImageLoader, ImageLoader, MemoryImageLoader};
pub use behavior::{BehaviorTable, HookContext, HookKind, SpriteSelector};
pub use components::animation::{Animation, AnimationDef, Direction};
pub use components::prototype::SpritePrototype;
pub use components::sprite::{Behaviors, Sprite};
pub use components::tile::{Tile, TileKind};
pub use components::trigger::{Event, Trigger, TriggerKind};
pub use core::game_loop::{GameLoop, LoopTick};
pub use core::registry::{AssetStatus, EntityRegistry, Sound};
pub use core::viewport::Viewport;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::{Fill, RasterSurface, Surface};
pub use runner::Engine;
pub use systems::render::Blitter;
pub use systems::trigger::Fired;
