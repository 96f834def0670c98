//! Level description: everything needed to set up one game, loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;
use crate::api::game::{Border, Buffering, CollisionAccuracy, GameConfig};
use crate::api::types::{Mode, Vitality};
use crate::components::sprite::Behaviors;
use crate::components::tile::TileKind;
use crate::components::trigger::TriggerKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDescription {
    pub game: GameSection,
    pub screen: ScreenSection,
    #[serde(default)]
    pub maps: Vec<MapDescriptor>,
    #[serde(default)]
    pub sounds: Vec<SoundDescriptor>,
    #[serde(default)]
    pub prototypes: Vec<PrototypeDescriptor>,
    #[serde(default)]
    pub triggers: Vec<TriggerDescriptor>,
}

/// Game speeds and switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSection {
    /// Render cadence in milliseconds.
    pub display_speed: u64,
    /// Simulation cadence in milliseconds.
    pub game_speed: u64,
    #[serde(default)]
    pub border: Border,
    #[serde(default)]
    pub collision: CollisionAccuracy,
    #[serde(default)]
    pub double_buffering: bool,
    #[serde(default)]
    pub void_map: bool,
    #[serde(default)]
    pub audio: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenSection {
    /// Viewport size in pixels; also the size of every map tile.
    pub dimension: [i32; 2],
    /// Map size in tiles.
    pub gamesize: [i32; 2],
    /// Initial scroll velocity.
    #[serde(default)]
    pub velocity: [i32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDescriptor {
    #[serde(rename = "type", default)]
    pub kind: TileKind,
    /// Grid cell; unused for the void map.
    #[serde(default)]
    pub position: Option<[i32; 2]>,
    pub image: String,
    #[serde(default)]
    pub velocity: Option<[i32; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    pub id: u32,
    pub file: String,
    /// 0..=100
    #[serde(default = "default_volume")]
    pub volume: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrototypeDescriptor {
    pub id: String,
    pub image: String,
    #[serde(default)]
    pub animation: Option<AnimationDescriptor>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    pub frames: u32,
    #[serde(default = "default_rows")]
    pub rows: u32,
    /// Milliseconds per frame.
    #[serde(default)]
    pub delay: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerDescriptor {
    #[serde(rename = "type", default)]
    pub kind: TriggerKind,
    #[serde(default = "default_lifetime")]
    pub lifetime: i32,
    /// `[x, y, w, h]`; required for coordinate triggers.
    #[serde(rename = "box", default)]
    pub area: Option<[i32; 4]>,
    #[serde(default)]
    pub events: Vec<EventDescriptor>,
}

/// One event entry. Each position in `sprites` becomes its own event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub prototype: String,
    #[serde(rename = "type", default = "default_event_type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_layer")]
    pub layer: i32,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub vitality: Vitality,
    #[serde(default)]
    pub velocity: [i32; 2],
    #[serde(default)]
    pub behavior: Behaviors,
    #[serde(default)]
    pub sprites: Vec<[i32; 2]>,
}

fn default_volume() -> u32 {
    100
}

fn default_rows() -> u32 {
    1
}

fn default_lifetime() -> i32 {
    1
}

fn default_event_type() -> String {
    "sprite".to_string()
}

fn default_layer() -> i32 {
    1
}

impl LevelDescription {
    /// Parse a level from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Engine configuration from the `game` section; tunables keep their defaults.
    pub fn config(&self) -> GameConfig {
        GameConfig {
            display_speed_ms: self.game.display_speed,
            game_speed_ms: self.game.game_speed,
            border: self.game.border,
            collision: self.game.collision,
            buffering: if self.game.double_buffering {
                Buffering::Double
            } else {
                Buffering::Direct
            },
            void_fill: self.game.void_map,
            audio: self.game.audio,
            ..GameConfig::default()
        }
    }
}
