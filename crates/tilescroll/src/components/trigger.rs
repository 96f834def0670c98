//! Triggers and the events they spawn.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{Mode, Rect, Vitality};
use crate::components::sprite::Behaviors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// Fired on demand by gameplay code.
    User,
    /// Fired once when the game starts.
    Start,
    /// Fired when a player sprite overlaps the trigger box.
    #[default]
    Coordinate,
}

/// Everything needed to spawn one sprite from a prototype.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub prototype: String,
    /// Type tag given to the spawned sprite.
    pub kind: String,
    pub layer: i32,
    pub pos: IVec2,
    pub vel: IVec2,
    pub vitality: Vitality,
    pub mode: Mode,
    pub behaviors: Behaviors,
}

impl Event {
    pub fn new(prototype: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            prototype: prototype.into(),
            kind: "sprite".to_string(),
            layer: 1,
            pos: IVec2::ZERO,
            vel: IVec2::ZERO,
            vitality: Vitality::default(),
            mode: Mode::default(),
            behaviors: Behaviors::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_pos(mut self, pos: IVec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_vel(mut self, vel: IVec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_vitality(mut self, vitality: Vitality) -> Self {
        self.vitality = vitality;
        self
    }

    pub fn with_behaviors(mut self, behaviors: Behaviors) -> Self {
        self.behaviors = behaviors;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub kind: TriggerKind,
    /// Remaining activations: negative is unlimited, zero is spent.
    pub lifetime: i32,
    /// Only meaningful for coordinate triggers.
    pub area: Option<Rect>,
    pub events: Vec<Event>,
}

impl Trigger {
    pub fn new(kind: TriggerKind) -> Self {
        Self {
            kind,
            lifetime: 1,
            area: None,
            events: Vec::new(),
        }
    }

    pub fn with_lifetime(mut self, lifetime: i32) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_area(mut self, area: Rect) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn event_by_name(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name)
    }
}
