use serde::{Deserialize, Serialize};

use crate::api::error::EngineError;
use crate::api::types::{SoundEvent, SpriteId, TriggerId};
use crate::assets::image::Rgba;
use crate::behavior::{BehaviorTable, HookContext};
use crate::components::trigger::Event;
use crate::core::registry::{EntityRegistry, Sound};
use crate::input::queue::InputQueue;
use crate::renderer::surface::Surface;
use crate::systems::trigger::{self, Fired};

/// What happens to sprites that leave the playing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Border {
    /// Deactivate once the sprite no longer touches the viewport.
    #[default]
    Screen,
    /// Deactivate once the sprite is entirely outside the map.
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionAccuracy {
    /// Bounding boxes only.
    #[default]
    Box,
    /// Bounding boxes, then opacity masks over the overlap.
    Pixel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Buffering {
    /// Draw straight onto the target surface.
    #[default]
    Direct,
    /// Compose off-screen, then copy to the target in one blit.
    Double,
}

/// Configuration for the engine. Level files fill in the gameplay part;
/// the tunables keep their defaults unless changed in code.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Render cadence in milliseconds.
    pub display_speed_ms: u64,
    /// Simulation cadence in milliseconds.
    pub game_speed_ms: u64,
    pub border: Border,
    pub collision: CollisionAccuracy,
    pub buffering: Buffering,
    /// Fill map holes with the void tile pattern instead of a flat colour.
    pub void_fill: bool,
    /// Forward sound events to the game.
    pub audio: bool,
    /// Colour used for map holes without a void pattern (default: black).
    pub fallback_color: Rgba,
    /// How often asset readiness is polled while waiting (default: 100 ms).
    pub asset_poll_ms: u64,
    /// Most ticks a loop may run to catch up before dropping the rest (default: 10).
    pub max_catch_up: u64,
    /// Rounds of trigger requests handled after a pass; hooks that keep
    /// requesting triggers beyond this are cut off (default: 16).
    pub max_trigger_rounds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            display_speed_ms: 40,
            game_speed_ms: 40,
            border: Border::Screen,
            collision: CollisionAccuracy::Box,
            buffering: Buffering::Direct,
            void_fill: false,
            audio: false,
            fallback_color: Rgba::BLACK,
            asset_poll_ms: 100,
            max_catch_up: 10,
            max_trigger_rounds: 16,
        }
    }
}

/// Game-specific code plugged into the engine loops. All methods default to no-ops.
pub trait Gameplay {
    /// Called once, right before start triggers fire.
    fn init(&mut self, _ctx: &mut EngineContext) {}

    /// Simulation tick, after movement, collisions and coordinate triggers.
    fn update(&mut self, _ctx: &mut EngineContext, _input: &InputQueue) {}

    /// Render tick, after the frame has been drawn.
    fn display(&mut self, _ctx: &EngineContext, _surface: &mut dyn Surface) {}

    /// A sprite's animation finished one or more cycles.
    fn animation_cycled(&mut self, _ctx: &mut EngineContext, _sprite: SpriteId) {}

    /// A hook emitted a sound while audio is enabled.
    fn play_sound(&mut self, _sound: &Sound) {}
}

/// Mutable access to engine state, passed to gameplay code and the systems.
pub struct EngineContext {
    pub registry: EntityRegistry,
    pub behaviors: BehaviorTable,
    pub hooks: HookContext,
    pub config: GameConfig,
    stop_requested: bool,
}

impl EngineContext {
    pub fn new(config: GameConfig, registry: EntityRegistry, behaviors: BehaviorTable) -> Self {
        let hooks = HookContext::new(registry.viewport);
        Self {
            registry,
            behaviors,
            hooks,
            config,
            stop_requested: false,
        }
    }

    /// Fire a trigger now, then any triggers its hooks asked for.
    /// Lifetime is left alone; that is the caller's business.
    pub fn fire_trigger(&mut self, id: TriggerId) -> Result<Fired, EngineError> {
        self.hooks.viewport = self.registry.viewport;
        let fired = trigger::fire_trigger(&mut self.registry, &self.behaviors, &mut self.hooks, id)?;
        self.process_trigger_requests();
        Ok(fired)
    }

    /// Spawn one sprite from an event.
    pub fn spawn(&mut self, event: &Event) -> Result<SpriteId, EngineError> {
        self.hooks.viewport = self.registry.viewport;
        let id = trigger::activate(&mut self.registry, &self.behaviors, &mut self.hooks, event)?;
        self.process_trigger_requests();
        Ok(id)
    }

    /// Handle sprite edits and trigger requests queued by hooks.
    pub fn process_trigger_requests(&mut self) {
        trigger::process_requests(
            &mut self.registry,
            &self.behaviors,
            &mut self.hooks,
            self.config.max_trigger_rounds,
        );
    }

    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.hooks.emit_sound(event);
    }

    /// Ask the engine to stop its loops after the current tick.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    pub(crate) fn take_stop_request(&mut self) -> bool {
        std::mem::take(&mut self.stop_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BehaviorId;
    use crate::assets::image::{Image, ImageHandle};
    use crate::components::prototype::SpritePrototype;
    use crate::components::trigger::{Trigger, TriggerKind};
    use crate::core::viewport::Viewport;
    use glam::IVec2;

    fn context() -> EngineContext {
        let mut registry = EntityRegistry::new(Viewport::new(IVec2::new(100, 100), IVec2::new(2, 2)));
        registry.add_prototype(SpritePrototype::new("dot", ImageHandle::ready("dot.png", Image::new(4, 4))));
        EngineContext::new(GameConfig::default(), registry, BehaviorTable::new())
    }

    #[test]
    fn default_config() {
        let config = GameConfig::default();
        assert_eq!(config.border, Border::Screen);
        assert_eq!(config.collision, CollisionAccuracy::Box);
        assert_eq!(config.buffering, Buffering::Direct);
        assert_eq!(config.asset_poll_ms, 100);
    }

    #[test]
    fn user_trigger_keeps_lifetime() {
        let mut ctx = context();
        let id = ctx
            .registry
            .add_trigger(Trigger::new(TriggerKind::User).with_event(Event::new("dot")));
        let fired = ctx.fire_trigger(id).unwrap();
        assert_eq!(fired.spawned, vec![SpriteId(1)]);
        assert_eq!(ctx.registry.trigger(id).unwrap().lifetime, 1);
    }

    #[test]
    fn created_hook_can_chain_triggers() {
        let mut ctx = context();
        let second = ctx
            .registry
            .add_trigger(Trigger::new(TriggerKind::User).with_event(Event::new("dot").with_name("child")));
        ctx.behaviors.on_created(1, move |_, hooks| hooks.fire_trigger(second));
        let mut parent = Event::new("dot");
        parent.behaviors.created = BehaviorId(1);

        ctx.spawn(&parent).unwrap();
        assert_eq!(ctx.registry.sprite_count(), 2);
        assert_eq!(ctx.registry.sprites()[1].name, "child");
    }

    #[test]
    fn runaway_trigger_chain_is_cut_off() {
        let mut ctx = context();
        ctx.config.max_trigger_rounds = 3;
        let mut looping = Event::new("dot");
        looping.behaviors.created = BehaviorId(1);
        let id = ctx
            .registry
            .add_trigger(Trigger::new(TriggerKind::User).with_event(looping));
        ctx.behaviors.on_created(1, move |_, hooks| hooks.fire_trigger(id));

        ctx.fire_trigger(id).unwrap();
        // the direct fire plus three rounds of requests
        assert_eq!(ctx.registry.sprite_count(), 4);
        assert!(!ctx.hooks.has_trigger_requests());
    }

    #[test]
    fn stop_request_is_consumed() {
        let mut ctx = context();
        ctx.request_stop();
        assert!(ctx.take_stop_request());
        assert!(!ctx.take_stop_request());
    }
}
