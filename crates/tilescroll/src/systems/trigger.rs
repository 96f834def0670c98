//! Trigger evaluation and event activation.

use glam::IVec2;

use crate::api::error::EngineError;
use crate::api::types::{SpriteId, TriggerId};
use crate::behavior::{BehaviorTable, HookContext, HookKind};
use crate::components::animation::Animation;
use crate::components::sprite::{Behaviors, Sprite};
use crate::components::trigger::{Event, TriggerKind};
use crate::core::registry::EntityRegistry;

/// Type tag of sprites that set off coordinate triggers.
pub const PLAYER_KIND: &str = "player";

/// Spawn a sprite from `event` and run its created hook.
pub fn activate(
    registry: &mut EntityRegistry,
    behaviors: &BehaviorTable,
    hooks: &mut HookContext,
    event: &Event,
) -> Result<SpriteId, EngineError> {
    let prototype = registry
        .prototype(&event.prototype)
        .ok_or_else(|| EngineError::UnknownPrototype(event.prototype.clone()))?;
    let image = prototype
        .loaded_image()
        .cloned()
        .ok_or_else(|| EngineError::PrototypeNotReady(prototype.id.clone()))?;
    let mask = prototype.mask();

    let mut dimension = image.size();
    let animation = prototype.animation.map(|def| {
        dimension = IVec2::new(
            dimension.x / def.frames.max(1) as i32,
            dimension.y / def.rows.max(1) as i32,
        );
        Animation::new(def)
    });

    let sprite = Sprite {
        id: registry.next_sprite_id(),
        name: event.name.clone(),
        kind: event.kind.clone(),
        prototype: event.prototype.clone(),
        pos: event.pos,
        vel: event.vel,
        dimension,
        layer: event.layer,
        vitality: event.vitality,
        mode: event.mode,
        active: true,
        animation,
        image: Some(image),
        mask,
        behaviors: resolve_behaviors(behaviors, &event.behaviors),
    };

    let sprite = registry.add_sprite(sprite);
    behaviors.run_sprite_hook(HookKind::Created, sprite, hooks);
    log::debug!("spawned sprite {} from `{}`", sprite.id.0, event.prototype);
    Ok(sprite.id)
}

fn resolve_behaviors(table: &BehaviorTable, selectors: &Behaviors) -> Behaviors {
    Behaviors {
        movement: table.resolve(HookKind::Movement, selectors.movement),
        impact: table.resolve(HookKind::Impact, selectors.impact),
        damage: table.resolve(HookKind::Damage, selectors.damage),
        created: table.resolve(HookKind::Created, selectors.created),
        destroyed: table.resolve(HookKind::Destroyed, selectors.destroyed),
    }
}

/// Outcome of firing one trigger.
#[derive(Debug, Default)]
pub struct Fired {
    /// Sprites created, in event order.
    pub spawned: Vec<SpriteId>,
    /// Events that could not be activated, by index into the trigger's event list.
    pub failed: Vec<(usize, EngineError)>,
}

/// Activate every event of a trigger in declaration order.
///
/// An event that cannot be activated is logged and skipped; the rest still
/// spawn. Only an unknown trigger id is an error. Lifetime is not touched here.
pub fn fire_trigger(
    registry: &mut EntityRegistry,
    behaviors: &BehaviorTable,
    hooks: &mut HookContext,
    id: TriggerId,
) -> Result<Fired, EngineError> {
    // Borrow the events out while spawning; they go back untouched.
    let events = match registry.trigger_mut(id) {
        Some(trigger) => std::mem::take(&mut trigger.events),
        None => return Err(EngineError::UnknownTrigger(id.0)),
    };

    let mut fired = Fired {
        spawned: Vec::with_capacity(events.len()),
        failed: Vec::new(),
    };
    for (index, event) in events.iter().enumerate() {
        match activate(registry, behaviors, hooks, event) {
            Ok(sprite) => fired.spawned.push(sprite),
            Err(e) => {
                log::warn!("trigger {} event {} `{}` skipped: {}", id.0, index, event.name, e);
                fired.failed.push((index, e));
            }
        }
    }

    if let Some(trigger) = registry.trigger_mut(id) {
        trigger.events = events;
    }
    Ok(fired)
}

/// Fire every start trigger once, in list order. Each loses exactly one
/// lifetime, whatever its value was.
pub fn fire_start_triggers(
    registry: &mut EntityRegistry,
    behaviors: &BehaviorTable,
    hooks: &mut HookContext,
) {
    let ids: Vec<TriggerId> = registry
        .triggers_by_kind(TriggerKind::Start)
        .map(|(id, _)| id)
        .collect();
    for id in ids {
        if let Err(e) = fire_trigger(registry, behaviors, hooks, id) {
            log::error!("start trigger {}: {}", id.0, e);
        }
        if let Some(trigger) = registry.trigger_mut(id) {
            trigger.lifetime -= 1;
        }
    }
}

/// Fire coordinate triggers overlapped by player sprites.
///
/// Every overlapping player fires the trigger and takes one lifetime, so a
/// trigger with one life left still fires once per player in the same tick.
pub fn check_coordinate_triggers(
    registry: &mut EntityRegistry,
    behaviors: &BehaviorTable,
    hooks: &mut HookContext,
) {
    for index in 0..registry.triggers().len() {
        let id = TriggerId(index);
        let trigger = &registry.triggers()[index];
        if trigger.kind != TriggerKind::Coordinate || trigger.lifetime <= 0 {
            continue;
        }
        let Some(area) = trigger.area else {
            continue;
        };

        let hits = registry
            .sprites_by_kind(PLAYER_KIND)
            .filter(|s| s.active && s.bounds().overlaps(&area))
            .count();

        for _ in 0..hits {
            if let Err(e) = fire_trigger(registry, behaviors, hooks, id) {
                log::error!("coordinate trigger {}: {}", index, e);
            }
            if let Some(trigger) = registry.trigger_mut(id) {
                trigger.lifetime -= 1;
            }
        }
    }
}

/// Apply sprite edits and fire triggers requested by hooks until none are
/// left or `max_rounds` rounds of triggers have run. Edits queued by the
/// last round still apply.
pub fn process_requests(
    registry: &mut EntityRegistry,
    behaviors: &BehaviorTable,
    hooks: &mut HookContext,
    max_rounds: u32,
) {
    let mut rounds = 0;
    loop {
        hooks.apply_sprite_edits(registry.sprites_mut());
        if !hooks.has_trigger_requests() {
            break;
        }
        if rounds == max_rounds {
            let dropped = hooks.take_trigger_requests();
            log::warn!(
                "trigger requests still pending after {max_rounds} rounds; dropping {}",
                dropped.len()
            );
            break;
        }
        rounds += 1;
        for id in hooks.take_trigger_requests() {
            if let Err(e) = fire_trigger(registry, behaviors, hooks, id) {
                log::error!("requested trigger {}: {}", id.0, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{BehaviorId, Rect};
    use crate::assets::image::{Image, ImageHandle};
    use crate::components::animation::AnimationDef;
    use crate::components::prototype::SpritePrototype;
    use crate::components::trigger::Trigger;
    use crate::core::viewport::Viewport;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() -> (EntityRegistry, BehaviorTable, HookContext) {
        let viewport = Viewport::new(IVec2::new(100, 100), IVec2::new(4, 4));
        let mut registry = EntityRegistry::new(viewport);
        registry.add_prototype(SpritePrototype::new(
            "block",
            ImageHandle::ready("block.png", Image::new(10, 10)),
        ));
        registry.add_prototype(
            SpritePrototype::new("walker", ImageHandle::ready("walker.png", Image::new(64, 32)))
                .with_animation(AnimationDef { frames: 4, rows: 1, delay_ms: 100 }),
        );
        (registry, BehaviorTable::new(), HookContext::new(viewport))
    }

    #[test]
    fn activate_copies_event_fields() {
        let (mut reg, table, mut hooks) = setup();
        let event = Event::new("block")
            .with_name("rock")
            .with_kind("obstacle")
            .with_pos(IVec2::new(5, 6))
            .with_vel(IVec2::new(-1, 0));
        let id = activate(&mut reg, &table, &mut hooks, &event).unwrap();
        let s = reg.sprite(id).unwrap();
        assert_eq!(id, SpriteId(1));
        assert_eq!(s.name, "rock");
        assert_eq!(s.kind, "obstacle");
        assert_eq!(s.pos, IVec2::new(5, 6));
        assert_eq!(s.vel, IVec2::new(-1, 0));
        assert_eq!(s.dimension, IVec2::new(10, 10));
        assert!(s.mask.is_some());
    }

    #[test]
    fn animated_prototype_shrinks_to_one_cell() {
        let (mut reg, table, mut hooks) = setup();
        reg.add_sprite(Sprite::new(SpriteId(4)));
        let id = activate(&mut reg, &table, &mut hooks, &Event::new("walker")).unwrap();
        assert_eq!(id, SpriteId(5));
        let s = reg.sprite(id).unwrap();
        assert_eq!(s.dimension, IVec2::new(16, 32));
        assert!(s.animation.is_some());
    }

    #[test]
    fn created_hook_runs_once() {
        let (mut reg, mut table, mut hooks) = setup();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        table.on_created(3, move |s, _| {
            seen.set(seen.get() + 1);
            s.vel = IVec2::new(9, 9);
        });
        let mut event = Event::new("block");
        event.behaviors.created = BehaviorId(3);
        let id = activate(&mut reg, &table, &mut hooks, &event).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(reg.sprite(id).unwrap().vel, IVec2::new(9, 9));
    }

    #[test]
    fn unknown_selector_falls_back_to_noop() {
        let (mut reg, table, mut hooks) = setup();
        let mut event = Event::new("block");
        event.behaviors.impact = BehaviorId(42);
        let id = activate(&mut reg, &table, &mut hooks, &event).unwrap();
        assert!(reg.sprite(id).unwrap().behaviors.impact.is_none());
    }

    #[test]
    fn unknown_prototype_is_an_error() {
        let (mut reg, table, mut hooks) = setup();
        let err = activate(&mut reg, &table, &mut hooks, &Event::new("ghost")).unwrap_err();
        assert!(matches!(err, EngineError::UnknownPrototype(ref p) if p == "ghost"));
    }

    #[test]
    fn fire_trigger_keeps_events_and_order() {
        let (mut reg, table, mut hooks) = setup();
        let id = reg.add_trigger(
            Trigger::new(TriggerKind::User)
                .with_event(Event::new("block").with_name("a"))
                .with_event(Event::new("walker").with_name("b")),
        );
        let fired = fire_trigger(&mut reg, &table, &mut hooks, id).unwrap();
        assert_eq!(fired.spawned, vec![SpriteId(1), SpriteId(2)]);
        assert!(fired.failed.is_empty());
        assert_eq!(reg.sprites()[0].name, "a");
        assert_eq!(reg.sprites()[1].name, "b");
        assert_eq!(reg.trigger(id).unwrap().events.len(), 2);
    }

    #[test]
    fn bad_event_is_skipped_and_later_events_still_spawn() {
        let (mut reg, table, mut hooks) = setup();
        let id = reg.add_trigger(
            Trigger::new(TriggerKind::User)
                .with_event(Event::new("ghost").with_name("lost"))
                .with_event(Event::new("block").with_name("kept")),
        );
        let fired = fire_trigger(&mut reg, &table, &mut hooks, id).unwrap();
        assert_eq!(fired.spawned, vec![SpriteId(1)]);
        assert_eq!(fired.failed.len(), 1);
        assert_eq!(fired.failed[0].0, 0);
        assert!(matches!(fired.failed[0].1, EngineError::UnknownPrototype(ref p) if p == "ghost"));
        assert_eq!(reg.sprites()[0].name, "kept");
        assert_eq!(reg.trigger(id).unwrap().events.len(), 2);
    }

    #[test]
    fn unknown_trigger_request_does_not_block_others() {
        let (mut reg, table, mut hooks) = setup();
        let id = reg.add_trigger(Trigger::new(TriggerKind::User).with_event(Event::new("block")));
        assert!(matches!(
            fire_trigger(&mut reg, &table, &mut hooks, TriggerId(99)),
            Err(EngineError::UnknownTrigger(99))
        ));

        hooks.fire_trigger(TriggerId(99));
        hooks.fire_trigger(id);
        process_requests(&mut reg, &table, &mut hooks, 4);
        assert_eq!(reg.sprite_count(), 1);
        assert!(!hooks.has_trigger_requests());
    }

    #[test]
    fn edits_from_created_hooks_apply_after_the_round() {
        let (mut reg, mut table, mut hooks) = setup();
        table.on_created(1, |s, hooks| {
            let me = s.id;
            hooks.update_sprites_by_kind("wall", move |w| w.name = format!("seen by {}", me.0));
        });
        reg.add_sprite(Sprite::new(SpriteId(7)).with_kind("wall"));
        let mut event = Event::new("block");
        event.behaviors.created = BehaviorId(1);
        let id = reg.add_trigger(Trigger::new(TriggerKind::User).with_event(event));

        hooks.fire_trigger(id);
        process_requests(&mut reg, &table, &mut hooks, 1);
        assert_eq!(reg.sprite(SpriteId(7)).unwrap().name, "seen by 8");
        assert!(!hooks.has_sprite_edits());
    }

    #[test]
    fn start_triggers_lose_one_lifetime_even_when_infinite() {
        let (mut reg, table, mut hooks) = setup();
        let finite = reg.add_trigger(Trigger::new(TriggerKind::Start).with_event(Event::new("block")));
        let infinite = reg.add_trigger(
            Trigger::new(TriggerKind::Start)
                .with_lifetime(-1)
                .with_event(Event::new("block")),
        );
        let user = reg.add_trigger(Trigger::new(TriggerKind::User).with_event(Event::new("block")));

        fire_start_triggers(&mut reg, &table, &mut hooks);
        assert_eq!(reg.trigger(finite).unwrap().lifetime, 0);
        assert_eq!(reg.trigger(infinite).unwrap().lifetime, -2);
        assert_eq!(reg.trigger(user).unwrap().lifetime, 1);
        assert_eq!(reg.sprite_count(), 2);
    }

    #[test]
    fn coordinate_trigger_fires_on_player_overlap() {
        let (mut reg, table, mut hooks) = setup();
        let id = reg.add_trigger(
            Trigger::new(TriggerKind::Coordinate)
                .with_area(Rect::new(50, 50, 20, 20))
                .with_event(Event::new("block")),
        );
        reg.add_sprite(
            Sprite::new(SpriteId(10))
                .with_kind("enemy")
                .with_pos(IVec2::new(55, 55))
                .with_dimension(IVec2::new(5, 5)),
        );
        check_coordinate_triggers(&mut reg, &table, &mut hooks);
        assert_eq!(reg.trigger(id).unwrap().lifetime, 1);

        reg.add_sprite(
            Sprite::new(SpriteId(11))
                .with_kind(PLAYER_KIND)
                .with_pos(IVec2::new(40, 40))
                .with_dimension(IVec2::new(10, 10)),
        );
        check_coordinate_triggers(&mut reg, &table, &mut hooks);
        assert_eq!(reg.trigger(id).unwrap().lifetime, 0);
        assert_eq!(reg.sprite_count(), 3);

        // spent triggers stay quiet
        check_coordinate_triggers(&mut reg, &table, &mut hooks);
        assert_eq!(reg.sprite_count(), 3);
    }

    #[test]
    fn two_players_fire_a_single_life_trigger_twice() {
        let (mut reg, table, mut hooks) = setup();
        let id = reg.add_trigger(
            Trigger::new(TriggerKind::Coordinate)
                .with_area(Rect::new(0, 0, 10, 10))
                .with_event(Event::new("block")),
        );
        for i in 1..=2 {
            reg.add_sprite(
                Sprite::new(SpriteId(i))
                    .with_kind(PLAYER_KIND)
                    .with_dimension(IVec2::new(4, 4)),
            );
        }
        check_coordinate_triggers(&mut reg, &table, &mut hooks);
        assert_eq!(reg.trigger(id).unwrap().lifetime, -1);
        assert_eq!(reg.sprite_count(), 4);
    }
}
