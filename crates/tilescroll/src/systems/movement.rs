//! The per-tick movement pass: viewport, sprites, collisions, cleanup.

use crate::api::game::{Border, EngineContext};
use crate::api::types::Rect;
use crate::behavior::{BehaviorTable, HookContext, HookKind};
use crate::components::sprite::Sprite;
use crate::core::registry::EntityRegistry;
use crate::core::viewport::Viewport;
use crate::systems::collision::check_collisions;

/// Run one simulation step of the movement subsystem.
///
/// Order is fixed: viewport, sprite advance with border check, collisions,
/// removal of inactive sprites, then the trigger requests hooks made meanwhile.
pub fn simulate(ctx: &mut EngineContext) {
    move_viewport(&mut ctx.registry);
    ctx.hooks.viewport = ctx.registry.viewport;

    let border = ctx.config.border;
    move_sprites(ctx.registry.sprites_mut(), border, &ctx.behaviors, &mut ctx.hooks);
    check_collisions(
        ctx.registry.sprites_mut(),
        &mut ctx.config.collision,
        &ctx.behaviors,
        &mut ctx.hooks,
    );
    remove_inactive(&mut ctx.registry, &ctx.behaviors, &mut ctx.hooks);
    ctx.process_trigger_requests();
}

/// Scroll the viewport. Entering a tile with its own velocity adopts it.
pub fn move_viewport(registry: &mut EntityRegistry) {
    registry.viewport.move_by_velocity();
    if let Some(cell) = registry.viewport.take_cell_change() {
        if let Some(vel) = registry.tile_at(cell).and_then(|t| t.velocity) {
            log::debug!("viewport entered tile ({}, {}), velocity now {}", cell.x, cell.y, vel);
            registry.viewport.vel = vel;
        }
    }
}

/// Whether a sprite box has left the playing field under `border`.
pub fn is_out_of_bounds(bounds: &Rect, border: Border, viewport: &Viewport) -> bool {
    let field = match border {
        Border::Screen => viewport.rect(),
        Border::Map => viewport.map_rect(),
    };
    !bounds.overlaps(&field)
}

/// Run movement hooks of active sprites and deactivate those that left the field.
pub fn move_sprites(
    sprites: &mut [Sprite],
    border: Border,
    behaviors: &BehaviorTable,
    hooks: &mut HookContext,
) {
    let viewport = hooks.viewport;
    for sprite in sprites.iter_mut().filter(|s| s.active) {
        behaviors.run_sprite_hook(HookKind::Movement, sprite, hooks);
        if is_out_of_bounds(&sprite.bounds(), border, &viewport) {
            sprite.active = false;
        }
    }
}

/// Drop inactive sprites, stopping their animations and running destroyed hooks.
/// Returns the number of sprites removed.
pub fn remove_inactive(
    registry: &mut EntityRegistry,
    behaviors: &BehaviorTable,
    hooks: &mut HookContext,
) -> usize {
    let removed = registry.remove_inactive();
    let count = removed.len();
    for mut sprite in removed {
        if let Some(anim) = sprite.animation.as_mut() {
            anim.stop();
        }
        behaviors.run_sprite_hook(HookKind::Destroyed, &mut sprite, hooks);
    }
    count
}
