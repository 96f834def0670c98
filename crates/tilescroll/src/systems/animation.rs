//! Animation system: advances every running sprite animation.

use crate::api::types::SpriteId;
use crate::core::registry::EntityRegistry;

/// Advance all sprite animations by `dt_ms`.
///
/// Returns the sprites whose animation completed at least one cycle.
pub fn tick_animations(registry: &mut EntityRegistry, dt_ms: u32) -> Vec<SpriteId> {
    let mut cycled = Vec::new();
    for sprite in registry.sprites_mut().iter_mut().filter(|s| s.active) {
        if let Some(anim) = sprite.animation.as_mut() {
            if anim.tick(dt_ms) > 0 {
                cycled.push(sprite.id);
            }
        }
    }
    cycled
}
