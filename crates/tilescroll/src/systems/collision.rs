//! Pairwise collision detection and response.

use crate::api::game::CollisionAccuracy;
use crate::behavior::{BehaviorTable, HookContext, HookKind};
use crate::components::sprite::Sprite;

/// Inclusive bounding-box test.
pub fn boxes_overlap(a: &Sprite, b: &Sprite) -> bool {
    a.bounds().overlaps(&b.bounds())
}

/// Scan the overlap of two sprites for a pixel opaque in both masks.
///
/// Masks are sampled at the sprite-local offset without the current
/// animation cell, i.e. always against the sheet's first cell.
/// Returns `None` when either sprite has no mask.
pub fn pixels_overlap(a: &Sprite, b: &Sprite) -> Option<bool> {
    let (mask_a, mask_b) = (a.mask.as_ref()?, b.mask.as_ref()?);
    let Some(overlap) = a.bounds().intersection(&b.bounds()) else {
        return Some(false);
    };

    let offset_a = overlap.pos() - a.pos;
    let offset_b = overlap.pos() - b.pos;
    for y in 0..overlap.h {
        for x in 0..overlap.w {
            if mask_a.at(offset_a.x + x, offset_a.y + y) > 0
                && mask_b.at(offset_b.x + x, offset_b.y + y) > 0
            {
                return Some(true);
            }
        }
    }
    Some(false)
}

/// Test every unordered pair once and dispatch impact and damage hooks.
///
/// For the pair `(i, j)` with `i > j`, sprite `i` is "A" and reacts first.
/// A missing mask in pixel mode switches `accuracy` to box tests for good.
pub fn check_collisions(
    sprites: &mut [Sprite],
    accuracy: &mut CollisionAccuracy,
    behaviors: &BehaviorTable,
    hooks: &mut HookContext,
) {
    for i in 1..sprites.len() {
        for j in 0..i {
            let (head, tail) = sprites.split_at_mut(i);
            let (a, b) = (&mut tail[0], &mut head[j]);

            if a.id == b.id || !a.active || !b.active || !a.is_alive() || !b.is_alive() {
                continue;
            }
            if !boxes_overlap(a, b) {
                continue;
            }
            if *accuracy == CollisionAccuracy::Pixel {
                match pixels_overlap(a, b) {
                    Some(true) => {}
                    Some(false) => continue,
                    None => {
                        log::error!(
                            "sprite {} or {} has no opacity mask; pixel collisions disabled",
                            a.id.0,
                            b.id.0
                        );
                        *accuracy = CollisionAccuracy::Box;
                    }
                }
            }
            respond(a, b, behaviors, hooks);
        }
    }
}

fn respond(a: &mut Sprite, b: &mut Sprite, behaviors: &BehaviorTable, hooks: &mut HookContext) {
    if a.mode.impactful > 0 && b.mode.impactful > 0 {
        behaviors.run_contact_hook(HookKind::Impact, a, b, hooks);
        behaviors.run_contact_hook(HookKind::Impact, b, a, hooks);
    }

    if a.mode.channel != b.mode.channel {
        if a.mode.damageable > 0 && b.mode.force > 0 {
            behaviors.run_contact_hook(HookKind::Damage, a, b, hooks);
        }
        if b.mode.damageable > 0 && a.mode.force > 0 {
            behaviors.run_contact_hook(HookKind::Damage, b, a, hooks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{BehaviorId, Mode, SpriteId};
    use crate::assets::image::{Image, OpacityMask, Rgba};
    use crate::core::viewport::Viewport;
    use glam::IVec2;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    type Log = Rc<RefCell<Vec<(&'static str, u32, u32)>>>;

    fn recording_table() -> (BehaviorTable, Log) {
        let log: Log = Rc::default();
        let mut table = BehaviorTable::new();
        let l = log.clone();
        table.on_impact(1, move |s, other, _| l.borrow_mut().push(("impact", s.id.0, other.id.0)));
        let l = log.clone();
        table.on_damage(1, move |s, other, _| l.borrow_mut().push(("damage", s.id.0, other.id.0)));
        (table, log)
    }

    fn block(id: u32, x: i32, y: i32) -> Sprite {
        let mut s = Sprite::new(SpriteId(id))
            .with_pos(IVec2::new(x, y))
            .with_dimension(IVec2::new(10, 10));
        s.behaviors.impact = BehaviorId(1);
        s.behaviors.damage = BehaviorId(1);
        s
    }

    fn hooks() -> HookContext {
        HookContext::new(Viewport::new(IVec2::new(100, 100), IVec2::ONE))
    }

    fn impactful() -> Mode {
        Mode { impactful: 1, ..Mode::default() }
    }

    #[test]
    fn overlapping_impactful_pair_fires_both_impacts_once() {
        let (table, log) = recording_table();
        let mut sprites = vec![
            block(1, 0, 0).with_mode(impactful()),
            block(2, 5, 5).with_mode(impactful()),
        ];
        check_collisions(&mut sprites, &mut CollisionAccuracy::Box, &table, &mut hooks());
        assert_eq!(*log.borrow(), vec![("impact", 2, 1), ("impact", 1, 2)]);
    }

    #[test]
    fn distant_pair_fires_nothing() {
        let (table, log) = recording_table();
        let mode = Mode { impactful: 1, force: 1, damageable: 1, channel: 0 };
        let mut sprites = vec![block(1, 0, 0).with_mode(mode), block(2, 20, 20).with_mode(mode)];
        sprites[1].mode.channel = 1;
        check_collisions(&mut sprites, &mut CollisionAccuracy::Box, &table, &mut hooks());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn same_channel_never_damages() {
        let (table, log) = recording_table();
        let mode = Mode { impactful: 0, force: 5, damageable: 1, channel: 2 };
        let mut sprites = vec![block(1, 0, 0).with_mode(mode), block(2, 3, 3).with_mode(mode)];
        check_collisions(&mut sprites, &mut CollisionAccuracy::Box, &table, &mut hooks());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn damage_needs_force_on_the_other_side() {
        let (table, log) = recording_table();
        let bullet = Mode { force: 1, channel: 1, ..Mode::default() };
        let ship = Mode { damageable: 1, channel: 2, ..Mode::default() };
        let mut sprites = vec![block(1, 0, 0).with_mode(ship), block(2, 4, 4).with_mode(bullet)];
        check_collisions(&mut sprites, &mut CollisionAccuracy::Box, &table, &mut hooks());
        assert_eq!(*log.borrow(), vec![("damage", 1, 2)]);
    }

    #[test]
    fn inactive_and_dead_sprites_are_skipped() {
        let (table, log) = recording_table();
        let mut sprites = vec![
            block(1, 0, 0).with_mode(impactful()),
            block(2, 1, 1).with_mode(impactful()),
            block(3, 2, 2).with_mode(impactful()),
        ];
        sprites[1].active = false;
        sprites[2].vitality.energy = 0;
        check_collisions(&mut sprites, &mut CollisionAccuracy::Box, &table, &mut hooks());
        assert!(log.borrow().is_empty());
    }

    fn masked(id: u32, x: i32, y: i32, opaque: &[(i32, i32)]) -> Sprite {
        let mut img = Image::new(10, 10);
        for &(px, py) in opaque {
            img.set_pixel(px, py, Rgba::BLACK);
        }
        block(id, x, y).with_image(Arc::new(img)).with_mode(impactful())
    }

    #[test]
    fn pixel_mode_ignores_transparent_overlap() {
        let (table, log) = recording_table();
        // boxes overlap on [5,10) but the opaque pixels do not
        let mut sprites = vec![masked(1, 0, 0, &[(0, 0)]), masked(2, 5, 5, &[(9, 9)])];
        let mut accuracy = CollisionAccuracy::Pixel;
        check_collisions(&mut sprites, &mut accuracy, &table, &mut hooks());
        assert!(log.borrow().is_empty());
        assert_eq!(accuracy, CollisionAccuracy::Pixel);
    }

    #[test]
    fn pixel_mode_detects_shared_opaque_pixel() {
        let a = masked(1, 0, 0, &[(7, 7)]);
        let b = masked(2, 5, 5, &[(2, 2)]);
        assert_eq!(pixels_overlap(&a, &b), Some(true));
    }

    #[test]
    fn missing_mask_falls_back_to_boxes() {
        let (table, log) = recording_table();
        let mut plain = block(2, 5, 5).with_mode(impactful());
        plain.mask = None;
        let mut sprites = vec![masked(1, 0, 0, &[]), plain];
        let mut accuracy = CollisionAccuracy::Pixel;
        check_collisions(&mut sprites, &mut accuracy, &table, &mut hooks());
        assert_eq!(accuracy, CollisionAccuracy::Box);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn mask_samples_first_cell_only() {
        // opaque only in the second animation cell of a 2x1 sheet
        let mut img = Image::new(20, 10);
        img.set_pixel(12, 2, Rgba::BLACK);
        let mut a = block(1, 0, 0);
        a.mask = Some(Arc::new(OpacityMask::from_image(&img)));
        let b = masked(2, 0, 0, &[(2, 2)]);
        assert_eq!(pixels_overlap(&a, &b), Some(false));
    }
}
