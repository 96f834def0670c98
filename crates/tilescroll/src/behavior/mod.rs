//! Behavior hooks.
//!
//! Sprites carry [`BehaviorId`] selectors instead of closures. Games register
//! hooks under non-zero ids; id 0 always means "do nothing".

use std::collections::HashMap;
use std::fmt;

use crate::api::types::{BehaviorId, SoundEvent, SpriteId, TriggerId};
use crate::components::sprite::Sprite;
use crate::core::viewport::Viewport;

pub type SpriteHook = Box<dyn Fn(&mut Sprite, &mut HookContext)>;
pub type ContactHook = Box<dyn Fn(&mut Sprite, &Sprite, &mut HookContext)>;
pub type SpriteEdit = Box<dyn FnMut(&mut Sprite)>;

/// Which sprites a deferred edit applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteSelector {
    Id(SpriteId),
    Kind(String),
    Name(String),
}

impl SpriteSelector {
    pub fn matches(&self, sprite: &Sprite) -> bool {
        match self {
            SpriteSelector::Id(id) => sprite.id == *id,
            SpriteSelector::Kind(kind) => sprite.kind == *kind,
            SpriteSelector::Name(name) => sprite.name == *name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Movement,
    Impact,
    Damage,
    Created,
    Destroyed,
}

/// What a hook may do besides changing its own sprite.
///
/// Requests are collected here and acted on by the engine once the current
/// pass over the sprites is finished. Edits to other sprites run in the order
/// they were queued and see whatever state the pass left behind.
pub struct HookContext {
    /// Viewport as of the start of the current pass.
    pub viewport: Viewport,
    sounds: Vec<SoundEvent>,
    trigger_requests: Vec<TriggerId>,
    edits: Vec<(SpriteSelector, SpriteEdit)>,
}

impl fmt::Debug for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("viewport", &self.viewport)
            .field("sounds", &self.sounds)
            .field("trigger_requests", &self.trigger_requests)
            .field("pending_edits", &self.edits.len())
            .finish()
    }
}

impl HookContext {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            sounds: Vec::new(),
            trigger_requests: Vec::new(),
            edits: Vec::new(),
        }
    }

    /// Change another sprite once the current pass is over.
    pub fn update_sprite(&mut self, id: SpriteId, edit: impl FnMut(&mut Sprite) + 'static) {
        self.edits.push((SpriteSelector::Id(id), Box::new(edit)));
    }

    /// Change every sprite of `kind`, as matched when the edit is applied.
    pub fn update_sprites_by_kind(
        &mut self,
        kind: impl Into<String>,
        edit: impl FnMut(&mut Sprite) + 'static,
    ) {
        self.edits.push((SpriteSelector::Kind(kind.into()), Box::new(edit)));
    }

    pub fn update_sprites_by_name(
        &mut self,
        name: impl Into<String>,
        edit: impl FnMut(&mut Sprite) + 'static,
    ) {
        self.edits.push((SpriteSelector::Name(name.into()), Box::new(edit)));
    }

    pub fn has_sprite_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Run queued edits against `sprites`. Returns how many sprites were touched;
    /// a sprite matched by two edits counts twice.
    pub fn apply_sprite_edits(&mut self, sprites: &mut [Sprite]) -> usize {
        let mut touched = 0;
        for (target, mut edit) in std::mem::take(&mut self.edits) {
            for sprite in sprites.iter_mut().filter(|s| target.matches(s)) {
                edit(sprite);
                touched += 1;
            }
        }
        touched
    }

    pub fn emit_sound(&mut self, sound: SoundEvent) {
        self.sounds.push(sound);
    }

    /// Ask for a trigger to fire after the current pass.
    pub fn fire_trigger(&mut self, trigger: TriggerId) {
        self.trigger_requests.push(trigger);
    }

    pub fn take_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    pub fn take_trigger_requests(&mut self) -> Vec<TriggerId> {
        std::mem::take(&mut self.trigger_requests)
    }

    pub fn has_trigger_requests(&self) -> bool {
        !self.trigger_requests.is_empty()
    }
}

/// Hook registry keyed by behavior id, one map per hook kind.
#[derive(Default)]
pub struct BehaviorTable {
    movement: HashMap<BehaviorId, SpriteHook>,
    created: HashMap<BehaviorId, SpriteHook>,
    destroyed: HashMap<BehaviorId, SpriteHook>,
    impact: HashMap<BehaviorId, ContactHook>,
    damage: HashMap<BehaviorId, ContactHook>,
}

impl BehaviorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_movement(
        &mut self,
        id: u32,
        hook: impl Fn(&mut Sprite, &mut HookContext) + 'static,
    ) -> &mut Self {
        insert(&mut self.movement, HookKind::Movement, id, Box::new(hook));
        self
    }

    pub fn on_created(
        &mut self,
        id: u32,
        hook: impl Fn(&mut Sprite, &mut HookContext) + 'static,
    ) -> &mut Self {
        insert(&mut self.created, HookKind::Created, id, Box::new(hook));
        self
    }

    pub fn on_destroyed(
        &mut self,
        id: u32,
        hook: impl Fn(&mut Sprite, &mut HookContext) + 'static,
    ) -> &mut Self {
        insert(&mut self.destroyed, HookKind::Destroyed, id, Box::new(hook));
        self
    }

    pub fn on_impact(
        &mut self,
        id: u32,
        hook: impl Fn(&mut Sprite, &Sprite, &mut HookContext) + 'static,
    ) -> &mut Self {
        insert(&mut self.impact, HookKind::Impact, id, Box::new(hook));
        self
    }

    pub fn on_damage(
        &mut self,
        id: u32,
        hook: impl Fn(&mut Sprite, &Sprite, &mut HookContext) + 'static,
    ) -> &mut Self {
        insert(&mut self.damage, HookKind::Damage, id, Box::new(hook));
        self
    }

    pub fn contains(&self, kind: HookKind, id: BehaviorId) -> bool {
        match kind {
            HookKind::Movement => self.movement.contains_key(&id),
            HookKind::Created => self.created.contains_key(&id),
            HookKind::Destroyed => self.destroyed.contains_key(&id),
            HookKind::Impact => self.impact.contains_key(&id),
            HookKind::Damage => self.damage.contains_key(&id),
        }
    }

    /// Map an id to itself if a hook exists, otherwise to the no-op.
    pub fn resolve(&self, kind: HookKind, id: BehaviorId) -> BehaviorId {
        if id.is_none() || self.contains(kind, id) {
            return id;
        }
        log::warn!("no {kind:?} behavior registered under id {}; using no-op", id.0);
        BehaviorId::NONE
    }

    pub fn run_sprite_hook(&self, kind: HookKind, sprite: &mut Sprite, ctx: &mut HookContext) {
        let id = match kind {
            HookKind::Movement => sprite.behaviors.movement,
            HookKind::Created => sprite.behaviors.created,
            HookKind::Destroyed => sprite.behaviors.destroyed,
            HookKind::Impact | HookKind::Damage => return,
        };
        let map = match kind {
            HookKind::Movement => &self.movement,
            HookKind::Created => &self.created,
            _ => &self.destroyed,
        };
        if let Some(hook) = map.get(&id) {
            hook(sprite, ctx);
        }
    }

    pub fn run_contact_hook(
        &self,
        kind: HookKind,
        sprite: &mut Sprite,
        other: &Sprite,
        ctx: &mut HookContext,
    ) {
        let (map, id) = match kind {
            HookKind::Impact => (&self.impact, sprite.behaviors.impact),
            HookKind::Damage => (&self.damage, sprite.behaviors.damage),
            _ => return,
        };
        if let Some(hook) = map.get(&id) {
            hook(sprite, other, ctx);
        }
    }
}

fn insert<H>(map: &mut HashMap<BehaviorId, H>, kind: HookKind, id: u32, hook: H) {
    if id == 0 {
        log::warn!("{kind:?} behavior id 0 is reserved for the no-op; ignoring registration");
        return;
    }
    map.insert(BehaviorId(id), hook);
}
