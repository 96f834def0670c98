use std::mem;

use glam::IVec2;

use crate::api::types::{SpriteId, TileId, TriggerId};
use crate::assets::image::{ImageHandle, Readiness};
use crate::components::prototype::SpritePrototype;
use crate::components::sprite::Sprite;
use crate::components::tile::{Tile, TileKind};
use crate::components::trigger::{Trigger, TriggerKind};
use crate::core::viewport::Viewport;

/// A sound declared by the level. Playback is up to the embedding game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    pub id: u32,
    pub file: String,
    /// 0..=100
    pub volume: u8,
}

/// Combined load state of every tile and prototype image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Ready,
    Loading { pending: usize },
    /// Name and reason of the first image that failed.
    Failed { name: String, reason: String },
}

/// Owner of all level state: tiles, prototypes, live sprites, sounds, triggers
/// and the viewport.
///
/// Storage is flat vectors; sprites stay in creation order, which is also
/// the collision and draw order.
pub struct EntityRegistry {
    tiles: Vec<Tile>,
    prototypes: Vec<SpritePrototype>,
    sprites: Vec<Sprite>,
    sounds: Vec<Sound>,
    triggers: Vec<Trigger>,
    pub viewport: Viewport,
}

impl EntityRegistry {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            tiles: Vec::new(),
            prototypes: Vec::new(),
            sprites: Vec::with_capacity(64),
            sounds: Vec::new(),
            triggers: Vec::new(),
            viewport,
        }
    }

    // -- Tiles --

    pub fn add_tile(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Tile covering a grid cell. Cells outside the map have none.
    pub fn tile_at(&self, cell: IVec2) -> Option<&Tile> {
        let size = self.viewport.game_size;
        if cell.x < 0 || cell.y < 0 || cell.x >= size.x || cell.y >= size.y {
            return None;
        }
        self.tile(Tile::grid_id(cell, size.x))
    }

    pub fn void_tile(&self) -> Option<&Tile> {
        self.tile(TileId::VOID)
    }

    pub fn start_tile(&self) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.kind == TileKind::Start)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    // -- Prototypes --

    pub fn add_prototype(&mut self, prototype: SpritePrototype) {
        self.prototypes.push(prototype);
    }

    pub fn prototype(&self, id: &str) -> Option<&SpritePrototype> {
        self.prototypes.iter().find(|p| p.id == id)
    }

    pub fn prototypes(&self) -> &[SpritePrototype] {
        &self.prototypes
    }

    // -- Sprites --

    /// One past the highest live sprite id, or 1 when there are none.
    pub fn next_sprite_id(&self) -> SpriteId {
        SpriteId(self.sprites.iter().map(|s| s.id.0).max().map_or(1, |max| max + 1))
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> &mut Sprite {
        self.sprites.push(sprite);
        let last = self.sprites.len() - 1;
        &mut self.sprites[last]
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.id == id)
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub fn sprites_by_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Sprite> + 'a {
        self.sprites.iter().filter(move |s| s.kind == kind)
    }

    pub fn sprites_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Sprite> + 'a {
        self.sprites.iter().filter(move |s| s.name == name)
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Take every inactive sprite out of the registry, keeping the order of the rest.
    pub fn remove_inactive(&mut self) -> Vec<Sprite> {
        if self.sprites.iter().all(|s| s.active) {
            return Vec::new();
        }
        let (keep, removed): (Vec<_>, Vec<_>) =
            mem::take(&mut self.sprites).into_iter().partition(|s| s.active);
        self.sprites = keep;
        removed
    }

    // -- Sounds --

    pub fn add_sound(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }

    pub fn sound(&self, id: u32) -> Option<&Sound> {
        self.sounds.iter().find(|s| s.id == id)
    }

    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    // -- Triggers --

    pub fn add_trigger(&mut self, trigger: Trigger) -> TriggerId {
        self.triggers.push(trigger);
        TriggerId(self.triggers.len() - 1)
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.get(id.0)
    }

    pub fn trigger_mut(&mut self, id: TriggerId) -> Option<&mut Trigger> {
        self.triggers.get_mut(id.0)
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn triggers_by_kind(&self, kind: TriggerKind) -> impl Iterator<Item = (TriggerId, &Trigger)> {
        self.triggers
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.kind == kind)
            .map(|(i, t)| (TriggerId(i), t))
    }

    // -- Readiness --

    fn images(&self) -> impl Iterator<Item = &ImageHandle> {
        self.tiles
            .iter()
            .map(|t| &t.image)
            .chain(self.prototypes.iter().map(|p| &p.image))
    }

    pub fn asset_status(&self) -> AssetStatus {
        let mut pending = 0;
        for handle in self.images() {
            match handle.readiness() {
                Readiness::Ready => {}
                Readiness::Loading => pending += 1,
                Readiness::Failed => {
                    return AssetStatus::Failed {
                        name: handle.name().to_string(),
                        reason: handle.error().map(|e| e.to_string()).unwrap_or_default(),
                    }
                }
            }
        }
        if pending == 0 {
            AssetStatus::Ready
        } else {
            AssetStatus::Loading { pending }
        }
    }

    /// Drop all level content. The viewport is kept.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.prototypes.clear();
        self.sprites.clear();
        self.sounds.clear();
        self.triggers.clear();
    }
}
