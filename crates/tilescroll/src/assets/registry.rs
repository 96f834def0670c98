//! Turning a validated level description into a live registry.

use std::collections::HashSet;

use glam::IVec2;

use crate::api::error::ConfigError;
use crate::api::types::Rect;
use crate::assets::level::{LevelDescription, MapDescriptor, TriggerDescriptor};
use crate::assets::loader::ImageLoader;
use crate::components::animation::AnimationDef;
use crate::components::prototype::SpritePrototype;
use crate::components::tile::{Tile, TileKind};
use crate::components::trigger::{Event, Trigger, TriggerKind};
use crate::core::registry::{EntityRegistry, Sound};
use crate::core::viewport::Viewport;

impl LevelDescription {
    /// Check every reference and value the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.game.display_speed as i64, "game.display_speed")?;
        positive(self.game.game_speed as i64, "game.game_speed")?;
        let [w, h] = self.screen.dimension;
        positive(w as i64, "screen.dimension")?;
        positive(h as i64, "screen.dimension")?;
        let [columns, rows] = self.screen.gamesize;
        positive(columns as i64, "screen.gamesize")?;
        positive(rows as i64, "screen.gamesize")?;
        map_extent("x", columns, w)?;
        map_extent("y", rows, h)?;

        self.validate_maps(columns, rows)?;

        let mut sound_ids = HashSet::new();
        for sound in &self.sounds {
            if !sound_ids.insert(sound.id) {
                return Err(ConfigError::DuplicateSound(sound.id));
            }
            if sound.volume > 100 {
                return Err(ConfigError::InvalidVolume { id: sound.id, volume: sound.volume });
            }
        }

        let mut prototype_ids = HashSet::new();
        for proto in &self.prototypes {
            if !prototype_ids.insert(proto.id.as_str()) {
                return Err(ConfigError::DuplicatePrototype(proto.id.clone()));
            }
            if let Some(anim) = proto.animation {
                if anim.frames == 0 || anim.rows == 0 {
                    return Err(ConfigError::InvalidAnimation {
                        id: proto.id.clone(),
                        frames: anim.frames,
                        rows: anim.rows,
                    });
                }
            }
        }

        for (index, trigger) in self.triggers.iter().enumerate() {
            if trigger.kind == TriggerKind::Coordinate && trigger.area.is_none() {
                return Err(ConfigError::MissingTriggerBox(index));
            }
            for event in &trigger.events {
                if !prototype_ids.contains(event.prototype.as_str()) {
                    return Err(ConfigError::UnknownPrototype {
                        trigger: index,
                        event: event.name.clone(),
                        prototype: event.prototype.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_maps(&self, columns: i32, rows: i32) -> Result<(), ConfigError> {
        let mut cells = HashSet::new();
        let (mut starts, mut voids) = (0, 0);
        for map in &self.maps {
            if map.kind == TileKind::Void {
                voids += 1;
                if voids > 1 {
                    return Err(ConfigError::DuplicateSpecialTile("void"));
                }
                continue;
            }
            if map.kind == TileKind::Start {
                starts += 1;
                if starts > 1 {
                    return Err(ConfigError::DuplicateSpecialTile("start"));
                }
            }
            let [x, y] = map
                .position
                .ok_or_else(|| ConfigError::MissingTilePosition(map.image.clone()))?;
            if x < 0 || y < 0 || x >= columns || y >= rows {
                return Err(ConfigError::TileOutOfRange { x, y, columns, rows });
            }
            if !cells.insert((x, y)) {
                return Err(ConfigError::DuplicateTile { x, y });
            }
        }
        Ok(())
    }
}

/// The map in pixels must fit in `i32`, with room for sprites beyond its edge.
fn map_extent(axis: &'static str, tiles: i32, tile_px: i32) -> Result<(), ConfigError> {
    match tiles.checked_mul(tile_px) {
        Some(px) if px <= i32::MAX / 2 => Ok(()),
        _ => Err(ConfigError::MapTooLarge { axis, tiles, tile_px }),
    }
}

fn positive(value: i64, field: &'static str) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NotPositive(field));
    }
    Ok(())
}

impl EntityRegistry {
    /// Validate `level` and populate a registry from it. Image loads are
    /// started through `loader` and finish in the background.
    pub fn from_level(level: &LevelDescription, loader: &dyn ImageLoader) -> Result<Self, ConfigError> {
        level.validate()?;

        let viewport = Viewport::new(
            IVec2::from_array(level.screen.dimension),
            IVec2::from_array(level.screen.gamesize),
        )
        .with_vel(IVec2::from_array(level.screen.velocity));
        let mut registry = EntityRegistry::new(viewport);

        for map in &level.maps {
            registry.add_tile(build_tile(map, viewport.game_size.x, loader));
        }
        if let Some(start) = registry.start_tile() {
            let (cell, vel) = (start.grid, start.velocity);
            registry.viewport.place_on_cell(cell);
            if let Some(vel) = vel {
                registry.viewport.vel = vel;
            }
        }

        for sound in &level.sounds {
            registry.add_sound(Sound {
                id: sound.id,
                file: sound.file.clone(),
                volume: sound.volume as u8,
            });
        }

        for proto in &level.prototypes {
            let mut prototype = SpritePrototype::new(proto.id.clone(), loader.load(&proto.image));
            if let Some(anim) = proto.animation {
                prototype = prototype.with_animation(AnimationDef {
                    frames: anim.frames,
                    rows: anim.rows,
                    delay_ms: anim.delay,
                });
            }
            registry.add_prototype(prototype);
        }

        for trigger in &level.triggers {
            registry.add_trigger(build_trigger(trigger));
        }

        log::info!(
            "level loaded: {} tiles, {} prototypes, {} triggers, {} sounds",
            registry.tiles().len(),
            registry.prototypes().len(),
            registry.triggers().len(),
            registry.sounds().len()
        );
        Ok(registry)
    }
}

fn build_tile(map: &MapDescriptor, columns: i32, loader: &dyn ImageLoader) -> Tile {
    let image = loader.load(&map.image);
    let mut tile = match map.kind {
        TileKind::Void => Tile::void(image),
        kind => {
            let grid = IVec2::from_array(map.position.unwrap_or_default());
            Tile::new(grid, columns, image).with_kind(kind)
        }
    };
    if let Some(vel) = map.velocity {
        tile = tile.with_velocity(IVec2::from_array(vel));
    }
    tile
}

fn build_trigger(desc: &TriggerDescriptor) -> Trigger {
    let mut trigger = Trigger::new(desc.kind).with_lifetime(desc.lifetime);
    if let Some([x, y, w, h]) = desc.area {
        trigger = trigger.with_area(Rect::new(x, y, w, h));
    }
    for entry in &desc.events {
        for &pos in &entry.sprites {
            trigger = trigger.with_event(
                Event::new(entry.prototype.clone())
                    .with_name(entry.name.clone())
                    .with_kind(entry.kind.clone())
                    .with_layer(entry.layer)
                    .with_pos(IVec2::from_array(pos))
                    .with_vel(IVec2::from_array(entry.velocity))
                    .with_mode(entry.mode)
                    .with_vitality(entry.vitality)
                    .with_behaviors(entry.behavior),
            );
        }
    }
    trigger
}
