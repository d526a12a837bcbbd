//! Level data and the level loader
//!
//! A level is a player spawn point plus a list of platform rectangles.
//! `LevelData::level_one()` is the built-in layout; other layouts can be
//! read from JSON:
//!
//! ```json
//! {
//!     "name": "Steps",
//!     "player_spawn": [100.0, 400.0],
//!     "platforms": [
//!         { "x": 0.0, "y": 550.0, "width": 800.0, "height": 50.0 }
//!     ]
//! }
//! ```
//!
//! `LevelLoader` turns level data into entities: it empties the store,
//! spawns the player and one entity per platform, and registers a solid
//! image for each platform so it can be drawn at its own size.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assets::{AssetStore, ImageDesc, Rgba};
use crate::config::PlayerConfig;
use crate::ecs::{
    Collider, Entity, EntityStore, Gravity, Input, Platform, Player, Position, Sprite, Velocity,
};
use crate::error::LevelError;

const DEFAULT_PLATFORM_COLOR: Rgba = Rgba::rgb(0, 150, 0);

fn default_platform_color() -> Rgba {
    DEFAULT_PLATFORM_COLOR
}

/// Motion parameters for a moving platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformMotion {
    pub speed: f64,
    pub direction: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_platform_color")]
    pub color: Rgba,
    #[serde(default)]
    pub motion: Option<PlatformMotion>,
}

impl PlatformSpec {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        PlatformSpec {
            x,
            y,
            width,
            height,
            color: DEFAULT_PLATFORM_COLOR,
            motion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    pub player_spawn: (f64, f64),
    pub platforms: Vec<PlatformSpec>,
}

impl LevelData {
    /// The built-in first level: ground plus four floating platforms.
    pub fn level_one() -> Self {
        LevelData {
            name: "Level 1".to_string(),
            player_spawn: (100.0, 400.0),
            platforms: vec![
                PlatformSpec::new(0.0, 550.0, 800.0, 50.0),
                PlatformSpec::new(200.0, 450.0, 150.0, 20.0),
                PlatformSpec::new(450.0, 350.0, 150.0, 20.0),
                PlatformSpec::new(100.0, 250.0, 100.0, 20.0),
                PlatformSpec::new(600.0, 200.0, 120.0, 20.0),
            ],
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level: LevelData =
            serde_json::from_str(&content).map_err(|source| LevelError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        level.validate()?;
        Ok(level)
    }

    /// Rejects platforms with a zero or negative extent.
    pub fn validate(&self) -> Result<(), LevelError> {
        for (index, platform) in self.platforms.iter().enumerate() {
            if !(platform.width > 0.0 && platform.height > 0.0) {
                return Err(LevelError::InvalidPlatform {
                    index,
                    width: platform.width,
                    height: platform.height,
                });
            }
        }
        Ok(())
    }
}

/// Entities created by a level load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedLevel {
    pub player: Entity,
    pub platforms: Vec<Entity>,
}

/// Populates the entity store from level data.
pub struct LevelLoader<'a> {
    store: &'a mut EntityStore,
    assets: &'a mut AssetStore,
    player_config: &'a PlayerConfig,
}

impl<'a> LevelLoader<'a> {
    pub fn new(
        store: &'a mut EntityStore,
        assets: &'a mut AssetStore,
        player_config: &'a PlayerConfig,
    ) -> Self {
        LevelLoader {
            store,
            assets,
            player_config,
        }
    }

    /// Replaces whatever is in the store with the level's entities.
    pub fn load(&mut self, level: &LevelData) -> LoadedLevel {
        self.store.clear();

        let (spawn_x, spawn_y) = level.player_spawn;
        let player = self.create_player(spawn_x, spawn_y);
        let platforms = level
            .platforms
            .iter()
            .enumerate()
            .map(|(index, spec)| self.create_platform(index, spec))
            .collect::<Vec<_>>();

        info!(
            "loaded level '{}': player {} and {} platforms",
            level.name,
            player,
            platforms.len()
        );
        self.store.log_summary();

        LoadedLevel { player, platforms }
    }

    fn create_player(&mut self, x: f64, y: f64) -> Entity {
        let tuning = self.player_config;
        let player = self.store.create_entity();

        self.store.add_component(player, Position::new(x, y));
        self.store.add_component(player, Velocity::default());
        self.store
            .add_component(player, Sprite::new("player", tuning.width, tuning.height));
        self.store.add_component(
            player,
            Collider::solid(tuning.width as f64, tuning.height as f64),
        );
        self.store.add_component(
            player,
            Player {
                health: tuning.max_health,
                max_health: tuning.max_health,
                jump_power: tuning.jump_power,
                move_speed: tuning.move_speed,
                is_grounded: false,
                jump_cooldown: 0,
                facing_right: true,
            },
        );
        self.store.add_component(
            player,
            Gravity {
                force: tuning.gravity_force,
                terminal: tuning.terminal_velocity,
                is_affected: true,
            },
        );
        self.store.add_component(player, Input { enabled: true });

        player
    }

    fn create_platform(&mut self, index: usize, spec: &PlatformSpec) -> Entity {
        let platform = self.store.create_entity();
        let (width, height) = (spec.width.round() as u32, spec.height.round() as u32);

        // Each platform gets an image sized to match it, keyed by its place
        // in the level so a reload replaces the previous images
        let image_key = format!("platform_{}", index);
        self.assets
            .add_image(image_key.clone(), ImageDesc::solid(width, height, spec.color));

        let mut descriptor = Platform::fixed_at(spec.x, spec.y);
        if let Some(motion) = spec.motion {
            descriptor.is_moving = true;
            descriptor.move_speed = motion.speed;
            descriptor.move_direction = motion.direction;
            descriptor.move_distance = motion.distance;
        }

        self.store.add_component(platform, Position::new(spec.x, spec.y));
        self.store
            .add_component(platform, Sprite::new(image_key, width, height));
        self.store
            .add_component(platform, Collider::solid(spec.width, spec.height));
        self.store.add_component(platform, descriptor);

        platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::ComponentKind;

    fn load_level_one(store: &mut EntityStore, assets: &mut AssetStore) -> LoadedLevel {
        let config = PlayerConfig::default();
        LevelLoader::new(store, assets, &config).load(&LevelData::level_one())
    }

    #[test]
    fn test_level_one_entities() {
        let mut store = EntityStore::new();
        let mut assets = AssetStore::new();
        let loaded = load_level_one(&mut store, &mut assets);

        assert_eq!(store.len(), 6);
        assert_eq!(loaded.platforms.len(), 5);
        assert_eq!(
            store.get::<Position>(loaded.player),
            Some(&Position::new(100.0, 400.0))
        );
        assert_eq!(
            store.entities_with(&[
                ComponentKind::Player,
                ComponentKind::Velocity,
                ComponentKind::Input,
                ComponentKind::Gravity,
                ComponentKind::Collider,
                ComponentKind::Sprite,
            ]),
            vec![loaded.player]
        );
        assert_eq!(
            store.entities_with_one(ComponentKind::Platform),
            loaded.platforms
        );
    }

    #[test]
    fn test_platform_images_registered_per_platform() {
        let mut store = EntityStore::new();
        let mut assets = AssetStore::new();
        let loaded = load_level_one(&mut store, &mut assets);

        let ground = loaded.platforms[0];
        let sprite = store.get::<Sprite>(ground).unwrap();
        assert_eq!(sprite.image_key, "platform_0");
        assert_eq!(assets.image_size(&sprite.image_key), (800, 50));

        let platform = store.get::<Platform>(ground).unwrap();
        assert!(!platform.is_moving);
        assert_eq!((platform.start_x, platform.start_y), (0.0, 550.0));
    }

    #[test]
    fn test_reload_replaces_previous_entities() {
        let mut store = EntityStore::new();
        let mut assets = AssetStore::new();
        let first = load_level_one(&mut store, &mut assets);
        let second = load_level_one(&mut store, &mut assets);

        assert_eq!(store.len(), 6);
        // Three defaults were never registered here, so only platform images
        assert_eq!(assets.len(), 5);
        assert!(!store.is_alive(first.player));
        assert!(store.is_alive(second.player));
        assert!(second.player.id() > first.platforms[4].id());
    }

    #[test]
    fn test_player_uses_configured_tuning() {
        let mut store = EntityStore::new();
        let mut assets = AssetStore::new();
        let config = PlayerConfig {
            jump_power: 20.0,
            gravity_force: 1.0,
            ..PlayerConfig::default()
        };
        let loaded = LevelLoader::new(&mut store, &mut assets, &config).load(&LevelData::level_one());

        assert_eq!(store.get::<Player>(loaded.player).unwrap().jump_power, 20.0);
        assert_eq!(store.get::<Gravity>(loaded.player).unwrap().force, 1.0);
    }

    #[test]
    fn test_moving_platform_descriptor() {
        let mut store = EntityStore::new();
        let mut assets = AssetStore::new();
        let config = PlayerConfig::default();
        let level = LevelData {
            name: "Lift".to_string(),
            player_spawn: (0.0, 0.0),
            platforms: vec![PlatformSpec {
                motion: Some(PlatformMotion {
                    speed: 2.0,
                    direction: 1.0,
                    distance: 100.0,
                }),
                ..PlatformSpec::new(300.0, 400.0, 80.0, 16.0)
            }],
        };
        let loaded = LevelLoader::new(&mut store, &mut assets, &config).load(&level);

        let platform = store.get::<Platform>(loaded.platforms[0]).unwrap();
        assert!(platform.is_moving);
        assert_eq!(platform.move_distance, 100.0);
    }

    #[test]
    fn test_load_from_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        std::fs::write(
            &path,
            r#"{
                "name": "Flat",
                "player_spawn": [10.0, 20.0],
                "platforms": [ { "x": 0.0, "y": 500.0, "width": 640.0, "height": 40.0 } ]
            }"#,
        )
        .unwrap();

        let level = LevelData::load_from_file(&path).unwrap();
        assert_eq!(level.player_spawn, (10.0, 20.0));
        assert_eq!(level.platforms[0].color, DEFAULT_PLATFORM_COLOR);
        assert!(level.platforms[0].motion.is_none());
    }

    #[test]
    fn test_load_from_file_rejects_empty_platform() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        std::fs::write(
            &path,
            r#"{ "name": "Bad", "player_spawn": [0.0, 0.0],
                 "platforms": [ { "x": 0.0, "y": 0.0, "width": 0.0, "height": 10.0 } ] }"#,
        )
        .unwrap();

        assert!(matches!(
            LevelData::load_from_file(&path),
            Err(LevelError::InvalidPlatform { index: 0, .. })
        ));
    }

    #[test]
    fn test_level_one_is_valid() {
        assert!(LevelData::level_one().validate().is_ok());
    }

    #[test]
    fn test_bundled_stairs_level() {
        let level = LevelData::load_from_file("assets/levels/stairs.json").unwrap();
        assert_eq!(level.name, "Stairs");
        assert_eq!(level.platforms.len(), 5);
        assert_eq!(level.platforms[4].color, Rgba::rgb(150, 90, 30));
    }
}
