// GameWorld struct
//
// Everything a game mode reads or mutates: the entity store, the image
// registry, the active configuration and the level the Playing mode loads.
// The state machine passes it by reference into every hook.

use crate::assets::AssetStore;
use crate::config::GameConfig;
use crate::ecs::EntityStore;
use crate::level::LevelData;

#[derive(Debug)]
pub struct GameWorld {
    pub store: EntityStore,
    pub assets: AssetStore,
    pub config: GameConfig,
    /// Layout spawned each time gameplay starts.
    pub level: LevelData,
}

impl GameWorld {
    /// Empty store and empty image registry.
    pub fn new(config: GameConfig, level: LevelData) -> Self {
        GameWorld {
            store: EntityStore::new(),
            assets: AssetStore::new(),
            config,
            level,
        }
    }

    /// Logical screen size in pixels.
    pub fn layout(&self) -> (u32, u32) {
        (self.config.window.width, self.config.window.height)
    }
}
