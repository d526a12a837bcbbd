//! Game configuration
//!
//! Tuning values live in a JSON file so they can be adjusted without a
//! rebuild. Every field has a default, and a partial file only overrides
//! what it names.
//!
//! ```json
//! {
//!     "window": { "width": 800, "height": 600 },
//!     "player": { "jump_power": 16.0 },
//!     "bindings": { "quit": ["Q", "Escape"] }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::input::KeyBindings;

const CONFIG_FILE_NAME: &str = "game.json";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub bindings: KeyBindings,
    /// Level file to load instead of the built-in level one.
    pub level: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 800,
            height: 600,
            title: "2D Platform Game".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Ticks between two jumps.
    pub jump_cooldown_ticks: i32,
    /// How far below the bottom of the window a falling player may get
    /// before the run ends.
    pub fall_limit: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            jump_cooldown_ticks: 10,
            fall_limit: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: i32,
    pub jump_power: f64,
    pub move_speed: f64,
    pub gravity_force: f64,
    pub terminal_velocity: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            max_health: 100,
            jump_power: 15.0,
            move_speed: 4.0,
            gravity_force: 0.8,
            terminal_velocity: 20.0,
            width: 48,
            height: 48,
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the first readable config among `candidates`, or the defaults.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Self {
        for candidate in candidates {
            let path = candidate.as_ref();
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(config) => {
                    info!("loaded config from {}", path.display());
                    return config;
                }
                Err(e) => warn!("{}, trying next location", e),
            }
        }
        warn!("no usable config file found, using defaults");
        Self::default()
    }

    /// Standard config locations: the bundled assets first, then the
    /// per-user config directory.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("assets/config").join(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("platformer").join(CONFIG_FILE_NAME));
        }
        paths
    }
}
