//! Simulation core of a 2D side-scrolling platformer.
//!
//! Entities are ids with typed components attached; a fixed pipeline of
//! systems (input, gravity, movement, collision) advances them once per
//! tick, and a small state machine switches between menu, gameplay, pause
//! and game-over screens. Hosts drive everything through [`Game`]: feed it
//! an [`InputSnapshot`] each tick and a [`FrameTarget`] each frame.

pub mod assets;
pub mod collision;
pub mod config;
pub mod ecs;
pub mod error;
pub mod font;
pub mod game;
pub mod input;
pub mod level;
pub mod render;
pub mod state;
pub mod systems;

pub use assets::{AssetStore, ImageDesc, Rgba};
pub use config::GameConfig;
pub use ecs::{ComponentKind, Entity, EntityStore};
pub use error::{ConfigError, LevelError};
pub use game::{Game, GameWorld};
pub use input::{InputSnapshot, InputState, Key, KeyBindings};
pub use level::LevelData;
pub use render::{FrameTarget, RecordingFrame};
pub use state::GameMode;
