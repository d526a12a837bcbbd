// Game module - the facade a host drives
//
// This module contains:
// - world.rs: GameWorld, the state shared by every game mode
// - Game: owns the world and the state machine, exposes tick/render/layout
//
// A host calls `tick` at a fixed rate with the current input snapshot and
// `render` once per displayed frame. Neither call touches a graphics or
// windowing library.

pub mod world;

pub use world::GameWorld;

use tracing::info;

use crate::assets::AssetStore;
use crate::config::GameConfig;
use crate::ecs::EntityStore;
use crate::error::LevelError;
use crate::input::InputSnapshot;
use crate::level::LevelData;
use crate::render::FrameTarget;
use crate::state::{GameMode, ModeState, StateMachine};

pub struct Game {
    world: GameWorld,
    states: StateMachine<ModeState>,
    ticks: u64,
}

impl Game {
    /// Creates a game from `config`, reading the configured level file if
    /// there is one and falling back to the built-in level otherwise.
    pub fn new(config: GameConfig) -> Result<Self, LevelError> {
        let level = match &config.level {
            Some(path) => {
                let level = LevelData::load_from_file(path)?;
                info!("using level '{}' from {}", level.name, path.display());
                level
            }
            None => LevelData::level_one(),
        };
        Ok(Self::with_level(config, level))
    }

    /// Creates a game that plays `level`. The game starts in Playing mode.
    pub fn with_level(config: GameConfig, level: LevelData) -> Self {
        let mut world = GameWorld::new(config, level);
        world.assets.load_defaults();

        let mut states = StateMachine::standard();
        states.change_state(GameMode::Playing, &mut world);

        Game {
            world,
            states,
            ticks: 0,
        }
    }

    /// Advances the simulation by one fixed step.
    pub fn tick(&mut self, input: &impl InputSnapshot) {
        self.states.update(&mut self.world, input);
        self.ticks += 1;
    }

    /// Draws the active mode into `frame`.
    pub fn render(&self, frame: &mut impl FrameTarget) {
        self.states.draw(frame, &self.world);
    }

    pub fn layout(&self) -> (u32, u32) {
        self.world.layout()
    }

    pub fn active_mode(&self) -> Option<GameMode> {
        self.states.active_mode()
    }

    /// Ticks run since the game was created.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &GameConfig {
        &self.world.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.world.store
    }

    pub fn assets(&self) -> &AssetStore {
        &self.world.assets
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    /// Entities of the level currently being played.
    pub fn current_level(&self) -> Option<&crate::level::LoadedLevel> {
        self.states
            .state(GameMode::Playing)
            .and_then(ModeState::as_playing)
            .and_then(|playing| playing.level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Player, Position, Velocity};
    use crate::input::{InputState, Key};
    use crate::render::RecordingFrame;

    fn press(input: &mut InputState, keys: &[Key]) {
        input.begin_frame(keys.iter().copied());
    }

    fn player_position(game: &Game) -> Position {
        let player = game.current_level().unwrap().player;
        *game.store().get::<Position>(player).unwrap()
    }

    #[test]
    fn test_starts_in_playing_with_level_pending() {
        let game = Game::new(GameConfig::default()).unwrap();

        assert_eq!(game.active_mode(), Some(GameMode::Playing));
        assert_eq!(game.layout(), (800, 600));
        assert!(game.store().is_empty());
        assert!(game.assets().has_image("player"));
    }

    #[test]
    fn test_first_tick_spawns_level() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.tick(&InputState::new());

        assert_eq!(game.store().len(), 6);
        assert_eq!(game.ticks(), 1);
    }

    #[test]
    fn test_player_walks_right() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let mut input = InputState::new();

        game.tick(&input);
        let start = player_position(&game);
        for _ in 0..10 {
            press(&mut input, &[Key::D]);
            game.tick(&input);
        }

        assert_eq!(player_position(&game).x, start.x + 40.0);
    }

    #[test]
    fn test_pause_resume_reloads_level() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let mut input = InputState::new();

        for _ in 0..5 {
            press(&mut input, &[Key::D]);
            game.tick(&input);
        }
        assert!(player_position(&game).x > 100.0);

        press(&mut input, &[Key::Escape]);
        game.tick(&input);
        assert_eq!(game.active_mode(), Some(GameMode::Paused));
        assert!(game.store().is_empty());

        // Paused ignores gameplay keys
        press(&mut input, &[Key::D]);
        game.tick(&input);
        assert_eq!(game.active_mode(), Some(GameMode::Paused));

        press(&mut input, &[Key::Escape]);
        game.tick(&input);
        assert_eq!(game.active_mode(), Some(GameMode::Playing));
        assert!(game.store().is_empty());

        press(&mut input, &[]);
        game.tick(&input);
        assert_eq!(player_position(&game).x, 100.0);
    }

    #[test]
    fn test_repeated_pause_resume_keeps_resources_flat() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let mut input = InputState::new();
        game.tick(&input);
        let images = game.assets().len();

        for _ in 0..50 {
            press(&mut input, &[Key::Escape]);
            game.tick(&input);
            press(&mut input, &[]);
            game.tick(&input);
            press(&mut input, &[Key::Escape]);
            game.tick(&input);
            press(&mut input, &[]);
            game.tick(&input);
        }

        assert_eq!(game.active_mode(), Some(GameMode::Playing));
        assert_eq!(game.store().len(), 6);
        assert_eq!(game.assets().len(), images);
        assert_eq!(game.store().tables().positions.capacity(), 6);
    }

    #[test]
    fn test_world_exposes_level_and_config() {
        let game = Game::new(GameConfig::default()).unwrap();
        let world = game.world();

        assert_eq!(world.level, LevelData::level_one());
        assert_eq!(world.layout(), game.layout());
        assert_eq!(world.config, *game.config());
    }

    #[test]
    fn test_quit_from_pause_goes_to_menu_then_back() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let mut input = InputState::new();

        press(&mut input, &[Key::Escape]);
        game.tick(&input);
        press(&mut input, &[Key::Q]);
        game.tick(&input);
        assert_eq!(game.active_mode(), Some(GameMode::Menu));

        press(&mut input, &[Key::Space]);
        game.tick(&input);
        assert_eq!(game.active_mode(), Some(GameMode::Playing));
    }

    #[test]
    fn test_fall_out_then_restart() {
        let level = LevelData {
            name: "Void".to_string(),
            player_spawn: (100.0, 0.0),
            platforms: Vec::new(),
        };
        let mut game = Game::with_level(GameConfig::default(), level);
        let input = InputState::new();

        for _ in 0..200 {
            game.tick(&input);
            if game.active_mode() == Some(GameMode::GameOver) {
                break;
            }
        }
        assert_eq!(game.active_mode(), Some(GameMode::GameOver));

        let mut input = InputState::new();
        press(&mut input, &[Key::Space]);
        game.tick(&input);
        assert_eq!(game.active_mode(), Some(GameMode::Playing));

        press(&mut input, &[]);
        game.tick(&input);
        assert!(player_position(&game).y < 10.0);
    }

    #[test]
    fn test_jump_from_ground() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        let mut input = InputState::new();

        for _ in 0..60 {
            game.tick(&input);
        }
        let player = game.current_level().unwrap().player;
        assert!(game.store().get::<Player>(player).unwrap().is_grounded);

        press(&mut input, &[Key::Space]);
        game.tick(&input);

        let velocity = game.store().get::<Velocity>(player).unwrap();
        // Jump impulse, then one gravity step
        assert_eq!(velocity.vy, -15.0 + 0.8);
        assert!(!game.store().get::<Player>(player).unwrap().is_grounded);
    }

    #[test]
    fn test_render_draws_active_mode() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.tick(&InputState::new());

        let mut frame = RecordingFrame::new();
        game.render(&mut frame);
        assert_eq!(frame.image_count(), 6);
    }

    #[test]
    fn test_missing_level_file_is_an_error() {
        let config = GameConfig {
            level: Some("does/not/exist.json".into()),
            ..GameConfig::default()
        };
        assert!(matches!(Game::new(config), Err(LevelError::Io { .. })));
    }
}
