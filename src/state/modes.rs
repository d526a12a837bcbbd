// The four game modes
//
// Each mode is a small struct implementing `GameState`; `ModeState` is the
// closed set the standard state machine stores, dispatching by match.

use tracing::{debug, info};

use crate::assets::Rgba;
use crate::ecs::{Collider, Position};
use crate::game::GameWorld;
use crate::input::{Action, InputSnapshot};
use crate::level::{LevelLoader, LoadedLevel};
use crate::render::{FrameTarget, render_entities};
use crate::systems::{Pipeline, SystemContext};

use super::{GameMode, GameState, Trigger, transition};

const MENU_BACKGROUND: Rgba = Rgba::rgb(30, 30, 60);
const SKY: Rgba = Rgba::rgb(135, 206, 235);
const PAUSE_OVERLAY: Rgba = Rgba::rgba(0, 0, 0, 128);
const GAME_OVER_BACKGROUND: Rgba = Rgba::rgb(60, 30, 30);

const MENU_TEXT: &str = "2D Platform Game\n\nPress SPACE to start\n\nControls:\nWASD or Arrow Keys to move\nSPACE to jump";
const PLAYING_HINT: &str = "ESC to pause";
const PAUSED_TEXT: &str = "PAUSED\n\nESC to resume\nQ to quit to menu";
const GAME_OVER_TEXT: &str = "GAME OVER\n\nSPACE to restart\nQ to quit to menu";

/// First table transition fired by a just-pressed action, checked in order.
fn pressed_transition(
    mode: GameMode,
    world: &GameWorld,
    input: &dyn InputSnapshot,
    checks: &[(Action, Trigger)],
) -> Option<GameMode> {
    checks
        .iter()
        .filter(|(action, _)| world.config.bindings.action_just_pressed(input, *action))
        .find_map(|(_, trigger)| transition(mode, *trigger))
}

/// Title screen.
#[derive(Debug, Default)]
pub struct MenuState;

impl GameState for MenuState {
    fn enter(&mut self, _world: &mut GameWorld) {
        debug!("entered menu");
    }

    fn exit(&mut self, _world: &mut GameWorld) {}

    fn update(&mut self, world: &mut GameWorld, input: &dyn InputSnapshot) -> Option<GameMode> {
        pressed_transition(
            GameMode::Menu,
            world,
            input,
            &[(Action::Confirm, Trigger::ConfirmPressed)],
        )
    }

    fn draw(&self, frame: &mut dyn FrameTarget, _world: &GameWorld) {
        frame.clear(MENU_BACKGROUND);
        frame.draw_text(MENU_TEXT, 10, 10);
    }
}

/// Active gameplay.
///
/// The level is loaded lazily on the first update after `enter`, and the
/// store is emptied on `exit`, so every visit starts from a fresh level.
#[derive(Debug, Default)]
pub struct PlayingState {
    pipeline: Pipeline,
    level: Option<LoadedLevel>,
}

impl PlayingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities of the currently loaded level, if one is loaded.
    pub fn level(&self) -> Option<&LoadedLevel> {
        self.level.as_ref()
    }

    fn ensure_level(&mut self, world: &mut GameWorld) {
        if self.level.is_some() {
            return;
        }
        let loaded = LevelLoader::new(&mut world.store, &mut world.assets, &world.config.player)
            .load(&world.level);
        self.level = Some(loaded);
    }

    /// Player's top edge is past the bottom of the window plus the limit.
    fn player_fell_out(&self, world: &GameWorld) -> bool {
        let limit = world.config.window.height as f64 + world.config.physics.fall_limit;
        let Some(level) = &self.level else {
            return false;
        };
        let Some(position) = world.store.get::<Position>(level.player) else {
            return false;
        };
        let offset_y = world
            .store
            .get::<Collider>(level.player)
            .map_or(0.0, |collider| collider.offset_y);
        position.y + offset_y > limit
    }
}

impl GameState for PlayingState {
    fn enter(&mut self, _world: &mut GameWorld) {
        self.level = None;
    }

    fn exit(&mut self, world: &mut GameWorld) {
        self.level = None;
        world.store.clear();
    }

    fn update(&mut self, world: &mut GameWorld, input: &dyn InputSnapshot) -> Option<GameMode> {
        self.ensure_level(world);

        if let Some(next) = pressed_transition(
            GameMode::Playing,
            world,
            input,
            &[(Action::Cancel, Trigger::CancelPressed)],
        ) {
            return Some(next);
        }

        let context = SystemContext {
            input,
            bindings: &world.config.bindings,
            jump_cooldown_ticks: world.config.physics.jump_cooldown_ticks,
        };
        self.pipeline.run(&mut world.store, &context);

        if self.player_fell_out(world) {
            info!("player fell out of the level");
            return transition(GameMode::Playing, Trigger::PlayerFellOut);
        }
        None
    }

    fn draw(&self, frame: &mut dyn FrameTarget, world: &GameWorld) {
        frame.clear(SKY);
        render_entities(frame, &world.store, &world.assets);
        frame.draw_text(PLAYING_HINT, 10, 10);
    }
}

/// Gameplay suspended.
#[derive(Debug, Default)]
pub struct PausedState;

impl GameState for PausedState {
    fn enter(&mut self, _world: &mut GameWorld) {
        debug!("paused");
    }

    fn exit(&mut self, _world: &mut GameWorld) {}

    fn update(&mut self, world: &mut GameWorld, input: &dyn InputSnapshot) -> Option<GameMode> {
        // Quit takes precedence when both are pressed in the same frame
        pressed_transition(
            GameMode::Paused,
            world,
            input,
            &[
                (Action::Quit, Trigger::QuitPressed),
                (Action::Cancel, Trigger::CancelPressed),
            ],
        )
    }

    fn draw(&self, frame: &mut dyn FrameTarget, _world: &GameWorld) {
        frame.fill_overlay(PAUSE_OVERLAY);
        frame.draw_text(PAUSED_TEXT, 10, 10);
    }
}

/// Run ended.
#[derive(Debug, Default)]
pub struct GameOverState;

impl GameState for GameOverState {
    fn enter(&mut self, _world: &mut GameWorld) {
        debug!("game over");
    }

    fn exit(&mut self, _world: &mut GameWorld) {}

    fn update(&mut self, world: &mut GameWorld, input: &dyn InputSnapshot) -> Option<GameMode> {
        pressed_transition(
            GameMode::GameOver,
            world,
            input,
            &[
                (Action::Quit, Trigger::QuitPressed),
                (Action::Confirm, Trigger::ConfirmPressed),
            ],
        )
    }

    fn draw(&self, frame: &mut dyn FrameTarget, _world: &GameWorld) {
        frame.clear(GAME_OVER_BACKGROUND);
        frame.draw_text(GAME_OVER_TEXT, 10, 10);
    }
}

/// The states registered by `StateMachine::standard`.
#[derive(Debug)]
pub enum ModeState {
    Menu(MenuState),
    Playing(PlayingState),
    Paused(PausedState),
    GameOver(GameOverState),
}

impl ModeState {
    fn inner(&self) -> &dyn GameState {
        match self {
            ModeState::Menu(state) => state,
            ModeState::Playing(state) => state,
            ModeState::Paused(state) => state,
            ModeState::GameOver(state) => state,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn GameState {
        match self {
            ModeState::Menu(state) => state,
            ModeState::Playing(state) => state,
            ModeState::Paused(state) => state,
            ModeState::GameOver(state) => state,
        }
    }

    pub fn as_playing(&self) -> Option<&PlayingState> {
        match self {
            ModeState::Playing(state) => Some(state),
            _ => None,
        }
    }
}

impl GameState for ModeState {
    fn enter(&mut self, world: &mut GameWorld) {
        self.inner_mut().enter(world);
    }

    fn exit(&mut self, world: &mut GameWorld) {
        self.inner_mut().exit(world);
    }

    fn update(&mut self, world: &mut GameWorld, input: &dyn InputSnapshot) -> Option<GameMode> {
        self.inner_mut().update(world, input)
    }

    fn draw(&self, frame: &mut dyn FrameTarget, world: &GameWorld) {
        self.inner().draw(frame, world);
    }
}
