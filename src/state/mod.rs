//! Game mode state machine
//!
//! Exactly one mode (menu, playing, paused, game over) is active at a time.
//! The machine forwards each tick's update and each frame's draw to the
//! active state, and runs the exit/enter hooks when the mode changes.
//!
//! # Transitions
//!
//! States never switch modes themselves. `update` returns the mode it wants
//! next, and the machine performs the change once `update` has returned, so
//! the new state's first update happens on the following tick.
//!
//! | From     | Trigger            | To       |
//! |----------|--------------------|----------|
//! | Menu     | confirm pressed    | Playing  |
//! | Playing  | cancel pressed     | Paused   |
//! | Playing  | player fell out    | GameOver |
//! | Paused   | cancel pressed     | Playing  |
//! | Paused   | quit pressed       | Menu     |
//! | GameOver | confirm pressed    | Playing  |
//! | GameOver | quit pressed       | Menu     |

pub mod modes;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::game::GameWorld;
use crate::input::InputSnapshot;
use crate::render::FrameTarget;

pub use modes::{GameOverState, MenuState, ModeState, PausedState, PlayingState};

/// Top-level game modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameMode {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Events that can move the game between modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    ConfirmPressed,
    CancelPressed,
    QuitPressed,
    PlayerFellOut,
}

/// The transition table. `None` means the trigger does nothing in `from`.
pub fn transition(from: GameMode, trigger: Trigger) -> Option<GameMode> {
    match (from, trigger) {
        (GameMode::Menu, Trigger::ConfirmPressed) => Some(GameMode::Playing),
        (GameMode::Playing, Trigger::CancelPressed) => Some(GameMode::Paused),
        (GameMode::Playing, Trigger::PlayerFellOut) => Some(GameMode::GameOver),
        (GameMode::Paused, Trigger::CancelPressed) => Some(GameMode::Playing),
        (GameMode::Paused, Trigger::QuitPressed) => Some(GameMode::Menu),
        (GameMode::GameOver, Trigger::ConfirmPressed) => Some(GameMode::Playing),
        (GameMode::GameOver, Trigger::QuitPressed) => Some(GameMode::Menu),
        _ => None,
    }
}

/// Lifecycle and per-frame hooks of one game mode.
pub trait GameState {
    fn enter(&mut self, world: &mut GameWorld);

    fn exit(&mut self, world: &mut GameWorld);

    /// Advances one tick. Returns the mode to switch to, if any.
    fn update(&mut self, world: &mut GameWorld, input: &dyn InputSnapshot) -> Option<GameMode>;

    fn draw(&self, frame: &mut dyn FrameTarget, world: &GameWorld);
}

/// Owns every registered state and tracks which one is active.
pub struct StateMachine<S: GameState = ModeState> {
    states: BTreeMap<GameMode, S>,
    active: Option<GameMode>,
}

impl StateMachine<ModeState> {
    /// All four modes registered, none active yet.
    pub fn standard() -> Self {
        let mut machine = StateMachine::new();
        machine.register(GameMode::Menu, ModeState::Menu(MenuState));
        machine.register(GameMode::Playing, ModeState::Playing(PlayingState::new()));
        machine.register(GameMode::Paused, ModeState::Paused(PausedState));
        machine.register(GameMode::GameOver, ModeState::GameOver(GameOverState));
        machine
    }
}

impl<S: GameState> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> StateMachine<S> {
    pub fn new() -> Self {
        StateMachine {
            states: BTreeMap::new(),
            active: None,
        }
    }

    pub fn register(&mut self, mode: GameMode, state: S) {
        self.states.insert(mode, state);
    }

    pub fn active_mode(&self) -> Option<GameMode> {
        self.active
    }

    pub fn state(&self, mode: GameMode) -> Option<&S> {
        self.states.get(&mode)
    }

    /// Exits the active state, then enters `next`.
    ///
    /// Requests for an unregistered mode are ignored and the current state
    /// stays active.
    pub fn change_state(&mut self, next: GameMode, world: &mut GameWorld) {
        if !self.states.contains_key(&next) {
            warn!(?next, "no state registered for mode, ignoring transition");
            return;
        }

        if let Some(current) = self.active {
            if let Some(state) = self.states.get_mut(&current) {
                state.exit(world);
            }
            info!("game mode {:?} -> {:?}", current, next);
        } else {
            info!("game mode -> {:?}", next);
        }

        self.active = Some(next);
        if let Some(state) = self.states.get_mut(&next) {
            state.enter(world);
        }
    }

    /// Updates the active state and applies any transition it requests.
    pub fn update(&mut self, world: &mut GameWorld, input: &dyn InputSnapshot) {
        let Some(current) = self.active else {
            return;
        };
        let requested = match self.states.get_mut(&current) {
            Some(state) => state.update(world, input),
            None => None,
        };
        if let Some(next) = requested {
            debug!(?current, ?next, "transition requested");
            self.change_state(next, world);
        }
    }

    pub fn draw(&self, frame: &mut dyn FrameTarget, world: &GameWorld) {
        if let Some(state) = self.active.and_then(|mode| self.states.get(&mode)) {
            state.draw(frame, world);
        }
    }
}
