/// Keyboard input model for the simulation core
///
/// The host polls the physical keyboard once per frame and feeds the set of
/// held keys into an `InputState`. The core only ever asks two questions of
/// a snapshot: is a key held, and was it pressed this frame.
///
/// # Architecture
///
/// - `Key`: the keys the game cares about, independent of any windowing library
/// - `InputSnapshot`: the read-only interface systems and states consume
/// - `InputState`: previous/current held sets, giving edge detection
/// - `Action` + `KeyBindings`: named game actions mapped onto keys
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Keys recognised by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    S,
    W,
    Q,
    Space,
    Enter,
    Escape,
}

/// Per-frame view of the keyboard.
pub trait InputSnapshot {
    /// Key is down this frame.
    fn is_held(&self, key: Key) -> bool;

    /// Key is down this frame and was up the previous frame.
    fn is_just_pressed(&self, key: Key) -> bool;
}

/// Tracks held keys across two consecutive frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    previous: HashSet<Key>,
    current: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new frame with the given set of held keys.
    ///
    /// The old current set becomes the previous set.
    pub fn begin_frame<I>(&mut self, held: I)
    where
        I: IntoIterator<Item = Key>,
    {
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current.clear();
        self.current.extend(held);
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        !self.current.contains(&key) && self.previous.contains(&key)
    }

    pub fn held_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.current.iter().copied()
    }
}

impl InputSnapshot for InputState {
    fn is_held(&self, key: Key) -> bool {
        self.current.contains(&key)
    }

    fn is_just_pressed(&self, key: Key) -> bool {
        self.current.contains(&key) && !self.previous.contains(&key)
    }
}

/// High-level actions the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    /// Start / restart from a menu screen
    Confirm,
    /// Pause and unpause
    Cancel,
    /// Back to the main menu
    Quit,
}

/// Keys bound to each action. Any bound key triggers the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Vec<Key>,
    pub move_right: Vec<Key>,
    pub jump: Vec<Key>,
    pub confirm: Vec<Key>,
    pub cancel: Vec<Key>,
    pub quit: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            move_left: vec![Key::A, Key::Left],
            move_right: vec![Key::D, Key::Right],
            jump: vec![Key::Space, Key::W, Key::Up],
            confirm: vec![Key::Space, Key::Enter],
            cancel: vec![Key::Escape],
            quit: vec![Key::Q],
        }
    }
}

impl KeyBindings {
    pub fn keys(&self, action: Action) -> &[Key] {
        match action {
            Action::MoveLeft => &self.move_left,
            Action::MoveRight => &self.move_right,
            Action::Jump => &self.jump,
            Action::Confirm => &self.confirm,
            Action::Cancel => &self.cancel,
            Action::Quit => &self.quit,
        }
    }

    pub fn action_held(&self, input: &(impl InputSnapshot + ?Sized), action: Action) -> bool {
        self.keys(action).iter().any(|&key| input.is_held(key))
    }

    pub fn action_just_pressed(&self, input: &(impl InputSnapshot + ?Sized), action: Action) -> bool {
        self.keys(action).iter().any(|&key| input.is_just_pressed(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_just_pressed_only_on_first_frame() {
        let mut input = InputState::new();

        input.begin_frame([Key::Space]);
        assert!(input.is_held(Key::Space));
        assert!(input.is_just_pressed(Key::Space));

        input.begin_frame([Key::Space]);
        assert!(input.is_held(Key::Space));
        assert!(!input.is_just_pressed(Key::Space));
    }

    #[test]
    fn test_just_released() {
        let mut input = InputState::new();
        input.begin_frame([Key::Left]);
        input.begin_frame([]);

        assert!(!input.is_held(Key::Left));
        assert!(input.is_just_released(Key::Left));

        input.begin_frame([]);
        assert!(!input.is_just_released(Key::Left));
    }

    #[test]
    fn test_held_keys_reflects_current_frame() {
        let mut input = InputState::new();
        input.begin_frame([Key::A, Key::Space]);
        input.begin_frame([Key::Space, Key::Right]);

        let mut held: Vec<Key> = input.held_keys().collect();
        held.sort();
        assert_eq!(held, vec![Key::Right, Key::Space]);
    }

    #[test]
    fn test_bindings_any_key_triggers_action() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        input.begin_frame([Key::Up]);

        assert!(bindings.action_held(&input, Action::Jump));
        assert!(bindings.action_just_pressed(&input, Action::Jump));
        assert!(!bindings.action_held(&input, Action::MoveLeft));
    }

    #[test]
    fn test_bindings_deserialize_partial() {
        let bindings: KeyBindings = serde_json::from_str(r#"{ "quit": ["Escape"] }"#).unwrap();
        assert_eq!(bindings.quit, vec![Key::Escape]);
        // Unlisted actions keep their defaults
        assert_eq!(bindings.jump, KeyBindings::default().jump);
    }
}
