//! Component data records
//!
//! Every component is a plain data struct with no behavior. The set of
//! component types is closed: `ComponentKind` enumerates them and the
//! `Component` enum wraps one value of any kind so it can be handed to
//! `EntityStore::add_component` without generics.

use serde::{Deserialize, Serialize};

/// Position of the entity's top-left anchor in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Velocity in pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    pub fn new(vx: f64, vy: f64) -> Self {
        Velocity { vx, vy }
    }
}

/// Visual representation, resolved through the asset store by `image_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub image_key: String,
    pub width: u32,
    pub height: u32,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Sprite {
    pub fn new(image_key: impl Into<String>, width: u32, height: u32) -> Self {
        Sprite {
            image_key: image_key.into(),
            width,
            height,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Axis-aligned collision box, offset from the entity's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Solid colliders take part in penetration resolution.
    pub is_solid: bool,
    /// Trigger colliders only report overlaps.
    pub is_trigger: bool,
}

impl Collider {
    /// A solid, non-trigger box with no offset.
    pub fn solid(width: f64, height: f64) -> Self {
        Collider {
            width,
            height,
            offset_x: 0.0,
            offset_y: 0.0,
            is_solid: true,
            is_trigger: false,
        }
    }
}

/// Player attributes. Presence of this component marks the player entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub health: i32,
    pub max_health: i32,
    pub jump_power: f64,
    pub move_speed: f64,
    pub is_grounded: bool,
    /// Ticks left before another jump may trigger.
    pub jump_cooldown: i32,
    pub facing_right: bool,
}

impl Default for Player {
    fn default() -> Self {
        Player {
            health: 100,
            max_health: 100,
            jump_power: 15.0,
            move_speed: 4.0,
            is_grounded: false,
            jump_cooldown: 0,
            facing_right: true,
        }
    }
}

/// Platform motion descriptor. Presence of this component marks a platform.
///
/// The motion fields are carried as data; static platforms leave
/// `is_moving` false.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Platform {
    pub is_moving: bool,
    pub move_speed: f64,
    pub move_direction: f64,
    pub move_distance: f64,
    pub start_x: f64,
    pub start_y: f64,
}

impl Platform {
    pub fn fixed_at(x: f64, y: f64) -> Self {
        Platform {
            start_x: x,
            start_y: y,
            ..Default::default()
        }
    }
}

/// Constant downward acceleration with a terminal (downward) speed cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gravity {
    pub force: f64,
    pub terminal: f64,
    pub is_affected: bool,
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity {
            force: 0.8,
            terminal: 20.0,
            is_affected: true,
        }
    }
}

/// Marks an entity as driven by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub enabled: bool,
}

impl Default for Input {
    fn default() -> Self {
        Input { enabled: true }
    }
}

/// The closed set of component types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Position,
    Velocity,
    Sprite,
    Collider,
    Player,
    Platform,
    Gravity,
    Input,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 8] = [
        ComponentKind::Position,
        ComponentKind::Velocity,
        ComponentKind::Sprite,
        ComponentKind::Collider,
        ComponentKind::Player,
        ComponentKind::Platform,
        ComponentKind::Gravity,
        ComponentKind::Input,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Position => "Position",
            ComponentKind::Velocity => "Velocity",
            ComponentKind::Sprite => "Sprite",
            ComponentKind::Collider => "Collider",
            ComponentKind::Player => "Player",
            ComponentKind::Platform => "Platform",
            ComponentKind::Gravity => "Gravity",
            ComponentKind::Input => "Input",
        }
    }
}

/// One component value of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Position(Position),
    Velocity(Velocity),
    Sprite(Sprite),
    Collider(Collider),
    Player(Player),
    Platform(Platform),
    Gravity(Gravity),
    Input(Input),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Position(_) => ComponentKind::Position,
            Component::Velocity(_) => ComponentKind::Velocity,
            Component::Sprite(_) => ComponentKind::Sprite,
            Component::Collider(_) => ComponentKind::Collider,
            Component::Player(_) => ComponentKind::Player,
            Component::Platform(_) => ComponentKind::Platform,
            Component::Gravity(_) => ComponentKind::Gravity,
            Component::Input(_) => ComponentKind::Input,
        }
    }
}

macro_rules! impl_from_component {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Component {
                fn from(value: $ty) -> Self {
                    Component::$ty(value)
                }
            }
        )*
    };
}

impl_from_component!(Position, Velocity, Sprite, Collider, Player, Platform, Gravity, Input);
