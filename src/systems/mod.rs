//! Per-tick systems pipeline
//!
//! A system is a stateless pass over the entity store. The pipeline runs
//! its systems strictly in sequence, so each system sees the complete
//! result of the ones before it and the render pass only sees the store
//! after the whole tick has run.
//!
//! # Order
//!
//! 1. `Input`     - keys → player velocity, jumps
//! 2. `Gravity`   - downward acceleration with terminal cap
//! 3. `Movement`  - position += velocity
//! 4. `Collision` - overlap detection and player/platform resolution

pub mod input;
pub mod physics;

use tracing::trace;

use crate::collision;
use crate::ecs::EntityStore;
use crate::input::{InputSnapshot, KeyBindings};

/// Everything a system may read besides the store.
pub struct SystemContext<'a> {
    pub input: &'a dyn InputSnapshot,
    pub bindings: &'a KeyBindings,
    pub jump_cooldown_ticks: i32,
}

/// The closed set of systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum System {
    Input,
    Gravity,
    Movement,
    Collision,
}

impl System {
    pub fn run(&self, store: &mut EntityStore, context: &SystemContext) {
        match self {
            System::Input => input::run(
                store,
                context.input,
                context.bindings,
                context.jump_cooldown_ticks,
            ),
            System::Gravity => physics::apply_gravity(store),
            System::Movement => physics::apply_movement(store),
            System::Collision => {
                let stats = collision::resolve_collisions(store);
                trace!(
                    pairs = stats.pairs_tested,
                    overlaps = stats.overlaps,
                    resolved = stats.resolved,
                    "collision pass"
                );
            }
        }
    }
}

/// Ordered list of systems run once per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    systems: Vec<System>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pipeline {
    /// Input → Gravity → Movement → Collision.
    pub fn standard() -> Self {
        Pipeline {
            systems: vec![
                System::Input,
                System::Gravity,
                System::Movement,
                System::Collision,
            ],
        }
    }

    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    /// Runs every system once, in order.
    pub fn run(&self, store: &mut EntityStore, context: &SystemContext) {
        for system in &self.systems {
            system.run(store, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Collider, Gravity, Input, Platform, Player, Position, Velocity};
    use crate::input::InputState;

    #[test]
    fn test_standard_order() {
        assert_eq!(
            Pipeline::standard().systems(),
            &[
                System::Input,
                System::Gravity,
                System::Movement,
                System::Collision
            ]
        );
    }

    #[test]
    fn test_one_tick_lands_falling_player() {
        let mut store = EntityStore::new();
        let player = store.create_entity();
        store.add_component(player, Position::new(100.0, 490.0));
        // One more gravity step takes vy from 4.2 to 5.0
        store.add_component(player, Velocity::new(0.0, 4.2));
        store.add_component(player, Collider::solid(48.0, 48.0));
        store.add_component(player, Player::default());
        store.add_component(player, Gravity::default());
        store.add_component(player, Input::default());

        let ground = store.create_entity();
        store.add_component(ground, Position::new(0.0, 540.0));
        store.add_component(ground, Collider::solid(800.0, 20.0));
        store.add_component(ground, Platform::fixed_at(0.0, 540.0));

        let input = InputState::new();
        let bindings = KeyBindings::default();
        let context = SystemContext {
            input: &input,
            bindings: &bindings,
            jump_cooldown_ticks: 10,
        };
        Pipeline::standard().run(&mut store, &context);

        assert_eq!(store.get::<Position>(player).unwrap().y, 492.0);
        assert_eq!(store.get::<Velocity>(player).unwrap().vy, 0.0);
        assert!(store.get::<Player>(player).unwrap().is_grounded);
    }

    #[test]
    fn test_resting_player_is_resolved_every_tick() {
        let mut store = EntityStore::new();
        let player = store.create_entity();
        store.add_component(player, Position::new(100.0, 492.0));
        store.add_component(player, Velocity::default());
        store.add_component(player, Collider::solid(48.0, 48.0));
        store.add_component(player, Player::default());
        store.add_component(player, Gravity::default());

        let ground = store.create_entity();
        store.add_component(ground, Position::new(0.0, 540.0));
        store.add_component(ground, Collider::solid(800.0, 20.0));
        store.add_component(ground, Platform::fixed_at(0.0, 540.0));

        let input = InputState::new();
        let bindings = KeyBindings::default();
        let context = SystemContext {
            input: &input,
            bindings: &bindings,
            jump_cooldown_ticks: 10,
        };
        for _ in 0..3 {
            System::Gravity.run(&mut store, &context);
            System::Movement.run(&mut store, &context);
            // Gravity sinks the player 0.8px each tick, so there is always
            // a contact to resolve
            assert_eq!(collision::resolve_collisions(&mut store).resolved, 1);
            assert_eq!(store.get::<Position>(player).unwrap().y, 492.0);
        }
    }
}
