// Input system: keyboard → player velocity and jumps

use crate::ecs::{ComponentKind, ComponentTables, EntityStore};
use crate::input::{Action, InputSnapshot, KeyBindings};

/// Applies held movement keys and jump triggers to every controllable player.
///
/// Horizontal speed is set outright each tick (left wins if both directions
/// are held). A jump fires only when the jump action is held, the player is
/// grounded and the cooldown has run out. The cooldown ticks down once per
/// call before the jump check, whether or not jump is held.
pub fn run(
    store: &mut EntityStore,
    input: &dyn InputSnapshot,
    bindings: &KeyBindings,
    jump_cooldown_ticks: i32,
) {
    let entities = store.entities_with(&[
        ComponentKind::Player,
        ComponentKind::Velocity,
        ComponentKind::Input,
    ]);
    let ComponentTables {
        players,
        velocities,
        inputs,
        ..
    } = store.tables_mut();

    let left = bindings.action_held(input, Action::MoveLeft);
    let right = bindings.action_held(input, Action::MoveRight);
    let jump = bindings.action_held(input, Action::Jump);

    for entity in entities {
        let (Some(player), Some(velocity), Some(control)) = (
            players.get_mut(entity),
            velocities.get_mut(entity),
            inputs.get(entity),
        ) else {
            unreachable!("entity {} matched input query without its components", entity);
        };

        if !control.enabled {
            continue;
        }

        velocity.vx = if left {
            -player.move_speed
        } else if right {
            player.move_speed
        } else {
            0.0
        };

        if velocity.vx < 0.0 {
            player.facing_right = false;
        } else if velocity.vx > 0.0 {
            player.facing_right = true;
        }

        if player.jump_cooldown > 0 {
            player.jump_cooldown -= 1;
        }

        if jump && player.is_grounded && player.jump_cooldown <= 0 {
            velocity.vy = -player.jump_power;
            player.is_grounded = false;
            player.jump_cooldown = jump_cooldown_ticks;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Entity, Input, Player, Velocity};
    use crate::input::{InputState, Key};

    const COOLDOWN: i32 = 10;

    fn spawn_controllable(store: &mut EntityStore, grounded: bool) -> Entity {
        let e = store.create_entity();
        store.add_component(e, Velocity::default());
        store.add_component(
            e,
            Player {
                is_grounded: grounded,
                ..Player::default()
            },
        );
        store.add_component(e, Input { enabled: true });
        e
    }

    fn held(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        input.begin_frame(keys.iter().copied());
        input
    }

    #[test]
    fn test_horizontal_movement() {
        let mut store = EntityStore::new();
        let e = spawn_controllable(&mut store, true);
        let bindings = KeyBindings::default();

        run(&mut store, &held(&[Key::A]), &bindings, COOLDOWN);
        assert_eq!(store.get::<Velocity>(e).unwrap().vx, -4.0);
        assert!(!store.get::<Player>(e).unwrap().facing_right);

        run(&mut store, &held(&[Key::Right]), &bindings, COOLDOWN);
        assert_eq!(store.get::<Velocity>(e).unwrap().vx, 4.0);
        assert!(store.get::<Player>(e).unwrap().facing_right);

        run(&mut store, &held(&[]), &bindings, COOLDOWN);
        assert_eq!(store.get::<Velocity>(e).unwrap().vx, 0.0);
        // Facing is kept when standing still
        assert!(store.get::<Player>(e).unwrap().facing_right);
    }

    #[test]
    fn test_left_wins_when_both_held() {
        let mut store = EntityStore::new();
        let e = spawn_controllable(&mut store, true);

        run(&mut store, &held(&[Key::Left, Key::Right]), &KeyBindings::default(), COOLDOWN);
        assert_eq!(store.get::<Velocity>(e).unwrap().vx, -4.0);
    }

    #[test]
    fn test_jump_then_cooldown_blocks_next_tick() {
        let mut store = EntityStore::new();
        let e = spawn_controllable(&mut store, true);
        let bindings = KeyBindings::default();
        let jump = held(&[Key::Space]);

        run(&mut store, &jump, &bindings, COOLDOWN);
        let player = *store.get::<Player>(e).unwrap();
        assert_eq!(store.get::<Velocity>(e).unwrap().vy, -15.0);
        assert!(!player.is_grounded);
        assert_eq!(player.jump_cooldown, 10);

        // Landed again, but still cooling down
        store.get_mut::<Player>(e).unwrap().is_grounded = true;
        store.get_mut::<Velocity>(e).unwrap().vy = 0.0;
        run(&mut store, &jump, &bindings, COOLDOWN);

        assert_eq!(store.get::<Velocity>(e).unwrap().vy, 0.0);
        assert_eq!(store.get::<Player>(e).unwrap().jump_cooldown, 9);
    }

    #[test]
    fn test_jump_requires_grounded() {
        let mut store = EntityStore::new();
        let e = spawn_controllable(&mut store, false);

        run(&mut store, &held(&[Key::W]), &KeyBindings::default(), COOLDOWN);
        assert_eq!(store.get::<Velocity>(e).unwrap().vy, 0.0);
    }

    #[test]
    fn test_cooldown_decrements_without_jump_key() {
        let mut store = EntityStore::new();
        let e = spawn_controllable(&mut store, true);
        store.get_mut::<Player>(e).unwrap().jump_cooldown = 3;
        let bindings = KeyBindings::default();

        for _ in 0..5 {
            run(&mut store, &held(&[]), &bindings, COOLDOWN);
        }
        assert_eq!(store.get::<Player>(e).unwrap().jump_cooldown, 0);
    }

    #[test]
    fn test_last_cooldown_tick_allows_jump() {
        let mut store = EntityStore::new();
        let e = spawn_controllable(&mut store, true);
        let bindings = KeyBindings::default();
        let jump = held(&[Key::Space]);

        // Cooldown 2 ticks down to 1: still blocked
        store.get_mut::<Player>(e).unwrap().jump_cooldown = 2;
        run(&mut store, &jump, &bindings, COOLDOWN);
        assert_eq!(store.get::<Velocity>(e).unwrap().vy, 0.0);
        assert_eq!(store.get::<Player>(e).unwrap().jump_cooldown, 1);

        // Cooldown 1 reaches 0 before the check, so the jump fires this tick
        run(&mut store, &jump, &bindings, COOLDOWN);
        assert_eq!(store.get::<Velocity>(e).unwrap().vy, -15.0);
        assert_eq!(store.get::<Player>(e).unwrap().jump_cooldown, COOLDOWN);
    }

    #[test]
    fn test_jump_spacing_is_cooldown_ticks() {
        let mut store = EntityStore::new();
        let e = spawn_controllable(&mut store, true);
        let bindings = KeyBindings::default();
        let jump = held(&[Key::Space]);

        let mut jump_ticks = Vec::new();
        for tick in 0..25 {
            store.get_mut::<Player>(e).unwrap().is_grounded = true;
            store.get_mut::<Velocity>(e).unwrap().vy = 0.0;
            run(&mut store, &jump, &bindings, COOLDOWN);
            if store.get::<Velocity>(e).unwrap().vy < 0.0 {
                jump_ticks.push(tick);
            }
        }
        assert_eq!(jump_ticks, vec![0, 10, 20]);
    }

    #[test]
    fn test_disabled_input_is_skipped() {
        let mut store = EntityStore::new();
        let e = spawn_controllable(&mut store, true);
        store.get_mut::<Input>(e).unwrap().enabled = false;
        store.get_mut::<Velocity>(e).unwrap().vx = 2.5;

        run(&mut store, &held(&[Key::Left, Key::Space]), &KeyBindings::default(), COOLDOWN);
        assert_eq!(store.get::<Velocity>(e), Some(&Velocity::new(2.5, 0.0)));
    }
}
