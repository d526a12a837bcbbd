// Gravity and movement integration

use crate::ecs::{ComponentKind, ComponentTables, EntityStore};

/// Accelerates every gravity-affected entity downward.
///
/// Vertical speed is capped at `Gravity.terminal` going down only; upward
/// speed (a jump) is never clamped.
pub fn apply_gravity(store: &mut EntityStore) {
    let entities = store.entities_with(&[ComponentKind::Velocity, ComponentKind::Gravity]);
    let ComponentTables {
        velocities,
        gravities,
        ..
    } = store.tables_mut();

    for entity in entities {
        let (Some(velocity), Some(gravity)) = (velocities.get_mut(entity), gravities.get(entity))
        else {
            unreachable!("entity {} matched gravity query without its components", entity);
        };

        if !gravity.is_affected {
            continue;
        }

        velocity.vy += gravity.force;
        if velocity.vy > gravity.terminal {
            velocity.vy = gravity.terminal;
        }
    }
}

/// Advances positions by one tick of velocity (explicit Euler).
pub fn apply_movement(store: &mut EntityStore) {
    let entities = store.entities_with(&[ComponentKind::Position, ComponentKind::Velocity]);
    let ComponentTables {
        positions,
        velocities,
        ..
    } = store.tables_mut();

    for entity in entities {
        let (Some(position), Some(velocity)) = (positions.get_mut(entity), velocities.get(entity))
        else {
            unreachable!("entity {} matched movement query without its components", entity);
        };

        position.x += velocity.vx;
        position.y += velocity.vy;
    }
}
