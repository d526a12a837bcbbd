/// Collision detection and response
///
/// This module detects overlaps between every pair of entities carrying a
/// `Position` and a `Collider`, and pushes the player out of solid platforms.
///
/// # Algorithm
///
/// 1. Enumerate each unordered pair `(i, j)` with `i < j` once, ascending by id
/// 2. Test the pair's boxes with a strict AABB overlap check
/// 3. If both colliders are solid and the pair is player-vs-platform, push the
///    player out along the axis of least penetration (vertical on ties)
///
/// Pairs are resolved one at a time, so a push applied to the player is
/// visible to every later pair in the same pass.
use tracing::trace;

use crate::ecs::{Collider, ComponentKind, ComponentTables, Entity, EntityStore, Position};

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Bounds {
            left,
            top,
            width,
            height,
        }
    }

    /// World-space box of a collider attached at `position`.
    pub fn of(position: &Position, collider: &Collider) -> Self {
        Bounds {
            left: position.x + collider.offset_x,
            top: position.y + collider.offset_y,
            width: collider.width,
            height: collider.height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Checks if two boxes overlap.
///
/// Both axis intervals must strictly intersect: boxes that only share an
/// edge do not overlap.
pub fn aabb_intersect(a: &Bounds, b: &Bounds) -> bool {
    let x_overlap = a.left < b.right() && a.right() > b.left;
    let y_overlap = a.top < b.bottom() && a.bottom() > b.top;

    x_overlap && y_overlap
}

/// Penetration depth of `mover` into `obstacle` on each axis.
///
/// Returns `(overlap_x, overlap_y)`, each the smaller of the two ways the
/// boxes could be separated on that axis. Only meaningful for intersecting
/// boxes.
pub fn calculate_overlap(mover: &Bounds, obstacle: &Bounds) -> (f64, f64) {
    let overlap_x = (mover.right() - obstacle.left).min(obstacle.right() - mover.left);
    let overlap_y = (mover.bottom() - obstacle.top).min(obstacle.bottom() - mover.top);
    (overlap_x, overlap_y)
}

/// How a player/platform contact was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Pushed out sideways; horizontal velocity zeroed.
    Horizontal,
    /// Snapped onto the platform top; now grounded.
    Landed,
    /// Snapped under the platform bottom. Grounded flag untouched.
    HitCeiling,
}

/// Counters from one collision pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionStats {
    pub pairs_tested: usize,
    pub overlaps: usize,
    pub resolved: usize,
}

/// Runs one detection + resolution pass over the store.
pub fn resolve_collisions(store: &mut EntityStore) -> CollisionStats {
    let entities = store.entities_with(&[ComponentKind::Position, ComponentKind::Collider]);
    let tables = store.tables_mut();
    let mut stats = CollisionStats::default();

    for (i, &a) in entities.iter().enumerate() {
        for &b in &entities[i + 1..] {
            stats.pairs_tested += 1;

            let (bounds_a, bounds_b) = (collision_bounds(tables, a), collision_bounds(tables, b));
            if !aabb_intersect(&bounds_a, &bounds_b) {
                continue;
            }
            stats.overlaps += 1;

            if let Some(resolution) = resolve_pair(tables, a, b) {
                trace!(?resolution, "resolved contact {} / {}", a, b);
                stats.resolved += 1;
            }
        }
    }

    stats
}

fn collision_bounds(tables: &ComponentTables, entity: Entity) -> Bounds {
    let (Some(position), Some(collider)) =
        (tables.positions.get(entity), tables.colliders.get(entity))
    else {
        unreachable!("entity {} queried for collision without Position/Collider", entity);
    };
    Bounds::of(position, collider)
}

/// Resolves an overlapping pair if it is a solid player-vs-platform contact.
fn resolve_pair(tables: &mut ComponentTables, a: Entity, b: Entity) -> Option<Resolution> {
    let solid = |e: Entity| tables.colliders.get(e).is_some_and(|c| c.is_solid);
    if !solid(a) || !solid(b) {
        return None;
    }

    let is_player = |e: Entity| tables.players.contains(e);
    let is_platform = |e: Entity| tables.platforms.contains(e);
    let (player, platform) = if is_player(a) && is_platform(b) {
        (a, b)
    } else if is_player(b) && is_platform(a) {
        (b, a)
    } else {
        // Player-vs-player and platform-vs-platform overlaps are ignored
        return None;
    };

    resolve_player_platform(tables, player, platform)
}

fn resolve_player_platform(
    tables: &mut ComponentTables,
    player: Entity,
    platform: Entity,
) -> Option<Resolution> {
    let player_collider = *tables.colliders.get(player)?;
    let platform_position = *tables.positions.get(platform)?;
    let platform_bounds = collision_bounds(tables, platform);
    let player_bounds = collision_bounds(tables, player);

    let (overlap_x, overlap_y) = calculate_overlap(&player_bounds, &platform_bounds);

    let ComponentTables {
        positions,
        velocities,
        players,
        ..
    } = tables;
    // A player without velocity cannot be resolved
    let velocity = velocities.get_mut(player)?;
    let attributes = players.get_mut(player)?;
    let position = positions.get_mut(player)?;

    if overlap_x < overlap_y {
        if position.x < platform_position.x {
            position.x = platform_bounds.left - player_collider.width - player_collider.offset_x;
        } else {
            position.x = platform_bounds.right() - player_collider.offset_x;
        }
        velocity.vx = 0.0;
        Some(Resolution::Horizontal)
    } else if position.y < platform_position.y {
        position.y = platform_bounds.top - player_collider.height - player_collider.offset_y;
        velocity.vy = 0.0;
        attributes.is_grounded = true;
        Some(Resolution::Landed)
    } else {
        position.y = platform_bounds.bottom() - player_collider.offset_y;
        velocity.vy = 0.0;
        Some(Resolution::HitCeiling)
    }
}
