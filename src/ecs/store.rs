//! Entity store
//!
//! Arena-style storage: one `ComponentTable` per component type, each a
//! slot vector indexed by entity id relative to the table's base id. Systems borrow the individual
//! tables they touch through `EntityStore::tables_mut`, so a pass can hold
//! `&mut` positions next to `&` colliders without any runtime locking.
//!
//! # Invariants
//!
//! - Ids start at 1, increase monotonically and are never reused.
//! - Every id present in a table is also in the live set.
//! - `destroy_entity` purges the id from every table in the same call.
//! - A table holds at most one value per entity.
//! - `clear` rebases every table on the next unissued id, so slot vectors
//!   only ever span ids allocated since the last clear.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

use super::components::{
    Collider, Component, ComponentKind, Gravity, Input, Platform, Player, Position, Sprite,
    Velocity,
};

/// Opaque entity identifier. Never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl Entity {
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Dense per-type storage indexed by entity id.
///
/// Slot `i` holds the component of entity `base + i`.
#[derive(Debug, Clone)]
pub struct ComponentTable<T> {
    slots: Vec<Option<T>>,
    base: u32,
    count: usize,
}

impl<T> Default for ComponentTable<T> {
    fn default() -> Self {
        ComponentTable {
            slots: Vec::new(),
            base: 0,
            count: 0,
        }
    }
}

impl<T> ComponentTable<T> {
    fn slot(&self, entity: Entity) -> Option<usize> {
        entity.0.checked_sub(self.base).map(|offset| offset as usize)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(self.slot(entity)?).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = self.slot(entity)?;
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Allocated slots, occupied or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Iterate `(entity, value)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        let base = self.base;
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(slot, value)| {
                value.as_ref().map(|v| (Entity(base + slot as u32), v))
            })
    }

    /// Overwrites any existing value, returning it.
    ///
    /// Ids below the table's base belong to cleared entities and are ignored.
    pub(crate) fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        let slot = self.slot(entity)?;
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
        let previous = self.slots[slot].replace(value);
        if previous.is_none() {
            self.count += 1;
        }
        previous
    }

    pub(crate) fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slot(entity)?;
        let removed = self.slots.get_mut(slot).and_then(Option::take);
        if removed.is_some() {
            self.count -= 1;
        }
        removed
    }

    /// Drops every slot and starts indexing at `base`.
    fn rebase(&mut self, base: u32) {
        self.slots = Vec::new();
        self.base = base;
        self.count = 0;
    }
}

/// All component tables. Fields are public so a system can split-borrow
/// exactly the tables it declares.
#[derive(Debug, Clone, Default)]
pub struct ComponentTables {
    pub positions: ComponentTable<Position>,
    pub velocities: ComponentTable<Velocity>,
    pub sprites: ComponentTable<Sprite>,
    pub colliders: ComponentTable<Collider>,
    pub players: ComponentTable<Player>,
    pub platforms: ComponentTable<Platform>,
    pub gravities: ComponentTable<Gravity>,
    pub inputs: ComponentTable<Input>,
}

impl ComponentTables {
    fn contains(&self, entity: Entity, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Position => self.positions.contains(entity),
            ComponentKind::Velocity => self.velocities.contains(entity),
            ComponentKind::Sprite => self.sprites.contains(entity),
            ComponentKind::Collider => self.colliders.contains(entity),
            ComponentKind::Player => self.players.contains(entity),
            ComponentKind::Platform => self.platforms.contains(entity),
            ComponentKind::Gravity => self.gravities.contains(entity),
            ComponentKind::Input => self.inputs.contains(entity),
        }
    }

    fn count(&self, kind: ComponentKind) -> usize {
        match kind {
            ComponentKind::Position => self.positions.len(),
            ComponentKind::Velocity => self.velocities.len(),
            ComponentKind::Sprite => self.sprites.len(),
            ComponentKind::Collider => self.colliders.len(),
            ComponentKind::Player => self.players.len(),
            ComponentKind::Platform => self.platforms.len(),
            ComponentKind::Gravity => self.gravities.len(),
            ComponentKind::Input => self.inputs.len(),
        }
    }

    fn insert(&mut self, entity: Entity, component: Component) {
        match component {
            Component::Position(c) => {
                self.positions.insert(entity, c);
            }
            Component::Velocity(c) => {
                self.velocities.insert(entity, c);
            }
            Component::Sprite(c) => {
                self.sprites.insert(entity, c);
            }
            Component::Collider(c) => {
                self.colliders.insert(entity, c);
            }
            Component::Player(c) => {
                self.players.insert(entity, c);
            }
            Component::Platform(c) => {
                self.platforms.insert(entity, c);
            }
            Component::Gravity(c) => {
                self.gravities.insert(entity, c);
            }
            Component::Input(c) => {
                self.inputs.insert(entity, c);
            }
        }
    }

    fn get_cloned(&self, entity: Entity, kind: ComponentKind) -> Option<Component> {
        match kind {
            ComponentKind::Position => self.positions.get(entity).copied().map(Component::from),
            ComponentKind::Velocity => self.velocities.get(entity).copied().map(Component::from),
            ComponentKind::Sprite => self.sprites.get(entity).cloned().map(Component::from),
            ComponentKind::Collider => self.colliders.get(entity).copied().map(Component::from),
            ComponentKind::Player => self.players.get(entity).copied().map(Component::from),
            ComponentKind::Platform => self.platforms.get(entity).copied().map(Component::from),
            ComponentKind::Gravity => self.gravities.get(entity).copied().map(Component::from),
            ComponentKind::Input => self.inputs.get(entity).copied().map(Component::from),
        }
    }

    fn rebase(&mut self, base: u32) {
        self.positions.rebase(base);
        self.velocities.rebase(base);
        self.sprites.rebase(base);
        self.colliders.rebase(base);
        self.players.rebase(base);
        self.platforms.rebase(base);
        self.gravities.rebase(base);
        self.inputs.rebase(base);
    }

    fn purge(&mut self, entity: Entity) {
        self.positions.remove(entity);
        self.velocities.remove(entity);
        self.sprites.remove(entity);
        self.colliders.remove(entity);
        self.players.remove(entity);
        self.platforms.remove(entity);
        self.gravities.remove(entity);
        self.inputs.remove(entity);
    }
}

/// Typed access to the table holding a component type.
pub trait ComponentType: Sized {
    const KIND: ComponentKind;

    fn table(tables: &ComponentTables) -> &ComponentTable<Self>;
    fn table_mut(tables: &mut ComponentTables) -> &mut ComponentTable<Self>;
}

macro_rules! impl_component_type {
    ($($ty:ident => $field:ident),* $(,)?) => {
        $(
            impl ComponentType for $ty {
                const KIND: ComponentKind = ComponentKind::$ty;

                fn table(tables: &ComponentTables) -> &ComponentTable<Self> {
                    &tables.$field
                }

                fn table_mut(tables: &mut ComponentTables) -> &mut ComponentTable<Self> {
                    &mut tables.$field
                }
            }
        )*
    };
}

impl_component_type!(
    Position => positions,
    Velocity => velocities,
    Sprite => sprites,
    Collider => colliders,
    Player => players,
    Platform => platforms,
    Gravity => gravities,
    Input => inputs,
);

/// Registry of live entities plus their components.
#[derive(Debug, Clone)]
pub struct EntityStore {
    next_id: u32,
    live: BTreeSet<Entity>,
    tables: ComponentTables,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        EntityStore {
            next_id: 1,
            live: BTreeSet::new(),
            tables: ComponentTables::default(),
        }
    }

    /// Allocates a fresh id. Ids are never reused.
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        self.live.insert(entity);
        entity
    }

    /// Removes the entity and every component attached to it.
    ///
    /// Returns false if the entity was not alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let was_alive = self.live.remove(&entity);
        self.tables.purge(entity);
        was_alive
    }

    /// Destroys every live entity and releases the table slots.
    pub fn clear(&mut self) {
        self.live.clear();
        self.tables.rebase(self.next_id);
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.live.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.live.iter().copied()
    }

    /// Attaches a component, replacing any existing one of the same type.
    ///
    /// Components for dead or never-allocated ids are dropped.
    pub fn add_component(&mut self, entity: Entity, component: impl Into<Component>) {
        let component = component.into();
        if !self.is_alive(entity) {
            warn!(
                "ignoring {} component for dead entity {}",
                component.kind().name(),
                entity
            );
            return;
        }
        self.tables.insert(entity, component);
    }

    pub fn get_component(&self, entity: Entity, kind: ComponentKind) -> Option<Component> {
        self.tables.get_cloned(entity, kind)
    }

    pub fn has_component(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.tables.contains(entity, kind)
    }

    pub fn get<T: ComponentType>(&self, entity: Entity) -> Option<&T> {
        T::table(&self.tables).get(entity)
    }

    pub fn get_mut<T: ComponentType>(&mut self, entity: Entity) -> Option<&mut T> {
        T::table_mut(&mut self.tables).get_mut(entity)
    }

    pub fn has<T: ComponentType>(&self, entity: Entity) -> bool {
        T::table(&self.tables).contains(entity)
    }

    pub fn remove<T: ComponentType>(&mut self, entity: Entity) -> Option<T> {
        T::table_mut(&mut self.tables).remove(entity)
    }

    /// Live entities carrying every listed component type, ascending by id.
    pub fn entities_with(&self, kinds: &[ComponentKind]) -> Vec<Entity> {
        self.live
            .iter()
            .copied()
            .filter(|&entity| kinds.iter().all(|&kind| self.tables.contains(entity, kind)))
            .collect()
    }

    pub fn entities_with_one(&self, kind: ComponentKind) -> Vec<Entity> {
        self.entities_with(&[kind])
    }

    pub fn tables(&self) -> &ComponentTables {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut ComponentTables {
        &mut self.tables
    }

    /// Number of stored components per type.
    pub fn component_counts(&self) -> Vec<(ComponentKind, usize)> {
        ComponentKind::ALL
            .iter()
            .map(|&kind| (kind, self.tables.count(kind)))
            .collect()
    }

    pub fn log_summary(&self) {
        debug!(entities = self.live.len(), "entity store summary");
        for (kind, count) in self.component_counts() {
            debug!(component = kind.name(), count, "component table");
        }
    }
}
