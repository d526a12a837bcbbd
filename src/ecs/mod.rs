// Entity/component storage
//
// - components.rs: the closed set of component data records
// - store.rs: EntityStore, per-type component tables, entity ids

pub mod components;
pub mod store;

pub use components::{
    Collider, Component, ComponentKind, Gravity, Input, Platform, Player, Position, Sprite,
    Velocity,
};
pub use store::{ComponentTable, ComponentTables, ComponentType, Entity, EntityStore};
