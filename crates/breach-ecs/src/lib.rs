//! Breach ECS - entity/component runtime
//!
//! A custom ECS built for the Breach gameplay core. Generational indices
//! for entities, sparse-set storage per component type, a deferred command
//! queue flushed once per tick, and an event bus broadcasting component
//! lifecycle changes to registered listeners.
//!
//! Mutation happens either immediately on the simulation thread or through
//! the command queue; queued operations are invisible to every query until
//! `World::process_pending` drains them at the tick boundary.

mod command;
mod component;
mod entity;
mod events;
mod query;
mod world;

pub use command::CommandSender;
pub use component::Component;
pub use entity::Entity;
pub use events::{EcsEvent, EcsEventKind, ListenerHandle};
pub use query::EntityQuery;
pub use world::World;
