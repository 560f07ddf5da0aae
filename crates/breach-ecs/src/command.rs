use std::sync::Arc;

use parking_lot::Mutex;

use crate::component::Component;
use crate::entity::Entity;
use crate::world::World;

/// A deferred world mutation. `World::process_pending` drains the queue in
/// destroy -> add -> remove order.
pub(crate) enum Command {
    Destroy(Entity),
    Add(Box<dyn FnOnce(&mut World) + Send>),
    Remove(Box<dyn FnOnce(&mut World) + Send>),
}

pub(crate) type CommandQueue = Arc<Mutex<Vec<Command>>>;

/// Clone-able handle for enqueueing deferred mutations from any thread.
///
/// The queue is the only cross-thread entry point into the ECS: producer
/// threads (input, networking) push commands here, and nothing they push is
/// visible to queries until the simulation thread drains the queue at the
/// tick boundary.
#[derive(Clone)]
pub struct CommandSender {
    queue: CommandQueue,
}

impl CommandSender {
    pub(crate) fn new(queue: CommandQueue) -> Self {
        Self { queue }
    }

    /// Queue an entity for destruction at the next flush.
    pub fn destroy_entity(&self, entity: Entity) {
        self.queue.lock().push(Command::Destroy(entity));
    }

    /// Queue a component insertion. Applied with immediate-add semantics at
    /// the next flush; an entity destroyed earlier in the same flush
    /// surfaces as an unknown-entity warning.
    pub fn add_component<T: Component>(&self, entity: Entity, component: T) {
        self.queue.lock().push(Command::Add(Box::new(move |world| {
            world.add_component_immediate(entity, component);
        })));
    }

    /// Queue a component removal.
    pub fn remove_component<T: Component>(&self, entity: Entity) {
        self.queue
            .lock()
            .push(Command::Remove(Box::new(move |world| {
                world.remove_component_immediate::<T>(entity);
            })));
    }

    /// Number of commands waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}
