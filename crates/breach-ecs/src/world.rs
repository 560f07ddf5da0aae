use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::command::{Command, CommandQueue, CommandSender};
use crate::component::{AnyStorage, Component, SparseSet};
use crate::entity::{Entity, EntityAllocator};
use crate::events::{EcsEvent, EcsEventKind, EventBus, ListenerHandle};
use crate::query::EntityQuery;

/// Authoritative owner of all entities and components; the only type that
/// mutates the entity/component graph.
///
/// Mutation is either immediate (`*_immediate`, simulation thread only) or
/// deferred through the command queue and applied by `process_pending` at
/// the tick boundary. Operations on unknown entities log a warning and
/// become no-ops: a destroyed-but-still-referenced entity is an expected
/// race in game code, not a failure.
pub struct World {
    entities: EntityAllocator,
    storages: HashMap<TypeId, Box<dyn AnyStorage>>,
    queue: CommandQueue,
    events: EventBus,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            storages: HashMap::new(),
            queue: Arc::new(Mutex::new(Vec::new())),
            events: EventBus::new(),
        }
    }

    // ---- Entities ----

    /// Allocate a fresh entity with no components. Never fails.
    pub fn create_entity(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Whether the handle refers to a live entity.
    pub fn entity_exists(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Whether the entity is alive and not disabled.
    pub fn entity_enabled(&self, entity: Entity) -> bool {
        self.entities.is_enabled(entity)
    }

    /// Disable or re-enable an entity. Disabled entities keep their
    /// components but are skipped by systems that honor the flag.
    pub fn set_entity_enabled(&mut self, entity: Entity, enabled: bool) {
        if !self.entities.set_enabled(entity, enabled) {
            warn!("set_entity_enabled on unknown entity {entity}");
        }
    }

    /// Queue the entity for destruction at the next flush. Systems
    /// mid-iteration this tick are never invalidated.
    pub fn destroy_entity(&self, entity: Entity) {
        if !self.entities.is_alive(entity) {
            warn!("destroy_entity on unknown entity {entity}");
            return;
        }
        self.queue.lock().push(Command::Destroy(entity));
    }

    /// Destroy the entity now: run each attached component's disable and
    /// destroy hooks, broadcast a destroyed event per component, remove all
    /// storage entries, and free the slot.
    pub fn destroy_entity_immediate(&mut self, entity: Entity) {
        if !self.entities.is_alive(entity) {
            warn!("destroy_entity_immediate on unknown entity {entity}");
            return;
        }
        for storage in self.storages.values_mut() {
            if storage.destroy(entity.index, entity) {
                self.events.emit(&EcsEvent {
                    kind: EcsEventKind::Destroyed,
                    entity,
                    component: storage.type_name(),
                });
            }
        }
        self.entities.deallocate(entity);
    }

    // ---- Components ----

    fn storage_mut<T: Component>(&mut self) -> &mut SparseSet<T> {
        self.storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()))
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
            .expect("component type mismatch")
    }

    fn storage<T: Component>(&self) -> Option<&SparseSet<T>> {
        self.storages
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<SparseSet<T>>())
    }

    /// Queue a component insertion for the next flush.
    pub fn add_component<T: Component>(&self, entity: Entity, component: T) {
        self.queue.lock().push(Command::Add(Box::new(move |world| {
            world.add_component_immediate(entity, component);
        })));
    }

    /// Insert a component now. Replaces an existing component of the same
    /// type with a warning (the old instance is removed with full hook and
    /// event semantics). Runs the awake hook, then the enable hook, then
    /// broadcasts an added event.
    pub fn add_component_immediate<T: Component>(&mut self, entity: Entity, component: T) {
        if !self.entities.is_alive(entity) {
            warn!(
                "add_component_immediate of {} on unknown entity {entity}",
                std::any::type_name::<T>()
            );
            return;
        }
        if self.storage::<T>().map_or(false, |s| s.has(entity.index)) {
            warn!(
                "replacing existing {} on {entity}",
                std::any::type_name::<T>()
            );
            self.remove_component_immediate::<T>(entity);
        }
        let storage = self.storage_mut::<T>();
        storage.insert(entity.index, component);
        let slot = storage.slot_mut(entity.index).expect("slot just inserted");
        slot.value.on_awake(entity);
        if slot.enabled {
            slot.value.on_enable(entity);
        }
        self.events.emit(&EcsEvent {
            kind: EcsEventKind::Added,
            entity,
            component: std::any::type_name::<T>(),
        });
    }

    /// Queue a component removal for the next flush.
    pub fn remove_component<T: Component>(&self, entity: Entity) {
        self.queue
            .lock()
            .push(Command::Remove(Box::new(move |world| {
                world.remove_component_immediate::<T>(entity);
            })));
    }

    /// Remove a component now: disable hook (if enabled), destroy hook,
    /// removed event. Returns `true` if a component was removed.
    pub fn remove_component_immediate<T: Component>(&mut self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            warn!(
                "remove_component_immediate of {} on unknown entity {entity}",
                std::any::type_name::<T>()
            );
            return false;
        }
        let Some(storage) = self.storages.get_mut(&TypeId::of::<T>()) else {
            warn!("remove_component_immediate of unregistered {}", std::any::type_name::<T>());
            return false;
        };
        if !storage.destroy(entity.index, entity) {
            warn!(
                "remove_component_immediate: no {} on {entity}",
                std::any::type_name::<T>()
            );
            return false;
        }
        self.events.emit(&EcsEvent {
            kind: EcsEventKind::Removed,
            entity,
            component: std::any::type_name::<T>(),
        });
        true
    }

    /// O(1) component lookup. `None` for dead entities or absent
    /// components; never panics.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.storage::<T>()?.get(entity.index)
    }

    /// Mutable counterpart of `get_component`.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()?
            .get_mut(entity.index)
    }

    /// Whether the entity carries a component of this type.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// Whether the component instance is present and enabled.
    pub fn component_enabled<T: Component>(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
            && self
                .storage::<T>()
                .map_or(false, |s| AnyStorage::is_enabled(s, entity.index))
    }

    /// Flip a component's enabled flag, running the enable/disable hook and
    /// broadcasting the matching event. Idempotent.
    pub fn set_component_enabled<T: Component>(&mut self, entity: Entity, enabled: bool) {
        if !self.entities.is_alive(entity) {
            warn!(
                "set_component_enabled of {} on unknown entity {entity}",
                std::any::type_name::<T>()
            );
            return;
        }
        let Some(storage) = self.storages.get_mut(&TypeId::of::<T>()) else {
            return;
        };
        if storage.set_enabled(entity.index, entity, enabled) {
            self.events.emit(&EcsEvent {
                kind: if enabled {
                    EcsEventKind::Enabled
                } else {
                    EcsEventKind::Disabled
                },
                entity,
                component: std::any::type_name::<T>(),
            });
        }
    }

    // ---- Tags ----

    /// Tag a component instance. Returns `false` if the component is absent
    /// or already carries the tag.
    pub fn add_tag<T: Component>(&mut self, entity: Entity, tag: &str) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        self.storages
            .get_mut(&TypeId::of::<T>())
            .map_or(false, |s| s.add_tag(entity.index, tag))
    }

    /// Remove a tag from a component instance.
    pub fn remove_tag<T: Component>(&mut self, entity: Entity, tag: &str) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        self.storages
            .get_mut(&TypeId::of::<T>())
            .map_or(false, |s| s.remove_tag(entity.index, tag))
    }

    /// Whether the entity's component of this type carries the tag.
    pub fn has_tag<T: Component>(&self, entity: Entity, tag: &str) -> bool {
        self.entities.is_alive(entity)
            && self
                .storages
                .get(&TypeId::of::<T>())
                .map_or(false, |s| s.has_tag(entity.index, tag))
    }

    /// Entities where any component carries the tag.
    pub fn entities_tagged(&self, tag: &str) -> Vec<Entity> {
        self.entities
            .iter_alive()
            .filter(|e| {
                self.storages
                    .values()
                    .any(|s| s.has(e.index) && s.has_tag(e.index, tag))
            })
            .collect()
    }

    // ---- Queries ----

    /// Snapshot of the reverse index for a component type. Order is
    /// unspecified and must not be relied upon.
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        let Some(storage) = self.storage::<T>() else {
            return Vec::new();
        };
        storage
            .entity_indices()
            .iter()
            .filter_map(|&index| self.entities.entity_at(index))
            .collect()
    }

    /// Evaluate a composable predicate against every alive entity.
    /// O(alive entities x predicate clauses).
    pub fn entities_matching(&self, query: &EntityQuery) -> Vec<Entity> {
        let mut out = Vec::new();
        'entities: for entity in self.entities.iter_alive() {
            let index = entity.index;
            for tid in &query.required {
                if !self.storages.get(tid).map_or(false, |s| s.has(index)) {
                    continue 'entities;
                }
            }
            for tid in &query.excluded {
                if self.storages.get(tid).map_or(false, |s| s.has(index)) {
                    continue 'entities;
                }
            }
            for tag in &query.required_tags {
                if !self
                    .storages
                    .values()
                    .any(|s| s.has(index) && s.has_tag(index, tag))
                {
                    continue 'entities;
                }
            }
            for tag in &query.excluded_tags {
                if self
                    .storages
                    .values()
                    .any(|s| s.has(index) && s.has_tag(index, tag))
                {
                    continue 'entities;
                }
            }
            out.push(entity);
        }
        out
    }

    // ---- Deferred operations ----

    /// Handle for enqueueing deferred mutations from any thread.
    pub fn commands(&self) -> CommandSender {
        CommandSender::new(self.queue.clone())
    }

    /// Drain the command queue: destroys first (so a deferred add against a
    /// doomed entity surfaces as an unknown-entity warning in the same
    /// flush), then adds, then removes. Must run once per tick before any
    /// system reads the world. Returns the number of commands applied.
    pub fn process_pending(&mut self) -> usize {
        let drained: Vec<Command> = std::mem::take(&mut *self.queue.lock());
        let count = drained.len();

        let mut adds = Vec::new();
        let mut removes = Vec::new();
        for command in drained {
            match command {
                Command::Destroy(entity) => {
                    // A double-queued destroy is an expected race; skip
                    // dead entities without the diagnostic.
                    if self.entities.is_alive(entity) {
                        self.destroy_entity_immediate(entity);
                    }
                }
                Command::Add(apply) => adds.push(apply),
                Command::Remove(apply) => removes.push(apply),
            }
        }
        for apply in adds {
            apply(self);
        }
        for apply in removes {
            apply(self);
        }
        count
    }

    // ---- Events ----

    /// Register a lifecycle-event listener. The handle revokes it.
    pub fn subscribe(&mut self, listener: impl FnMut(&EcsEvent) + Send + 'static) -> ListenerHandle {
        self.events.subscribe(Box::new(listener))
    }

    /// Revoke a listener registration. Stale handles warn and return false.
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        self.events.unsubscribe(handle)
    }

    /// Destroy every entity immediately and drop all queued commands.
    /// Listener registrations survive a reset.
    pub fn clear(&mut self) {
        let alive: Vec<Entity> = self.entities.iter_alive().collect();
        for entity in alive {
            self.destroy_entity_immediate(entity);
        }
        self.storages.clear();
        self.queue.lock().clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
