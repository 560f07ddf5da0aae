use std::any::Any;

use breach_core::Transform;

use crate::entity::Entity;

/// A record attached to exactly one entity.
///
/// Lifecycle hooks default to no-ops; implementors override the ones they
/// care about. The world invokes them at fixed points: awake then enable on
/// insertion, disable (if enabled) then destroy on removal or entity
/// destruction.
pub trait Component: 'static + Send + Sync {
    fn on_awake(&mut self, _entity: Entity) {}
    fn on_enable(&mut self, _entity: Entity) {}
    fn on_disable(&mut self, _entity: Entity) {}
    fn on_destroy(&mut self, _entity: Entity) {}
}

// The transform collaborator is storable like any gameplay component.
impl Component for Transform {}

/// Spare dense capacity retained after removals, per component type.
/// Bounds the memory pinned by high-churn component types.
pub(crate) const SPARE_SLOT_CAP: usize = 100;

/// Per-instance bookkeeping, owned by the storage rather than the component
/// value. Every insertion builds a fresh slot, so enabled state and tags
/// can never leak from a previous owner of the dense slot.
pub(crate) struct Slot<T> {
    pub value: T,
    pub enabled: bool,
    pub tags: Vec<String>,
}

/// Type-erased storage interface for operations that span every component
/// type: entity destruction, tag queries, enable toggles.
pub(crate) trait AnyStorage: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn has(&self, index: u32) -> bool;
    fn is_enabled(&self, index: u32) -> bool;
    /// Flip the enabled flag, running the matching hook. Returns `true` if
    /// the flag changed.
    fn set_enabled(&mut self, index: u32, entity: Entity, enabled: bool) -> bool;
    fn add_tag(&mut self, index: u32, tag: &str) -> bool;
    fn remove_tag(&mut self, index: u32, tag: &str) -> bool;
    fn has_tag(&self, index: u32, tag: &str) -> bool;
    /// Run disable (if enabled) and destroy hooks, then drop the instance.
    /// Returns `true` if a component was present.
    fn destroy(&mut self, index: u32, entity: Entity) -> bool;
    fn type_name(&self) -> &'static str;
    fn len(&self) -> usize;
}

/// Sparse-set storage for a single component type. O(1) insert, remove, and
/// lookup; dense iteration over the entity indices that carry the type.
pub(crate) struct SparseSet<T: Component> {
    /// Entity index -> dense slot. `None` means no component.
    sparse: Vec<Option<usize>>,
    /// Packed slots.
    dense: Vec<Slot<T>>,
    /// Entity indices per dense slot, for iteration.
    entities: Vec<u32>,
}

impl<T: Component> SparseSet<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Insert a fresh slot for the entity index. Callers resolve duplicate
    /// occupancy first; inserting over an existing slot replaces the value
    /// but keeps its bookkeeping.
    pub fn insert(&mut self, index: u32, value: T) {
        let idx = index as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }
        if let Some(dense_idx) = self.sparse[idx] {
            self.dense[dense_idx].value = value;
        } else {
            let dense_idx = self.dense.len();
            self.sparse[idx] = Some(dense_idx);
            self.dense.push(Slot {
                value,
                enabled: true,
                tags: Vec::new(),
            });
            self.entities.push(index);
        }
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        self.slot(index).map(|s| &s.value)
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        self.slot_mut(index).map(|s| &mut s.value)
    }

    pub fn slot(&self, index: u32) -> Option<&Slot<T>> {
        self.sparse
            .get(index as usize)
            .and_then(|s| s.map(|dense_idx| &self.dense[dense_idx]))
    }

    pub fn slot_mut(&mut self, index: u32) -> Option<&mut Slot<T>> {
        let dense_idx = (*self.sparse.get(index as usize)?)?;
        Some(&mut self.dense[dense_idx])
    }

    /// Dense array of entity indices carrying this component.
    pub fn entity_indices(&self) -> &[u32] {
        &self.entities
    }

    /// Swap-remove the slot for an entity index. Retained spare capacity is
    /// bounded by `SPARE_SLOT_CAP`.
    fn remove_slot(&mut self, index: u32) -> Option<Slot<T>> {
        let idx = index as usize;
        let dense_idx = (*self.sparse.get(idx)?)?;
        self.sparse[idx] = None;

        let last = self.dense.len() - 1;
        if dense_idx != last {
            self.dense.swap(dense_idx, last);
            self.entities.swap(dense_idx, last);
            let moved = self.entities[dense_idx];
            self.sparse[moved as usize] = Some(dense_idx);
        }
        let slot = self.dense.pop();
        self.entities.pop();

        if self.dense.capacity() - self.dense.len() > SPARE_SLOT_CAP {
            self.dense.shrink_to(self.dense.len() + SPARE_SLOT_CAP);
            self.entities.shrink_to(self.entities.len() + SPARE_SLOT_CAP);
        }
        slot
    }
}

impl<T: Component> AnyStorage for SparseSet<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn has(&self, index: u32) -> bool {
        self.slot(index).is_some()
    }

    fn is_enabled(&self, index: u32) -> bool {
        self.slot(index).map_or(false, |s| s.enabled)
    }

    fn set_enabled(&mut self, index: u32, entity: Entity, enabled: bool) -> bool {
        let Some(slot) = self.slot_mut(index) else {
            return false;
        };
        if slot.enabled == enabled {
            return false;
        }
        slot.enabled = enabled;
        if enabled {
            slot.value.on_enable(entity);
        } else {
            slot.value.on_disable(entity);
        }
        true
    }

    fn add_tag(&mut self, index: u32, tag: &str) -> bool {
        let Some(slot) = self.slot_mut(index) else {
            return false;
        };
        if slot.tags.iter().any(|t| t == tag) {
            return false;
        }
        slot.tags.push(tag.to_string());
        true
    }

    fn remove_tag(&mut self, index: u32, tag: &str) -> bool {
        let Some(slot) = self.slot_mut(index) else {
            return false;
        };
        match slot.tags.iter().position(|t| t == tag) {
            Some(pos) => {
                slot.tags.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    fn has_tag(&self, index: u32, tag: &str) -> bool {
        self.slot(index)
            .map_or(false, |s| s.tags.iter().any(|t| t == tag))
    }

    fn destroy(&mut self, index: u32, entity: Entity) -> bool {
        let Some(mut slot) = self.remove_slot(index) else {
            return false;
        };
        if slot.enabled {
            slot.value.on_disable(entity);
        }
        slot.value.on_destroy(entity);
        true
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn len(&self) -> usize {
        self.dense.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(i32);
    impl Component for Marker {}

    #[test]
    fn insert_and_get() {
        let mut set = SparseSet::new();
        set.insert(5, Marker(42));
        assert_eq!(set.get(5).map(|m| m.0), Some(42));
        assert!(set.get(0).is_none());
    }

    #[test]
    fn remove_swaps_last_into_hole() {
        let mut set = SparseSet::new();
        set.insert(0, Marker(0));
        set.insert(1, Marker(1));
        set.insert(2, Marker(2));
        assert!(set.destroy(0, Entity::from_raw(0, 0)));
        assert!(set.get(0).is_none());
        assert_eq!(set.get(1).map(|m| m.0), Some(1));
        assert_eq!(set.get(2).map(|m| m.0), Some(2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn destroy_absent_returns_false() {
        let mut set: SparseSet<Marker> = SparseSet::new();
        assert!(!set.destroy(3, Entity::from_raw(3, 0)));
    }

    #[test]
    fn reused_slot_has_fresh_bookkeeping() {
        let mut set = SparseSet::new();
        set.insert(0, Marker(1));
        set.add_tag(0, "weapon");
        set.set_enabled(0, Entity::from_raw(0, 0), false);
        set.destroy(0, Entity::from_raw(0, 0));

        set.insert(0, Marker(2));
        assert!(!set.has_tag(0, "weapon"));
        assert!(set.is_enabled(0));
    }

    #[test]
    fn tag_add_remove() {
        let mut set = SparseSet::new();
        set.insert(7, Marker(0));
        assert!(set.add_tag(7, "physics"));
        assert!(!set.add_tag(7, "physics"));
        assert!(set.has_tag(7, "physics"));
        assert!(set.remove_tag(7, "physics"));
        assert!(!set.has_tag(7, "physics"));
        assert!(!set.remove_tag(7, "physics"));
    }

    #[test]
    fn spare_capacity_is_bounded() {
        let mut set = SparseSet::new();
        for i in 0..1000u32 {
            set.insert(i, Marker(i as i32));
        }
        for i in 0..1000u32 {
            set.destroy(i, Entity::from_raw(i, 0));
        }
        assert!(set.dense.capacity() <= SPARE_SLOT_CAP);
    }
}
