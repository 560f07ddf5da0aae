use tracing::warn;

use crate::entity::Entity;

/// What happened to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsEventKind {
    Added,
    Removed,
    Enabled,
    Disabled,
    Destroyed,
}

/// Broadcast whenever the world changes a component's lifecycle state.
/// The sole notification channel out of the ECS toward observers such as
/// debug overlays or game-logic listeners.
#[derive(Debug, Clone)]
pub struct EcsEvent {
    pub kind: EcsEventKind,
    pub entity: Entity,
    /// Type name of the affected component.
    pub component: &'static str,
}

type Listener = Box<dyn FnMut(&EcsEvent) + Send>;

/// Subscription token returned by `subscribe`; revokes exactly one
/// registration. Stale handles are rejected, never misdelivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle {
    index: usize,
    generation: u32,
}

struct ListenerSlot {
    generation: u32,
    listener: Option<Listener>,
}

/// Arena of listener slots with explicit revocation. Vacant slots are
/// reused; the per-slot generation guards against stale handles.
pub(crate) struct EventBus {
    slots: Vec<ListenerSlot>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn subscribe(&mut self, listener: Listener) -> ListenerHandle {
        if let Some(index) = self.slots.iter().position(|s| s.listener.is_none()) {
            let slot = &mut self.slots[index];
            slot.listener = Some(listener);
            ListenerHandle {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(ListenerSlot {
                generation: 0,
                listener: Some(listener),
            });
            ListenerHandle {
                index: self.slots.len() - 1,
                generation: 0,
            }
        }
    }

    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index) else {
            warn!("unsubscribe with unknown listener handle {:?}", handle);
            return false;
        };
        if slot.generation != handle.generation || slot.listener.is_none() {
            warn!("unsubscribe with stale listener handle {:?}", handle);
            return false;
        }
        slot.listener = None;
        slot.generation += 1;
        true
    }

    pub fn emit(&mut self, event: &EcsEvent) {
        for slot in &mut self.slots {
            if let Some(listener) = slot.listener.as_mut() {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.slots.iter().filter(|s| s.listener.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn added_event() -> EcsEvent {
        EcsEvent {
            kind: EcsEventKind::Added,
            entity: Entity::from_raw(0, 0),
            component: "test",
        }
    }

    #[test]
    fn delivers_to_subscribers() {
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        bus.subscribe(Box::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        bus.emit(&added_event());
        bus.emit(&added_event());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let handle = bus.subscribe(Box::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(bus.unsubscribe(handle));
        bus.emit(&added_event());
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn stale_handle_is_rejected() {
        let mut bus = EventBus::new();
        let handle = bus.subscribe(Box::new(|_| {}));
        assert!(bus.unsubscribe(handle));
        assert!(!bus.unsubscribe(handle));

        // The slot is reused with a bumped generation; the old handle must
        // not revoke the new listener.
        let replacement = bus.subscribe(Box::new(|_| {}));
        assert_eq!(replacement.index, handle.index);
        assert!(!bus.unsubscribe(handle));
        assert_eq!(bus.listener_count(), 1);
    }
}
