//! In-flight RSVP tracking
//!
//! At most one RSVP write per (user, event) runs at a time. The slot is held
//! by an RAII guard and released when the guard is dropped.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

type Slot = (Uuid, Uuid);

#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    slots: Arc<Mutex<HashSet<Slot>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Slot>> {
        // A panic while holding the lock cannot leave the set inconsistent
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim the slot for `(user_id, event_id)`; `None` if already taken
    pub fn try_acquire(&self, user_id: Uuid, event_id: Uuid) -> Option<InFlightGuard> {
        let slot = (user_id, event_id);
        if self.lock().insert(slot) {
            Some(InFlightGuard {
                registry: self.clone(),
                slot,
            })
        } else {
            None
        }
    }

    pub fn is_in_flight(&self, user_id: Uuid, event_id: Uuid) -> bool {
        self.lock().contains(&(user_id, event_id))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases its slot on drop
#[derive(Debug)]
pub struct InFlightGuard {
    registry: InFlightRegistry,
    slot: Slot,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected_until_release() {
        let registry = InFlightRegistry::new();
        let (user, event) = (Uuid::new_v4(), Uuid::new_v4());

        let guard = registry.try_acquire(user, event);
        assert!(guard.is_some());
        assert!(registry.try_acquire(user, event).is_none());
        assert!(registry.is_in_flight(user, event));

        drop(guard);
        assert!(!registry.is_in_flight(user, event));
        assert!(registry.try_acquire(user, event).is_some());
    }

    #[test]
    fn test_slots_are_independent() {
        let registry = InFlightRegistry::new();
        let user = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let _first = registry.try_acquire(user, a).unwrap();
        let _second = registry.try_acquire(user, b).unwrap();
        let _other_user = registry.try_acquire(Uuid::new_v4(), a).unwrap();

        assert_eq!(registry.len(), 3);
        assert!(registry.is_in_flight(user, a));
        assert!(registry.is_in_flight(user, b));
        assert!(!registry.is_in_flight(Uuid::new_v4(), b));
    }
}
