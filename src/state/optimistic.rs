//! Optimistic RSVP overlay
//!
//! Statuses recorded here take precedence over stored ones until the write
//! that produced them finishes. `Some(None)` means "no RSVP" was chosen.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::models::RsvpStatus;

type Key = (Uuid, Uuid);

#[derive(Debug, Clone, Default)]
pub struct OptimisticOverlay {
    entries: Arc<Mutex<HashMap<Key, Option<RsvpStatus>>>>,
}

impl OptimisticOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Key, Option<RsvpStatus>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Pending status for the pair, if any
    pub fn get(&self, user_id: Uuid, event_id: Uuid) -> Option<Option<RsvpStatus>> {
        self.lock().get(&(user_id, event_id)).copied()
    }

    /// Record a pending status, returning the entry it replaced
    pub fn set(&self, user_id: Uuid, event_id: Uuid, status: Option<RsvpStatus>) -> Option<Option<RsvpStatus>> {
        self.lock().insert((user_id, event_id), status)
    }

    /// Put back an entry returned by [`set`](Self::set)
    pub fn restore(&self, user_id: Uuid, event_id: Uuid, previous: Option<Option<RsvpStatus>>) {
        let mut entries = self.lock();
        match previous {
            Some(status) => {
                entries.insert((user_id, event_id), status);
            }
            None => {
                entries.remove(&(user_id, event_id));
            }
        }
    }

    pub fn clear(&self, user_id: Uuid, event_id: Uuid) {
        self.lock().remove(&(user_id, event_id));
    }

    /// All pending statuses for one user, keyed by event
    pub fn for_user(&self, user_id: Uuid) -> HashMap<Uuid, Option<RsvpStatus>> {
        self.lock()
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .map(|((_, event), status)| (*event, *status))
            .collect()
    }

    /// Stored statuses with pending ones laid over them
    pub fn merge(&self, user_id: Uuid, stored: HashMap<Uuid, RsvpStatus>) -> HashMap<Uuid, RsvpStatus> {
        let mut merged = stored;
        for (event_id, status) in self.for_user(user_id) {
            match status {
                Some(status) => {
                    merged.insert(event_id, status);
                }
                None => {
                    merged.remove(&event_id);
                }
            }
        }
        merged
    }
}
