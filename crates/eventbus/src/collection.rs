//! Ordered registrations for a single event type.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{EventBusError, Result};
use crate::event::EventKey;
use crate::ids::SubscriptionId;
use crate::subscription::Registration;

/// Registrations for one [`EventKey`], in insertion order.
///
/// Insertion order is dispatch order. The lock is only held for list
/// operations, never while a handler runs.
#[derive(Debug)]
pub(crate) struct HandlerCollection {
    key: EventKey,
    entries: RwLock<Vec<Arc<Registration>>>,
}

impl HandlerCollection {
    pub(crate) fn new(key: EventKey) -> Self {
        Self {
            key,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn key(&self) -> EventKey {
        self.key
    }

    /// Appends a registration.
    pub(crate) fn push(&self, registration: Arc<Registration>) {
        // Never poisoned by handlers: they run outside the lock.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push(registration);
    }

    /// Unlinks the registration with `id`. Returns false if it was not present.
    pub(crate) fn remove(&self, id: &SubscriptionId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.iter().position(|r| r.id() == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copies the current registration list for one dispatch pass.
    ///
    /// Registrations added after the snapshot are not part of the pass;
    /// registrations removed after it are skipped via their alive flag.
    pub(crate) fn snapshot(&self) -> Result<Vec<Arc<Registration>>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| EventBusError::LockPoisoned(e.to_string()))?;
        Ok(entries.clone())
    }

    /// Kills and drops every registration. Returns how many were removed.
    pub(crate) fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for registration in entries.iter() {
            registration.kill();
        }
        let count = entries.len();
        entries.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
