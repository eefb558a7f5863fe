//! Event type to handler collection map.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::collection::HandlerCollection;
use crate::error::{EventBusError, Result};
use crate::event::EventKey;

/// Maps each [`EventKey`] to its [`HandlerCollection`].
///
/// Collections are created on first registration and live as long as the
/// registry, even when they become empty.
#[derive(Debug, Default)]
pub(crate) struct HandlerRegistry {
    collections: RwLock<HashMap<EventKey, Arc<HandlerCollection>>>,
}

impl HandlerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the collection for `key`, if anything was ever registered under it.
    pub(crate) fn get(&self, key: &EventKey) -> Result<Option<Arc<HandlerCollection>>> {
        let collections = self
            .collections
            .read()
            .map_err(|e| EventBusError::LockPoisoned(e.to_string()))?;
        Ok(collections.get(key).cloned())
    }

    /// Returns the collection for `key`, creating it if needed.
    pub(crate) fn get_or_create(&self, key: EventKey) -> Arc<HandlerCollection> {
        if let Ok(collections) = self.collections.read() {
            if let Some(collection) = collections.get(&key) {
                return collection.clone();
            }
        }

        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(key)
            .or_insert_with(|| Arc::new(HandlerCollection::new(key)))
            .clone()
    }

    /// Number of live registrations under `key`.
    pub(crate) fn handler_count(&self, key: &EventKey) -> usize {
        self.get(key)
            .ok()
            .flatten()
            .map(|c| c.len())
            .unwrap_or(0)
    }

    /// Keys that currently have at least one registration.
    pub(crate) fn active_keys(&self) -> Vec<EventKey> {
        self.collections
            .read()
            .map(|c| {
                c.values()
                    .filter(|collection| !collection.is_empty())
                    .map(|collection| collection.key())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total live registrations across all keys.
    pub(crate) fn len(&self) -> usize {
        self.collections
            .read()
            .map(|c| c.values().map(|collection| collection.len()).sum())
            .unwrap_or(0)
    }

    /// Kills every registration and drops every collection.
    pub(crate) fn clear(&self) -> usize {
        let drained: Vec<Arc<HandlerCollection>> = {
            let mut collections = self
                .collections
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            collections.drain().map(|(_, collection)| collection).collect()
        };

        drained.iter().map(|collection| collection.clear()).sum()
    }
}
