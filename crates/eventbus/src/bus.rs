//! EventBus - synchronous, in-process publish/subscribe.
//!
//! Dispatch works on a snapshot of the registration list:
//! - The registry and collection locks are released before any handler runs,
//!   so handlers may subscribe, remove, or publish reentrantly.
//! - Removal flips the registration's alive flag first, so an entry removed
//!   mid-pass is skipped even though it is still in the snapshot.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use tracing::{debug, trace, warn};

use crate::config::BusConfig;
use crate::descriptor::SubscriptionDescriptor;
use crate::error::{EventBusError, Result};
use crate::event::{AsAny, Event, EventKey};
use crate::handler::EventHandler;
use crate::ids::SenderId;
use crate::registry::HandlerRegistry;
use crate::subscription::{Registration, Subscription};

/// Nested dispatch depth of one bus, per publishing thread.
#[derive(Debug, Default)]
struct DispatchDepth {
    threads: Mutex<HashMap<ThreadId, usize>>,
}

impl DispatchDepth {
    fn enter(&self, limit: Option<usize>) -> Result<DepthGuard<'_>> {
        let thread = thread::current().id();
        let mut threads = self.threads.lock().unwrap_or_else(PoisonError::into_inner);
        let current = threads.entry(thread).or_insert(0);
        if let Some(max) = limit {
            if *current >= max {
                return Err(EventBusError::DepthExceeded(max));
            }
        }
        *current += 1;
        Ok(DepthGuard {
            depth: self,
            thread,
        })
    }

    fn leave(&self, thread: ThreadId) {
        let mut threads = self.threads.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = threads.get_mut(&thread) {
            *current = current.saturating_sub(1);
            if *current == 0 {
                threads.remove(&thread);
            }
        }
    }
}

/// Leaves one dispatch level when dropped.
struct DepthGuard<'a> {
    depth: &'a DispatchDepth,
    thread: ThreadId,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.leave(self.thread);
    }
}

/// Synchronous event bus.
///
/// Handlers are registered per concrete event type and run on the
/// publishing thread, in registration order, before `publish` returns.
///
/// # Example
///
/// ```
/// use eventbus::{Event, EventBus};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// struct Scored {
///     value: u32,
/// }
/// impl Event for Scored {}
///
/// let bus = EventBus::new();
/// let seen = Arc::new(AtomicUsize::new(0));
///
/// let s = seen.clone();
/// let subscription = bus.subscribe_filtered(
///     move |_: &mut Scored| {
///         s.fetch_add(1, Ordering::SeqCst);
///     },
///     |e: &Scored| e.value > 10,
/// );
///
/// bus.publish(&mut Scored { value: 5 }).unwrap();
/// bus.publish(&mut Scored { value: 15 }).unwrap();
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
///
/// subscription.remove();
/// bus.publish(&mut Scored { value: 15 }).unwrap();
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub struct EventBus {
    config: BusConfig,
    registry: HandlerRegistry,
    depth: DispatchDepth,
}

impl EventBus {
    /// Creates a bus with default configuration.
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates a bus with the given configuration.
    pub fn with_config(config: BusConfig) -> Self {
        debug!(bus = %config.name, "event bus created");
        Self {
            config,
            registry: HandlerRegistry::new(),
            depth: DispatchDepth::default(),
        }
    }

    /// Returns the bus configuration.
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Registers a subscription described by `descriptor`.
    pub fn add(&self, descriptor: SubscriptionDescriptor) -> Subscription {
        let registration = Arc::new(Registration::new(descriptor));
        let collection = self.registry.get_or_create(registration.key());
        collection.push(registration.clone());

        debug!(
            bus = %self.config.name,
            event = %registration.key(),
            subscription = %registration.id(),
            "subscription added"
        );

        Subscription::new(registration, &collection)
    }

    /// Subscribes `handler` to every event of type `T`.
    pub fn subscribe<T, F>(&self, handler: F) -> Subscription
    where
        T: Event,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.add(SubscriptionDescriptor::new(handler))
    }

    /// Subscribes `handler` to events of type `T` accepted by `predicate`.
    ///
    /// The predicate is evaluated for each event, right before the handler
    /// would run, so it sees changes made by earlier handlers.
    pub fn subscribe_filtered<T, F, P>(&self, handler: F, predicate: P) -> Subscription
    where
        T: Event,
        F: Fn(&mut T) + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.add(SubscriptionDescriptor::with_predicate(handler, predicate))
    }

    /// Registers a typed handler, optionally restricted to one sender.
    ///
    /// The bus keeps `handler` alive until the subscription is removed or the
    /// bus is cleared or dropped. Adding the same handler twice creates two
    /// independent registrations.
    pub fn add_handler<T, H>(&self, handler: Arc<H>, sender: Option<SenderId>) -> Subscription
    where
        T: Event,
        H: EventHandler<T> + 'static,
    {
        let descriptor =
            SubscriptionDescriptor::new(move |event: &mut T| handler.on_event(event))
                .with_sender(sender);
        self.add(descriptor)
    }

    /// Publishes `event` to every matching handler registered for `T`.
    ///
    /// Returns the number of handlers invoked. Publishing with no handlers
    /// registered returns `Ok(0)`.
    pub fn publish<T: Event>(&self, event: &mut T) -> Result<usize> {
        self.dispatch(EventKey::of::<T>(), event)
    }

    /// Fires a type-erased event, routed by its concrete type.
    ///
    /// Equivalent to [`EventBus::publish`] for the same value.
    pub fn fire_event(&self, event: &mut dyn Event) -> Result<usize> {
        let key = AsAny::event_key(&*event);
        self.dispatch(key, event)
    }

    fn dispatch(&self, key: EventKey, event: &mut dyn Event) -> Result<usize> {
        let _depth = match self.depth.enter(self.config.max_dispatch_depth) {
            Ok(guard) => guard,
            Err(e) => {
                warn!(bus = %self.config.name, event = %key, error = %e, "dispatch rejected");
                return Err(e);
            }
        };

        let Some(collection) = self.registry.get(&key)? else {
            trace!(bus = %self.config.name, event = %key, "no handlers registered");
            return Ok(0);
        };

        let snapshot = collection.snapshot()?;
        let mut delivered = 0;

        for registration in &snapshot {
            if registration.dispatch(event)? {
                delivered += 1;
            }
        }

        trace!(
            bus = %self.config.name,
            event = %key,
            registered = snapshot.len(),
            delivered,
            "event dispatched"
        );

        Ok(delivered)
    }

    /// Number of live registrations for `T`.
    pub fn handler_count<T: Event>(&self) -> usize {
        self.registry.handler_count(&EventKey::of::<T>())
    }

    /// Event types that currently have at least one registration.
    pub fn registered_keys(&self) -> Vec<EventKey> {
        self.registry.active_keys()
    }

    /// Total live registrations across all event types.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every registration. Outstanding handles become dead and their
    /// `remove` stays a no-op.
    pub fn clear(&self) {
        let removed = self.registry.clear();
        debug!(bus = %self.config.name, removed, "event bus cleared");
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("config", &self.config)
            .field("registrations", &self.len())
            .finish()
    }
}
