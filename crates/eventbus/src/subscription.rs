//! Registrations and the handles returned to callers.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::collection::HandlerCollection;
use crate::descriptor::SubscriptionDescriptor;
use crate::error::Result;
use crate::event::{Event, EventKey};
use crate::filter::SenderFilter;
use crate::handler::ErasedHandler;
use crate::ids::SubscriptionId;

/// One live association between a handler and an event type.
///
/// Owned by its [`HandlerCollection`]; handles share it through an `Arc`.
/// Once dead it never becomes alive again.
pub(crate) struct Registration {
    id: SubscriptionId,
    key: EventKey,
    sender: SenderFilter,
    handler: Box<dyn ErasedHandler>,
    alive: AtomicBool,
}

impl Registration {
    pub(crate) fn new(descriptor: SubscriptionDescriptor) -> Self {
        let (key, sender, handler) = descriptor.into_parts();
        Self {
            id: SubscriptionId::new(),
            key,
            sender,
            handler,
            alive: AtomicBool::new(true),
        }
    }

    pub(crate) fn id(&self) -> &SubscriptionId {
        &self.id
    }

    pub(crate) fn key(&self) -> EventKey {
        self.key
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Marks the registration dead. Returns true only for the call that
    /// actually flipped it.
    pub(crate) fn kill(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }

    /// Delivers `event` if this registration is alive and its sender filter
    /// and predicate accept it. Returns whether the handler ran.
    pub(crate) fn dispatch(&self, event: &mut dyn Event) -> Result<bool> {
        if !self.is_alive() {
            return Ok(false);
        }

        if !self.sender.matches(event.sender()) {
            return Ok(false);
        }

        self.handler.dispatch(event)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("sender", &self.sender)
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}

/// Handle to a registration, returned by every registering call on
/// [`crate::EventBus`].
///
/// Dropping a `Subscription` does **not** unregister it; call
/// [`Subscription::remove`] or convert it into a [`SubscriptionGuard`].
/// Clones refer to the same registration.
#[derive(Clone)]
pub struct Subscription {
    registration: Arc<Registration>,
    collection: Weak<HandlerCollection>,
}

impl Subscription {
    pub(crate) fn new(
        registration: Arc<Registration>,
        collection: &Arc<HandlerCollection>,
    ) -> Self {
        Self {
            registration,
            collection: Arc::downgrade(collection),
        }
    }

    /// Returns the unique ID of this registration.
    pub fn id(&self) -> &SubscriptionId {
        self.registration.id()
    }

    /// Returns the event type this registration receives.
    pub fn event_key(&self) -> EventKey {
        self.registration.key()
    }

    /// Returns true until the registration is removed or the bus is cleared.
    pub fn is_alive(&self) -> bool {
        self.registration.is_alive()
    }

    /// Unregisters the handler. No further events are delivered to it,
    /// including events later in a dispatch pass that is already running.
    ///
    /// Safe to call any number of times, from inside a handler, and after
    /// the bus has been dropped.
    pub fn remove(&self) {
        if !self.registration.kill() {
            return;
        }

        if let Some(collection) = self.collection.upgrade() {
            collection.remove(self.registration.id());
        }

        debug!(
            subscription = %self.registration.id(),
            event = %self.registration.key(),
            "subscription removed"
        );
    }

    /// Ties the registration to a scope: it is removed when the guard drops.
    pub fn guard(self) -> SubscriptionGuard {
        SubscriptionGuard {
            subscription: Some(self),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", self.id())
            .field("event", &self.event_key())
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Removes its subscription when dropped.
#[must_use = "dropping the guard removes the subscription immediately"]
pub struct SubscriptionGuard {
    subscription: Option<Subscription>,
}

impl SubscriptionGuard {
    /// Returns the guarded subscription.
    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    /// Releases the subscription without removing it.
    pub fn into_inner(mut self) -> Option<Subscription> {
        self.subscription.take()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.remove();
        }
    }
}

impl fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("subscription", &self.subscription)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SenderId;
    use std::sync::atomic::AtomicUsize;

    struct Tick {
        from: Option<SenderId>,
    }

    impl Event for Tick {
        fn sender(&self) -> Option<&SenderId> {
            self.from.as_ref()
        }
    }

    fn counting(calls: &Arc<AtomicUsize>) -> SubscriptionDescriptor {
        let c = calls.clone();
        SubscriptionDescriptor::new(move |_: &mut Tick| {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn make_subscription(
        descriptor: SubscriptionDescriptor,
    ) -> (Subscription, Arc<HandlerCollection>) {
        let collection = Arc::new(HandlerCollection::new(EventKey::of::<Tick>()));
        let registration = Arc::new(Registration::new(descriptor));
        collection.push(registration.clone());
        (Subscription::new(registration, &collection), collection)
    }

    #[test]
    fn test_kill_flips_once() {
        let registration = Registration::new(SubscriptionDescriptor::new(|_: &mut Tick| {}));
        assert!(registration.is_alive());
        assert!(registration.kill());
        assert!(!registration.kill());
        assert!(!registration.is_alive());
    }

    #[test]
    fn test_dispatch_respects_sender_filter() {
        let calls = Arc::new(AtomicUsize::new(0));
        let s1 = SenderId::from_string("s1");
        let registration = Registration::new(counting(&calls).with_sender(s1.clone()));

        let mut from_s1 = Tick { from: Some(s1) };
        let mut from_s2 = Tick {
            from: Some(SenderId::from_string("s2")),
        };
        let mut anonymous = Tick { from: None };

        assert!(registration.dispatch(&mut from_s1).unwrap());
        assert!(!registration.dispatch(&mut from_s2).unwrap());
        assert!(!registration.dispatch(&mut anonymous).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dead_registration_does_not_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registration = Registration::new(counting(&calls));
        registration.kill();

        assert!(!registration.dispatch(&mut Tick { from: None }).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remove_unlinks_and_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (subscription, collection) = make_subscription(counting(&calls));
        assert_eq!(collection.len(), 1);

        subscription.remove();
        assert!(!subscription.is_alive());
        assert_eq!(collection.len(), 0);

        subscription.remove();
        assert_eq!(collection.len(), 0);
    }

    #[test]
    fn test_remove_after_collection_dropped() {
        let (subscription, collection) =
            make_subscription(SubscriptionDescriptor::new(|_: &mut Tick| {}));
        drop(collection);

        subscription.remove();
        assert!(!subscription.is_alive());
    }

    #[test]
    fn test_clones_share_registration() {
        let (subscription, collection) =
            make_subscription(SubscriptionDescriptor::new(|_: &mut Tick| {}));
        let clone = subscription.clone();
        assert_eq!(clone.id(), subscription.id());

        clone.remove();
        assert!(!subscription.is_alive());
        subscription.remove();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_guard_removes_on_drop() {
        let (subscription, collection) =
            make_subscription(SubscriptionDescriptor::new(|_: &mut Tick| {}));
        let observer = subscription.clone();

        {
            let guard = subscription.guard();
            assert!(guard.subscription().is_some_and(Subscription::is_alive));
        }

        assert!(!observer.is_alive());
        assert!(collection.is_empty());
    }

    #[test]
    fn test_guard_into_inner_keeps_registration() {
        let (subscription, collection) =
            make_subscription(SubscriptionDescriptor::new(|_: &mut Tick| {}));

        let released = subscription.guard().into_inner().unwrap();
        assert!(released.is_alive());
        assert_eq!(collection.len(), 1);
    }
}
