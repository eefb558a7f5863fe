//! Subscription descriptors.

use std::fmt;

use crate::event::{Event, EventKey};
use crate::filter::{accept_all, SenderFilter};
use crate::handler::{ErasedHandler, TypedCallback};

/// Everything needed to register one subscription: the event key, the erased
/// callback and predicate, and an optional sender filter.
///
/// Built from typed closures, so the key and the callback always agree on the
/// event type. Pass to [`crate::EventBus::add`].
///
/// # Example
///
/// ```
/// use eventbus::{Event, EventBus, SenderId, SubscriptionDescriptor};
///
/// struct Chat {
///     from: SenderId,
///     text: String,
/// }
///
/// impl Event for Chat {
///     fn sender(&self) -> Option<&SenderId> {
///         Some(&self.from)
///     }
/// }
///
/// let alice = SenderId::from_string("alice");
/// let descriptor = SubscriptionDescriptor::with_predicate(
///     |chat: &mut Chat| println!("{}", chat.text),
///     |chat: &Chat| !chat.text.is_empty(),
/// )
/// .with_sender(alice);
///
/// let bus = EventBus::new();
/// let subscription = bus.add(descriptor);
/// assert!(subscription.is_alive());
/// ```
pub struct SubscriptionDescriptor {
    key: EventKey,
    sender: SenderFilter,
    handler: Box<dyn ErasedHandler>,
}

impl SubscriptionDescriptor {
    /// Describes a subscription that receives every event of type `T`.
    pub fn new<T, F>(handler: F) -> Self
    where
        T: Event,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        Self::with_predicate(handler, accept_all::<T>)
    }

    /// Describes a subscription that receives events of type `T` for which
    /// `predicate` returns true.
    pub fn with_predicate<T, F, P>(handler: F, predicate: P) -> Self
    where
        T: Event,
        F: Fn(&mut T) + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            key: EventKey::of::<T>(),
            sender: SenderFilter::Any,
            handler: Box::new(TypedCallback::new(handler, predicate)),
        }
    }

    /// Restricts the subscription to one sender.
    pub fn with_sender(mut self, sender: impl Into<SenderFilter>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Returns the event key this descriptor is registered under.
    pub fn key(&self) -> EventKey {
        self.key
    }

    /// Returns the sender filter.
    pub fn sender(&self) -> &SenderFilter {
        &self.sender
    }

    pub(crate) fn into_parts(self) -> (EventKey, SenderFilter, Box<dyn ErasedHandler>) {
        (self.key, self.sender, self.handler)
    }
}

impl fmt::Debug for SubscriptionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionDescriptor")
            .field("key", &self.key)
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}
