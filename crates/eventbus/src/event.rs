//! Event trait and runtime type identity.
//!
//! Every value published on the bus implements [`Event`]. Registrations are
//! partitioned by [`EventKey`], which is derived from the concrete type of the
//! event, so a `PlayerMoveEvent` is only ever delivered to handlers that were
//! registered for `PlayerMoveEvent`.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ids::SenderId;

/// Upcasts to `dyn Any` so that type-erased events can be downcast again.
///
/// Implemented for every sized `'static` type by a blanket impl, which also
/// means no type can supply its own. [`AsAny::event_key`] is therefore always
/// the key of the concrete type, and it is what [`crate::EventBus::fire_event`]
/// routes on.
///
/// ```compile_fail
/// use eventbus::{AsAny, EventKey};
///
/// struct Spoofed;
///
/// impl AsAny for Spoofed {
///     fn as_any(&self) -> &dyn std::any::Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
///     fn event_key(&self) -> EventKey { EventKey::of::<u8>() }
/// }
/// ```
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Key of the concrete type. Through `dyn Event` this is still the
    /// concrete type, not the trait object.
    fn event_key(&self) -> EventKey;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn event_key(&self) -> EventKey {
        EventKey::of::<T>()
    }
}

/// A value that can be published on the bus.
///
/// # Example
///
/// ```
/// use eventbus::{Event, SenderId};
///
/// struct Deployed {
///     from: SenderId,
///     version: String,
/// }
///
/// impl Event for Deployed {
///     fn sender(&self) -> Option<&SenderId> {
///         Some(&self.from)
///     }
/// }
/// ```
///
/// The routing key is not part of this trait:
///
/// ```compile_fail
/// use eventbus::{Event, EventKey};
///
/// struct Relabeled;
///
/// impl Event for Relabeled {
///     fn event_key(&self) -> EventKey {
///         EventKey::of::<String>()
///     }
/// }
/// ```
pub trait Event: AsAny {
    /// The component that originated this event, if any.
    ///
    /// Used to match registrations that carry a sender filter.
    fn sender(&self) -> Option<&SenderId> {
        None
    }
}

/// An event that handlers may cancel.
///
/// Canceling does not stop dispatch; later handlers still run and can check
/// [`Cancelable::is_canceled`] (or be registered with
/// [`crate::filter::not_canceled`]). The publisher inspects the flag after
/// `publish` returns.
pub trait Cancelable: Event {
    /// Returns true if a handler canceled this event.
    fn is_canceled(&self) -> bool;

    /// Sets the canceled flag.
    fn set_canceled(&mut self, canceled: bool);
}

/// Runtime identity of an event type.
///
/// Two keys are equal iff they were derived from the same concrete type.
#[derive(Clone, Copy)]
pub struct EventKey {
    id: TypeId,
    name: &'static str,
}

impl EventKey {
    /// Returns the key for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the underlying `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the type name (for diagnostics only).
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventKey {}

impl Hash for EventKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventKey").field(&self.name).finish()
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    impl Event for Ping {}

    struct Pong {
        from: SenderId,
    }
    impl Event for Pong {
        fn sender(&self) -> Option<&SenderId> {
            Some(&self.from)
        }
    }

    #[test]
    fn test_key_equality() {
        assert_eq!(EventKey::of::<Ping>(), EventKey::of::<Ping>());
        assert_ne!(EventKey::of::<Ping>(), EventKey::of::<Pong>());
    }

    #[test]
    fn test_key_from_dyn_is_concrete() {
        let ping = Ping;
        let erased: &dyn Event = &ping;
        assert_eq!((*erased).event_key(), EventKey::of::<Ping>());
        assert!((*erased).event_key().name().ends_with("Ping"));

        let boxed: Box<dyn Event> = Box::new(Pong {
            from: SenderId::new(),
        });
        assert_eq!((*boxed).event_key(), EventKey::of::<Pong>());
        assert_eq!((*boxed).as_any().type_id(), TypeId::of::<Pong>());
    }

    #[test]
    fn test_default_sender_is_none() {
        assert!(Ping.sender().is_none());

        let from = SenderId::new();
        let pong = Pong { from: from.clone() };
        assert_eq!(pong.sender(), Some(&from));
    }

    #[test]
    fn test_downcast_through_as_any() {
        let mut pong = Pong {
            from: SenderId::from_string("a"),
        };
        let erased: &mut dyn Event = &mut pong;
        let back = (*erased).as_any_mut().downcast_mut::<Pong>().unwrap();
        back.from = SenderId::from_string("b");
        assert_eq!(pong.from.as_str(), "b");
    }

    #[test]
    fn test_key_usable_in_hash_map() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(EventKey::of::<Ping>(), 1);
        map.insert(EventKey::of::<Pong>(), 2);
        assert_eq!(map.get(&EventKey::of::<Ping>()), Some(&1));
        assert!(format!("{:?}", EventKey::of::<Ping>()).contains("Ping"));
    }
}
