//! Handler traits and type erasure.
//!
//! Two layers:
//! - **Typed**: [`EventHandler<T>`] and plain closures over `&mut T`.
//! - **Erased**: `ErasedHandler`, an object-safe trait over `&mut dyn Event`
//!   stored in the registry. [`TypedCallback`] bridges the two and is the only
//!   place that downcasts.

use std::any::type_name;
use std::marker::PhantomData;

use crate::error::{EventBusError, Result};
use crate::event::Event;

/// A component that handles events of type `T`.
///
/// Register with [`crate::EventBus::add_handler`]. One type can implement
/// `EventHandler` for several event types; the type parameter picks which one
/// is being registered.
///
/// # Example
///
/// ```
/// use eventbus::{Event, EventHandler};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct Tick;
/// impl Event for Tick {}
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl EventHandler<Tick> for Counter {
///     fn on_event(&self, _event: &mut Tick) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
/// ```
pub trait EventHandler<T: Event>: Send + Sync {
    /// Called synchronously for every matching event.
    fn on_event(&self, event: &mut T);
}

/// Object-safe handler stored in a registration.
pub(crate) trait ErasedHandler: Send + Sync {
    /// Evaluates the predicate and, if it passes, invokes the handler.
    ///
    /// Returns whether the handler ran.
    fn dispatch(&self, event: &mut dyn Event) -> Result<bool>;
}

/// Callback and predicate declared over `T`, erased to [`ErasedHandler`].
pub(crate) struct TypedCallback<T, F, P> {
    handler: F,
    predicate: P,
    // fn pointer marker: no ownership of T, Send + Sync regardless of T
    _marker: PhantomData<fn(&mut T)>,
}

impl<T, F, P> TypedCallback<T, F, P>
where
    T: Event,
    F: Fn(&mut T) + Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    pub(crate) fn new(handler: F, predicate: P) -> Self {
        Self {
            handler,
            predicate,
            _marker: PhantomData,
        }
    }
}

impl<T, F, P> ErasedHandler for TypedCallback<T, F, P>
where
    T: Event,
    F: Fn(&mut T) + Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn dispatch(&self, event: &mut dyn Event) -> Result<bool> {
        let actual = (*event).event_key();
        let Some(event) = (*event).as_any_mut().downcast_mut::<T>() else {
            return Err(EventBusError::TypeMismatch {
                expected: type_name::<T>(),
                actual: actual.name(),
            });
        };

        if !(self.predicate)(event) {
            return Ok(false);
        }

        (self.handler)(event);
        Ok(true)
    }
}
