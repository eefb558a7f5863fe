//! Synchronous in-process event bus.
//!
//! This crate provides the `EventBus` for decoupling components with:
//! - Registrations keyed by the concrete event type (`EventKey`)
//! - Closure subscriptions with optional predicates
//! - Typed handlers (`EventHandler<T>`) with optional sender filters
//! - Idempotent removal through `Subscription` handles
//!
//! Publishing runs every matching handler on the calling thread, in
//! registration order, before returning.
//!
//! # Example
//!
//! ```
//! use eventbus::{Cancelable, Event, EventBus, SenderId};
//!
//! struct PlayerMoved {
//!     player: SenderId,
//!     x: i32,
//!     canceled: bool,
//! }
//!
//! impl Event for PlayerMoved {
//!     fn sender(&self) -> Option<&SenderId> {
//!         Some(&self.player)
//!     }
//! }
//!
//! impl Cancelable for PlayerMoved {
//!     fn is_canceled(&self) -> bool {
//!         self.canceled
//!     }
//!
//!     fn set_canceled(&mut self, canceled: bool) {
//!         self.canceled = canceled;
//!     }
//! }
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(|e: &mut PlayerMoved| {
//!     if e.x.abs() > 500 {
//!         e.set_canceled(true);
//!     }
//! });
//!
//! let mut event = PlayerMoved { player: SenderId::new(), x: 600, canceled: false };
//! bus.publish(&mut event).unwrap();
//! assert!(event.is_canceled());
//!
//! subscription.remove();
//! ```

pub mod bus;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod filter;
pub mod handler;
pub mod ids;
pub mod subscription;

mod collection;
mod registry;

pub use bus::EventBus;
pub use config::BusConfig;
pub use descriptor::SubscriptionDescriptor;
pub use error::{EventBusError, Result};
pub use event::{AsAny, Cancelable, Event, EventKey};
pub use filter::{accept_all, not_canceled, SenderFilter};
pub use handler::EventHandler;
pub use ids::{SenderId, SubscriptionId};
pub use subscription::{Subscription, SubscriptionGuard};
