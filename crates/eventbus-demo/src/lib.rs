//! Event bus demo.
//!
//! Two players walk along the X axis. A border handler registered for the
//! first player cancels moves that leave the border, and a chat handler
//! prints messages until its subscription is removed.

pub mod cli;
pub mod error;
pub mod events;
pub mod game;
pub mod player;

pub use error::{DemoError, Result};
pub use game::{Game, GameConfig, GameReport};
