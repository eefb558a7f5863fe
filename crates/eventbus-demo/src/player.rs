//! Players that publish events about themselves.

use eventbus::SenderId;

use crate::events::Position;

/// A named player with a position. Its [`SenderId`] tags every event it
/// originates.
#[derive(Debug, Clone)]
pub struct Player {
    id: SenderId,
    name: String,
    position: Position,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SenderId::new(),
            name: name.into(),
            position: Position::default(),
        }
    }

    pub fn id(&self) -> &SenderId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}
