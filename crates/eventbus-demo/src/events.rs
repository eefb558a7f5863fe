//! Player events published by the demo.

use eventbus::{Cancelable, Event, SenderId};
use serde::Serialize;

/// A position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Published after a player's position changes. Canceling it makes the
/// publisher roll the move back.
#[derive(Debug, Clone)]
pub struct PlayerMoveEvent {
    pub player: SenderId,
    pub name: String,
    pub from: Position,
    pub to: Position,
    canceled: bool,
}

impl PlayerMoveEvent {
    pub fn new(player: SenderId, name: impl Into<String>, from: Position, to: Position) -> Self {
        Self {
            player,
            name: name.into(),
            from,
            to,
            canceled: false,
        }
    }
}

impl Event for PlayerMoveEvent {
    fn sender(&self) -> Option<&SenderId> {
        Some(&self.player)
    }
}

impl Cancelable for PlayerMoveEvent {
    fn is_canceled(&self) -> bool {
        self.canceled
    }

    fn set_canceled(&mut self, canceled: bool) {
        self.canceled = canceled;
    }
}

/// A chat message sent by a player.
#[derive(Debug, Clone)]
pub struct PlayerChatEvent {
    pub player: SenderId,
    pub name: String,
    pub message: String,
    canceled: bool,
}

impl PlayerChatEvent {
    pub fn new(player: SenderId, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            player,
            name: name.into(),
            message: message.into(),
            canceled: false,
        }
    }
}

impl Event for PlayerChatEvent {
    fn sender(&self) -> Option<&SenderId> {
        Some(&self.player)
    }
}

impl Cancelable for PlayerChatEvent {
    fn is_canceled(&self) -> bool {
        self.canceled
    }

    fn set_canceled(&mut self, canceled: bool) {
        self.canceled = canceled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_event_sender_is_player() {
        let id = SenderId::from_string("p1");
        let to = Position::new(1, 0, 0);
        let event = PlayerMoveEvent::new(id.clone(), "P1", Position::default(), to);
        assert_eq!(event.sender(), Some(&id));
        assert!(!event.is_canceled());
    }

    #[test]
    fn test_chat_event_cancel() {
        let mut event = PlayerChatEvent::new(SenderId::new(), "P1", "hello");
        event.set_canceled(true);
        assert!(event.is_canceled());
        assert_eq!(event.message, "hello");
    }
}
