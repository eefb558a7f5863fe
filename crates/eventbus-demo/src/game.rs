//! The demo scenario: two players walk along X, a border handler scoped to
//! the first player cancels moves that leave the border, and a chat handler
//! echoes messages until it is removed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use eventbus::{not_canceled, BusConfig, Cancelable, EventBus, EventHandler};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{DemoError, Result};
use crate::events::{PlayerChatEvent, PlayerMoveEvent, Position};
use crate::player::Player;

/// Game configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Half-width of the square border.
    pub border: i32,
    /// Distance moved along X per step.
    pub step: i32,
    /// Stop once X passes this value.
    pub max_x: i32,
    /// Limit on nested dispatch depth.
    pub max_dispatch_depth: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            border: 500,
            step: 200,
            max_x: 1000,
            max_dispatch_depth: None,
        }
    }
}

/// Cancels moves that end outside the border.
#[derive(Debug)]
pub struct BorderGuard {
    border: i32,
    rejected: AtomicUsize,
}

impl BorderGuard {
    pub fn new(border: i32) -> Self {
        Self {
            border,
            rejected: AtomicUsize::new(0),
        }
    }

    /// Number of moves this guard canceled.
    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }
}

impl EventHandler<PlayerMoveEvent> for BorderGuard {
    fn on_event(&self, event: &mut PlayerMoveEvent) {
        if event.is_canceled() {
            return;
        }

        if event.to.x.abs() > self.border || event.to.z.abs() > self.border {
            event.set_canceled(true);
            self.rejected.fetch_add(1, Ordering::SeqCst);
            info!(
                player = %event.name,
                x = event.to.x,
                z = event.to.z,
                "move canceled: outside of border"
            );
        }
    }
}

/// Collects chat lines.
#[derive(Debug, Default)]
pub struct ChatLog {
    lines: Mutex<Vec<String>>,
}

impl ChatLog {
    fn record(&self, event: &PlayerChatEvent) {
        let line = format!("The player '{}' said: {}", event.name, event.message);
        info!("{line}");
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }

    /// Lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

/// Final state of one player.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub name: String,
    pub position: Position,
    /// X coordinate of the first rejected move, if any.
    pub blocked_at: Option<i32>,
}

/// Outcome of a game run.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub players: Vec<PlayerReport>,
    pub moves_rejected: usize,
    pub chats_published: usize,
    pub chats_delivered: usize,
    pub chat: Vec<String>,
}

/// Moves `player` to `to` and publishes the move.
///
/// Returns false and restores the previous position if a handler canceled it.
pub fn set_position_with_event(bus: &EventBus, player: &mut Player, to: Position) -> Result<bool> {
    let from = player.position();
    player.set_position(to);

    let mut event = PlayerMoveEvent::new(player.id().clone(), player.name(), from, to);
    bus.publish(&mut event)?;

    if event.is_canceled() {
        player.set_position(from);
        return Ok(false);
    }

    Ok(true)
}

/// Runs the demo scenario on its own bus.
pub struct Game {
    config: GameConfig,
    bus: EventBus,
}

impl Game {
    /// Creates a game. Fails if the step would never advance.
    pub fn new(config: GameConfig) -> Result<Self> {
        if config.step <= 0 {
            return Err(DemoError::InvalidConfig(format!(
                "step must be positive, got {}",
                config.step
            )));
        }

        let mut bus_config = BusConfig::new().with_name("game");
        if let Some(depth) = config.max_dispatch_depth {
            bus_config = bus_config.with_max_dispatch_depth(depth);
        }

        Ok(Self {
            config,
            bus: EventBus::with_config(bus_config),
        })
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn run(&self) -> Result<GameReport> {
        let mut player1 = Player::new("Player1");
        let mut player2 = Player::new("Player2");

        // Nobody is listening yet; this is a no-op.
        let mut idle = PlayerMoveEvent::new(
            player1.id().clone(),
            player1.name(),
            Position::default(),
            Position::default(),
        );
        self.bus.publish(&mut idle)?;

        let border = Arc::new(BorderGuard::new(self.config.border));
        let _border = self
            .bus
            .add_handler::<PlayerMoveEvent, _>(border.clone(), Some(player1.id().clone()))
            .guard();

        let chat_log = Arc::new(ChatLog::default());
        let log = chat_log.clone();
        let chat = self.bus.subscribe_filtered(
            move |event: &mut PlayerChatEvent| log.record(event),
            not_canceled::<PlayerChatEvent>,
        );

        let blocked1 = self.walk(&mut player1)?;
        // The border handler only listens to player 1.
        let blocked2 = self.walk(&mut player2)?;

        let mut chats = vec![
            PlayerChatEvent::new(player1.id().clone(), player1.name(), "Hello I am Player 1!"),
            PlayerChatEvent::new(player2.id().clone(), player2.name(), "Hello I am Player 2!"),
        ];
        let mut chats_delivered = 0;
        for event in chats.iter_mut() {
            chats_delivered += self.bus.publish(event)?;
        }

        chat.remove();

        let mut unheard = PlayerChatEvent::new(
            player2.id().clone(),
            player2.name(),
            "This chat message will not be serviced",
        );
        chats_delivered += self.bus.publish(&mut unheard)?;

        debug!(handlers = self.bus.len(), "scenario finished");

        Ok(GameReport {
            players: vec![
                PlayerReport {
                    name: player1.name().to_string(),
                    position: player1.position(),
                    blocked_at: blocked1,
                },
                PlayerReport {
                    name: player2.name().to_string(),
                    position: player2.position(),
                    blocked_at: blocked2,
                },
            ],
            moves_rejected: border.rejected(),
            chats_published: chats.len() + 1,
            chats_delivered,
            chat: chat_log.lines(),
        })
    }

    /// Walks `player` along X until `max_x` or until a move is canceled.
    /// Returns the X of the canceled move.
    fn walk(&self, player: &mut Player) -> Result<Option<i32>> {
        let mut x = 0;
        while x <= self.config.max_x {
            info!(player = %player.name(), x, "changing position");
            if !set_position_with_event(&self.bus, player, Position::new(x, 0, 0))? {
                info!(player = %player.name(), x, "setting position was canceled");
                return Ok(Some(x));
            }
            x += self.config.step;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario() {
        let game = Game::new(GameConfig::default()).unwrap();
        let report = game.run().unwrap();

        let p1 = &report.players[0];
        assert_eq!(p1.blocked_at, Some(600));
        assert_eq!(p1.position, Position::new(400, 0, 0));

        let p2 = &report.players[1];
        assert_eq!(p2.blocked_at, None);
        assert_eq!(p2.position, Position::new(1000, 0, 0));

        assert_eq!(report.moves_rejected, 1);
        assert_eq!(report.chats_published, 3);
        assert_eq!(report.chats_delivered, 2);
        assert_eq!(
            report.chat,
            vec![
                "The player 'Player1' said: Hello I am Player 1!",
                "The player 'Player2' said: Hello I am Player 2!",
            ]
        );
    }

    #[test]
    fn test_handlers_released_after_run() {
        let game = Game::new(GameConfig::default()).unwrap();
        game.run().unwrap();
        assert!(game.bus().is_empty());
    }

    #[test]
    fn test_wide_border_never_blocks() {
        let config = GameConfig {
            border: 10_000,
            ..GameConfig::default()
        };
        let report = Game::new(config).unwrap().run().unwrap();
        assert!(report.players.iter().all(|p| p.blocked_at.is_none()));
        assert_eq!(report.moves_rejected, 0);
    }

    #[test]
    fn test_invalid_step() {
        let config = GameConfig {
            step: 0,
            ..GameConfig::default()
        };
        assert!(matches!(Game::new(config), Err(DemoError::InvalidConfig(_))));
    }

    #[test]
    fn test_set_position_with_event_restores_on_cancel() {
        let bus = EventBus::new();
        let mut player = Player::new("P");
        bus.subscribe(|e: &mut PlayerMoveEvent| e.set_canceled(e.to.x > 5));

        assert!(set_position_with_event(&bus, &mut player, Position::new(5, 0, 0)).unwrap());
        assert!(!set_position_with_event(&bus, &mut player, Position::new(6, 0, 0)).unwrap());
        assert_eq!(player.position(), Position::new(5, 0, 0));
    }

    #[test]
    fn test_report_serializes() {
        let report = Game::new(GameConfig::default()).unwrap().run().unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["players"][0]["blocked_at"], 600);
        assert_eq!(json["chats_delivered"], 2);
    }
}
