//! Text surfaces shown to the player.
//!
//! Two lines, as in the browser client: a connection status line and the
//! in-game HUD (score or game phase).

use pong_net::{GameState, GameStatus};

/// Status after the connection opened.
pub const STATUS_CONNECTED: &str = "Connected! Subscribing to game state...";
/// Status once the subscription is live.
pub const STATUS_SUBSCRIBED: &str = "Subscribed! Waiting for players...";
/// Status and HUD after the connection is gone.
pub const DISCONNECTED: &str = "Disconnected.";
/// HUD after the connection opened, before any game state arrives.
pub const HUD_WAITING: &str = "Connected. Waiting for game...";
/// HUD after the game state row went away.
pub const HUD_RESETTING: &str = "Game Resetting...";

/// Score line for a game state row. Non-playing statuses are appended.
pub fn score_line(state: &GameState) -> String {
    match state.status {
        GameStatus::Playing => format!("Score: {} - {}", state.score1, state.score2),
        status => format!("Score: {} - {} ({status})", state.score1, state.score2),
    }
}

/// Current status line and HUD text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    status: String,
    text: String,
}

impl Hud {
    /// Empty HUD.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connection status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// In-game HUD text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the status line.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        tracing::info!(target: "pong_client::hud", "status: {}", self.status);
    }

    /// Replace the HUD text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            tracing::debug!(target: "pong_client::hud", "hud: {text}");
        }
        self.text = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pong_net::Timestamp;

    fn state(status: GameStatus) -> GameState {
        GameState {
            singleton_id: 1,
            score1: 3,
            score2: 5,
            status,
            last_update: Timestamp::default(),
        }
    }

    #[test]
    fn test_score_line() {
        assert_eq!(score_line(&state(GameStatus::Playing)), "Score: 3 - 5");
        assert_eq!(
            score_line(&state(GameStatus::Paused)),
            "Score: 3 - 5 (Paused)"
        );
        assert_eq!(
            score_line(&state(GameStatus::Waiting)),
            "Score: 3 - 5 (Waiting)"
        );
    }

    #[test]
    fn test_setters() {
        let mut hud = Hud::new();
        hud.set_status(STATUS_CONNECTED);
        hud.set_text(HUD_WAITING);
        assert_eq!(hud.status(), STATUS_CONNECTED);
        assert_eq!(hud.text(), HUD_WAITING);
    }
}
