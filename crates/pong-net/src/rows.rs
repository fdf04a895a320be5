//! Rows of the pong module's public tables, as seen by a subscribed client.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity / Timestamp
// ---------------------------------------------------------------------------

/// A client identity issued by the store. 256 bits, rendered as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity([u8; 32]);

impl Identity {
    /// Wraps raw identity bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Identity whose low 8 bytes hold `n` (big-endian). Used by the loopback
    /// store and tests to mint distinct identities.
    pub fn from_u64(n: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// 64-character lowercase hex string. Used as the paddle registry key.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Microseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Timestamp from microseconds since the epoch.
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Microseconds since the epoch.
    pub const fn as_micros(&self) -> u64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Session status of the single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for enough players.
    Waiting,
    /// Ball in play.
    Playing,
    /// Temporarily halted.
    Paused,
    /// Game over.
    Finished,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Waiting => "Waiting",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Finished => "Finished",
        };
        f.write_str(name)
    }
}

/// Court side a player defends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left side, scores into `score1`.
    Left,
    /// Right side, scores into `score2`.
    Right,
}

impl Side {
    /// Decodes the module's side code. The module hands out `1` (left) and
    /// `2` (right) alternately by join order; any other code keeps the same
    /// parity rule, odd → left, even → right.
    pub fn from_code(code: u8) -> Self {
        if code % 2 == 1 { Self::Left } else { Self::Right }
    }

    /// Wire code for this side.
    pub fn code(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// `player_input` row: one paddle per connected player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Owning player (primary key).
    pub player_id: Identity,
    /// Paddle centre y in simulation units.
    pub paddle_y: f32,
    /// Last time the row changed.
    pub last_update: Timestamp,
}

/// `ball` row. At most one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Primary key of the singleton.
    pub singleton_id: u32,
    /// Centre x in simulation units.
    pub x: f32,
    /// Centre y in simulation units.
    pub y: f32,
    /// Server-side x velocity per tick. Not used for rendering.
    pub vx: f32,
    /// Server-side y velocity per tick. Not used for rendering.
    pub vy: f32,
}

/// `game_state` row. At most one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Primary key of the singleton.
    pub singleton_id: u32,
    /// Left side's score.
    pub score1: u32,
    /// Right side's score.
    pub score2: u32,
    /// Current status.
    pub status: GameStatus,
    /// Last time the row changed.
    pub last_update: Timestamp,
}

/// `player_info` row: static per-player metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Player (primary key).
    pub player_id: Identity,
    /// Assigned side.
    pub side: Side,
}
