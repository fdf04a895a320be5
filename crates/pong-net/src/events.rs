//! Notifications delivered by the store to a connected client.
//!
//! For any one row the store delivers `Insert`, then zero or more `Update`s,
//! then at most one `Delete`, in that order. Nothing is promised about the
//! relative order of different rows or tables.

use crate::remote::ConnectionId;
use crate::rows::{Ball, GameState, PlayerInfo, PlayerInput};

/// Lifecycle notification for one row of one table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent<R> {
    /// Row became visible (includes the initial subscription snapshot).
    Insert(R),
    /// Row changed in place.
    Update {
        /// Previous value.
        old: R,
        /// Current value.
        new: R,
    },
    /// Row went away.
    Delete(R),
}

impl<R> TableEvent<R> {
    /// Short name of the event kind for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Update { .. } => "update",
            Self::Delete(_) => "delete",
        }
    }

    /// The row as it stands after this event (the deleted row for deletes).
    pub fn row(&self) -> &R {
        match self {
            Self::Insert(row) | Self::Delete(row) => row,
            Self::Update { new, .. } => new,
        }
    }
}

/// A [`TableEvent`] tagged with the table it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum TableUpdate {
    /// `player_info` table.
    PlayerInfo(TableEvent<PlayerInfo>),
    /// `player_input` table.
    PlayerInput(TableEvent<PlayerInput>),
    /// `ball` table.
    Ball(TableEvent<Ball>),
    /// `game_state` table.
    GameState(TableEvent<GameState>),
}

impl TableUpdate {
    /// Name of the table the event belongs to.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::PlayerInfo(_) => "player_info",
            Self::PlayerInput(_) => "player_input",
            Self::Ball(_) => "ball",
            Self::GameState(_) => "game_state",
        }
    }

    /// Event kind, see [`TableEvent::kind`].
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayerInfo(e) => e.kind(),
            Self::PlayerInput(e) => e.kind(),
            Self::Ball(e) => e.kind(),
            Self::GameState(e) => e.kind(),
        }
    }
}

/// Everything the store can tell a connected client after the connection has
/// been established.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteEvent {
    /// The subscription to all tables is live. Inserts may already have
    /// arrived before this.
    SubscriptionApplied,
    /// The subscription request was rejected.
    SubscriptionError {
        /// Human-readable cause.
        message: String,
    },
    /// The connection is gone, gracefully or not.
    Disconnected {
        /// Cause, when the transport reported one.
        reason: Option<String>,
    },
    /// A row changed in a subscribed table.
    Table(TableUpdate),
}

/// A [`RemoteEvent`] together with the connection it belongs to.
///
/// Events of a closed connection can still be queued when the next one
/// opens; receivers compare `connection` against their live id.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionEvent {
    /// Connection that produced the event.
    pub connection: ConnectionId,
    /// The event itself.
    pub event: RemoteEvent,
}
