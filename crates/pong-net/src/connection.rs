//! Observable connection lifecycle state.
//!
//! State changes are broadcast via a [`watch`] channel so any number of
//! consumers (status bar, tests, shutdown logic) can react without polling.

use std::fmt;

use tokio::sync::watch;

/// Connection lifecycle state.
///
/// ```text
/// Disconnected → Connecting → Connected → Subscribing → Subscribed
///      ↑             │            │             │             │
///      └─────────────┴────────────┴─────────────┴─────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection handle.
    Disconnected,
    /// Connect request in flight.
    Connecting,
    /// Handle established, no subscription requested (or it was rejected).
    Connected,
    /// Subscription requested, not yet applied.
    Subscribing,
    /// Subscription applied.
    Subscribed,
}

impl ConnectionState {
    /// Whether a connection handle exists in this state.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected | Self::Subscribing | Self::Subscribed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Subscribing => "subscribing",
            Self::Subscribed => "subscribed",
        };
        f.write_str(name)
    }
}

/// Observable connection state backed by a [`watch`] channel.
pub struct ConnectionStateWatch {
    tx: watch::Sender<ConnectionState>,
    rx: watch::Receiver<ConnectionState>,
}

impl Default for ConnectionStateWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionStateWatch {
    /// Create a new watch initialized to [`ConnectionState::Disconnected`].
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(ConnectionState::Disconnected);
        Self { tx, rx }
    }

    /// Set the current connection state, notifying all subscribers.
    pub fn set(&self, state: ConnectionState) {
        let previous = self.tx.send_replace(state);
        if previous != state {
            tracing::debug!("connection state {previous} -> {state}");
        }
    }

    /// Return a new subscriber receiver.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.rx.clone()
    }

    /// Return the current state without blocking.
    pub fn current(&self) -> ConnectionState {
        *self.rx.borrow()
    }
}
