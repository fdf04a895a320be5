//! Connector and connection traits for the remote store.
//!
//! A [`Connector`] plays the role of the store SDK's connection builder: it
//! opens a connection from a [`ConnectParams`] and reports the identity and
//! token the store assigned. The resulting [`RemoteConnection`] is the
//! client's only handle for outbound traffic. Inbound traffic arrives
//! separately as a stream of [`ConnectionEvent`](crate::ConnectionEvent)s,
//! each stamped with the [`ConnectionId`] that produced it.

use crate::rows::Identity;

/// Errors produced at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Transport or authorization failure while connecting.
    #[error("connect failed: {0}")]
    Connect(String),
    /// The subscription request was rejected.
    #[error("subscription rejected: {0}")]
    Subscription(String),
    /// The handle no longer refers to a live connection.
    #[error("not connected")]
    NotConnected,
    /// A request could not be delivered.
    #[error("transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    /// Cause without the variant prefix, for user-facing status text.
    pub fn message(&self) -> String {
        match self {
            Self::Connect(m) | Self::Subscription(m) | Self::Transport(m) => m.clone(),
            Self::NotConnected => self.to_string(),
        }
    }
}

/// Identifies one opened connection. A store never reuses an id, so events
/// stamped with an old id can be told apart from those of a newer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything needed to open a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    /// Transport URI, e.g. `ws://127.0.0.1:3000`.
    pub uri: String,
    /// Logical database/module name.
    pub module_name: String,
    /// Bearer token from an earlier session, if any.
    pub token: Option<String>,
}

/// A freshly opened connection together with what the store told us about
/// ourselves.
#[derive(Debug)]
pub struct Established<C> {
    /// Outbound handle.
    pub connection: C,
    /// Id stamped on every event this connection produces.
    pub connection_id: ConnectionId,
    /// Identity the store associates with this client.
    pub identity: Identity,
    /// Token to present next time. May differ from the one we sent.
    pub token: String,
}

/// Opens connections to the store.
pub trait Connector {
    /// Handle type produced on success.
    type Connection: RemoteConnection;

    /// Open a connection. An error here is a connect error; no connection
    /// handle exists afterwards.
    fn connect(
        &mut self,
        params: &ConnectParams,
    ) -> Result<Established<Self::Connection>, RemoteError>;
}

/// Outbound side of a live connection.
pub trait RemoteConnection {
    /// Request a subscription covering every public table. The outcome is
    /// reported later as `SubscriptionApplied` or `SubscriptionError`.
    fn subscribe_to_all_tables(&mut self) -> Result<(), RemoteError>;

    /// Call the `move_paddle` reducer with a simulation-space y.
    /// Fire-and-forget: the effect shows up as a `player_input` update.
    fn move_paddle(&mut self, new_y: f32) -> Result<(), RemoteError>;

    /// Close the connection. The store answers with `Disconnected`.
    fn disconnect(&mut self);
}
