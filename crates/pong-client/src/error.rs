//! Errors surfaced by the client session.

use pong_net::RemoteError;

/// Failures returned by [`ConnectionLifecycleManager`](crate::ConnectionLifecycleManager).
///
/// None of these are fatal; the matching status line has already been shown
/// by the time one is returned.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Opening the connection failed.
    #[error("connection error: {0}")]
    Connect(#[source] RemoteError),
    /// The subscription request could not be sent.
    #[error("subscription error: {0}")]
    Subscribe(#[source] RemoteError),
    /// A connection is already open.
    #[error("already connected")]
    AlreadyConnected,
    /// No connection is open.
    #[error("not connected")]
    NotConnected,
}
