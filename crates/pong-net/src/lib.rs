//! Boundary to the remote table store.
//!
//! Row types replicated by the pong module, the per-table notification
//! stream, the connector/connection traits the client drives, observable
//! connection state, authorization token persistence, and an in-process
//! loopback store implementing the same boundary.

pub mod connection;
pub mod events;
pub mod loopback;
pub mod remote;
pub mod rows;
pub mod token;

pub use connection::{ConnectionState, ConnectionStateWatch};
pub use events::{ConnectionEvent, RemoteEvent, TableEvent, TableUpdate};
pub use loopback::{LoopbackConnection, LoopbackConnector, LoopbackStore};
pub use remote::{
    ConnectParams, ConnectionId, Connector, Established, RemoteConnection, RemoteError,
};
pub use rows::{Ball, GameState, GameStatus, Identity, PlayerInfo, PlayerInput, Side, Timestamp};
pub use token::{FileTokenStore, MemoryTokenStore, TokenError, TokenStore};
