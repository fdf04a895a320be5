//! In-process table store speaking the same boundary as a real store.
//!
//! [`LoopbackStore`] keeps the four public tables in memory and pushes
//! [`ConnectionEvent`]s to a single subscribed client through an unbounded
//! channel. It runs no game rules: rows change only when the owner of the
//! store (a test or the headless binary) changes them, or when a client calls
//! `move_paddle`, which writes the requested y into the caller's
//! `player_input` row.
//!
//! The store is single-threaded (`Rc<RefCell<_>>`), matching the client's
//! cooperative event loop.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tokio::sync::mpsc;

use crate::events::{ConnectionEvent, RemoteEvent, TableEvent, TableUpdate};
use crate::remote::{
    ConnectParams, ConnectionId, Connector, Established, RemoteConnection, RemoteError,
};
use crate::rows::{Ball, GameState, GameStatus, Identity, PlayerInfo, PlayerInput, Timestamp};

const BALL_ID: u32 = 1;
const GAME_STATE_ID: u32 = 1;

struct StoreInner {
    events: mpsc::UnboundedSender<ConnectionEvent>,
    module_name: String,

    player_info: Vec<PlayerInfo>,
    player_input: Vec<PlayerInput>,
    ball: Option<Ball>,
    game_state: Option<GameState>,

    /// Live connection id and its identity.
    session: Option<(ConnectionId, Identity)>,
    subscribed: bool,
    next_connection_id: u64,
    next_identity: u64,
    identities_by_token: HashMap<String, Identity>,
    clock_micros: u64,

    refuse_connect: Option<String>,
    reject_subscription: Option<String>,
    paddle_moves: Vec<(Identity, f32)>,
    connect_attempts: Vec<ConnectParams>,
}

impl StoreInner {
    fn tick(&mut self) -> Timestamp {
        self.clock_micros += 16_000;
        Timestamp::from_micros(self.clock_micros)
    }

    fn send(&self, connection: ConnectionId, event: RemoteEvent) {
        let _ = self.events.send(ConnectionEvent { connection, event });
    }

    fn emit(&self, update: TableUpdate) {
        match self.session {
            Some((connection, _)) if self.subscribed => {
                tracing::trace!(
                    table = update.table_name(),
                    kind = update.kind(),
                    "loopback emit on {connection}"
                );
                self.send(connection, RemoteEvent::Table(update));
            }
            _ => {}
        }
    }

    fn is_live(&self, connection_id: ConnectionId) -> bool {
        matches!(self.session, Some((id, _)) if id == connection_id)
    }

    fn end_session(&mut self, reason: Option<String>) {
        if let Some((connection, _)) = self.session.take() {
            self.subscribed = false;
            self.send(connection, RemoteEvent::Disconnected { reason });
        }
    }

    fn write_paddle(&mut self, player_id: Identity, paddle_y: f32) {
        let last_update = self.tick();
        match self
            .player_input
            .iter_mut()
            .find(|row| row.player_id == player_id)
        {
            Some(row) => {
                let old = row.clone();
                row.paddle_y = paddle_y;
                row.last_update = last_update;
                let new = row.clone();
                self.emit(TableUpdate::PlayerInput(TableEvent::Update { old, new }));
            }
            None => {
                let row = PlayerInput {
                    player_id,
                    paddle_y,
                    last_update,
                };
                self.player_input.push(row.clone());
                self.emit(TableUpdate::PlayerInput(TableEvent::Insert(row)));
            }
        }
    }
}

/// Handle to the in-memory store. Clones share the same tables.
#[derive(Clone)]
pub struct LoopbackStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl LoopbackStore {
    /// Creates an empty store serving `module_name`. The receiver yields
    /// every event meant for the connected client.
    pub fn new(
        module_name: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let inner = StoreInner {
            events,
            module_name: module_name.into(),
            player_info: Vec::new(),
            player_input: Vec::new(),
            ball: None,
            game_state: None,
            session: None,
            subscribed: false,
            next_connection_id: 1,
            next_identity: 1,
            identities_by_token: HashMap::new(),
            clock_micros: 0,
            refuse_connect: None,
            reject_subscription: None,
            paddle_moves: Vec::new(),
            connect_attempts: Vec::new(),
        };
        (
            Self {
                inner: Rc::new(RefCell::new(inner)),
            },
            rx,
        )
    }

    /// Connector opening connections to this store.
    pub fn connector(&self) -> LoopbackConnector {
        LoopbackConnector {
            store: self.clone(),
        }
    }

    // ── Fault injection ─────────────────────────────────────────────

    /// Make every following connect attempt fail with `message`.
    pub fn refuse_connections(&self, message: Option<&str>) {
        self.inner.borrow_mut().refuse_connect = message.map(str::to_string);
    }

    /// Make every following subscription fail with `message`.
    pub fn reject_subscriptions(&self, message: Option<&str>) {
        self.inner.borrow_mut().reject_subscription = message.map(str::to_string);
    }

    /// Drop the live connection as if the transport failed.
    pub fn drop_connection(&self, reason: &str) {
        tracing::info!("loopback dropping connection: {reason}");
        self.inner.borrow_mut().end_session(Some(reason.to_string()));
    }

    // ── Table writes ────────────────────────────────────────────────

    /// Insert or replace a `player_info` row.
    pub fn upsert_player_info(&self, info: PlayerInfo) {
        let mut inner = self.inner.borrow_mut();
        match inner
            .player_info
            .iter_mut()
            .find(|row| row.player_id == info.player_id)
        {
            Some(row) => {
                let old = std::mem::replace(row, info.clone());
                inner.emit(TableUpdate::PlayerInfo(TableEvent::Update { old, new: info }));
            }
            None => {
                inner.player_info.push(info.clone());
                inner.emit(TableUpdate::PlayerInfo(TableEvent::Insert(info)));
            }
        }
    }

    /// Insert the player's paddle row, or move it if it exists.
    pub fn set_paddle(&self, player_id: Identity, paddle_y: f32) {
        self.inner.borrow_mut().write_paddle(player_id, paddle_y);
    }

    /// Delete a player's `player_input` and `player_info` rows.
    pub fn remove_player(&self, player_id: Identity) {
        let mut inner = self.inner.borrow_mut();
        if let Some(pos) = inner
            .player_input
            .iter()
            .position(|row| row.player_id == player_id)
        {
            let row = inner.player_input.remove(pos);
            inner.emit(TableUpdate::PlayerInput(TableEvent::Delete(row)));
        }
        if let Some(pos) = inner
            .player_info
            .iter()
            .position(|row| row.player_id == player_id)
        {
            let row = inner.player_info.remove(pos);
            inner.emit(TableUpdate::PlayerInfo(TableEvent::Delete(row)));
        }
    }

    /// Insert the ball, or move it if it exists.
    pub fn set_ball(&self, x: f32, y: f32) {
        let mut inner = self.inner.borrow_mut();
        match inner.ball.as_mut() {
            Some(ball) => {
                let old = ball.clone();
                ball.vx = x - old.x;
                ball.vy = y - old.y;
                ball.x = x;
                ball.y = y;
                let new = ball.clone();
                inner.emit(TableUpdate::Ball(TableEvent::Update { old, new }));
            }
            None => {
                let ball = Ball {
                    singleton_id: BALL_ID,
                    x,
                    y,
                    vx: 0.0,
                    vy: 0.0,
                };
                inner.ball = Some(ball.clone());
                inner.emit(TableUpdate::Ball(TableEvent::Insert(ball)));
            }
        }
    }

    /// Delete the ball row if present.
    pub fn remove_ball(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(ball) = inner.ball.take() {
            inner.emit(TableUpdate::Ball(TableEvent::Delete(ball)));
        }
    }

    /// Insert or update the game state.
    pub fn set_game_state(&self, score1: u32, score2: u32, status: GameStatus) {
        let mut inner = self.inner.borrow_mut();
        let last_update = inner.tick();
        let new = GameState {
            singleton_id: GAME_STATE_ID,
            score1,
            score2,
            status,
            last_update,
        };
        match inner.game_state.replace(new.clone()) {
            Some(old) => inner.emit(TableUpdate::GameState(TableEvent::Update { old, new })),
            None => inner.emit(TableUpdate::GameState(TableEvent::Insert(new))),
        }
    }

    /// Delete the game state row if present.
    pub fn remove_game_state(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(state) = inner.game_state.take() {
            inner.emit(TableUpdate::GameState(TableEvent::Delete(state)));
        }
    }

    // ── Inspection ──────────────────────────────────────────────────

    /// Every `move_paddle` call received, in order.
    pub fn paddle_moves(&self) -> Vec<(Identity, f32)> {
        self.inner.borrow().paddle_moves.clone()
    }

    /// Every connect attempt received, in order.
    pub fn connect_attempts(&self) -> Vec<ConnectParams> {
        self.inner.borrow().connect_attempts.clone()
    }

    /// Identity of the live connection, if any.
    pub fn connected_identity(&self) -> Option<Identity> {
        self.inner.borrow().session.map(|(_, identity)| identity)
    }

    /// Current paddle y of a player, if the row exists.
    pub fn paddle_y(&self, player_id: Identity) -> Option<f32> {
        self.inner
            .borrow()
            .player_input
            .iter()
            .find(|row| row.player_id == player_id)
            .map(|row| row.paddle_y)
    }
}

impl std::fmt::Debug for LoopbackStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("LoopbackStore");
        if let Ok(inner) = self.inner.try_borrow() {
            out.field("module_name", &inner.module_name)
                .field("players", &inner.player_info.len())
                .field("subscribed", &inner.subscribed);
        }
        out.finish_non_exhaustive()
    }
}

/// [`Connector`] for a [`LoopbackStore`].
#[derive(Debug, Clone)]
pub struct LoopbackConnector {
    store: LoopbackStore,
}

impl Connector for LoopbackConnector {
    type Connection = LoopbackConnection;

    fn connect(
        &mut self,
        params: &ConnectParams,
    ) -> Result<Established<Self::Connection>, RemoteError> {
        let mut inner = self.store.inner.borrow_mut();
        inner.connect_attempts.push(params.clone());

        if let Some(message) = inner.refuse_connect.clone() {
            return Err(RemoteError::Connect(message));
        }
        if params.module_name != inner.module_name {
            return Err(RemoteError::Connect(format!(
                "no such database: {}",
                params.module_name
            )));
        }

        // One client at a time: a new connection replaces the old one.
        inner.end_session(Some("superseded by a new connection".to_string()));

        let known = params
            .token
            .as_ref()
            .and_then(|token| inner.identities_by_token.get(token).copied());
        let identity = match known {
            Some(identity) => identity,
            None => {
                let identity = Identity::from_u64(inner.next_identity);
                inner.next_identity += 1;
                identity
            }
        };
        let token = format!("loopback-{}", identity.to_hex());
        inner.identities_by_token.insert(token.clone(), identity);

        let connection_id = ConnectionId::new(inner.next_connection_id);
        inner.next_connection_id += 1;
        inner.session = Some((connection_id, identity));
        tracing::debug!(%identity, "loopback connection {connection_id} opened");

        Ok(Established {
            connection: LoopbackConnection {
                store: self.store.clone(),
                connection_id,
                identity,
            },
            connection_id,
            identity,
            token,
        })
    }
}

/// Outbound handle of a loopback connection.
#[derive(Debug)]
pub struct LoopbackConnection {
    store: LoopbackStore,
    connection_id: ConnectionId,
    identity: Identity,
}

impl RemoteConnection for LoopbackConnection {
    fn subscribe_to_all_tables(&mut self) -> Result<(), RemoteError> {
        let mut inner = self.store.inner.borrow_mut();
        if !inner.is_live(self.connection_id) {
            return Err(RemoteError::NotConnected);
        }
        if let Some(message) = inner.reject_subscription.clone() {
            inner.send(self.connection_id, RemoteEvent::SubscriptionError { message });
            return Ok(());
        }

        inner.subscribed = true;
        // Initial snapshot arrives as inserts, info before input.
        let snapshot: Vec<TableUpdate> = inner
            .player_info
            .iter()
            .cloned()
            .map(|row| TableUpdate::PlayerInfo(TableEvent::Insert(row)))
            .chain(
                inner
                    .player_input
                    .iter()
                    .cloned()
                    .map(|row| TableUpdate::PlayerInput(TableEvent::Insert(row))),
            )
            .chain(
                inner
                    .ball
                    .iter()
                    .cloned()
                    .map(|row| TableUpdate::Ball(TableEvent::Insert(row))),
            )
            .chain(
                inner
                    .game_state
                    .iter()
                    .cloned()
                    .map(|row| TableUpdate::GameState(TableEvent::Insert(row))),
            )
            .collect();
        for update in snapshot {
            inner.emit(update);
        }
        inner.send(self.connection_id, RemoteEvent::SubscriptionApplied);
        Ok(())
    }

    fn move_paddle(&mut self, new_y: f32) -> Result<(), RemoteError> {
        let mut inner = self.store.inner.borrow_mut();
        if !inner.is_live(self.connection_id) {
            return Err(RemoteError::NotConnected);
        }
        inner.paddle_moves.push((self.identity, new_y));
        if inner
            .player_input
            .iter()
            .any(|row| row.player_id == self.identity)
        {
            inner.write_paddle(self.identity, new_y);
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut inner = self.store.inner.borrow_mut();
        if inner.is_live(self.connection_id) {
            inner.end_session(None);
        }
    }
}
