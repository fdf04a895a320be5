//! Connection lifecycle: connect, subscribe, route events, tear down.
//!
//! [`ConnectionLifecycleManager`] owns the only connection handle (inside a
//! [`ClientSession`]), the reconciler set and the HUD. It is driven from the
//! client's event loop: [`connect`](ConnectionLifecycleManager::connect) once,
//! then [`handle_event`](ConnectionLifecycleManager::handle_event) for every
//! [`ConnectionEvent`]. Events stamped with any connection other than the
//! live one are dropped, so a late `Disconnected` from a closed connection
//! cannot tear down its successor.

use pong_net::{
    ConnectParams, ConnectionEvent, ConnectionState, ConnectionStateWatch, Connector, Established,
    Identity, RemoteConnection, RemoteEvent, TableUpdate, TokenStore,
};
use tokio::sync::watch;

use crate::error::SessionError;
use crate::hud::{self, Hud};
use crate::reconciler::TableSync;
use crate::scene::SceneGraph;
use crate::session::ClientSession;

/// Drives one client's connection through its states.
pub struct ConnectionLifecycleManager<K: Connector, T: TokenStore, S: SceneGraph> {
    connector: K,
    tokens: T,
    params: ConnectParams,
    fresh_identity: bool,
    state: ConnectionStateWatch,
    session: Option<ClientSession<K::Connection>>,
    sync: TableSync<S>,
    hud: Hud,
}

impl<K: Connector, T: TokenStore, S: SceneGraph> ConnectionLifecycleManager<K, T, S> {
    /// Manager connecting with `params`. Any token in `params` is replaced by
    /// the stored one at connect time.
    pub fn new(connector: K, tokens: T, params: ConnectParams, sync: TableSync<S>) -> Self {
        Self {
            connector,
            tokens,
            params,
            fresh_identity: false,
            state: ConnectionStateWatch::new(),
            session: None,
            sync,
            hud: Hud::new(),
        }
    }

    /// Ignore the stored token and connect as a new identity.
    pub fn with_fresh_identity(mut self, fresh: bool) -> Self {
        self.fresh_identity = fresh;
        self
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state.current()
    }

    /// Receiver notified on every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Status line and HUD.
    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    /// The reconciler set and its views.
    pub fn sync(&self) -> &TableSync<S> {
        &self.sync
    }

    /// The live session, if connected.
    pub fn session(&self) -> Option<&ClientSession<K::Connection>> {
        self.session.as_ref()
    }

    /// Our identity, if connected.
    pub fn identity(&self) -> Option<Identity> {
        self.session.as_ref().map(ClientSession::identity)
    }

    /// Token store.
    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Open the connection and request the subscription.
    ///
    /// On a connect error the status line shows the cause and the manager
    /// returns to `Disconnected`; there is no retry.
    pub fn connect(&mut self) -> Result<Identity, SessionError> {
        if self.session.is_some() {
            return Err(SessionError::AlreadyConnected);
        }

        self.state.set(ConnectionState::Connecting);
        let mut params = self.params.clone();
        params.token = self.stored_token();
        tracing::info!(
            "connecting to {} module {} ({})",
            params.uri,
            params.module_name,
            if params.token.is_some() { "stored token" } else { "anonymous" }
        );

        let Established {
            connection,
            connection_id,
            identity,
            token,
        } = match self.connector.connect(&params) {
            Ok(established) => established,
            Err(err) => {
                tracing::error!("failed to connect: {err}");
                self.hud.set_status(format!("Connection Error: {}", err.message()));
                self.state.set(ConnectionState::Disconnected);
                return Err(SessionError::Connect(err));
            }
        };

        if let Err(err) = self.tokens.store(&token) {
            tracing::warn!("could not persist auth token: {err}");
        }
        tracing::info!(%identity, "connected on {connection_id}");

        self.session = Some(ClientSession::new(connection, connection_id, identity));
        self.state.set(ConnectionState::Connected);
        self.hud.set_status(hud::STATUS_CONNECTED);
        self.hud.set_text(hud::HUD_WAITING);

        self.subscribe()?;
        Ok(identity)
    }

    fn stored_token(&self) -> Option<String> {
        if self.fresh_identity {
            return None;
        }
        match self.tokens.load() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!("could not read auth token, connecting anonymously: {err}");
                None
            }
        }
    }

    fn subscribe(&mut self) -> Result<(), SessionError> {
        let Some(session) = self.session.as_mut() else {
            return Err(SessionError::NotConnected);
        };
        match session.connection_mut().subscribe_to_all_tables() {
            Ok(()) => {
                self.state.set(ConnectionState::Subscribing);
                Ok(())
            }
            Err(err) => {
                tracing::error!("subscription request failed: {err}");
                self.hud
                    .set_status(format!("Subscription Error: {}", err.message()));
                Err(SessionError::Subscribe(err))
            }
        }
    }

    /// Route one event from the store.
    pub fn handle_event(&mut self, tagged: ConnectionEvent) {
        let ConnectionEvent { connection, event } = tagged;
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("dropping event from {connection} without a session: {event:?}");
            return;
        };
        if !session.owns(connection) {
            tracing::debug!(
                "dropping event from stale connection {connection} (live {}): {event:?}",
                session.connection_id()
            );
            return;
        }

        match event {
            RemoteEvent::SubscriptionApplied => {
                tracing::info!("subscribed to all tables");
                self.hud.set_status(hud::STATUS_SUBSCRIBED);
                self.state.set(ConnectionState::Subscribed);
            }
            RemoteEvent::SubscriptionError { message } => {
                tracing::error!("subscription failed: {message}");
                self.hud.set_status(format!("Subscription Error: {message}"));
                self.state.set(ConnectionState::Connected);
            }
            RemoteEvent::Disconnected { reason } => self.teardown(reason.as_deref()),
            RemoteEvent::Table(TableUpdate::PlayerInfo(event)) => {
                session.apply_player_info(&event);
            }
            RemoteEvent::Table(update) => {
                self.sync.apply(&update, session.players(), &mut self.hud);
            }
        }
    }

    /// Forward a paddle position in visual space to the store. Does nothing
    /// but warn when there is no connection.
    pub fn send_paddle_move(&mut self, visual_y: f32) -> bool {
        let Some(session) = self.session.as_mut() else {
            tracing::warn!("cannot send paddle move: not connected");
            return false;
        };
        let sim_y = self.sync.transform().to_sim_y(visual_y);
        match session.connection_mut().move_paddle(sim_y) {
            Ok(()) => {
                tracing::trace!("move_paddle({sim_y})");
                true
            }
            Err(err) => {
                tracing::warn!("move_paddle failed: {err}");
                false
            }
        }
    }

    /// Step the local scene.
    pub fn advance(&mut self, dt: f32) {
        self.sync.advance(dt);
    }

    /// Close the connection and clear all local state. Safe to call when
    /// already disconnected.
    pub fn shutdown(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.connection_mut().disconnect();
        }
        if self.session.is_some() || !self.sync.views().is_empty() {
            self.teardown(None);
        }
    }

    fn teardown(&mut self, reason: Option<&str>) {
        self.session = None;
        let removed = self.sync.teardown();
        match reason {
            Some(reason) => tracing::info!("disconnected ({reason}); removed {removed} views"),
            None => tracing::info!("disconnected; removed {removed} views"),
        }
        self.hud.set_status(hud::DISCONNECTED);
        self.hud.set_text(hud::DISCONNECTED);
        self.state.set(ConnectionState::Disconnected);
    }
}
