//! Per-table reconciliation of remote rows into local views.
//!
//! Each replicated table that has a visual counterpart gets one
//! [`TableReconciler`]. Reconcilers are stateless; everything they touch is
//! passed in through a [`ReconcileCx`]. [`TableSync`] owns the registry, the
//! coordinate transform and one reconciler per table, and routes
//! [`TableUpdate`]s to them.

use glam::Vec2;
use pong_coords::CoordinateTransform;
use pong_net::{Ball, GameState, Identity, PlayerInfo, PlayerInput, Side, TableEvent, TableUpdate};

use crate::hud::{self, Hud};
use crate::registry::EntityViewRegistry;
use crate::scene::SceneGraph;

/// Label of the ball body.
pub const BALL_LABEL: &str = "ball";

/// Label of a paddle body for the given registry key.
pub fn paddle_label(key: &str) -> String {
    format!("paddle_{key}")
}

// ---------------------------------------------------------------------------
// Side → slot policy
// ---------------------------------------------------------------------------

/// Side of `player_id` according to the `player_info` projection.
pub fn lookup_side(players: &[PlayerInfo], player_id: Identity) -> Option<Side> {
    players
        .iter()
        .find(|info| info.player_id == player_id)
        .map(|info| info.side)
}

/// Visual x of the paddle slot for a side. A player with no known side is
/// put in the right slot.
pub fn slot_x(transform: &CoordinateTransform, side: Option<Side>) -> f32 {
    match side {
        Some(Side::Left) => transform.left_paddle_x(),
        Some(Side::Right) | None => transform.right_paddle_x(),
    }
}

// ---------------------------------------------------------------------------
// ReconcileCx / TableReconciler
// ---------------------------------------------------------------------------

/// Everything a reconciler may read or write while handling one event.
pub struct ReconcileCx<'a, S: SceneGraph> {
    /// Local views; the only path to the scene.
    pub views: &'a mut EntityViewRegistry<S>,
    /// Simulation ↔ visual mapping.
    pub transform: &'a CoordinateTransform,
    /// Current `player_info` projection.
    pub players: &'a [PlayerInfo],
    /// Text surfaces.
    pub hud: &'a mut Hud,
}

/// Translates one table's row lifecycle into view operations.
pub trait TableReconciler {
    /// Row type of the table.
    type Row;

    /// A row became visible.
    fn insert<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, row: &Self::Row);

    /// A row changed.
    fn update<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, old: &Self::Row, new: &Self::Row);

    /// A row went away.
    fn delete<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, row: &Self::Row);

    /// Dispatch a [`TableEvent`] to the matching handler.
    fn apply<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, event: &TableEvent<Self::Row>) {
        match event {
            TableEvent::Insert(row) => self.insert(cx, row),
            TableEvent::Update { old, new } => self.update(cx, old, new),
            TableEvent::Delete(row) => self.delete(cx, row),
        }
    }
}

// ---------------------------------------------------------------------------
// Paddles
// ---------------------------------------------------------------------------

/// `player_input` → one static rectangle per player.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddleReconciler;

/// Move a paddle vertically, keeping the x slot it was created in.
fn set_paddle_y<S: SceneGraph>(scene: &mut S, handle: S::Handle, visual_y: f32) {
    if let Some(current) = scene.position(handle) {
        scene.set_position(handle, Vec2::new(current.x, visual_y));
    }
}

impl TableReconciler for PaddleReconciler {
    type Row = PlayerInput;

    fn insert<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, row: &PlayerInput) {
        let key = row.player_id.to_hex();
        let visual_y = cx.transform.to_visual_y(row.paddle_y);

        let side = lookup_side(cx.players, row.player_id);
        if side.is_none() {
            tracing::warn!("no player_info for {key}; placing paddle in the right slot");
        }
        let center = Vec2::new(slot_x(cx.transform, side), visual_y);
        let size = cx.transform.paddle_size();
        let label = paddle_label(&key);

        cx.views.upsert(
            &key,
            |scene| scene.add_rectangle(&label, center, size, true),
            |scene, handle| set_paddle_y(scene, handle, visual_y),
        );
    }

    fn update<S: SceneGraph>(
        &self,
        cx: &mut ReconcileCx<'_, S>,
        _old: &PlayerInput,
        new: &PlayerInput,
    ) {
        let key = new.player_id.to_hex();
        let visual_y = cx.transform.to_visual_y(new.paddle_y);
        cx.views.update(&key, |scene, handle| set_paddle_y(scene, handle, visual_y));
    }

    fn delete<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, row: &PlayerInput) {
        cx.views.remove(&row.player_id.to_hex());
    }
}

// ---------------------------------------------------------------------------
// Ball
// ---------------------------------------------------------------------------

/// `ball` → the single dynamic circle.
#[derive(Debug, Clone, Copy, Default)]
pub struct BallReconciler;

/// Snap the ball to the authoritative position and stop any local motion.
fn place_ball<S: SceneGraph>(scene: &mut S, handle: S::Handle, center: Vec2) {
    scene.set_position(handle, center);
    scene.set_velocity(handle, Vec2::ZERO);
}

impl TableReconciler for BallReconciler {
    type Row = Ball;

    fn insert<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, row: &Ball) {
        let center = cx.transform.to_visual(Vec2::new(row.x, row.y));
        let radius = cx.transform.ball_radius();
        cx.views.upsert_singleton(
            |scene| scene.add_circle(BALL_LABEL, center, radius),
            |scene, handle| place_ball(scene, handle, center),
        );
    }

    fn update<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, _old: &Ball, new: &Ball) {
        let center = cx.transform.to_visual(Vec2::new(new.x, new.y));
        cx.views.update_singleton(|scene, handle| place_ball(scene, handle, center));
    }

    fn delete<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, _row: &Ball) {
        cx.views.remove_singleton();
    }
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// `game_state` → HUD text. Has no visual body.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameStateReconciler;

impl TableReconciler for GameStateReconciler {
    type Row = GameState;

    fn insert<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, row: &GameState) {
        cx.hud.set_text(hud::score_line(row));
    }

    fn update<S: SceneGraph>(
        &self,
        cx: &mut ReconcileCx<'_, S>,
        _old: &GameState,
        new: &GameState,
    ) {
        cx.hud.set_text(hud::score_line(new));
    }

    fn delete<S: SceneGraph>(&self, cx: &mut ReconcileCx<'_, S>, _row: &GameState) {
        cx.hud.set_text(hud::HUD_RESETTING);
    }
}

// ---------------------------------------------------------------------------
// TableSync
// ---------------------------------------------------------------------------

/// The reconciler set: owns the registry and routes table events.
pub struct TableSync<S: SceneGraph> {
    views: EntityViewRegistry<S>,
    transform: CoordinateTransform,
    paddles: PaddleReconciler,
    ball: BallReconciler,
    game_state: GameStateReconciler,
}

impl<S: SceneGraph> TableSync<S> {
    /// Reconciler set drawing into `scene` through `transform`.
    pub fn new(scene: S, transform: CoordinateTransform) -> Self {
        Self {
            views: EntityViewRegistry::new(scene),
            transform,
            paddles: PaddleReconciler,
            ball: BallReconciler,
            game_state: GameStateReconciler,
        }
    }

    /// Local views.
    pub fn views(&self) -> &EntityViewRegistry<S> {
        &self.views
    }

    /// Coordinate mapping in use.
    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Apply one table event. `player_info` events carry no visuals and are
    /// ignored here; the caller keeps that projection.
    pub fn apply(&mut self, update: &TableUpdate, players: &[PlayerInfo], hud: &mut Hud) {
        tracing::debug!(table = update.table_name(), kind = update.kind(), "reconcile");
        let mut cx = ReconcileCx {
            views: &mut self.views,
            transform: &self.transform,
            players,
            hud,
        };
        match update {
            TableUpdate::PlayerInput(event) => self.paddles.apply(&mut cx, event),
            TableUpdate::Ball(event) => self.ball.apply(&mut cx, event),
            TableUpdate::GameState(event) => self.game_state.apply(&mut cx, event),
            TableUpdate::PlayerInfo(_) => {}
        }
    }

    /// Step the local scene.
    pub fn advance(&mut self, dt: f32) {
        self.views.advance(dt);
    }

    /// Destroy every local view. Returns how many bodies were removed.
    pub fn teardown(&mut self) -> usize {
        self.views.clear()
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
