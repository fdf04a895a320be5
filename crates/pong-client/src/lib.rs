//! Client-side reconciliation of replicated pong tables into a local scene.
//!
//! Data flows one way into the scene: store events are routed by the
//! [`ConnectionLifecycleManager`] to the per-table reconcilers in
//! [`TableSync`], which edit the [`EntityViewRegistry`], the only owner of
//! scene bodies. Pointer input flows the other way through
//! [`ClientRuntime`]: sampled, clamped, throttled, converted to simulation
//! space and sent as a `move_paddle` call.

pub mod error;
pub mod hud;
pub mod lifecycle;
pub mod reconciler;
pub mod registry;
pub mod runtime;
pub mod scene;
pub mod session;
pub mod settings;

pub use error::SessionError;
pub use hud::Hud;
pub use lifecycle::ConnectionLifecycleManager;
pub use reconciler::{
    BallReconciler, GameStateReconciler, PaddleReconciler, ReconcileCx, TableReconciler,
    TableSync,
};
pub use registry::{EntityViewRegistry, UpsertOutcome};
pub use runtime::{ClientInput, ClientRuntime};
pub use scene::{EcsScene, SceneGraph};
pub use session::ClientSession;
pub use settings::ClientSettings;
