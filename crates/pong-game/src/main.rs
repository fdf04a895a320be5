//! Spacetime Pong headless client.
//!
//! Loads `config.ron`, applies CLI overrides, initializes logging, and plays
//! a scripted match against the in-process loopback store through the real
//! client loop: reconciliation, pointer throttling and teardown included.
//!
//! Run with: `cargo run -p pong-game`

mod demo;

use std::time::Duration;

use clap::Parser;
use pong_client::{ClientRuntime, ClientSettings, ConnectionLifecycleManager, EcsScene, TableSync};
use pong_config::{CliArgs, Config, default_config_dir};
use pong_net::{FileTokenStore, LoopbackStore};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Server ticks the scripted match lasts.
const MATCH_TICKS: u32 = 600;
/// Server tick period.
const SERVER_TICK: Duration = Duration::from_millis(16);

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let (mut config, config_err) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    let override_err = config.apply_cli_overrides(&args).err();

    pong_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );
    if let Some(err) = config_err {
        error!("failed to load config from {}: {err}; using defaults", config_dir.display());
    }
    if let Some(err) = override_err {
        error!("ignoring command-line overrides: {err}");
    }

    info!("{}", config.window.title);
    info!(
        "Surface: {}x{} | Court: {}x{} | Throttle: {}ms",
        config.window.width,
        config.window.height,
        config.court.width,
        config.court.height,
        config.input.throttle_ms,
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("failed to start async runtime: {err}");
            return;
        }
    };

    runtime.block_on(run(ClientSettings::from_config(&config)));
}

async fn run(settings: ClientSettings) {
    let (store, events) = LoopbackStore::new(settings.connect.module_name.clone());
    let tokens = FileTokenStore::new(&settings.token_dir, &settings.token_key);
    info!("auth token file: {}", tokens.path().display());

    let sync = TableSync::new(EcsScene::new(), settings.transform);
    let manager = ConnectionLifecycleManager::new(
        store.connector(),
        tokens,
        settings.connect.clone(),
        sync,
    )
    .with_fresh_identity(settings.fresh_identity);

    let mut client = ClientRuntime::new(
        manager,
        settings.surface,
        settings.throttle,
        settings.frame_period,
    );

    let me = match client.manager_mut().connect() {
        Ok(identity) => identity,
        Err(err) => {
            error!("{err}");
            return;
        }
    };
    info!("playing as {me}");
    demo::seed(&store, me);

    let (inputs, inputs_rx) = mpsc::unbounded_channel();
    let script = demo::play(
        store.clone(),
        settings.transform,
        inputs,
        MATCH_TICKS,
        SERVER_TICK,
    );
    let ((), score) = tokio::join!(client.run(events, inputs_rx), script);

    info!("final score: {} - {}", score.left, score.right);
    info!(
        "paddle moves sent: {} over {} ticks",
        store.paddle_moves().len(),
        MATCH_TICKS
    );
    info!("status: {}", client.manager().hud().status());
}
