//! Configuration for the pong client.
//!
//! Settings persist to disk as RON, every section falls back to defaults when
//! missing, and command-line flags override whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AuthConfig, Config, CourtConfig, DebugConfig, InputConfig, NetworkConfig, WindowConfig,
    CONFIG_FILE_NAME, default_config_dir,
};
pub use error::ConfigError;
