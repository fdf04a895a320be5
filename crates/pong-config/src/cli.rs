//! Command-line argument parsing for the pong client.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, ConfigError};

/// Spacetime Pong client command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "pong", about = "Spacetime Pong client")]
pub struct CliArgs {
    /// Play-field width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Play-field height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Store address (`host:port`).
    #[arg(long)]
    pub host: Option<String>,

    /// Database/module name.
    #[arg(long)]
    pub module: Option<String>,

    /// Minimum milliseconds between paddle-move calls.
    #[arg(long)]
    pub throttle_ms: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Ignore the stored authorization token.
    #[arg(long)]
    pub fresh_identity: bool,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// The result is validated as a whole; if it is rejected `self` is left
    /// untouched.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) -> Result<(), ConfigError> {
        let mut next = self.clone();
        if let Some(w) = args.width {
            next.window.width = w;
        }
        if let Some(h) = args.height {
            next.window.height = h;
        }
        if let Some(ref host) = args.host {
            next.network.host = host.clone();
        }
        if let Some(ref module) = args.module {
            next.network.module_name = module.clone();
        }
        if let Some(ms) = args.throttle_ms {
            next.input.throttle_ms = ms;
        }
        if let Some(ref level) = args.log_level {
            next.debug.log_level = level.clone();
        }
        if args.fresh_identity {
            next.auth.fresh_identity = true;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1200),
            host: Some("192.168.1.11:3000".to_string()),
            throttle_ms: Some(16),
            fresh_identity: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args).unwrap();
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.network.host, "192.168.1.11:3000");
        assert_eq!(config.input.throttle_ms, 16);
        assert!(config.auth.fresh_identity);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 400);
        assert_eq!(config.network.module_name, "spacetime-pong");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default()).unwrap();
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_zero_size_rejected() {
        let original = Config::default();
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(0),
            module: Some("pong-dev".to_string()),
            ..Default::default()
        };
        let err = config.apply_cli_overrides(&args).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("0x400"));
        // Nothing from a rejected override set is applied
        assert_eq!(config, original);

        let args = CliArgs::parse_from(["pong", "--height", "0"]);
        assert!(config.apply_cli_overrides(&args).is_err());
        assert_eq!(config.window.height, 400);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["pong", "--module", "pong-dev", "--fresh-identity"]);
        assert_eq!(args.module.as_deref(), Some("pong-dev"));
        assert!(args.fresh_identity);
        assert!(args.width.is_none());
    }
}
