//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directory name used under the platform config/data roots.
const APP_DIR: &str = "spacetime-pong";

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Play-field surface settings (visual space).
    pub window: WindowConfig,
    /// Court geometry (simulation space). Must match the server module.
    pub court: CourtConfig,
    /// Remote store connection settings.
    pub network: NetworkConfig,
    /// Input sampling settings.
    pub input: InputConfig,
    /// Authorization token persistence.
    pub auth: AuthConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Play-field surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Play-field width in pixels.
    pub width: u32,
    /// Play-field height in pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

/// Court dimensions in simulation units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CourtConfig {
    /// Court width (x spans `-width/2 ..= width/2`).
    pub width: f32,
    /// Court height (y spans `-height/2 ..= height/2`).
    pub height: f32,
    /// Paddle width.
    pub paddle_width: f32,
    /// Paddle height.
    pub paddle_height: f32,
    /// Ball radius.
    pub ball_radius: f32,
    /// Distance from the side wall to a paddle's centre line.
    pub paddle_inset: f32,
}

/// Remote store connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// `host:port` of the store.
    pub host: String,
    /// Logical database (module) name the client subscribes to.
    pub module_name: String,
    /// Use `wss://` instead of `ws://`.
    pub use_tls: bool,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Minimum interval between two paddle-move calls, in milliseconds.
    pub throttle_ms: u64,
}

/// Authorization token persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Fixed key the token is stored under.
    pub token_key: String,
    /// Directory holding the token file. `None` uses the platform data dir.
    pub token_dir: Option<PathBuf>,
    /// Skip the stored token and connect as a fresh identity.
    pub fresh_identity: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            title: "Spacetime Pong".to_string(),
        }
    }
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 5.0,
            paddle_width: 0.2,
            paddle_height: 1.0,
            ball_radius: 0.1,
            paddle_inset: 0.5,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1:3000".to_string(),
            module_name: "spacetime-pong".to_string(),
            use_tls: false,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { throttle_ms: 8 }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_key: "auth_token".to_string(),
            token_dir: None,
            fresh_identity: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl NetworkConfig {
    /// Transport URI built from host and TLS flag.
    pub fn uri(&self) -> String {
        let scheme = if self.use_tls { "wss" } else { "ws" };
        format!("{scheme}://{}", self.host)
    }
}

impl AuthConfig {
    /// Directory the token file lives in.
    pub fn resolved_token_dir(&self) -> PathBuf {
        match &self.token_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
        }
    }
}

/// Platform config directory for the client, falling back to `./.spacetime-pong`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(format!(".{APP_DIR}")))
}

/// File name of the persisted config.
pub const CONFIG_FILE_NAME: &str = "config.ron";

// --- Validation ---

impl Config {
    /// Reject values the coordinate mapping cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let court = &self.court;
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window must be non-empty, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !(court.width > 0.0 && court.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "court must have positive size, got {}x{}",
                court.width, court.height
            )));
        }
        if !(court.paddle_height > 0.0 && court.paddle_height < court.height) {
            return Err(ConfigError::Invalid(format!(
                "paddle height {} does not fit a court of height {}",
                court.paddle_height, court.height
            )));
        }
        if !(court.paddle_inset >= 0.0 && court.paddle_inset < court.width / 2.0) {
            return Err(ConfigError::Invalid(format!(
                "paddle inset {} puts paddles outside the court",
                court.paddle_inset
            )));
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("wrote default config to {}", path.display());
            return Ok(config);
        }
        let config = read_config(&path)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config to `config_dir/config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let write_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| ConfigError::Write { path, source }
        };
        std::fs::create_dir_all(config_dir).map_err(write_err(config_dir))?;

        let pretty = ron::ser::PrettyConfig::new().depth_limit(2);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        let path = config_dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, text).map_err(write_err(&path))
    }

    /// Re-read the file. `Some` carries the new config when it differs from
    /// `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_config(&config_dir.join(CONFIG_FILE_NAME))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("config changed on disk");
        Ok(Some(fresh))
    }
}
