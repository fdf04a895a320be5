//! Client settings derived from the loaded [`Config`].

use std::path::PathBuf;
use std::time::Duration;

use pong_config::{Config, CourtConfig};
use pong_coords::{CoordinateTransform, CourtGeometry};
use pong_input::SurfaceRect;
use pong_net::ConnectParams;

/// Frame period of the local scene step.
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_micros(16_667);

/// Everything the client needs from configuration, in runtime types.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    /// Simulation ↔ visual mapping.
    pub transform: CoordinateTransform,
    /// Play-field surface, placed at the origin.
    pub surface: SurfaceRect,
    /// Where to connect. `token` is filled in from the token store.
    pub connect: ConnectParams,
    /// Minimum spacing of `move_paddle` calls.
    pub throttle: Duration,
    /// Local scene step period.
    pub frame_period: Duration,
    /// Ignore any stored token.
    pub fresh_identity: bool,
    /// Directory of the token file.
    pub token_dir: PathBuf,
    /// Key (file name) of the token.
    pub token_key: String,
}

impl ClientSettings {
    /// Derive settings from a loaded config.
    pub fn from_config(config: &Config) -> Self {
        let width = config.window.width as f32;
        let height = config.window.height as f32;
        Self {
            transform: CoordinateTransform::new(court_geometry(&config.court), width, height),
            surface: SurfaceRect::at_origin(width, height),
            connect: ConnectParams {
                uri: config.network.uri(),
                module_name: config.network.module_name.clone(),
                token: None,
            },
            throttle: Duration::from_millis(config.input.throttle_ms),
            frame_period: DEFAULT_FRAME_PERIOD,
            fresh_identity: config.auth.fresh_identity,
            token_dir: config.auth.resolved_token_dir(),
            token_key: config.auth.token_key.clone(),
        }
    }
}

/// Court geometry from its config section.
pub fn court_geometry(court: &CourtConfig) -> CourtGeometry {
    CourtGeometry {
        width: court.width,
        height: court.height,
        paddle_width: court.paddle_width,
        paddle_height: court.paddle_height,
        ball_radius: court.ball_radius,
        paddle_inset: court.paddle_inset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_court_constants() {
        let settings = ClientSettings::from_config(&Config::default());
        assert_eq!(settings.transform, CoordinateTransform::default());
        assert_eq!(settings.throttle, Duration::from_millis(8));
        assert_eq!(settings.connect.uri, "ws://127.0.0.1:3000");
        assert_eq!(settings.connect.module_name, "spacetime-pong");
        assert_eq!(settings.token_key, "auth_token");
        assert_eq!(settings.surface.height, 400.0);
    }

    #[test]
    fn test_resized_window_rescales() {
        let mut config = Config::default();
        config.window.width = 1000;
        config.window.height = 500;
        let settings = ClientSettings::from_config(&config);
        assert_eq!(settings.transform.scale(), glam::Vec2::new(100.0, 100.0));
        assert_eq!(settings.transform.left_paddle_x(), 50.0);
    }
}
