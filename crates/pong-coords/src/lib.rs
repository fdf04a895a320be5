//! Simulation space and visual space, and the mapping between them.
//!
//! # Coordinate Spaces
//!
//! 1. **Simulation Space**: the server's court. Origin at the centre, x grows
//!    right, y grows down the screen, measured in court units (10 × 5 by
//!    default).
//! 2. **Visual Space**: the play-field surface. Origin at the top-left,
//!    measured in pixels (800 × 400 by default).
//!
//! [`CoordinateTransform`] converts positions and sizes between the two. It
//! holds no mutable state; every method is a pure function of its inputs.
//!
//! ```rust
//! use pong_coords::{CoordinateTransform, CourtGeometry};
//!
//! let transform = CoordinateTransform::new(CourtGeometry::default(), 800.0, 400.0);
//! assert_eq!(transform.to_visual_x(0.0), 400.0);
//! assert_eq!(transform.to_sim_y(transform.to_visual_y(1.25)), 1.25);
//! ```

use glam::Vec2;

/// Court dimensions in simulation units. Mirrors the server's constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourtGeometry {
    /// Court width.
    pub width: f32,
    /// Court height.
    pub height: f32,
    /// Paddle width.
    pub paddle_width: f32,
    /// Paddle height.
    pub paddle_height: f32,
    /// Ball radius.
    pub ball_radius: f32,
    /// Distance from a side wall to the paddle centre line.
    pub paddle_inset: f32,
}

impl Default for CourtGeometry {
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

impl CourtGeometry {
    /// Absolute simulation-space x of either paddle's centre line.
    pub fn paddle_x_offset(&self) -> f32 {
        self.width / 2.0 - self.paddle_inset
    }
}

/// Bidirectional mapping between simulation space and visual space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    court: CourtGeometry,
    visual_size: Vec2,
    scale: Vec2,
}

impl CoordinateTransform {
    /// Build a transform for a court rendered onto a `visual_width` ×
    /// `visual_height` surface.
    pub fn new(court: CourtGeometry, visual_width: f32, visual_height: f32) -> Self {
        let visual_size = Vec2::new(visual_width, visual_height);
        let scale = visual_size / Vec2::new(court.width, court.height);
        Self {
            court,
            visual_size,
            scale,
        }
    }

    /// Court geometry this transform was built from.
    pub fn court(&self) -> &CourtGeometry {
        &self.court
    }

    /// Visual surface size in pixels.
    pub fn visual_size(&self) -> Vec2 {
        self.visual_size
    }

    /// Pixels per simulation unit along each axis.
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    // ── Positions ───────────────────────────────────────────────────

    /// Simulation x → visual x.
    pub fn to_visual_x(&self, sim_x: f32) -> f32 {
        (sim_x + self.court.width / 2.0) * self.scale.x
    }

    /// Simulation y → visual y.
    pub fn to_visual_y(&self, sim_y: f32) -> f32 {
        (sim_y + self.court.height / 2.0) * self.scale.y
    }

    /// Visual x → simulation x.
    pub fn to_sim_x(&self, visual_x: f32) -> f32 {
        visual_x / self.scale.x - self.court.width / 2.0
    }

    /// Visual y → simulation y.
    pub fn to_sim_y(&self, visual_y: f32) -> f32 {
        visual_y / self.scale.y - self.court.height / 2.0
    }

    /// Simulation point → visual point.
    pub fn to_visual(&self, sim: Vec2) -> Vec2 {
        Vec2::new(self.to_visual_x(sim.x), self.to_visual_y(sim.y))
    }

    /// Visual point → simulation point.
    pub fn to_sim(&self, visual: Vec2) -> Vec2 {
        Vec2::new(self.to_sim_x(visual.x), self.to_sim_y(visual.y))
    }

    // ── Derived sizes ───────────────────────────────────────────────

    /// Paddle width × height in pixels.
    pub fn paddle_size(&self) -> Vec2 {
        Vec2::new(self.court.paddle_width, self.court.paddle_height) * self.scale
    }

    /// Ball radius in pixels. Uses the x scale so the ball stays round.
    pub fn ball_radius(&self) -> f32 {
        self.court.ball_radius * self.scale.x
    }

    /// Visual x of the left paddle slot.
    pub fn left_paddle_x(&self) -> f32 {
        self.to_visual_x(-self.court.paddle_x_offset())
    }

    /// Visual x of the right paddle slot.
    pub fn right_paddle_x(&self) -> f32 {
        self.to_visual_x(self.court.paddle_x_offset())
    }

    /// Lowest and highest visual y a paddle centre may take without leaving
    /// the play field.
    pub fn paddle_y_bounds(&self) -> (f32, f32) {
        let half = self.paddle_size().y / 2.0;
        (half, self.visual_size.y - half)
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(CourtGeometry::default(), 800.0, 400.0)
    }
}
