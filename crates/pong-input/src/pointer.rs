//! Pointer sampling relative to the render surface.
//!
//! Pointer events arrive in window/client coordinates. [`PointerSampler`]
//! subtracts the surface's bounding rectangle and clamps the result so a
//! paddle centred on it stays inside the play field.

use glam::Vec2;

/// Bounding rectangle of the render surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl SurfaceRect {
    /// A rectangle anchored at the client origin.
    pub fn at_origin(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Whether a client-space point lies inside the rectangle.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.left + self.width
            && point.y >= self.top
            && point.y <= self.top + self.height
    }
}

/// Converts client pointer coordinates into clamped visual-space paddle
/// positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSampler {
    surface: SurfaceRect,
    min_y: f32,
    max_y: f32,
}

impl PointerSampler {
    /// `min_y`/`max_y` are the visual-space limits for the paddle centre.
    pub fn new(surface: SurfaceRect, min_y: f32, max_y: f32) -> Self {
        Self {
            surface,
            min_y,
            max_y,
        }
    }

    /// Current surface rectangle.
    pub fn surface(&self) -> SurfaceRect {
        self.surface
    }

    /// Update the surface rectangle after a layout change.
    pub fn set_surface(&mut self, surface: SurfaceRect) {
        self.surface = surface;
    }

    /// Visual-space paddle y for a pointer at `client_y`.
    pub fn sample_y(&self, client_y: f32) -> f32 {
        let surface_y = client_y - self.surface.top;
        surface_y.clamp(self.min_y, self.max_y)
    }

    /// Visual-space point for a pointer at `client`, with y clamped to the
    /// paddle range and x clamped to the surface.
    pub fn sample(&self, client: Vec2) -> Vec2 {
        let x = (client.x - self.surface.left).clamp(0.0, self.surface.width);
        Vec2::new(x, self.sample_y(client.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler() -> PointerSampler {
        let surface = SurfaceRect {
            left: 100.0,
            top: 50.0,
            width: 800.0,
            height: 400.0,
        };
        PointerSampler::new(surface, 40.0, 360.0)
    }

    #[test]
    fn test_sample_is_relative_to_surface_top() {
        assert_eq!(sampler().sample_y(250.0), 200.0);
    }

    #[test]
    fn test_sample_clamps_to_paddle_range() {
        let s = sampler();
        assert_eq!(s.sample_y(0.0), 40.0);
        assert_eq!(s.sample_y(60.0), 40.0);
        assert_eq!(s.sample_y(1000.0), 360.0);
    }

    #[test]
    fn test_sample_point_clamps_x_to_surface() {
        let s = sampler();
        assert_eq!(s.sample(Vec2::new(50.0, 250.0)), Vec2::new(0.0, 200.0));
        assert_eq!(s.sample(Vec2::new(2000.0, 250.0)), Vec2::new(800.0, 200.0));
    }

    #[test]
    fn test_set_surface_moves_origin() {
        let mut s = sampler();
        s.set_surface(SurfaceRect::at_origin(800.0, 400.0));
        assert_eq!(s.sample_y(250.0), 250.0);
    }

    #[test]
    fn test_surface_contains() {
        let rect = SurfaceRect::at_origin(10.0, 10.0);
        assert!(rect.contains(Vec2::new(5.0, 5.0)));
        assert!(!rect.contains(Vec2::new(11.0, 5.0)));
    }
}
