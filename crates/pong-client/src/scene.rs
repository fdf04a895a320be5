//! Visual scene graph the client renders from.
//!
//! [`SceneGraph`] is the boundary to the rendering engine: rectangles and
//! circles positioned in visual space (pixels, origin top-left). [`EcsScene`]
//! implements it on a `bevy_ecs` [`World`]. Every body is one entity carrying
//! [`VisualPosition`], [`VisualVelocity`], [`BodyShape`] and [`BodyLabel`];
//! static bodies additionally carry [`StaticBody`] and are skipped by
//! [`EcsScene::step`].

use std::fmt::Debug;
use std::hash::Hash;

use bevy_ecs::prelude::*;
use glam::Vec2;

// ---------------------------------------------------------------------------
// SceneGraph
// ---------------------------------------------------------------------------

/// Construct, move and destroy visual bodies.
pub trait SceneGraph {
    /// Opaque handle to a body in this scene.
    type Handle: Copy + Eq + Hash + Debug;

    /// Add an axis-aligned rectangle centred on `center`.
    fn add_rectangle(
        &mut self,
        label: &str,
        center: Vec2,
        size: Vec2,
        is_static: bool,
    ) -> Self::Handle;

    /// Add a dynamic circle centred on `center`.
    fn add_circle(&mut self, label: &str, center: Vec2, radius: f32) -> Self::Handle;

    /// Centre of a body, or `None` if the handle is dead.
    fn position(&self, handle: Self::Handle) -> Option<Vec2>;

    /// Move a body. Returns `false` if the handle is dead.
    fn set_position(&mut self, handle: Self::Handle, position: Vec2) -> bool;

    /// Velocity of a body in pixels per second.
    fn velocity(&self, handle: Self::Handle) -> Option<Vec2>;

    /// Set a body's velocity. Returns `false` if the handle is dead.
    fn set_velocity(&mut self, handle: Self::Handle, velocity: Vec2) -> bool;

    /// Remove a body. Returns `false` if the handle was already dead.
    fn remove(&mut self, handle: Self::Handle) -> bool;

    /// Number of live bodies.
    fn body_count(&self) -> usize;

    /// Advance the local simulation by `dt` seconds.
    fn step(&mut self, dt: f32);
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Body centre in visual space.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct VisualPosition(pub Vec2);

/// Body velocity in pixels per second.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct VisualVelocity(pub Vec2);

/// Geometry of a body.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum BodyShape {
    /// Axis-aligned rectangle of the given full size.
    Rectangle {
        /// Width and height in pixels.
        size: Vec2,
    },
    /// Circle of the given radius.
    Circle {
        /// Radius in pixels.
        radius: f32,
    },
}

/// Debug label, e.g. `paddle_<hex>` or `ball`.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct BodyLabel(pub String);

/// Marker for bodies that the local step never moves.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct StaticBody;

// ---------------------------------------------------------------------------
// EcsScene
// ---------------------------------------------------------------------------

/// [`SceneGraph`] backed by a `bevy_ecs` world.
#[derive(Default)]
pub struct EcsScene {
    world: World,
}

impl EcsScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Underlying world, for render extraction and inspection.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Shape of a body.
    pub fn shape(&self, handle: Entity) -> Option<BodyShape> {
        self.world.get::<BodyShape>(handle).copied()
    }

    /// Label of a body.
    pub fn label(&self, handle: Entity) -> Option<&str> {
        self.world
            .get::<BodyLabel>(handle)
            .map(|label| label.0.as_str())
    }

    /// Whether the body is static.
    pub fn is_static(&self, handle: Entity) -> bool {
        self.world.get::<StaticBody>(handle).is_some()
    }

    /// Entity of the first body with the given label.
    pub fn find_by_label(&self, label: &str) -> Option<Entity> {
        self.world
            .iter_entities()
            .find(|e| e.get::<BodyLabel>().is_some_and(|l| l.0 == label))
            .map(|e| e.id())
    }
}

impl SceneGraph for EcsScene {
    type Handle = Entity;

    fn add_rectangle(&mut self, label: &str, center: Vec2, size: Vec2, is_static: bool) -> Entity {
        let mut body = self.world.spawn((
            VisualPosition(center),
            VisualVelocity::default(),
            BodyShape::Rectangle { size },
            BodyLabel(label.to_string()),
        ));
        if is_static {
            body.insert(StaticBody);
        }
        body.id()
    }

    fn add_circle(&mut self, label: &str, center: Vec2, radius: f32) -> Entity {
        self.world
            .spawn((
                VisualPosition(center),
                VisualVelocity::default(),
                BodyShape::Circle { radius },
                BodyLabel(label.to_string()),
            ))
            .id()
    }

    fn position(&self, handle: Entity) -> Option<Vec2> {
        self.world.get::<VisualPosition>(handle).map(|p| p.0)
    }

    fn set_position(&mut self, handle: Entity, position: Vec2) -> bool {
        match self.world.get_mut::<VisualPosition>(handle) {
            Some(mut p) => {
                p.0 = position;
                true
            }
            None => false,
        }
    }

    fn velocity(&self, handle: Entity) -> Option<Vec2> {
        self.world.get::<VisualVelocity>(handle).map(|v| v.0)
    }

    fn set_velocity(&mut self, handle: Entity, velocity: Vec2) -> bool {
        match self.world.get_mut::<VisualVelocity>(handle) {
            Some(mut v) => {
                v.0 = velocity;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, handle: Entity) -> bool {
        self.world.despawn(handle)
    }

    fn body_count(&self) -> usize {
        self.world.iter_entities().count()
    }

    fn step(&mut self, dt: f32) {
        let mut query = self
            .world
            .query_filtered::<(&mut VisualPosition, &VisualVelocity), Without<StaticBody>>();
        for (mut position, velocity) in query.iter_mut(&mut self.world) {
            position.0 += velocity.0 * dt;
        }
    }
}
