//! Remote identity → local visual object mapping.
//!
//! [`EntityViewRegistry`] is the only code that adds bodies to or removes
//! bodies from the scene. It keeps, for paddles keyed by player identity and
//! for the single ball, exactly one local body per known remote row.

use std::collections::HashMap;

use crate::scene::SceneGraph;

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No object existed; one was constructed.
    Created,
    /// An object existed and was updated in place.
    Updated,
}

/// Owns the scene and the key → body maps.
pub struct EntityViewRegistry<S: SceneGraph> {
    scene: S,
    paddles: HashMap<String, S::Handle>,
    ball: Option<S::Handle>,
}

impl<S: SceneGraph> EntityViewRegistry<S> {
    /// Wraps an (empty) scene.
    pub fn new(scene: S) -> Self {
        Self {
            scene,
            paddles: HashMap::new(),
            ball: None,
        }
    }

    /// Read access to the scene.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Direct scene access for tests that need to perturb bodies.
    #[cfg(test)]
    pub(crate) fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Step the local scene simulation.
    pub fn advance(&mut self, dt: f32) {
        self.scene.step(dt);
    }

    // ── Keyed objects ───────────────────────────────────────────────

    /// Construct the object for `key` if absent, otherwise update it.
    pub fn upsert(
        &mut self,
        key: &str,
        construct: impl FnOnce(&mut S) -> S::Handle,
        update: impl FnOnce(&mut S, S::Handle),
    ) -> UpsertOutcome {
        match self.paddles.get(key) {
            Some(&handle) => {
                update(&mut self.scene, handle);
                UpsertOutcome::Updated
            }
            None => {
                let handle = construct(&mut self.scene);
                self.paddles.insert(key.to_string(), handle);
                tracing::debug!("created view for {key}");
                UpsertOutcome::Created
            }
        }
    }

    /// Update the object for `key`. Warns and returns `false` if unknown.
    pub fn update(&mut self, key: &str, update: impl FnOnce(&mut S, S::Handle)) -> bool {
        match self.paddles.get(key) {
            Some(&handle) => {
                update(&mut self.scene, handle);
                true
            }
            None => {
                tracing::warn!("update for unknown view {key}");
                false
            }
        }
    }

    /// Destroy the object for `key`. Warns and returns `false` if unknown.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.paddles.remove(key) {
            Some(handle) => {
                self.scene.remove(handle);
                tracing::debug!("removed view for {key}");
                true
            }
            None => {
                tracing::warn!("remove for unknown view {key}");
                false
            }
        }
    }

    /// Whether an object exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.paddles.contains_key(key)
    }

    /// Handle of the object for `key`.
    pub fn get(&self, key: &str) -> Option<S::Handle> {
        self.paddles.get(key).copied()
    }

    /// Number of keyed objects.
    pub fn len(&self) -> usize {
        self.paddles.len()
    }

    /// Whether there are no keyed objects.
    pub fn is_empty(&self) -> bool {
        self.paddles.is_empty()
    }

    /// Keys with a live object, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.paddles.keys().map(String::as_str)
    }

    // ── Singleton ───────────────────────────────────────────────────

    /// Construct the singleton if absent, otherwise update it.
    pub fn upsert_singleton(
        &mut self,
        construct: impl FnOnce(&mut S) -> S::Handle,
        update: impl FnOnce(&mut S, S::Handle),
    ) -> UpsertOutcome {
        match self.ball {
            Some(handle) => {
                update(&mut self.scene, handle);
                UpsertOutcome::Updated
            }
            None => {
                self.ball = Some(construct(&mut self.scene));
                tracing::debug!("created singleton view");
                UpsertOutcome::Created
            }
        }
    }

    /// Update the singleton. Warns and returns `false` if absent.
    pub fn update_singleton(&mut self, update: impl FnOnce(&mut S, S::Handle)) -> bool {
        match self.ball {
            Some(handle) => {
                update(&mut self.scene, handle);
                true
            }
            None => {
                tracing::warn!("update for absent singleton view");
                false
            }
        }
    }

    /// Destroy the singleton. Warns and returns `false` if absent. A later
    /// upsert constructs a fresh object.
    pub fn remove_singleton(&mut self) -> bool {
        match self.ball.take() {
            Some(handle) => {
                self.scene.remove(handle);
                tracing::debug!("removed singleton view");
                true
            }
            None => {
                tracing::warn!("remove for absent singleton view");
                false
            }
        }
    }

    /// Handle of the singleton.
    pub fn singleton(&self) -> Option<S::Handle> {
        self.ball
    }

    // ── Teardown ────────────────────────────────────────────────────

    /// Destroy every object, keyed and singleton. Returns how many were
    /// removed.
    pub fn clear(&mut self) -> usize {
        let mut removed = 0;
        for (_, handle) in self.paddles.drain() {
            self.scene.remove(handle);
            removed += 1;
        }
        if let Some(handle) = self.ball.take() {
            self.scene.remove(handle);
            removed += 1;
        }
        removed
    }
}
