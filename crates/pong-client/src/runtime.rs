//! The client's single-threaded event loop.
//!
//! One task multiplexes store events, local input, the throttle deadline and
//! the frame tick with `tokio::select!`. Nothing here is `Send`; run it on a
//! current-thread runtime or inside a `LocalSet`.

use std::time::Duration;

use pong_input::{InputThrottler, PointerSampler, SurfaceRect};
use pong_net::{ConnectionEvent, Connector, TokenStore};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::lifecycle::ConnectionLifecycleManager;
use crate::scene::SceneGraph;

/// Local input delivered to the runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClientInput {
    /// Pointer moved; `client_y` is in client (window) coordinates.
    PointerMoved {
        /// Pointer y.
        client_y: f32,
    },
    /// The surface moved or was resized.
    SurfaceChanged(SurfaceRect),
    /// Stop the loop and clean up.
    Shutdown,
}

/// Lifecycle manager plus the pointer pipeline in front of it.
pub struct ClientRuntime<K: Connector, T: TokenStore, S: SceneGraph> {
    manager: ConnectionLifecycleManager<K, T, S>,
    sampler: PointerSampler,
    throttler: InputThrottler<f32>,
    frame_period: Duration,
}

impl<K: Connector, T: TokenStore, S: SceneGraph> ClientRuntime<K, T, S> {
    /// Wrap a manager. Pointer samples are clamped to the paddle's travel
    /// range and sent at most once per `throttle`.
    pub fn new(
        manager: ConnectionLifecycleManager<K, T, S>,
        surface: SurfaceRect,
        throttle: Duration,
        frame_period: Duration,
    ) -> Self {
        let (min_y, max_y) = manager.sync().transform().paddle_y_bounds();
        Self {
            manager,
            sampler: PointerSampler::new(surface, min_y, max_y),
            throttler: InputThrottler::new(throttle),
            frame_period,
        }
    }

    /// The wrapped manager.
    pub fn manager(&self) -> &ConnectionLifecycleManager<K, T, S> {
        &self.manager
    }

    /// Mutable access to the wrapped manager.
    pub fn manager_mut(&mut self) -> &mut ConnectionLifecycleManager<K, T, S> {
        &mut self.manager
    }

    /// Consume the runtime, returning the manager.
    pub fn into_manager(self) -> ConnectionLifecycleManager<K, T, S> {
        self.manager
    }

    /// Feed a pointer sample through the throttle. Returns `true` if a
    /// paddle move was sent now.
    pub fn pointer_moved(&mut self, client_y: f32, now: Instant) -> bool {
        let visual_y = self.sampler.sample_y(client_y);
        let manager = &mut self.manager;
        self.throttler.call(visual_y, now.into_std(), |y| {
            manager.send_paddle_move(y);
        })
    }

    /// Drive the throttle timer. Returns `true` if a trailing move was sent.
    pub fn throttle_elapsed(&mut self, now: Instant) -> bool {
        let manager = &mut self.manager;
        self.throttler.fire(now.into_std(), |y| {
            manager.send_paddle_move(y);
        })
    }

    /// Apply one store event. Any queued move is dropped once the
    /// connection is gone.
    pub fn remote_event(&mut self, event: ConnectionEvent) {
        self.manager.handle_event(event);
        if !self.manager.state().is_connected() {
            self.throttler.reset();
        }
    }

    /// Run until [`ClientInput::Shutdown`] arrives or the input channel
    /// closes, then disconnect and clear all views.
    pub async fn run(
        &mut self,
        mut events: mpsc::UnboundedReceiver<ConnectionEvent>,
        mut inputs: mpsc::UnboundedReceiver<ClientInput>,
    ) {
        let mut frames = time::interval(self.frame_period);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let dt = self.frame_period.as_secs_f32();

        loop {
            let deadline = self.throttler.deadline().map(Instant::from_std);
            let wake = deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                biased;

                Some(event) = events.recv() => self.remote_event(event),

                input = inputs.recv() => match input {
                    Some(ClientInput::PointerMoved { client_y }) => {
                        self.pointer_moved(client_y, Instant::now());
                    }
                    Some(ClientInput::SurfaceChanged(surface)) => {
                        self.sampler.set_surface(surface);
                    }
                    Some(ClientInput::Shutdown) | None => break,
                },

                _ = time::sleep_until(wake), if deadline.is_some() => {
                    self.throttle_elapsed(Instant::now());
                }

                _ = frames.tick() => self.manager.advance(dt),
            }
        }

        tracing::info!("client loop stopping");
        self.throttler.reset();
        self.manager.shutdown();
    }
}
