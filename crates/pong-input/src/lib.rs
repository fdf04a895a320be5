//! Pointer sampling and rate limiting of outbound control input.
//!
//! [`PointerSampler`] turns raw pointer coordinates into a clamped play-field
//! position; [`InputThrottler`] decides when a sample may actually be sent.

pub mod pointer;
pub mod throttle;

pub use pointer::{PointerSampler, SurfaceRect};
pub use throttle::{InputThrottler, ThrottlePhase};
