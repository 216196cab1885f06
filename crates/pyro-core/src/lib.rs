//! Pyro core engine: platform-agnostic logic for tails, particles, and the frame loop.

pub mod animation;
pub mod config;
pub mod lifecycle;
pub mod particle;
pub mod scene;
pub mod tail;
pub mod timing;

#[cfg(test)]
pub(crate) mod testing;

pub use animation::{AnimationLoop, LoopState, StopHandle};
pub use config::{ConfigError, SceneConfig};
pub use lifecycle::Lifecycle;
pub use particle::Particle;
pub use scene::{Scene, TickOutcome};
pub use tail::Tail;
pub use timing::FrameTimer;
