use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pyro_platform::{DrawSurface, FrameScheduler};
use tracing::{debug, info};

use crate::scene::{Scene, TickOutcome};

/// Cancels an [`AnimationLoop`]. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Self-rescheduling frame loop: every frame ticks the scene and asks the
/// host for another frame until stopped.
pub struct AnimationLoop<S, F> {
    scene: Scene<S>,
    scheduler: F,
    stop: StopHandle,
    frames: u64,
}

impl<S: DrawSurface, F: FrameScheduler> AnimationLoop<S, F> {
    /// Runs the first frame right away, which also schedules the next one.
    pub fn start(scene: Scene<S>, scheduler: F, now: f64) -> Self {
        let mut animation = Self {
            scene,
            scheduler,
            stop: StopHandle::default(),
            frames: 0,
        };
        info!("animation loop started");
        animation.frame(now);
        animation
    }

    pub fn frame(&mut self, now: f64) -> LoopState {
        if self.stop.is_stopped() {
            return LoopState::Stopped;
        }
        if let TickOutcome::Rendered {
            bursts, particles, ..
        } = self.scene.tick(now)
        {
            self.frames += 1;
            if bursts > 0 {
                debug!(frame = self.frames, bursts, particles, "frame rendered");
            }
        }
        self.scheduler.request_frame();
        LoopState::Running
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        if !self.stop.is_stopped() {
            info!(frames = self.frames, "animation loop stopped");
        }
        self.stop.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Frames that got past throttling.
    pub fn rendered_frames(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> &Scene<S> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene<S> {
        &mut self.scene
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }
}
