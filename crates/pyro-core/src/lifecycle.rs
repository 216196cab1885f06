//! Binds a scene to a host component's mount, resize, and unmount events.

use pyro_platform::{DrawSurface, FrameScheduler, Viewport};
use tracing::{debug, info};

use crate::animation::{AnimationLoop, LoopState, StopHandle};
use crate::config::SceneConfig;
use crate::scene::Scene;

pub struct Lifecycle<S, F> {
    config: SceneConfig,
    animation: Option<AnimationLoop<S, F>>,
    listening_for_resize: bool,
}

impl<S: DrawSurface, F: FrameScheduler> Lifecycle<S, F> {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            animation: None,
            listening_for_resize: false,
        }
    }

    /// Builds a scene on `surface`, sizes it, and starts the loop.
    /// Mounting again tears the previous loop down first.
    pub fn mount(&mut self, surface: S, scheduler: F, viewport: Viewport, now: f64) -> StopHandle {
        if self.animation.is_some() {
            debug!("remounting; stopping the previous loop");
            self.unmount();
        }
        let mut scene = Scene::new(surface, viewport, self.config.clone(), now);
        scene.init(viewport);
        let animation = AnimationLoop::start(scene, scheduler, now);
        let handle = animation.stop_handle();
        self.animation = Some(animation);
        self.listening_for_resize = true;
        info!("mounted at {}x{}", viewport.width, viewport.height);
        handle
    }

    /// Re-sizes the surface. Returns false when nothing is listening.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        match self.animation.as_mut() {
            Some(animation) if self.listening_for_resize => {
                animation.scene_mut().init(viewport);
                true
            }
            _ => {
                debug!("resize to {}x{} ignored; not mounted", viewport.width, viewport.height);
                false
            }
        }
    }

    pub fn frame(&mut self, now: f64) -> LoopState {
        match self.animation.as_mut() {
            Some(animation) => animation.frame(now),
            None => LoopState::Stopped,
        }
    }

    /// Stops listening for resize, stops the loop, and drops the surface.
    pub fn unmount(&mut self) {
        self.listening_for_resize = false;
        if let Some(animation) = self.animation.take() {
            animation.stop();
            info!("unmounted after {} rendered frames", animation.rendered_frames());
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.animation.is_some()
    }

    pub fn is_listening_for_resize(&self) -> bool {
        self.listening_for_resize
    }

    pub fn stop_handle(&self) -> Option<StopHandle> {
        self.animation.as_ref().map(AnimationLoop::stop_handle)
    }

    pub fn scene(&self) -> Option<&Scene<S>> {
        self.animation.as_ref().map(AnimationLoop::scene)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}
