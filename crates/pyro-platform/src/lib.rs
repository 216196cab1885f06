//! Host contracts so `pyro-core` stays surface-agnostic.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod color;

pub use color::{ColorError, FillStyle, Rgb};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Logical size of the area the effect covers, plus the display's pixel density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    /// A ratio that is not a positive finite number falls back to 1.
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            debug!(device_pixel_ratio, "invalid device pixel ratio; using 1");
            1.0
        };
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Backing-store size in physical pixels, truncated the way a canvas truncates.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.device_pixel_ratio) as u32,
            (self.height as f32 * self.device_pixel_ratio) as u32,
        )
    }

    pub fn diagonal(&self) -> f32 {
        (self.width as f32).hypot(self.height as f32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600, 1.0)
    }
}

/// Immediate-mode 2D drawing commands.
pub trait DrawContext {
    /// Multiplies the current transform by a scale.
    fn scale(&mut self, x: f32, y: f32);
    fn set_fill_style(&mut self, style: FillStyle);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    /// A full-turn arc filled with the current style.
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);
}

/// A drawable surface owned by the host (a canvas element, a pixel buffer, ...).
pub trait DrawSurface {
    /// `None` when the host cannot provide a 2D context.
    fn context(&mut self) -> Option<&mut dyn DrawContext>;
    /// Resizes the backing store. Like a canvas, this resets the context transform.
    fn set_pixel_size(&mut self, width: u32, height: u32);
    fn pixel_size(&self) -> (u32, u32);
    /// CSS-style display size, e.g. `"800px"`.
    fn set_display_size(&mut self, width: &str, height: &str);
    fn display_size(&self) -> (&str, &str);
}

/// The host's "render next frame" primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}
