//! Software surface for Pyro: an RGBA pixel buffer that keeps its contents
//! between frames the way a canvas does.

use image::{Rgba, RgbaImage};
use pyro_platform::{DrawContext, DrawSurface, FillStyle};
use tracing::debug;

pub struct RasterContext {
    image: RgbaImage,
    scale: (f32, f32),
    fill: [u8; 4],
}

impl RasterContext {
    fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            scale: (1.0, 1.0),
            fill: [0, 0, 0, 255],
        }
    }

    pub fn scale_factors(&self) -> (f32, f32) {
        self.scale
    }

    /// Pixel rows and columns whose centers fall in `[start, end)`, clipped to `limit`.
    fn covered(start: f32, end: f32, limit: u32) -> std::ops::Range<u32> {
        let first = (start - 0.5).ceil().max(0.0);
        let last = (end - 0.5).ceil().clamp(0.0, limit as f32);
        if first >= last {
            return 0..0;
        }
        first as u32..last as u32
    }
}

impl DrawContext for RasterContext {
    fn scale(&mut self, x: f32, y: f32) {
        self.scale.0 *= x;
        self.scale.1 *= y;
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.fill = style.to_rgba8();
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if self.fill[3] == 0 {
            return;
        }
        let (sx, sy) = self.scale;
        let (x0, x1) = ordered(x * sx, (x + width) * sx);
        let (y0, y1) = ordered(y * sy, (y + height) * sy);
        let columns = Self::covered(x0, x1, self.image.width());
        for py in Self::covered(y0, y1, self.image.height()) {
            for px in columns.clone() {
                blend(self.image.get_pixel_mut(px, py), self.fill);
            }
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        if self.fill[3] == 0 || radius <= 0.0 {
            return;
        }
        let (sx, sy) = self.scale;
        let (cx, cy) = (x * sx, y * sy);
        let (rx, ry) = (radius * sx.abs(), radius * sy.abs());
        let columns = Self::covered(cx - rx, cx + rx, self.image.width());
        for py in Self::covered(cy - ry, cy + ry, self.image.height()) {
            let dy = (py as f32 + 0.5 - cy) / ry;
            for px in columns.clone() {
                let dx = (px as f32 + 0.5 - cx) / rx;
                if dx * dx + dy * dy <= 1.0 {
                    blend(self.image.get_pixel_mut(px, py), self.fill);
                }
            }
        }
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Source-over compositing with straight (non-premultiplied) alpha.
fn blend(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

pub struct RasterSurface {
    ctx: RasterContext,
    display_size: (String, String),
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            ctx: RasterContext::new(width, height),
            display_size: (format!("{width}px"), format!("{height}px")),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.ctx.image
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.ctx.image.as_raw()
    }

    pub fn raster_context(&self) -> &RasterContext {
        &self.ctx
    }
}

impl DrawSurface for RasterSurface {
    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        Some(&mut self.ctx)
    }

    fn set_pixel_size(&mut self, width: u32, height: u32) {
        debug!(width, height, "raster surface resized");
        self.ctx = RasterContext::new(width, height);
    }

    fn pixel_size(&self) -> (u32, u32) {
        self.ctx.image.dimensions()
    }

    fn set_display_size(&mut self, width: &str, height: &str) {
        self.display_size = (width.to_string(), height.to_string());
    }

    fn display_size(&self) -> (&str, &str) {
        (&self.display_size.0, &self.display_size.1)
    }
}
