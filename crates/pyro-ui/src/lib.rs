//! eframe host: mounts the fireworks scene on a raster surface and shows it
//! as a full-window texture.

use pyro_core::{Lifecycle, SceneConfig};
use pyro_platform::{DrawSurface, FrameScheduler, Result, Viewport};
use pyro_raster::RasterSurface;
use tracing::info;

const TEXTURE_NAME: &str = "pyro-surface";

/// Schedules the next frame by asking egui for a repaint.
pub struct RepaintScheduler {
    context: egui::Context,
}

impl FrameScheduler for RepaintScheduler {
    fn request_frame(&mut self) {
        self.context.request_repaint();
    }
}

pub fn run_ui(config: SceneConfig) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Pyro")
            .with_inner_size([960.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Pyro",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(PyroApp::new(config)))),
    )
    .map_err(|err| format!("eframe failed: {err}"))?;
    Ok(())
}

pub struct PyroApp {
    lifecycle: Lifecycle<RasterSurface, RepaintScheduler>,
    viewport: Option<Viewport>,
    texture: Option<egui::TextureHandle>,
    closing: bool,
}

impl PyroApp {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            lifecycle: Lifecycle::new(config),
            viewport: None,
            texture: None,
            closing: false,
        }
    }

    fn sync_viewport(&mut self, context: &egui::Context, now: f64) {
        let viewport = current_viewport(context);
        if !self.lifecycle.is_mounted() {
            let (width, height) = viewport.pixel_size();
            let scheduler = RepaintScheduler {
                context: context.clone(),
            };
            self.lifecycle
                .mount(RasterSurface::new(width, height), scheduler, viewport, now);
        } else if self.viewport != Some(viewport) {
            info!("UI: viewport resized to {}x{}", viewport.width, viewport.height);
            self.lifecycle.resize(viewport);
        }
        self.viewport = Some(viewport);
    }

    fn upload_surface(&mut self, context: &egui::Context) -> Option<egui::TextureId> {
        let surface = self.lifecycle.scene()?.surface();
        let (width, height) = surface.pixel_size();
        if width == 0 || height == 0 {
            return None;
        }
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            surface.pixels(),
        );
        if let Some(texture) = self.texture.as_mut() {
            texture.set(image, egui::TextureOptions::LINEAR);
            return Some(texture.id());
        }
        let texture = context.load_texture(TEXTURE_NAME, image, egui::TextureOptions::LINEAR);
        let id = texture.id();
        self.texture = Some(texture);
        Some(id)
    }
}

impl eframe::App for PyroApp {
    fn update(&mut self, context: &egui::Context, _frame: &mut eframe::Frame) {
        if context.input(|i| i.viewport().close_requested()) && !self.closing {
            info!("UI: CloseRequested -> unmount");
            self.closing = true;
            self.lifecycle.unmount();
        }
        if self.closing {
            return;
        }

        let now = context.input(|i| i.time) * 1000.0;
        self.sync_viewport(context, now);
        self.lifecycle.frame(now);

        let texture = self.upload_surface(context);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(context, |ui| {
                if let Some(texture) = texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter()
                        .image(texture, ui.max_rect(), uv, egui::Color32::WHITE);
                }
            });
    }
}

impl Drop for PyroApp {
    fn drop(&mut self) {
        self.lifecycle.unmount();
    }
}

fn current_viewport(context: &egui::Context) -> Viewport {
    let rect = context.screen_rect();
    Viewport::new(
        rect.width().round().max(0.0) as u32,
        rect.height().round().max(0.0) as u32,
        context.pixels_per_point(),
    )
}
