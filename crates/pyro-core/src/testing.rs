//! In-memory surface and scheduler that record what the engine asks of them.

use pyro_platform::{DrawContext, DrawSurface, FillStyle, FrameScheduler};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Scale(f32, f32),
    Fill(FillStyle),
    Rect(f32, f32, f32, f32),
    Circle(f32, f32, f32),
}

#[derive(Debug)]
pub struct RecordingContext {
    pub scale: f32,
    pub commands: Vec<Command>,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self {
            scale: 1.0,
            commands: Vec::new(),
        }
    }
}

impl RecordingContext {
    pub fn circles(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Circle(..)))
            .count()
    }
}

impl DrawContext for RecordingContext {
    fn scale(&mut self, x: f32, y: f32) {
        self.scale *= x;
        self.commands.push(Command::Scale(x, y));
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.commands.push(Command::Fill(style));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(Command::Rect(x, y, width, height));
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands.push(Command::Circle(x, y, radius));
    }
}

#[derive(Debug)]
pub struct RecordingSurface {
    pub ctx: RecordingContext,
    pub has_context: bool,
    pub pixel_size: (u32, u32),
    pub display_size: (String, String),
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ctx: RecordingContext::default(),
            has_context: true,
            pixel_size: (300, 150),
            display_size: (String::new(), String::new()),
        }
    }

    pub fn without_context() -> Self {
        Self {
            has_context: false,
            ..Self::new()
        }
    }
}

impl DrawSurface for RecordingSurface {
    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        if self.has_context {
            Some(&mut self.ctx)
        } else {
            None
        }
    }

    fn set_pixel_size(&mut self, width: u32, height: u32) {
        self.pixel_size = (width, height);
        self.ctx.scale = 1.0;
    }

    fn pixel_size(&self) -> (u32, u32) {
        self.pixel_size
    }

    fn set_display_size(&mut self, width: &str, height: &str) {
        self.display_size = (width.to_string(), height.to_string());
    }

    fn display_size(&self) -> (&str, &str) {
        (&self.display_size.0, &self.display_size.1)
    }
}

#[derive(Debug, Default)]
pub struct CountingScheduler {
    pub requests: usize,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requests += 1;
    }
}
