use glam::Vec2;
use pyro_platform::{DrawContext, FillStyle, Rgb};

pub const GRAVITY: f32 = 0.12;
pub const PARTICLE_FRICTION: f32 = 0.93;
/// Opacity lost per update.
pub const FADE_STEP: f32 = 0.01;
pub const PARTICLE_RADIUS: f32 = 2.0;

/// Debris from a burst. Always drawn white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub opacity: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, opacity: f32) -> Self {
        Self { pos, vel, opacity }
    }

    pub fn update(&mut self) {
        self.vel.y += GRAVITY;
        self.vel *= PARTICLE_FRICTION;
        self.pos += self.vel;
        self.opacity -= FADE_STEP;
    }

    pub fn is_faded(&self) -> bool {
        self.opacity < 0.0
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext) {
        ctx.set_fill_style(FillStyle::rgba(Rgb::WHITE, self.opacity));
        ctx.fill_circle(self.pos.x, self.pos.y, PARTICLE_RADIUS);
    }
}
