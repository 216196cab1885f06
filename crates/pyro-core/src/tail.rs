use glam::Vec2;
use pyro_platform::{DrawContext, FillStyle, Rgb};

pub const TAIL_FRICTION: f32 = 0.985;
/// A tail bursts once its vertical velocity decays above this.
pub const BURST_THRESHOLD: f32 = -0.7;
pub const TAIL_RADIUS: f32 = 2.0;

const ANGLE_STEP: f32 = 1.0;
const DRIFT: f32 = 0.2;

/// A rising spark. Its opacity always follows its speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tail {
    pub pos: Vec2,
    pub vy: f32,
    pub color: Rgb,
    opacity: f32,
    friction: f32,
    angle: f32,
}

impl Tail {
    pub fn new(pos: Vec2, vy: f32, color: Rgb, angle: f32) -> Self {
        Self {
            pos,
            vy,
            color,
            opacity: 1.0,
            friction: TAIL_FRICTION,
            angle,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn update(&mut self) {
        self.vy *= self.friction;
        self.pos.y += self.vy;

        self.angle += ANGLE_STEP;
        self.pos.x += self.angle.cos() * DRIFT * self.vy;

        self.opacity = -self.vy * 0.1;
    }

    pub fn is_spent(&self) -> bool {
        self.vy > BURST_THRESHOLD
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext) {
        ctx.set_fill_style(FillStyle::rgba(self.color, self.opacity));
        ctx.fill_circle(self.pos.x, self.pos.y, TAIL_RADIUS);
    }
}
