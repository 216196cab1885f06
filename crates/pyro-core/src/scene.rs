//! Scene manager: owns the live tails and particles and runs one frame at a time.

use glam::Vec2;
use pyro_platform::{DrawSurface, FillStyle, Rgb, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::SceneConfig;
use crate::particle::Particle;
use crate::tail::Tail;
use crate::timing::FrameTimer;

/// Horizontal band, as fractions of the viewport width, where tails launch.
const LAUNCH_BAND: (f32, f32) = (0.2, 0.8);
/// Launch speed as a fraction of the viewport height per frame.
const LAUNCH_SPEED: (f32, f32) = (0.01, 0.015);
const BURST_SPEED: (f32, f32) = (2.0, 100.0);
const BURST_SPEED_SCALE: f32 = 0.0001;
const BURST_OPACITY: (f32, f32) = (0.6, 0.9);

/// What a call to [`Scene::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Too early for the next frame; nothing changed.
    Throttled,
    Rendered {
        launched: bool,
        bursts: usize,
        tails: usize,
        particles: usize,
    },
}

pub struct Scene<S> {
    surface: S,
    config: SceneConfig,
    viewport: Viewport,
    timer: FrameTimer,
    tails: Vec<Tail>,
    particles: Vec<Particle>,
    rng: StdRng,
    missing_context_reported: bool,
}

impl<S: DrawSurface> Scene<S> {
    pub fn new(surface: S, viewport: Viewport, config: SceneConfig, now: f64) -> Self {
        Self::with_rng(surface, viewport, config, now, StdRng::from_entropy())
    }

    pub fn with_rng(
        surface: S,
        viewport: Viewport,
        config: SceneConfig,
        now: f64,
        rng: StdRng,
    ) -> Self {
        let timer = FrameTimer::new(config.frame_interval_ms(), now);
        Self {
            surface,
            config,
            viewport,
            timer,
            tails: Vec::new(),
            particles: Vec::new(),
            rng,
            missing_context_reported: false,
        }
    }

    /// Sizes the surface for `viewport` so drawing happens in logical
    /// coordinates. Safe to call again on every resize.
    pub fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let (pixel_width, pixel_height) = viewport.pixel_size();
        self.surface.set_pixel_size(pixel_width, pixel_height);
        self.surface.set_display_size(
            &format!("{}px", viewport.width),
            &format!("{}px", viewport.height),
        );

        let dpr = viewport.device_pixel_ratio;
        match self.surface.context() {
            Some(ctx) => ctx.scale(dpr, dpr),
            None => warn!("surface has no 2D context; frames will update but not draw"),
        }
        self.missing_context_reported = false;

        info!(
            "scene init => {}x{} @ dpr {} ({}x{} px)",
            viewport.width, viewport.height, dpr, pixel_width, pixel_height
        );
    }

    /// Launches one tail from the bottom edge at a random spot in the middle band.
    pub fn spawn_tail(&mut self) {
        let width = self.viewport.width as f32;
        let height = self.viewport.height as f32;
        let x = uniform(&mut self.rng, width * LAUNCH_BAND.0, width * LAUNCH_BAND.1);
        let vy = -height * uniform(&mut self.rng, LAUNCH_SPEED.0, LAUNCH_SPEED.1);
        let angle = uniform(&mut self.rng, 0.0, 2.0);
        self.launch(Tail::new(Vec2::new(x, height), vy, self.config.tail_color, angle));
    }

    pub fn launch(&mut self, tail: Tail) {
        self.tails.push(tail);
    }

    /// Adds one burst of particles at (x, y), scattered in every direction.
    pub fn spawn_burst(&mut self, x: f32, y: f32, color: Rgb) {
        let count = self.config.burst_size;
        let reach = self.viewport.diagonal() * BURST_SPEED_SCALE;
        let origin = Vec2::new(x, y);

        self.particles.reserve(count);
        for _ in 0..count {
            let speed = uniform(&mut self.rng, BURST_SPEED.0, BURST_SPEED.1) * reach;
            let direction = uniform(&mut self.rng, 0.0, 360.0).to_radians();
            let opacity = uniform(&mut self.rng, BURST_OPACITY.0, BURST_OPACITY.1);
            self.particles
                .push(Particle::new(origin, Vec2::from_angle(direction) * speed, opacity));
        }
        debug!(x, y, %color, count, "burst");
    }

    /// Runs one frame if the frame interval has elapsed since the last one.
    pub fn tick(&mut self, now: f64) -> TickOutcome {
        if self.timer.poll(now).is_none() {
            return TickOutcome::Throttled;
        }

        let launched = self.rng.gen::<f64>() < self.config.spawn_probability;
        if launched {
            self.spawn_tail();
        }

        if self.surface.context().is_none() && !self.missing_context_reported {
            warn!("no 2D context available; skipping draw calls");
            self.missing_context_reported = true;
        }

        let mut spent = Vec::new();
        {
            let mut ctx = self.surface.context();
            self.tails.retain_mut(|tail| {
                tail.update();
                if let Some(ctx) = ctx.as_deref_mut() {
                    tail.draw(ctx);
                }
                if tail.is_spent() {
                    spent.push((tail.pos, tail.color));
                    false
                } else {
                    true
                }
            });
        }
        for (pos, color) in &spent {
            self.spawn_burst(pos.x, pos.y, *color);
        }

        let mut ctx = self.surface.context();
        if let Some(ctx) = ctx.as_deref_mut() {
            ctx.set_fill_style(FillStyle::hex(self.config.background, self.config.trail_alpha));
            ctx.fill_rect(
                0.0,
                0.0,
                self.viewport.width as f32,
                self.viewport.height as f32,
            );
        }
        self.particles.retain_mut(|particle| {
            particle.update();
            if let Some(ctx) = ctx.as_deref_mut() {
                particle.draw(ctx);
            }
            !particle.is_faded()
        });

        TickOutcome::Rendered {
            launched,
            bursts: spent.len(),
            tails: self.tails.len(),
            particles: self.particles.len(),
        }
    }

    pub fn tails(&self) -> &[Tail] {
        &self.tails
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

/// Uniform in `[low, high)`; an empty range collapses to `low`.
fn uniform(rng: &mut StdRng, low: f32, high: f32) -> f32 {
    low + rng.gen::<f32>() * (high - low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tail::BURST_THRESHOLD;
    use crate::testing::{Command, RecordingSurface};

    const INTERVAL: f64 = 1000.0 / 60.0;

    fn quiet_config() -> SceneConfig {
        SceneConfig {
            spawn_probability: 0.0,
            ..SceneConfig::default()
        }
    }

    fn scene_with(config: SceneConfig) -> Scene<RecordingSurface> {
        let viewport = Viewport::new(800, 600, 1.0);
        let mut scene = Scene::with_rng(
            RecordingSurface::new(),
            viewport,
            config,
            0.0,
            StdRng::seed_from_u64(7),
        );
        scene.init(viewport);
        scene
    }

    #[test]
    fn init_sizes_surface_in_logical_units() {
        let scene = scene_with(quiet_config());
        let surface = scene.surface();
        assert_eq!(surface.pixel_size(), (800, 600));
        assert_eq!(surface.display_size(), ("800px", "600px"));
        assert_eq!(surface.ctx.scale, 1.0);
    }

    #[test]
    fn init_scales_for_high_density_displays() {
        let mut scene = scene_with(quiet_config());
        scene.init(Viewport::new(640, 480, 2.0));
        assert_eq!(scene.surface().pixel_size(), (1280, 960));
        assert_eq!(scene.surface().display_size(), ("640px", "480px"));
        assert_eq!(scene.surface().ctx.scale, 2.0);
    }

    #[test]
    fn init_is_idempotent() {
        let mut once = scene_with(quiet_config());
        once.init(Viewport::new(1024, 768, 1.5));

        let mut twice = scene_with(quiet_config());
        twice.init(Viewport::new(1024, 768, 1.5));
        twice.init(Viewport::new(1024, 768, 1.5));

        assert_eq!(once.surface().pixel_size(), twice.surface().pixel_size());
        assert_eq!(once.surface().display_size(), twice.surface().display_size());
        assert_eq!(once.surface().ctx.scale, twice.surface().ctx.scale);
        assert_eq!(twice.viewport(), Viewport::new(1024, 768, 1.5));
    }

    #[test]
    fn spawn_tail_launches_from_bottom_band() {
        let mut scene = scene_with(quiet_config());
        for _ in 0..200 {
            scene.spawn_tail();
        }
        for tail in scene.tails() {
            assert!(tail.pos.x >= 160.0 && tail.pos.x <= 640.0);
            assert_eq!(tail.pos.y, 600.0);
            assert!(tail.vy <= -6.0 && tail.vy >= -9.0);
            assert_eq!(tail.color, Rgb::WHITE);
            assert_eq!(tail.opacity(), 1.0);
            assert!((0.0..2.0).contains(&tail.angle()));
        }
    }

    #[test]
    fn spawn_burst_adds_fixed_count_within_bounds() {
        let mut scene = scene_with(quiet_config());
        scene.spawn_burst(400.0, 200.0, Rgb::WHITE);

        let particles = scene.particles();
        assert_eq!(particles.len(), 700);
        let reach = 800.0f32.hypot(600.0) * 0.0001;
        for p in particles {
            assert_eq!(p.pos, Vec2::new(400.0, 200.0));
            assert!((0.6..=0.9).contains(&p.opacity));
            let speed = p.vel.length();
            assert!(speed >= 2.0 * reach - 1e-4 && speed <= 100.0 * reach + 1e-4);
        }

        scene.spawn_burst(0.0, 0.0, Rgb::WHITE);
        assert_eq!(scene.particles().len(), 1400);
    }

    #[test]
    fn burst_directions_cover_the_circle() {
        let mut scene = scene_with(quiet_config());
        scene.spawn_burst(0.0, 0.0, Rgb::WHITE);
        let quadrants = scene.particles().iter().fold([0usize; 4], |mut acc, p| {
            let idx = match (p.vel.x >= 0.0, p.vel.y >= 0.0) {
                (true, true) => 0,
                (false, true) => 1,
                (false, false) => 2,
                (true, false) => 3,
            };
            acc[idx] += 1;
            acc
        });
        assert!(quadrants.iter().all(|&n| n > 100));
    }

    #[test]
    fn throttled_tick_changes_nothing() {
        let mut scene = scene_with(SceneConfig {
            spawn_probability: 1.0,
            ..SceneConfig::default()
        });
        scene.launch(Tail::new(Vec2::new(400.0, 600.0), -8.0, Rgb::WHITE, 0.0));
        scene.spawn_burst(100.0, 100.0, Rgb::WHITE);
        let tails = scene.tails().to_vec();
        let particles = scene.particles().to_vec();
        let commands = scene.surface().ctx.commands.len();

        assert_eq!(scene.tick(INTERVAL - 1.0), TickOutcome::Throttled);

        assert_eq!(scene.tails(), tails.as_slice());
        assert_eq!(scene.particles(), particles.as_slice());
        assert_eq!(scene.surface().ctx.commands.len(), commands);
    }

    #[test]
    fn tick_updates_draws_and_washes_background() {
        let mut scene = scene_with(quiet_config());
        scene.launch(Tail::new(Vec2::new(400.0, 600.0), -8.0, Rgb::WHITE, 0.0));
        let start = scene.surface().ctx.commands.len();

        let outcome = scene.tick(INTERVAL + 1.0);
        assert_eq!(
            outcome,
            TickOutcome::Rendered {
                launched: false,
                bursts: 0,
                tails: 1,
                particles: 0,
            }
        );

        let tail = scene.tails()[0];
        assert!((tail.vy - -7.88).abs() < 1e-5);
        let drawn = &scene.surface().ctx.commands[start..];
        assert_eq!(
            drawn,
            &[
                Command::Fill(FillStyle::rgba(Rgb::WHITE, tail.opacity())),
                Command::Circle(tail.pos.x, tail.pos.y, 2.0),
                Command::Fill(FillStyle::hex(Rgb::BLACK, 0x30)),
                Command::Rect(0.0, 0.0, 800.0, 600.0),
            ]
        );
    }

    #[test]
    fn spent_tail_bursts_exactly_once() {
        let mut scene = scene_with(quiet_config());
        // one update away from crossing the threshold
        let nearly_spent = Tail::new(Vec2::new(300.0, 120.0), -0.705, Rgb::new(255, 0, 0), 0.0);
        let lively = Tail::new(Vec2::new(500.0, 600.0), -8.0, Rgb::WHITE, 0.0);
        scene.launch(lively);
        scene.launch(nearly_spent);
        scene.launch(lively);

        let mut expected = nearly_spent;
        expected.update();
        assert!(expected.vy > BURST_THRESHOLD);

        let outcome = scene.tick(INTERVAL + 1.0);
        assert!(matches!(
            outcome,
            TickOutcome::Rendered { bursts: 1, tails: 2, .. }
        ));
        assert_eq!(scene.tails().len(), 2);
        assert!(scene.tails().iter().all(|t| t.vy < BURST_THRESHOLD));

        // all 700 particles start at the spent tail's last position and get one update
        assert_eq!(scene.particles().len(), 700);
        let reach = 800.0f32.hypot(600.0) * 0.0001;
        for p in scene.particles() {
            assert!(p.pos.distance(expected.pos) <= 100.0 * reach + 1.0);
            assert!(p.opacity < 0.9 - 0.01 + 1e-6);
        }
    }

    #[test]
    fn adjacent_spent_tails_are_all_removed() {
        let mut scene = scene_with(quiet_config());
        for i in 0..4 {
            scene.launch(Tail::new(Vec2::new(100.0 * i as f32, 50.0), -0.7, Rgb::WHITE, 0.0));
        }
        let outcome = scene.tick(INTERVAL + 1.0);
        assert!(matches!(outcome, TickOutcome::Rendered { bursts: 4, tails: 0, .. }));
        assert_eq!(scene.particles().len(), 4 * 700);
    }

    #[test]
    fn faded_particles_are_removed() {
        let mut scene = scene_with(quiet_config());
        scene.spawn_burst(400.0, 300.0, Rgb::WHITE);

        let mut now = 0.0;
        let mut frames = 0;
        while !scene.particles().is_empty() {
            now += INTERVAL + 0.5;
            scene.tick(now);
            frames += 1;
            assert!(scene.particles().iter().all(|p| p.opacity >= 0.0));
            assert!(frames <= 92, "particles outlived their fade");
        }
        assert!(frames >= 60);
    }

    #[test]
    fn launches_follow_spawn_probability() {
        let mut always = scene_with(SceneConfig {
            spawn_probability: 1.0,
            ..SceneConfig::default()
        });
        assert!(matches!(
            always.tick(INTERVAL + 1.0),
            TickOutcome::Rendered { launched: true, tails: 1, .. }
        ));

        let mut sometimes = scene_with(SceneConfig::default());
        let mut launches = 0;
        for i in 1..=2000 {
            if let TickOutcome::Rendered { launched: true, .. } =
                sometimes.tick(i as f64 * (INTERVAL + 0.01))
            {
                launches += 1;
            }
        }
        assert!((20..=110).contains(&launches), "launches = {launches}");
    }

    #[test]
    fn missing_context_still_simulates() {
        let viewport = Viewport::new(800, 600, 1.0);
        let mut scene = Scene::with_rng(
            RecordingSurface::without_context(),
            viewport,
            quiet_config(),
            0.0,
            StdRng::seed_from_u64(1),
        );
        scene.init(viewport);
        scene.launch(Tail::new(Vec2::new(400.0, 600.0), -8.0, Rgb::WHITE, 0.0));

        assert!(matches!(scene.tick(INTERVAL + 1.0), TickOutcome::Rendered { tails: 1, .. }));
        assert!(scene.tails()[0].vy > -8.0);
        assert!(scene.surface().ctx.commands.is_empty());
        assert_eq!(scene.surface().pixel_size(), (800, 600));
    }
}
