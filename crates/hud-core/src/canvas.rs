//! Canvas layer: drifting particles, orbit nodes and the centre burst.
//!
//! The renderer owns a fixed particle pool and draws through the
//! [`Surface2d`] trait so the browser binding stays thin and the scene logic
//! runs on the host in tests. It reads the instantaneous activity level
//! every frame, never the throttled published one.

use crate::constants::{
    BURST_BASE_RADIUS_FRAC, BURST_SPIN_DIVISOR_MS, BURST_WOBBLE_DIVISOR_MS, DRIFT_LEVEL_GAIN,
    ORBIT_PERIOD_DIVISOR_MS, PARTICLE_MIN_SPEED, PARTICLE_SPEED_SPAN, WRAP_MARGIN_PX,
};
use crate::error::{HudError, HudResult};
use crate::random::RandomSource;
use crate::tier::{FidelityTier, TierProfile};
use glam::Vec2;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn css(&self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

pub const PARTICLE_COLOR: Rgba = Rgba::new(6, 182, 212, 0.85);
pub const ORBIT_NODE_COLOR: Rgba = Rgba::new(103, 232, 249, 0.9);
pub const ORBIT_LINK_COLOR: Rgba = Rgba::new(96, 165, 250, 0.06);
pub const BURST_COLOR: Rgba = Rgba::new(188, 250, 255, 0.9);

/// Minimal 2D raster API the renderer needs.
pub trait Surface2d {
    fn set_backing_size(&mut self, width_px: u32, height_px: u32);
    /// Replace (not multiply) the transform with a uniform scale.
    fn set_scale(&mut self, scale: f64) -> HudResult<()>;
    fn clear(&mut self, width: f32, height: f32);
    fn set_fill(&mut self, color: Rgba);
    fn set_stroke(&mut self, color: Rgba, line_width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
    fn stroke_line(&mut self, from: Vec2, to: Vec2);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: usize,
    /// Normalised seed position in `[0, 1]²`.
    pub origin: Vec2,
    pub size: f32,
    pub phase_delay: f32,
    /// CSS pixels.
    pub position: Vec2,
    /// CSS pixels per frame; negative drifts upward.
    pub velocity_y: f32,
}

impl Particle {
    pub fn seeded(id: usize, rng: &mut impl RandomSource) -> Self {
        let origin = Vec2::new(
            (10 + (id * 7) % 80) as f32 / 100.0,
            (5 + (id * 13) % 80) as f32 / 100.0,
        );
        Self {
            id,
            origin,
            size: 2.0 + (id % 4) as f32 * 2.0,
            phase_delay: (id % 5) as f32 * 0.6,
            position: Vec2::ZERO,
            velocity_y: -(PARTICLE_MIN_SPEED + rng.next_unit() * PARTICLE_SPEED_SPAN),
        }
    }

    /// Advance one frame; wraps to below the bottom edge instead of leaving
    /// the pool. Returns true if it wrapped.
    #[inline]
    pub fn advance(&mut self, level: f32, damping: f32, height: f32) -> bool {
        self.position.y += self.velocity_y * (1.0 + DRIFT_LEVEL_GAIN * level) * damping;
        if self.position.y < -WRAP_MARGIN_PX {
            self.position.y = height + WRAP_MARGIN_PX;
            return true;
        }
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackingSize {
    pub width_px: u32,
    pub height_px: u32,
}

/// Backing store dimensions for a CSS size at a device pixel ratio.
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64) -> BackingSize {
    let px = |css: f64| ((css.max(0.0) * dpr).floor() as u32).max(1);
    BackingSize {
        width_px: px(css_width),
        height_px: px(css_height),
    }
}

#[inline]
fn sanitize_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr
    } else {
        1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    Hidden,
    /// No valid size yet.
    NotReady,
}

pub struct CanvasRenderer {
    profile: &'static TierProfile,
    tier: FidelityTier,
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    dpr: f64,
    laid_out: bool,
    wraps: u64,
}

impl CanvasRenderer {
    pub fn new(tier: FidelityTier, rng: &mut impl RandomSource) -> Self {
        let profile = tier.profile();
        let particles = (0..profile.particle_count)
            .map(|i| Particle::seeded(i, rng))
            .collect();
        Self {
            profile,
            tier,
            particles,
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
            laid_out: false,
            wraps: 0,
        }
    }

    pub fn tier(&self) -> FidelityTier {
        self.tier
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    pub fn wraps(&self) -> u64 {
        self.wraps
    }

    /// Adopt a new CSS size and pixel ratio. Sets the surface transform from
    /// scratch so no scale from a previous ratio survives.
    pub fn resize(
        &mut self,
        css_width: f64,
        css_height: f64,
        dpr: f64,
        surface: &mut impl Surface2d,
    ) -> HudResult<BackingSize> {
        if !css_width.is_finite() || !css_height.is_finite() || css_width < 0.0 || css_height < 0.0
        {
            return Err(HudError::Dimensions {
                width: css_width,
                height: css_height,
            });
        }
        let dpr = sanitize_dpr(dpr);
        let backing = backing_size(css_width, css_height, dpr);
        surface.set_backing_size(backing.width_px, backing.height_px);
        surface.set_scale(dpr)?;

        let width = css_width as f32;
        let height = css_height as f32;
        for p in &mut self.particles {
            p.position.x = p.origin.x * width;
            if !self.laid_out {
                p.position.y = p.origin.y * height;
            }
        }
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.laid_out = true;
        log::debug!(
            "[canvas] resize {}x{} @{} -> {}x{}",
            css_width,
            css_height,
            dpr,
            backing.width_px,
            backing.height_px
        );
        Ok(backing)
    }

    pub fn frame(
        &mut self,
        now_ms: f64,
        level: f32,
        visible: bool,
        surface: &mut impl Surface2d,
    ) -> FrameOutcome {
        if !visible {
            return FrameOutcome::Hidden;
        }
        if !self.laid_out || self.width <= 0.0 || self.height <= 0.0 {
            return FrameOutcome::NotReady;
        }
        let level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let now_ms = if now_ms.is_finite() { now_ms } else { 0.0 };

        surface.clear(self.width, self.height);
        self.draw_particles(level, surface);
        self.draw_orbit(now_ms, level, surface);
        self.draw_burst(now_ms, level, surface);
        FrameOutcome::Drawn
    }

    pub fn teardown(&mut self, surface: &mut impl Surface2d) {
        surface.clear(self.width, self.height);
        log::debug!("[canvas] teardown after {} particle wraps", self.wraps);
    }

    fn draw_particles(&mut self, level: f32, surface: &mut impl Surface2d) {
        let damping = self.profile.drift_damping;
        surface.set_fill(PARTICLE_COLOR);
        for p in &mut self.particles {
            if p.advance(level, damping, self.height) {
                self.wraps += 1;
            }
            surface.fill_circle(p.position, p.size);
        }
    }

    /// Node positions on the orbit circle at `now_ms`.
    pub fn orbit_nodes(&self, now_ms: f64) -> impl Iterator<Item = Vec2> + '_ {
        let n = self.profile.orbit_count;
        let center = self.size() * 0.5;
        let radius = self.width.min(self.height) * self.profile.orbit_radius_frac;
        let spin = (now_ms / ORBIT_PERIOD_DIVISOR_MS) as f32;
        (0..n).map(move |i| {
            let angle = i as f32 / n as f32 * TAU + spin;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
    }

    fn draw_orbit(&self, now_ms: f64, level: f32, surface: &mut impl Surface2d) {
        let nodes: smallvec::SmallVec<[Vec2; 8]> = self.orbit_nodes(now_ms).collect();
        let n = nodes.len();
        if n == 0 {
            return;
        }
        surface.set_stroke(ORBIT_LINK_COLOR.with_alpha(0.06 + level * 0.18), 1.0);
        for i in 0..n {
            surface.stroke_line(nodes[i], nodes[(i + 1) % n]);
        }
        surface.set_fill(ORBIT_NODE_COLOR);
        for (i, node) in nodes.iter().enumerate() {
            let r = match self.tier {
                FidelityTier::Reduced => 2.0,
                FidelityTier::Standard => 4.0 + (i % 3) as f32 * 1.5,
            };
            surface.fill_circle(*node, r);
        }
    }

    /// Burst dot positions at `now_ms` for `level`.
    pub fn burst_points(&self, now_ms: f64, level: f32) -> impl Iterator<Item = Vec2> + '_ {
        let n = self.profile.burst_count;
        let center = self.size() * 0.5;
        let base = self.width.min(self.height) * BURST_BASE_RADIUS_FRAC;
        let spin = (now_ms / BURST_SPIN_DIVISOR_MS) as f32;
        let wobble_t = now_ms / BURST_WOBBLE_DIVISOR_MS;
        let spread = 0.6 + level * 0.8;
        (0..n).map(move |i| {
            let angle = i as f32 / n as f32 * TAU + spin;
            let wobble = ((wobble_t + i as f64).sin() as f32).abs();
            let r = base * (0.2 + 0.6 * wobble) * spread;
            center + Vec2::new(angle.cos(), angle.sin()) * r
        })
    }

    fn draw_burst(&self, now_ms: f64, level: f32, surface: &mut impl Surface2d) {
        let reduced = self.tier == FidelityTier::Reduced;
        let points: smallvec::SmallVec<[Vec2; 10]> = self.burst_points(now_ms, level).collect();
        surface.set_fill(BURST_COLOR);
        for (i, p) in points.into_iter().enumerate() {
            let r = if reduced {
                1.5
            } else {
                2.0 + (i % 3) as f32 * 0.5
            };
            surface.fill_circle(p, r);
        }
    }
}
