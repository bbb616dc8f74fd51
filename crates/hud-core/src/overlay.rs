//! Declarative overlay layer.
//!
//! The overlay's structure is emitted once by [`OverlayMarkup`]; its moving
//! parts are CSS animations whose parameters are a pure function of the last
//! published activity sample, the tier, the pointer and the glitch flag.
//! [`OverlayState::compose`] evaluates that function and
//! [`OverlayState::patches`] turns it into DOM writes.

use crate::activity::ActivitySample;
use crate::constants::{GLITCH_DASH_OFFSET, MIN_ANIMATION_SECS};
use crate::pointer::PointerState;
use crate::tier::{FidelityTier, TierProfile};
use glam::Vec2;

mod markup;
mod patch;

pub use markup::{OverlayMarkup, WAVE_PATH};
pub use patch::{ElementId, Patch, PatchCache, PatchTarget};
use patch::{num, px, secs};

pub struct ArcSpec {
    pub radius: f32,
    pub stroke: &'static str,
    pub width: f32,
    pub period_s: f32,
}

pub const ARC_SPECS: [ArcSpec; 3] = [
    ArcSpec {
        radius: 140.0,
        stroke: "#60a5fa",
        width: 1.6,
        period_s: 8.0,
    },
    ArcSpec {
        radius: 200.0,
        stroke: "#22d3ee",
        width: 1.2,
        period_s: 12.0,
    },
    ArcSpec {
        radius: 260.0,
        stroke: "#7dd3fc",
        width: 1.0,
        period_s: 18.0,
    },
];

pub const RIPPLE_COUNT: usize = 3;
pub const INDICATOR_COUNT: usize = 6;
pub const INDICATOR_RADIUS: f32 = 220.0;
/// Core orbit radius indexed by `reduced as usize`.
pub const CORE_ORBIT_RADIUS: [f32; 2] = [220.0, 160.0];

// Fixed parallax multipliers (px at the viewport edge) for non-tiered layers.
pub const INNER_PARALLAX: Vec2 = Vec2::new(-10.0, -6.0);
pub const PULSE_PARALLAX: Vec2 = Vec2::new(6.0, 4.0);
pub const BEAM_PARALLAX: Vec2 = Vec2::new(10.0, 6.0);

const BAR_WIDTH: f32 = 10.0;
const BAR_GAP: f32 = 2.0;
const BAR_BASELINE: f32 = 64.0;

#[inline]
pub fn bar_x(i: usize) -> f32 {
    i as f32 * (BAR_WIDTH + BAR_GAP) + 12.0
}

/// `base - min(cap, gain * level)`, never shorter than `MIN_ANIMATION_SECS`.
/// Higher activity reads as faster tempo.
#[inline]
pub fn tempo(base: f32, cap: f32, gain: f32, level: f32) -> f32 {
    (base - cap.min(gain * level)).max(MIN_ANIMATION_SECS)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub y: f32,
    pub height: f32,
    pub alpha: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayState {
    pub level: f32,
    pub glitch: bool,
    pub outer_offset: Vec2,
    pub inner_offset: Vec2,
    pub pulse_offset: Vec2,
    pub beam_offset: Vec2,
    pub inner_period_s: f32,
    pub arc_period_s: [f32; 3],
    pub arc_opacity: f32,
    pub arc_keyframes: (f32, f32),
    pub pulse_scale: f32,
    pub pulse_keyframes: (f32, f32),
    pub ring_opacity: f32,
    pub core_scale: f32,
    pub core_rotate_deg: f32,
    pub halo_glow: (f32, f32),
    pub dot_scale: f32,
    pub dot_rotate_deg: f32,
    pub dot_glow: (f32, f32),
    pub ripple_alpha: [f32; RIPPLE_COUNT],
    pub ripple_scale: [f32; RIPPLE_COUNT],
    pub link_opacity: f32,
    pub beam_opacity: f32,
    pub beam_scale: f32,
    pub orbit_period_s: f32,
    pub indicator_period_s: [f32; INDICATOR_COUNT],
    pub indicator_scale: f32,
    pub indicator_glow: (f32, f32),
    pub dash_offset: f32,
    pub panel_keyframe_lo: [f32; 2],
    pub panel_bar_scale: [f32; 2],
    pub panel_cells: [[f32; 2]; 2],
    pub wave_lift: f32,
    pub wave_opacity: (f32, f32),
    pub wave_shift: f32,
    pub wave_period_s: f32,
    pub bars: Vec<Bar>,
}

impl OverlayState {
    pub fn compose(
        sample: &ActivitySample,
        tier: FidelityTier,
        pointer: PointerState,
        glitch: bool,
    ) -> Self {
        let profile: &TierProfile = tier.profile();
        let l = if sample.level.is_finite() {
            sample.level.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let outer = Vec2::from(profile.parallax_px);

        let bars = sample
            .bands
            .iter()
            .map(|v| {
                let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
                let height = 6.0 + v * 40.0 + l * 24.0;
                Bar {
                    y: BAR_BASELINE - height,
                    height,
                    alpha: 0.12 + v * 0.7,
                }
            })
            .collect();

        let mut ripple_alpha = [0.0; RIPPLE_COUNT];
        let mut ripple_scale = [0.0; RIPPLE_COUNT];
        for i in 0..RIPPLE_COUNT {
            ripple_alpha[i] = 0.06 + i as f32 * 0.03 + l * 0.08;
            ripple_scale[i] = 1.0 + l * 0.18 + i as f32 * 0.06;
        }
        let mut indicator_period_s = [0.0; INDICATOR_COUNT];
        for (i, p) in indicator_period_s.iter_mut().enumerate() {
            *p = (2.6 + (i % 4) as f32 * 0.4 - l).max(MIN_ANIMATION_SECS);
        }

        Self {
            level: l,
            glitch,
            outer_offset: pointer.parallax(outer),
            inner_offset: pointer.parallax(INNER_PARALLAX),
            pulse_offset: pointer.parallax(PULSE_PARALLAX),
            beam_offset: pointer.parallax(BEAM_PARALLAX),
            inner_period_s: tempo(20.0, 8.0, 6.0, l),
            arc_period_s: [
                tempo(ARC_SPECS[0].period_s, 4.0, 3.0, l),
                tempo(ARC_SPECS[1].period_s, 4.0, 3.0, l),
                tempo(ARC_SPECS[2].period_s, 4.0, 3.0, l),
            ],
            arc_opacity: 0.08 + l * 0.12,
            arc_keyframes: (0.05 + l * 0.05, 0.22 + l * 0.4),
            pulse_scale: 1.02 + l * 0.6,
            pulse_keyframes: (0.5 + l * 0.2, 0.95),
            ring_opacity: 0.06 + l * 0.12,
            core_scale: 1.0 + l * 0.08,
            core_rotate_deg: l * 6.0,
            halo_glow: (18.0 + l * 60.0, 0.12 + l * 0.6),
            dot_scale: 1.0 + l * 0.28,
            dot_rotate_deg: 18.0 * l,
            dot_glow: (12.0 + l * 48.0, 0.5 + l * 0.5),
            ripple_alpha,
            ripple_scale,
            link_opacity: 0.06 + l * 0.18,
            beam_opacity: (0.25 + l * 0.6).min(1.0),
            beam_scale: 1.0 + l * 0.06,
            orbit_period_s: tempo(30.0, 12.0, 12.0, l),
            indicator_period_s,
            indicator_scale: 1.0 + 0.8 * (0.6 + l),
            indicator_glow: (8.0 + l * 20.0, 0.5 + l * 0.5),
            dash_offset: if glitch { GLITCH_DASH_OFFSET } else { 0.0 },
            panel_keyframe_lo: [0.75 + l * 0.15, 0.7 + l * 0.2],
            panel_bar_scale: [0.9 + l * 0.4, 0.92 + l * 0.38],
            panel_cells: [
                [0.6 + l * 0.35, 0.45 + l * 0.25],
                [0.6 + l * 0.3, 0.45 + l * 0.25],
            ],
            wave_lift: -l * 6.0,
            wave_opacity: (0.8 + l * 0.15, 0.6 + l * 0.25),
            wave_shift: -34.0 - l * 28.0,
            wave_period_s: tempo(3.6, 1.6, 1.8, l),
            bars,
        }
    }

    /// Every DOM write implied by this state. Pair with a [`PatchCache`] to
    /// drop writes that would not change anything.
    pub fn patches(&self) -> Vec<Patch> {
        let mut out = Vec::with_capacity(64 + self.bars.len() * 3);
        let translate = |o: Vec2| format!("translate3d({},{},0)", px(o.x), px(o.y));

        out.push(Patch::style("hud-outer", "transform", translate(self.outer_offset)));
        out.push(Patch::style("hud-inner", "transform", translate(self.inner_offset)));
        out.push(Patch::style(
            "hud-inner-spin",
            "animation-duration",
            secs(self.inner_period_s),
        ));

        for (i, period) in self.arc_period_s.iter().enumerate() {
            let id = format!("hud-arc-{}", i);
            out.push(Patch::attr(id.clone(), "stroke-opacity", num(self.arc_opacity)));
            out.push(Patch::style(id.clone(), "animation-duration", secs(*period)));
            out.push(Patch::style(id.clone(), "--lo", num(self.arc_keyframes.0)));
            out.push(Patch::style(id, "--hi", num(self.arc_keyframes.1)));
        }

        out.push(Patch::style("hud-pulse", "transform", translate(self.pulse_offset)));
        out.push(Patch::style("hud-pulse-anim", "--to", num(self.pulse_scale)));
        out.push(Patch::style("hud-pulse-anim", "--lo", num(self.pulse_keyframes.0)));
        out.push(Patch::style("hud-pulse-anim", "--hi", num(self.pulse_keyframes.1)));
        out.push(Patch::attr("hud-pulse-ring", "stroke-opacity", num(self.ring_opacity)));

        out.push(Patch::style("hud-core", "--to", num(self.core_scale)));
        out.push(Patch::style(
            "hud-core",
            "--rot",
            format!("{}deg", num(self.core_rotate_deg)),
        ));
        out.push(Patch::style(
            "hud-halo",
            "box-shadow",
            format!(
                "0 0 {} rgba(56,189,248,{})",
                px(self.halo_glow.0),
                num(self.halo_glow.1)
            ),
        ));
        out.push(Patch::style("hud-core-dot", "--to", num(self.dot_scale)));
        out.push(Patch::style(
            "hud-core-dot",
            "--rot",
            format!("{}deg", num(self.dot_rotate_deg)),
        ));
        out.push(Patch::style(
            "hud-core-dot",
            "box-shadow",
            format!(
                "0 0 {} rgba(14,165,233,{})",
                px(self.dot_glow.0),
                num(self.dot_glow.1)
            ),
        ));
        for i in 0..RIPPLE_COUNT {
            let id = format!("hud-ripple-{}", i);
            out.push(Patch::style(
                id.clone(),
                "border-color",
                format!("rgba(125,211,252,{})", num(self.ripple_alpha[i])),
            ));
            out.push(Patch::style(id, "--to", num(self.ripple_scale[i])));
        }

        out.push(Patch::style("hud-beam", "opacity", num(self.beam_opacity)));
        out.push(Patch::style("hud-beam", "transform", translate(self.beam_offset)));
        out.push(Patch::style(
            "hud-beam-bar",
            "transform",
            format!("scale({})", num(self.beam_scale)),
        ));

        out.push(Patch::style(
            "hud-orbit",
            "animation-duration",
            secs(self.orbit_period_s),
        ));
        for (i, period) in self.indicator_period_s.iter().enumerate() {
            let id = format!("hud-orbit-dot-{}", i);
            out.push(Patch::style(id.clone(), "animation-duration", secs(*period)));
            out.push(Patch::style(id.clone(), "--to", num(self.indicator_scale)));
            out.push(Patch::style(
                id,
                "box-shadow",
                format!(
                    "0 0 {} rgba(34,211,238,{})",
                    px(self.indicator_glow.0),
                    num(self.indicator_glow.1)
                ),
            ));
            let link = format!("hud-orbit-link-{}", i);
            out.push(Patch::attr(link.clone(), "stroke-opacity", num(self.link_opacity)));
            out.push(Patch::style(link, "stroke-dashoffset", num(self.dash_offset)));
        }

        for (p, side) in ["l", "r"].iter().enumerate() {
            out.push(Patch::style(
                format!("hud-panel-{}", side),
                "--lo",
                num(self.panel_keyframe_lo[p]),
            ));
            out.push(Patch::style(
                format!("hud-panel-{}-bar", side),
                "transform",
                format!("scaleX({})", num(self.panel_bar_scale[p])),
            ));
            for c in 0..2 {
                out.push(Patch::style(
                    format!("hud-panel-{}-c{}", side, c),
                    "opacity",
                    num(self.panel_cells[p][c]),
                ));
            }
        }

        out.push(Patch::style(
            "hud-wave",
            "transform",
            format!("translateY({})", px(self.wave_lift)),
        ));
        out.push(Patch::attr("hud-wave-a", "stroke-opacity", num(self.wave_opacity.0)));
        out.push(Patch::attr("hud-wave-b", "stroke-opacity", num(self.wave_opacity.1)));
        out.push(Patch::style("hud-wave-b", "--shift", px(self.wave_shift)));
        out.push(Patch::style(
            "hud-wave-b",
            "animation-duration",
            secs(self.wave_period_s),
        ));

        for (i, bar) in self.bars.iter().enumerate() {
            let id = format!("hud-bar-{}", i);
            out.push(Patch::attr(id.clone(), "y", num(bar.y)));
            out.push(Patch::attr(id.clone(), "height", num(bar.height)));
            out.push(Patch::attr(
                id,
                "fill",
                format!("rgba(125,211,252,{})", num(bar.alpha)),
            ));
        }
        out
    }
}

/// Core-orbit connectors share the published opacity; kept separate because
/// their count depends on the tier.
pub fn core_link_patches(tier: FidelityTier, state: &OverlayState) -> Vec<Patch> {
    (0..tier.profile().overlay_orbit_nodes)
        .map(|i| {
            Patch::attr(
                format!("hud-core-link-{}", i),
                "stroke-opacity",
                num(state.link_opacity),
            )
        })
        .collect()
}
