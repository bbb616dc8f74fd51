//! Static overlay skeleton, built once per mount.
//!
//! Structure depends only on the tier. Everything that moves with activity is
//! driven afterwards by patches against the element ids emitted here.

use super::patch::num;
use super::{ARC_SPECS, CORE_ORBIT_RADIUS, INDICATOR_COUNT, INDICATOR_RADIUS, RIPPLE_COUNT};
use crate::tier::FidelityTier;
use std::f32::consts::TAU;
use std::fmt::Write;

const KEYFRAMES: &str = "\
.hud{position:fixed;inset:0;z-index:0;pointer-events:none;overflow:hidden}\
.hud-layer{position:absolute;inset:0;display:flex;align-items:center;justify-content:center;pointer-events:none}\
.hud-spin{animation:hud-spin 120s linear infinite}\
.hud-spin-rev{animation:hud-spin-rev 20s linear infinite}\
.hud-dash{animation:hud-dash 8s linear infinite}\
.hud-breathe{animation:hud-breathe 3.6s ease-in-out infinite}\
.hud-ripple{animation:hud-ripple 2.6s ease-out infinite}\
.hud-sweep{animation:hud-sweep 8s ease-in-out infinite}\
.hud-drift{animation:hud-drift 5.4s ease-in-out infinite}\
.hud-shift{animation:hud-shift 3.6s linear infinite}\
.hud-fade{animation:hud-fade 6s ease-in-out infinite}\
@keyframes hud-spin{to{transform:rotate(360deg)}}\
@keyframes hud-spin-rev{to{transform:rotate(-360deg)}}\
@keyframes hud-dash{0%,100%{stroke-dashoffset:0;opacity:var(--lo,.05)}50%{stroke-dashoffset:-300;opacity:var(--hi,.22)}}\
@keyframes hud-breathe{0%,100%{transform:scale(1) rotate(0deg);opacity:var(--lo,1)}50%{transform:scale(var(--to,1.02)) rotate(var(--rot,0deg));opacity:var(--hi,1)}}\
@keyframes hud-ripple{0%{transform:scale(var(--from,.6));opacity:.25}50%{opacity:.08}100%{transform:scale(var(--to,1));opacity:.25}}\
@keyframes hud-sweep{0%,100%{transform:rotate(-40deg)}50%{transform:rotate(40deg)}}\
@keyframes hud-drift{0%,100%{transform:translateX(var(--dx,-6px));opacity:var(--lo,.75)}50%{transform:translateX(0);opacity:1}}\
@keyframes hud-shift{0%,100%{transform:translateX(0)}50%{transform:translateX(var(--shift,-34px))}}\
@keyframes hud-fade{0%,100%{opacity:.04}50%{opacity:.09}}";

pub const WAVE_PATH: &str = "M0 40 C80 40 120 10 180 28 C240 46 320 8 400 28 C480 46 560 10 640 40";

/// Rendered skeleton plus the ids that were emitted, for sanity checks.
#[derive(Clone, Debug)]
pub struct OverlayMarkup {
    pub html: String,
    pub tier: FidelityTier,
}

fn ticks(out: &mut String, c: f32, count: usize, r_out: f32, r_in: f32, stroke: &str, alpha: f32) {
    for i in 0..count {
        let a = i as f32 / count as f32 * TAU;
        let _ = write!(
            out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-opacity="{}" stroke-width="1"/>"#,
            num(c + a.cos() * r_out),
            num(c + a.sin() * r_out),
            num(c + a.cos() * r_in),
            num(c + a.sin() * r_in),
            stroke,
            alpha
        );
    }
}

fn ring(out: &mut String, c: f32, r: f32, stroke: &str, width: f32, alpha: f32, id: Option<&str>) {
    let id_attr = id.map(|id| format!(r#" id="{}""#, id)).unwrap_or_default();
    let _ = write!(
        out,
        r#"<circle{} cx="{}" cy="{}" r="{}" stroke="{}" stroke-width="{}" stroke-opacity="{}"/>"#,
        id_attr, c, c, r, stroke, width, alpha
    );
}

impl OverlayMarkup {
    pub fn build(tier: FidelityTier, canvas_id: &str) -> Self {
        let profile = tier.profile();
        let reduced = tier == FidelityTier::Reduced;
        let mut h = String::with_capacity(16 * 1024);

        let _ = write!(h, "<style>{}</style>", KEYFRAMES);
        h.push_str(r#"<div class="hud" aria-hidden="true">"#);

        // backdrop and grid
        h.push_str(r#"<div class="hud-layer" style="background:radial-gradient(ellipse at center, rgba(4,43,58,0.55) 0%, rgba(0,0,0,0.85) 60%);backdrop-filter:blur(6px);-webkit-backdrop-filter:blur(6px)"></div>"#);
        h.push_str(r#"<div class="hud-layer" style="background-image:linear-gradient(90deg, rgba(10,60,90,0.03) 1px, transparent 1px), linear-gradient(180deg, rgba(10,60,90,0.03) 1px, transparent 1px);background-size:48px 48px;mix-blend-mode:screen;opacity:0.6"></div>"#);

        // outer rings
        let blur = if profile.ring_blur_px > 0.0 {
            format!(r#" style="filter:blur({}px)""#, profile.ring_blur_px)
        } else {
            String::new()
        };
        let _ = write!(
            h,
            r#"<div id="hud-outer" class="hud-layer"><div class="hud-spin" style="animation-duration:{}s"><svg width="640" height="640" viewBox="0 0 640 640" fill="none" opacity="0.8"{}>"#,
            profile.outer_ring_period_s, blur
        );
        let outer_rings: [(f32, &str, f32, f32); 3] = [
            (120.0, "#38bdf8", if reduced { 1.0 } else { 2.0 }, 0.9),
            (170.0, "#06b6d4", 3.0, 0.55),
            (240.0, "#0891b2", 1.5, 0.32),
        ];
        for (r, stroke, w, a) in outer_rings.iter().take(profile.outer_ring_count) {
            ring(&mut h, 320.0, *r, stroke, *w, *a, None);
        }
        ticks(&mut h, 320.0, 24, 300.0, 285.0, "#22d3ee", 0.12);
        h.push_str("</svg></div></div>");

        // counter-rotating inner ring
        h.push_str(r#"<div id="hud-inner" class="hud-layer"><div id="hud-inner-spin" class="hud-spin-rev"><svg width="420" height="420" viewBox="0 0 420 420" fill="none" opacity="0.7">"#);
        ring(&mut h, 210.0, 60.0, "#7dd3fc", 2.0, 0.85, None);
        ring(&mut h, 210.0, 96.0, "#38bdf8", 1.2, 0.5, None);
        ticks(&mut h, 210.0, 12, 106.0, 96.0, "#7dd3fc", 0.18);
        h.push_str("</svg></div></div>");

        // flowing arcs
        h.push_str(r#"<svg class="hud-layer" width="100%" height="100%" viewBox="0 0 640 640" style="overflow:visible">"#);
        for (i, arc) in ARC_SPECS.iter().enumerate() {
            let _ = write!(
                h,
                r#"<path id="hud-arc-{}" class="hud-dash" d="M320 {} A {} {} 0 1 1 319.9 {}" fill="none" stroke="{}" stroke-width="{}" stroke-dasharray="300" style="animation-duration:{}s"/>"#,
                i,
                num(320.0 - arc.radius),
                arc.radius,
                arc.radius,
                num(320.0 - arc.radius),
                arc.stroke,
                arc.width,
                arc.period_s
            );
        }
        h.push_str("</svg>");

        // pulsing ring
        h.push_str(r#"<div id="hud-pulse" class="hud-layer"><div id="hud-pulse-anim" class="hud-breathe" style="animation-duration:3.6s"><svg width="520" height="520" viewBox="0 0 520 520" fill="none" opacity="0.6">"#);
        ring(&mut h, 260.0, 200.0, "#34d399", 2.0, 0.06, Some("hud-pulse-ring"));
        h.push_str("</svg></div></div>");

        // lively centre
        h.push_str(r#"<div class="hud-layer"><div id="hud-core" class="hud-breathe" style="position:relative;width:220px;height:220px;border-radius:9999px;display:flex;align-items:center;justify-content:center;mix-blend-mode:screen;animation-duration:3.2s">"#);
        h.push_str(r#"<div style="position:absolute;width:320px;height:320px;border-radius:9999px;background:radial-gradient(circle at 40% 40%, rgba(56,189,248,0.09), rgba(14,165,233,0.02) 35%, transparent 60%);filter:blur(28px);opacity:0.9"></div>"#);
        h.push_str(r#"<div id="hud-halo" style="position:absolute;width:200px;height:200px;border-radius:9999px;background:radial-gradient(circle at 50% 50%, rgba(125,211,252,0.26), rgba(56,189,248,0.06) 45%, transparent 70%)"></div>"#);
        h.push_str(r#"<div id="hud-core-dot" class="hud-breathe" style="width:88px;height:88px;border-radius:9999px;background:radial-gradient(circle, #e6fffb 0%, #7dd3fc 45%, #0369a1 100%);border:1px solid rgba(255,255,255,0.08);animation-duration:1.6s;--lo:0.95"></div>"#);

        // micro segments
        h.push_str(r#"<svg width="220" height="220" viewBox="0 0 220 220" style="position:absolute"><g transform="translate(110,110)">"#);
        let segs = profile.micro_segments;
        let (sw, sh) = if reduced { (6, 8) } else { (8, 12) };
        for i in 0..segs {
            let a = i as f32 / segs as f32 * TAU;
            let rx = 72.0 + (i % 3) as f32 * 6.0;
            let _ = write!(
                h,
                r##"<rect x="{}" y="{}" width="{}" height="{}" rx="2" fill="#7dd3fc" opacity="{}"/>"##,
                num(a.cos() * rx - 4.0),
                num(a.sin() * rx - 6.0),
                sw,
                sh,
                num(0.7 - (i % 3) as f32 * 0.08)
            );
        }
        h.push_str("</g></svg>");

        for i in 0..RIPPLE_COUNT {
            let d = 60 + i * 60;
            let _ = write!(
                h,
                r#"<div id="hud-ripple-{}" class="hud-ripple" style="position:absolute;width:{}px;height:{}px;border-radius:9999px;border:1.2px solid rgba(125,211,252,0.06);animation-duration:{}s;animation-delay:{}s;--from:{}"></div>"#,
                i,
                d,
                d,
                num(2.6 + i as f32 * 0.8),
                num(i as f32 * 0.12),
                num(0.6 + i as f32 * 0.12)
            );
        }

        // orbiting nodes near the core
        h.push_str(r#"<svg width="640" height="640" style="position:absolute;left:50%;top:50%;transform:translate(-50%,-50%)">"#);
        let n = profile.overlay_orbit_nodes;
        let r = CORE_ORBIT_RADIUS[usize::from(reduced)];
        for i in 0..n {
            let a0 = i as f32 / n as f32 * TAU;
            let a1 = (i + 1) as f32 / n as f32 * TAU;
            let size = if reduced { 3.0 } else { 4.0 + (i % 3) as f32 * 2.0 };
            let _ = write!(
                h,
                r##"<circle cx="{x}" cy="{y}" r="{s}" fill="#67e8f9" opacity="0.9"/><line id="hud-core-link-{i}" x1="{x}" y1="{y}" x2="{x2}" y2="{y2}" stroke="#60a5fa" stroke-opacity="0.06" stroke-width="1" stroke-dasharray="8"/>"##,
                x = num(320.0 + a0.cos() * r),
                y = num(320.0 + a0.sin() * r),
                s = size,
                i = i,
                x2 = num(320.0 + a1.cos() * r),
                y2 = num(320.0 + a1.sin() * r)
            );
        }
        h.push_str("</svg></div></div>");

        // scanning beam
        h.push_str(r#"<div id="hud-beam" class="hud-layer" style="mix-blend-mode:screen;opacity:0.25"><div class="hud-sweep"><div id="hud-beam-bar" style="width:820px;height:140px;border-radius:9999px;background:linear-gradient(90deg, rgba(0,0,0,0) 0%, rgba(56,189,248,0.22) 50%, rgba(0,0,0,0) 100%);filter:blur(18px)"></div></div></div>"#);

        // orbiting indicator dots
        h.push_str(r#"<div class="hud-layer"><div id="hud-orbit" class="hud-spin" style="position:relative;width:640px;height:640px;animation-duration:30s">"#);
        for i in 0..INDICATOR_COUNT {
            let a = i as f32 / INDICATOR_COUNT as f32 * TAU;
            let size = 4 + (i % 3) * 2;
            let _ = write!(
                h,
                r#"<div id="hud-orbit-dot-{}" class="hud-breathe" style="position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;border-radius:9999px;background:#a5f3fc;animation-delay:{}s;--lo:0.7"></div>"#,
                i,
                num(320.0 + a.cos() * INDICATOR_RADIUS),
                num(320.0 + a.sin() * INDICATOR_RADIUS),
                size,
                size,
                num(i as f32 * 0.05)
            );
        }
        h.push_str(r#"<svg width="640" height="640" style="position:absolute;left:0;top:0">"#);
        for i in 0..INDICATOR_COUNT {
            let a0 = i as f32 / INDICATOR_COUNT as f32 * TAU;
            let a1 = (i + 1) as f32 / INDICATOR_COUNT as f32 * TAU;
            let _ = write!(
                h,
                r##"<line id="hud-orbit-link-{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="#60a5fa" stroke-opacity="0.06" stroke-width="1" stroke-dasharray="8" style="transition:stroke-dashoffset 180ms linear"/>"##,
                i,
                num(320.0 + a0.cos() * INDICATOR_RADIUS),
                num(320.0 + a0.sin() * INDICATOR_RADIUS),
                num(320.0 + a1.cos() * INDICATOR_RADIUS),
                num(320.0 + a1.sin() * INDICATOR_RADIUS)
            );
        }
        h.push_str("</svg></div></div>");

        // data panels
        for (side, pos, width, secs, delay, dx) in [
            ("l", "left:24px;top:24px", 160, 5.4, 0.0, -6),
            ("r", "right:24px;top:40px", 144, 6.8, 0.6, 6),
        ] {
            let _ = write!(
                h,
                r#"<div id="hud-panel-{s}" class="hud-drift" style="position:absolute;{pos};padding:12px;border-radius:6px;background:rgba(5,30,45,0.25);backdrop-filter:blur(4px);-webkit-backdrop-filter:blur(4px);border:1px solid rgba(14,165,233,0.08);animation-duration:{secs}s;animation-delay:{delay}s;--dx:{dx}px"><div id="hud-panel-{s}-bar" style="width:{w}px;height:8px;margin-bottom:8px;border-radius:9999px;background:linear-gradient(90deg,#22d3ee,#3b82f6);transform-origin:left"></div><div style="display:flex;gap:8px"><div id="hud-panel-{s}-c0" style="width:88px;height:12px;border-radius:4px;background:rgba(255,255,255,0.06)"></div><div id="hud-panel-{s}-c1" style="width:36px;height:12px;border-radius:4px;background:rgba(255,255,255,0.03)"></div></div></div>"#,
                s = side,
                pos = pos,
                secs = secs,
                delay = delay,
                dx = dx,
                w = width
            );
        }

        // bottom waveform and spectral bars
        h.push_str(r#"<div id="hud-wave" style="position:absolute;left:0;right:0;bottom:24px;display:flex;align-items:center;justify-content:center"><svg width="640" height="80" viewBox="0 0 640 80" fill="none" opacity="0.9">"#);
        let _ = write!(
            h,
            r##"<path id="hud-wave-a" d="{}" stroke="#38bdf8" stroke-width="2" stroke-opacity="0.8" fill="transparent"/><path id="hud-wave-b" class="hud-shift" d="{}" stroke="#7dd3fc" stroke-width="1.6" stroke-opacity="0.6" fill="transparent"/>"##,
            WAVE_PATH, WAVE_PATH
        );
        h.push_str(r#"<g transform="translate(0,8)">"#);
        for i in 0..profile.band_count {
            let _ = write!(
                h,
                r#"<rect id="hud-bar-{}" x="{}" y="58" width="10" height="6" rx="2" fill="rgba(125,211,252,0.12)"/>"#,
                i,
                super::bar_x(i)
            );
        }
        h.push_str("</g></svg></div>");

        // canvas for particles, orbit nodes and bursts
        let _ = write!(
            h,
            r#"<div class="hud-layer"><canvas id="{}" style="width:100%;height:100%;display:block"></canvas></div>"#,
            canvas_id
        );

        h.push_str(r#"<div class="hud-layer hud-fade" style="background:radial-gradient(circle at 30% 20%, rgba(10,120,160,0.06), transparent 20%), radial-gradient(circle at 70% 80%, rgba(0,80,120,0.05), transparent 30%)"></div>"#);
        h.push_str("</div>");

        Self { html: h, tier }
    }

    /// Count of `<tag` occurrences; used by tests and debug logging.
    pub fn count_tag(&self, tag: &str) -> usize {
        self.html.matches(&format!("<{}", tag)).count()
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.html.contains(&format!(r#"id="{}""#, id))
    }
}
