// Host-side tests for the overlay skeleton, composed state and DOM patches.

use hud_core::activity::ActivitySample;
use hud_core::overlay::{
    core_link_patches, tempo, OverlayMarkup, OverlayState, Patch, PatchCache, PatchTarget,
};
use hud_core::pointer::PointerState;
use hud_core::tier::FidelityTier;

fn sample(level: f32, band: f32, n: usize) -> ActivitySample {
    ActivitySample {
        level,
        bands: std::iter::repeat(band).take(n).collect(),
    }
}

fn find<'a>(patches: &'a [Patch], id: &str, target: PatchTarget) -> Option<&'a str> {
    patches
        .iter()
        .find(|p| p.id == id && p.target == target)
        .map(|p| p.value.as_str())
}

#[test]
fn markup_is_sized_by_tier() {
    let standard = OverlayMarkup::build(FidelityTier::Standard, "hud-canvas");
    assert!(standard.has_id("hud-bar-11"));
    assert!(!standard.has_id("hud-bar-12"));
    assert!(standard.has_id("hud-core-link-5"));
    assert!(standard.has_id("hud-canvas"));
    // 8 micro segments + 12 bars
    assert_eq!(standard.count_tag("rect"), 20);

    let reduced = OverlayMarkup::build(FidelityTier::Reduced, "hud-canvas");
    assert!(reduced.has_id("hud-bar-5"));
    assert!(!reduced.has_id("hud-bar-6"));
    assert!(!reduced.has_id("hud-core-link-4"));
    assert_eq!(reduced.count_tag("rect"), 12);
    assert!(reduced.html.contains("filter:blur(2px)"));
    assert!(reduced.html.len() < standard.html.len());
}

#[test]
fn every_patched_id_exists_in_markup() {
    for tier in [FidelityTier::Standard, FidelityTier::Reduced] {
        let markup = OverlayMarkup::build(tier, "c");
        let n = tier.profile().band_count;
        let state = OverlayState::compose(&sample(0.4, 0.2, n), tier, PointerState::CENTER, true);
        let mut patches = state.patches();
        patches.extend(core_link_patches(tier, &state));
        for p in &patches {
            assert!(markup.has_id(&p.id), "{:?}: missing #{}", tier, p.id);
        }
    }
}

#[test]
fn data_panels_drift_at_their_own_rates() {
    let markup = OverlayMarkup::build(FidelityTier::Standard, "c");
    let panel = |side: &str| {
        let start = markup
            .html
            .find(&format!(r#"id="hud-panel-{}""#, side))
            .unwrap();
        let end = start + markup.html[start..].find('>').unwrap();
        markup.html[start..end].to_string()
    };
    assert!(panel("l").contains("animation-duration:5.4s"));
    assert!(panel("r").contains("animation-duration:6.8s"));
}

#[test]
fn tempo_speeds_up_with_activity_but_stays_bounded() {
    assert_eq!(tempo(20.0, 8.0, 6.0, 0.0), 20.0);
    assert_eq!(tempo(20.0, 8.0, 6.0, 1.0), 14.0);
    assert_eq!(tempo(1.0, 4.0, 3.0, 1.0), 0.4);

    let idle = OverlayState::compose(&sample(0.0, 0.0, 12), FidelityTier::Standard, PointerState::CENTER, false);
    assert_eq!(idle.arc_period_s, [8.0, 12.0, 18.0]);
    assert_eq!(idle.orbit_period_s, 30.0);

    let loud = OverlayState::compose(&sample(1.0, 1.0, 12), FidelityTier::Standard, PointerState::CENTER, false);
    assert_eq!(loud.arc_period_s, [5.0, 9.0, 15.0]);
    assert_eq!(loud.orbit_period_s, 18.0);
    assert!((loud.wave_period_s - 2.0).abs() < 1e-6);
    assert!(loud.indicator_period_s.iter().all(|p| *p >= 0.4));
}

#[test]
fn bars_track_band_values_and_level() {
    let state = OverlayState::compose(&sample(0.5, 0.5, 6), FidelityTier::Reduced, PointerState::CENTER, false);
    assert_eq!(state.bars.len(), 6);
    let bar = state.bars[0];
    assert!((bar.height - 38.0).abs() < 1e-5);
    assert!((bar.y - 26.0).abs() < 1e-5);
    assert!((bar.alpha - 0.47).abs() < 1e-5);
}

#[test]
fn out_of_range_level_is_clamped() {
    let state = OverlayState::compose(&sample(f32::NAN, 2.0, 12), FidelityTier::Standard, PointerState::CENTER, false);
    assert_eq!(state.level, 0.0);
    assert!(state.bars.iter().all(|b| b.height.is_finite() && b.alpha <= 0.82 + 1e-6));
}

#[test]
fn parallax_offsets_follow_tier_multipliers() {
    let corner = PointerState { x: 1.0, y: 1.0 };
    let s = sample(0.2, 0.1, 12);

    let standard = OverlayState::compose(&s, FidelityTier::Standard, corner, false);
    let patches = standard.patches();
    assert_eq!(
        find(&patches, "hud-outer", PatchTarget::Style("transform")),
        Some("translate3d(9px,6px,0)")
    );
    assert_eq!(
        find(&patches, "hud-inner", PatchTarget::Style("transform")),
        Some("translate3d(-5px,-3px,0)")
    );

    let reduced = OverlayState::compose(&s, FidelityTier::Reduced, corner, false);
    assert_eq!(
        find(&reduced.patches(), "hud-outer", PatchTarget::Style("transform")),
        Some("translate3d(3px,2px,0)")
    );
}

/// Filter through the cache and record every surviving write as applied.
fn apply_all(cache: &mut PatchCache, patches: Vec<Patch>) -> Vec<Patch> {
    let changed = cache.retain_changed(patches);
    for p in &changed {
        cache.record(p.clone());
    }
    changed
}

#[test]
fn unchanged_state_produces_no_writes() {
    let s = sample(0.3, 0.2, 12);
    let state = OverlayState::compose(&s, FidelityTier::Standard, PointerState::CENTER, false);
    let mut cache = PatchCache::new();

    let first = apply_all(&mut cache, state.patches());
    assert!(!first.is_empty());
    assert_eq!(first.len(), cache.len());
    assert!(cache.retain_changed(state.patches()).is_empty());

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.retain_changed(state.patches()).len(), first.len());
}

#[test]
fn unrecorded_writes_are_offered_again() {
    let s = sample(0.3, 0.2, 12);
    let state = OverlayState::compose(&s, FidelityTier::Standard, PointerState::CENTER, false);
    let mut cache = PatchCache::new();

    let first = cache.retain_changed(state.patches());
    // only the first write lands
    let landed = first[0].clone();
    cache.record(landed.clone());
    assert_eq!(cache.len(), 1);

    let retry = cache.retain_changed(state.patches());
    assert_eq!(retry.len(), first.len() - 1);
    assert!(!retry.contains(&landed));
    assert!(retry.contains(&first[1]));
}

#[test]
fn glitch_only_moves_connector_dash_offsets() {
    let s = sample(0.3, 0.2, 12);
    let calm = OverlayState::compose(&s, FidelityTier::Standard, PointerState::CENTER, false);
    let glitched = OverlayState::compose(&s, FidelityTier::Standard, PointerState::CENTER, true);
    let mut cache = PatchCache::new();
    apply_all(&mut cache, calm.patches());

    let delta = apply_all(&mut cache, glitched.patches());
    assert_eq!(delta.len(), 6);
    for p in &delta {
        assert_eq!(p.target, PatchTarget::Style("stroke-dashoffset"));
        assert_eq!(p.value, "6");
    }
}

#[test]
fn connector_opacity_rises_with_level() {
    let tier = FidelityTier::Reduced;
    let state = OverlayState::compose(&sample(1.0, 0.0, 6), tier, PointerState::CENTER, false);
    let links = core_link_patches(tier, &state);
    assert_eq!(links.len(), 4);
    assert!(links.iter().all(|p| p.value == "0.24"));
}
