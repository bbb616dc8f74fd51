// Host-side tests for tuning constants and the tier table.

use hud_core::constants::*;
use hud_core::tier::{FidelityTier, REDUCED, STANDARD};

#[test]
#[allow(clippy::assertions_on_constants)]
fn deterministic_activity_fits_under_high_activity_threshold() {
    // without a spike the scheduler never widens its throttle
    assert!(BREATH_BASE + BREATH_SPAN + PULSE_SPAN < HIGH_ACTIVITY_LEVEL);
    assert!(SPIKE_MIN + SPIKE_SPAN <= 1.0);
    assert!(BAND_FLOOR < BAND_SPAN);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn epsilons_and_rates_are_positive() {
    assert!(LEVEL_EPSILON > 0.0 && BAND_EPSILON > LEVEL_EPSILON);
    assert!(PUBLISHED_LEVEL_DECAY > 0.0 && PUBLISHED_LEVEL_DECAY < 1.0);
    assert!(FRAME_FLOOR_MS > 0.0);
    assert!(GLITCH_PROBABILITY > 0.0 && GLITCH_PROBABILITY < 1.0);
    assert!(MIN_ANIMATION_SECS > 0.0);
}

#[test]
fn reduced_tier_is_never_more_expensive() {
    assert!(REDUCED.particle_count < STANDARD.particle_count);
    assert!(REDUCED.band_count < STANDARD.band_count);
    assert!(REDUCED.orbit_count <= STANDARD.orbit_count);
    assert!(REDUCED.burst_count <= STANDARD.burst_count);
    assert!(REDUCED.base_throttle_frames >= STANDARD.base_throttle_frames);
    assert!(REDUCED.base_throttle_frames <= HIGH_ACTIVITY_THROTTLE_FLOOR);
    assert!(REDUCED.drift_damping <= STANDARD.drift_damping);
    assert!(REDUCED.outer_ring_count < STANDARD.outer_ring_count);
}

#[test]
fn profile_lookup_matches_tables() {
    assert_eq!(FidelityTier::Standard.profile(), &STANDARD);
    assert_eq!(FidelityTier::Reduced.profile(), &REDUCED);
    assert_eq!(FidelityTier::default(), FidelityTier::Standard);
    // bands fit the inline buffer
    assert!(STANDARD.band_count <= 12);
}
