//! Scheduling, activity and drawing tuning constants.
//!
//! Tier-dependent numbers live in `TierProfile`; everything here is shared by
//! both tiers.

// Update scheduler
pub const FRAME_FLOOR_MS: f64 = 33.0; // ~30 Hz semantic update rate
pub const HIGH_ACTIVITY_LEVEL: f32 = 0.6;
pub const HIGH_ACTIVITY_THROTTLE_FLOOR: u32 = 6;
pub const LEVEL_EPSILON: f32 = 0.001;
pub const BAND_EPSILON: f32 = 0.003;
pub const PUBLISHED_LEVEL_DECAY: f32 = 0.92; // per publication slot

// Synthetic activity
pub const BREATH_BASE: f32 = 0.12;
pub const BREATH_SPAN: f32 = 0.06;
pub const BREATH_RATE: f32 = 0.6; // rad/s
pub const PULSE_SPAN: f32 = 0.06;
pub const PULSE_RATE: f32 = 3.2; // rad/s
pub const SPIKE_PROBABILITY: f32 = 0.02;
pub const SPIKE_MIN: f32 = 0.4;
pub const SPIKE_SPAN: f32 = 0.6;

// Spectral bands
pub const BAND_FLOOR: f32 = 0.02;
pub const BAND_SPAN: f32 = 0.22;
pub const BAND_BASE_RATE: f32 = 0.6;
pub const BAND_RATE_STEP: f32 = 0.08; // added per (i mod 5)
pub const BAND_NOISE: f32 = 0.02;
pub const BAND_LEVEL_LIFT: f32 = 0.04;
pub const IDLE_BAND_VALUE: f32 = 0.05; // before the first publication
pub const IDLE_LEVEL: f32 = 0.12;

// Canvas layer
pub const WRAP_MARGIN_PX: f32 = 10.0;
pub const PARTICLE_MIN_SPEED: f32 = 0.1; // px per frame, upward
pub const PARTICLE_SPEED_SPAN: f32 = 0.2;
pub const DRIFT_LEVEL_GAIN: f32 = 2.0;
pub const ORBIT_PERIOD_DIVISOR_MS: f64 = 2000.0; // angle = now / divisor
pub const BURST_SPIN_DIVISOR_MS: f64 = 600.0;
pub const BURST_WOBBLE_DIVISOR_MS: f64 = 400.0;
pub const BURST_BASE_RADIUS_FRAC: f32 = 0.12;

// Overlay layer
pub const MIN_ANIMATION_SECS: f32 = 0.4;
pub const GLITCH_DASH_OFFSET: f32 = 6.0;

// Glitch flicker timer
pub const GLITCH_INTERVAL_MS: u32 = 700;
pub const GLITCH_PROBABILITY: f32 = 0.1;
pub const GLITCH_MIN_MS: f32 = 80.0;
pub const GLITCH_SPAN_MS: f32 = 240.0;

// Capability classification
pub const LOW_MEMORY_GB: f64 = 2.0;
pub const DEFAULT_MEMORY_GB: f64 = 4.0; // assumed when unreported
