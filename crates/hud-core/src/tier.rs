//! Fidelity tiers and the one-shot capability classifier.

use crate::constants::{DEFAULT_MEMORY_GB, LOW_MEMORY_GB};
use crate::error::HudResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FidelityTier {
    #[default]
    Standard,
    Reduced,
}

impl FidelityTier {
    pub fn profile(self) -> &'static TierProfile {
        match self {
            FidelityTier::Standard => &STANDARD,
            FidelityTier::Reduced => &REDUCED,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FidelityTier::Standard => "standard",
            FidelityTier::Reduced => "reduced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "full" => Some(FidelityTier::Standard),
            "reduced" | "low" | "lowpower" => Some(FidelityTier::Reduced),
            _ => None,
        }
    }
}

/// Every count, factor and duration that differs between tiers.
#[derive(Clone, Debug, PartialEq)]
pub struct TierProfile {
    pub particle_count: usize,
    pub band_count: usize,
    pub orbit_count: usize,
    pub burst_count: usize,
    pub base_throttle_frames: u32,
    pub drift_damping: f32,
    pub orbit_radius_frac: f32,
    pub outer_ring_count: usize,
    pub micro_segments: usize,
    pub overlay_orbit_nodes: usize,
    pub ring_blur_px: f32,
    pub outer_ring_period_s: f32,
    pub parallax_px: [f32; 2],
}

pub static STANDARD: TierProfile = TierProfile {
    particle_count: 12,
    band_count: 12,
    orbit_count: 6,
    burst_count: 10,
    base_throttle_frames: 3,
    drift_damping: 1.0,
    orbit_radius_frac: 0.34,
    outer_ring_count: 3,
    micro_segments: 8,
    overlay_orbit_nodes: 6,
    ring_blur_px: 0.0,
    outer_ring_period_s: 120.0,
    parallax_px: [18.0, 12.0],
};

pub static REDUCED: TierProfile = TierProfile {
    particle_count: 6,
    band_count: 6,
    orbit_count: 4,
    burst_count: 6,
    base_throttle_frames: 6,
    drift_damping: 0.6,
    orbit_radius_frac: 0.25,
    outer_ring_count: 1,
    micro_segments: 6,
    overlay_orbit_nodes: 4,
    ring_blur_px: 2.0,
    outer_ring_period_s: 240.0,
    parallax_px: [6.0, 4.0],
};

/// Navigator properties holding the network information object, in lookup
/// order. The prefixed names cover older Firefox and WebKit builds.
pub const CONNECTION_KEYS: [&str; 3] = ["connection", "mozConnection", "webkitConnection"];

/// Read-only environment hints. Each accessor may fail or report nothing;
/// either way the classifier treats the signal as absent.
pub trait CapabilityProbe {
    fn save_data(&self) -> HudResult<Option<bool>>;
    fn effective_type(&self) -> HudResult<Option<String>>;
    fn device_memory_gb(&self) -> HudResult<Option<f64>>;
}

/// Plain snapshot of hints, for tests and forced configurations.
#[derive(Clone, Debug, Default)]
pub struct DeviceHints {
    pub save_data: Option<bool>,
    pub effective_type: Option<String>,
    pub device_memory_gb: Option<f64>,
}

impl CapabilityProbe for DeviceHints {
    fn save_data(&self) -> HudResult<Option<bool>> {
        Ok(self.save_data)
    }

    fn effective_type(&self) -> HudResult<Option<String>> {
        Ok(self.effective_type.clone())
    }

    fn device_memory_gb(&self) -> HudResult<Option<f64>> {
        Ok(self.device_memory_gb)
    }
}

/// Why a tier was chosen, for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierReason {
    SaveData,
    SlowNetwork,
    LowMemory,
    Unconstrained,
}

fn absent_on_error<T>(signal: &str, r: HudResult<Option<T>>) -> Option<T> {
    match r {
        Ok(v) => v,
        Err(e) => {
            log::debug!("[tier] {} unavailable: {}", signal, e);
            None
        }
    }
}

#[inline]
pub fn is_low_bandwidth(effective_type: &str) -> bool {
    effective_type.to_ascii_lowercase().contains("2g")
}

/// Classify once at mount. Never fails.
pub fn classify_with_reason(probe: &impl CapabilityProbe) -> (FidelityTier, TierReason) {
    if absent_on_error("save-data", probe.save_data()).unwrap_or(false) {
        return (FidelityTier::Reduced, TierReason::SaveData);
    }
    if absent_on_error("effective-type", probe.effective_type())
        .as_deref()
        .map(is_low_bandwidth)
        .unwrap_or(false)
    {
        return (FidelityTier::Reduced, TierReason::SlowNetwork);
    }
    let memory = absent_on_error("device-memory", probe.device_memory_gb())
        .filter(|m| m.is_finite())
        .unwrap_or(DEFAULT_MEMORY_GB);
    if memory <= LOW_MEMORY_GB {
        return (FidelityTier::Reduced, TierReason::LowMemory);
    }
    (FidelityTier::Standard, TierReason::Unconstrained)
}

pub fn classify(probe: &impl CapabilityProbe) -> FidelityTier {
    let (tier, reason) = classify_with_reason(probe);
    log::info!("[tier] {} ({:?})", tier.as_str(), reason);
    tier
}
