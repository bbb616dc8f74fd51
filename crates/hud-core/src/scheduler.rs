//! Update scheduler: decouples the raw frame callback rate from the rate at
//! which activity becomes observable to the overlay.
//!
//! Every frame the host calls [`UpdateScheduler::tick`]. Ticks closer than
//! `FRAME_FLOOR_MS` to the previous computed tick are skipped. A computed tick
//! always refreshes the instantaneous level (read by the canvas loop), but is
//! published only on every Nth computed tick and only if it differs
//! perceptibly from what is already published.

use crate::activity::{ActivitySample, ActivitySource};
use crate::constants::{
    BAND_EPSILON, FRAME_FLOOR_MS, HIGH_ACTIVITY_LEVEL, HIGH_ACTIVITY_THROTTLE_FLOOR, LEVEL_EPSILON,
    PUBLISHED_LEVEL_DECAY,
};
use crate::shared::{instant_level, published, LevelReader, LevelWriter, Publisher, Subscriber};
use crate::tier::FidelityTier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Active,
    Hidden,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Torn down; the caller must not reschedule.
    Stopped,
    /// Surface hidden; nothing computed, caller keeps polling.
    Hidden,
    /// Below the frame floor (or first tick after resuming).
    Skipped,
    /// Sample computed, not a publication slot.
    Computed,
    /// Publication slot, but nothing changed beyond epsilon.
    Suppressed,
    Published,
}

impl TickOutcome {
    #[inline]
    pub fn keep_scheduling(self) -> bool {
        self != TickOutcome::Stopped
    }
}

/// Throttle divisor for a computed level.
#[inline]
pub fn effective_throttle(base: u32, level: f32) -> u32 {
    let base = base.max(1);
    if level > HIGH_ACTIVITY_LEVEL {
        base.max(HIGH_ACTIVITY_THROTTLE_FLOOR)
    } else {
        base
    }
}

/// Published level with fall-off: rises instantly, decays geometrically.
#[inline]
pub fn decayed_level(computed: f32, previous: f32) -> f32 {
    computed.max(previous * PUBLISHED_LEVEL_DECAY).clamp(0.0, 1.0)
}

#[inline]
pub fn bands_differ(previous: &[f32], next: &[f32]) -> bool {
    previous.len() != next.len()
        || previous
            .iter()
            .zip(next)
            .any(|(a, b)| (a - b).abs() > BAND_EPSILON)
}

pub struct UpdateScheduler<S> {
    source: S,
    base_throttle: u32,
    state: SchedulerState,
    last_ms: f64,
    elapsed_s: f64,
    computed_ticks: u64,
    last_throttle: u32,
    level: LevelWriter,
    sample: Publisher<ActivitySample>,
}

impl<S: ActivitySource> UpdateScheduler<S> {
    pub fn new(tier: FidelityTier, source: S, start_ms: f64) -> Self {
        let profile = tier.profile();
        let idle = ActivitySample::idle(source.band_count());
        let (level, _) = instant_level(idle.level);
        let (sample, _) = published(idle);
        Self {
            source,
            base_throttle: profile.base_throttle_frames,
            state: SchedulerState::Active,
            last_ms: start_ms,
            elapsed_s: 0.0,
            computed_ticks: 0,
            last_throttle: profile.base_throttle_frames,
            level,
            sample,
        }
    }

    pub fn subscribe(&self) -> Subscriber<ActivitySample> {
        self.sample.subscribe()
    }

    pub fn level_reader(&self) -> LevelReader {
        self.level.reader()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_s
    }

    /// Divisor used on the most recent computed tick.
    pub fn effective_throttle(&self) -> u32 {
        self.last_throttle
    }

    pub fn publications(&self) -> u64 {
        self.sample.revision()
    }

    pub fn stop(&mut self) {
        if self.state != SchedulerState::Stopped {
            log::debug!(
                "[scheduler] stopped after {} computed ticks, {} publications",
                self.computed_ticks,
                self.sample.revision()
            );
        }
        self.state = SchedulerState::Stopped;
    }

    pub fn tick(&mut self, now_ms: f64, visible: bool) -> TickOutcome {
        match self.state {
            SchedulerState::Stopped => return TickOutcome::Stopped,
            SchedulerState::Hidden if visible => {
                // Restart the clock so hidden time is not replayed as one giant step.
                log::debug!("[scheduler] visible again");
                self.state = SchedulerState::Active;
                self.last_ms = now_ms;
                return TickOutcome::Skipped;
            }
            _ => {}
        }
        if !visible {
            if self.state == SchedulerState::Active {
                log::debug!("[scheduler] hidden, suspending");
            }
            self.state = SchedulerState::Hidden;
            return TickOutcome::Hidden;
        }

        let dt = now_ms - self.last_ms;
        if !dt.is_finite() || dt < FRAME_FLOOR_MS {
            if !dt.is_finite() || dt < 0.0 {
                self.last_ms = now_ms;
            }
            return TickOutcome::Skipped;
        }
        self.last_ms = now_ms;
        self.elapsed_s += dt / 1000.0;
        self.computed_ticks += 1;

        let fresh = self.source.sample(self.elapsed_s);
        self.level.set(fresh.level);

        let throttle = effective_throttle(self.base_throttle, fresh.level);
        self.last_throttle = throttle;
        if self.computed_ticks % throttle as u64 != 0 {
            return TickOutcome::Computed;
        }

        let (next_level, level_changed, bands_changed) = {
            let prev = self.sample.peek();
            let next_level = decayed_level(fresh.level, prev.level);
            (
                next_level,
                (next_level - prev.level).abs() > LEVEL_EPSILON,
                bands_differ(&prev.bands, &fresh.bands),
            )
        };
        if !level_changed && !bands_changed {
            return TickOutcome::Suppressed;
        }
        self.sample.publish_with(|published| {
            if level_changed {
                published.level = next_level;
            }
            if bands_changed {
                published.bands.clone_from(&fresh.bands);
            }
        });
        TickOutcome::Published
    }
}
