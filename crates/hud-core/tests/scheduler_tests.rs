// Host-side tests for the update scheduler: frame floor, publication
// throttle, change suppression and visibility suspension.

use hud_core::activity::{ActivityGenerator, ActivitySample, ActivitySource};
use hud_core::random::FixedRandom;
use hud_core::scheduler::{SchedulerState, TickOutcome, UpdateScheduler};
use hud_core::tier::FidelityTier;

/// Returns the same sample on every call.
struct ConstantSource(ActivitySample);

impl ConstantSource {
    fn new(level: f32, bands: usize) -> Self {
        Self(ActivitySample {
            level,
            bands: std::iter::repeat(0.3).take(bands).collect(),
        })
    }
}

impl ActivitySource for ConstantSource {
    fn band_count(&self) -> usize {
        self.0.bands.len()
    }

    fn sample(&mut self, _t: f64) -> &ActivitySample {
        &self.0
    }
}

const STEP_MS: f64 = 40.0;

fn run<S: ActivitySource>(s: &mut UpdateScheduler<S>, ticks: usize, start: f64) -> Vec<TickOutcome> {
    (1..=ticks)
        .map(|i| s.tick(start + i as f64 * STEP_MS, true))
        .collect()
}

#[test]
fn ticks_under_the_frame_floor_are_skipped() {
    let mut s = UpdateScheduler::new(FidelityTier::Standard, ConstantSource::new(0.5, 12), 0.0);
    assert_eq!(s.tick(16.0, true), TickOutcome::Skipped);
    assert_eq!(s.tick(32.0, true), TickOutcome::Skipped);
    assert_ne!(s.tick(34.0, true), TickOutcome::Skipped);
    assert_eq!(s.tick(50.0, true), TickOutcome::Skipped);
}

#[test]
fn constant_activity_publishes_exactly_once() {
    let mut s = UpdateScheduler::new(FidelityTier::Standard, ConstantSource::new(0.5, 12), 0.0);
    let rx = s.subscribe();
    let outcomes = run(&mut s, 60, 0.0);

    let published = outcomes
        .iter()
        .filter(|o| **o == TickOutcome::Published)
        .count();
    assert_eq!(published, 1);
    assert_eq!(s.publications(), 1);
    assert_eq!(rx.revision(), 1);
    assert!(outcomes.contains(&TickOutcome::Suppressed));

    let sample = rx.borrow();
    assert!((sample.level - 0.5).abs() < 1e-6);
    assert_eq!(sample.bands.len(), 12);
}

#[test]
fn standard_tier_publication_slots_follow_base_throttle() {
    let mut s = UpdateScheduler::new(FidelityTier::Standard, ConstantSource::new(0.3, 12), 0.0);
    let outcomes = run(&mut s, 30, 0.0);
    for (i, o) in outcomes.iter().enumerate() {
        let slot = (i + 1) % 3 == 0;
        assert_eq!(
            slot,
            matches!(o, TickOutcome::Published | TickOutcome::Suppressed),
            "tick {} -> {:?}",
            i + 1,
            o
        );
    }
}

#[test]
fn sustained_high_activity_widens_throttle_to_six() {
    let mut s = UpdateScheduler::new(FidelityTier::Standard, ConstantSource::new(0.8, 12), 0.0);
    let mut slots = 0;
    for i in 1..=100 {
        let o = s.tick(i as f64 * STEP_MS, true);
        assert!(s.effective_throttle() >= 6);
        if matches!(o, TickOutcome::Published | TickOutcome::Suppressed) {
            slots += 1;
        }
    }
    assert_eq!(slots, 100 / 6);
    assert_eq!(s.publications(), 1);
}

#[test]
fn instantaneous_level_updates_every_computed_tick() {
    let mut s = UpdateScheduler::new(FidelityTier::Reduced, ConstantSource::new(0.42, 6), 0.0);
    let level = s.level_reader();
    assert_eq!(s.tick(40.0, true), TickOutcome::Computed);
    assert!((level.get() - 0.42).abs() < 1e-6);
    assert_eq!(s.publications(), 0);
}

#[test]
fn hidden_surface_suspends_and_resumes_without_replay() {
    let mut s = UpdateScheduler::new(
        FidelityTier::Standard,
        ActivityGenerator::new(12, FixedRandom(0.5)),
        0.0,
    );
    run(&mut s, 10, 0.0);
    let elapsed = s.elapsed_secs();
    let publications = s.publications();

    for i in 0..200 {
        let o = s.tick(1_000.0 + i as f64 * STEP_MS, false);
        assert_eq!(o, TickOutcome::Hidden);
        assert!(o.keep_scheduling());
    }
    assert_eq!(s.state(), SchedulerState::Hidden);
    assert_eq!(s.elapsed_secs(), elapsed);
    assert_eq!(s.publications(), publications);

    // First visible tick only re-anchors the clock.
    assert_eq!(s.tick(60_000.0, true), TickOutcome::Skipped);
    assert_eq!(s.state(), SchedulerState::Active);
    assert_ne!(s.tick(60_040.0, true), TickOutcome::Skipped);
    assert!((s.elapsed_secs() - elapsed - 0.04).abs() < 1e-9);
}

#[test]
fn stopped_scheduler_never_computes_again() {
    let mut s = UpdateScheduler::new(FidelityTier::Standard, ConstantSource::new(0.5, 12), 0.0);
    s.stop();
    let outcome = s.tick(100.0, true);
    assert_eq!(outcome, TickOutcome::Stopped);
    assert!(!outcome.keep_scheduling());
    assert_eq!(s.elapsed_secs(), 0.0);
}

#[test]
fn published_level_decays_smoothly_after_a_burst() {
    struct Burst {
        sample: ActivitySample,
        calls: usize,
    }
    impl ActivitySource for Burst {
        fn band_count(&self) -> usize {
            self.sample.bands.len()
        }
        fn sample(&mut self, _t: f64) -> &ActivitySample {
            self.calls += 1;
            self.sample.level = if self.calls <= 3 { 0.9 } else { 0.1 };
            &self.sample
        }
    }

    let source = Burst {
        sample: ActivitySample::idle(12),
        calls: 0,
    };
    let mut s = UpdateScheduler::new(FidelityTier::Standard, source, 0.0);
    let rx = s.subscribe();
    run(&mut s, 3, 0.0);
    assert!((rx.borrow().level - 0.9).abs() < 1e-6);

    run(&mut s, 3, 120.0);
    let after = rx.borrow().level;
    assert!((after - 0.9 * 0.92).abs() < 1e-5, "level {}", after);
}

/// Level and band value set from the outside between ticks.
struct Knob(std::rc::Rc<std::cell::Cell<(f32, f32)>>, ActivitySample);

impl ActivitySource for Knob {
    fn band_count(&self) -> usize {
        self.1.bands.len()
    }

    fn sample(&mut self, _t: f64) -> &ActivitySample {
        let (level, band) = self.0.get();
        self.1.level = level;
        self.1.bands.iter_mut().for_each(|b| *b = band);
        &self.1
    }
}

#[test]
fn sub_epsilon_jitter_is_suppressed_and_real_change_publishes_once() {
    let knob = std::rc::Rc::new(std::cell::Cell::new((0.5, 0.3)));
    let source = Knob(knob.clone(), ActivitySample::idle(6));
    // reduced tier: every 6th computed tick is a slot
    let mut s = UpdateScheduler::new(FidelityTier::Reduced, source, 0.0);
    run(&mut s, 6, 0.0);
    assert_eq!(s.publications(), 1);

    let mut at = 6.0 * STEP_MS;
    for jitter in [(0.5005, 0.302), (0.4995, 0.298), (0.5008, 0.3025)] {
        knob.set(jitter);
        run(&mut s, 6, at);
        at += 6.0 * STEP_MS;
    }
    assert_eq!(s.publications(), 1);

    knob.set((0.52, 0.3));
    run(&mut s, 18, at);
    assert_eq!(s.publications(), 2);
}

#[test]
fn forced_reduced_tier_publishes_reduced_band_vector() {
    let tier = FidelityTier::Reduced;
    let n = tier.profile().band_count;
    let mut s = UpdateScheduler::new(tier, ActivityGenerator::new(n, FixedRandom(0.5)), 0.0);
    let rx = s.subscribe();
    for i in 1..=60 {
        s.tick(i as f64 * STEP_MS, true);
        assert_eq!(rx.borrow().bands.len(), 6);
    }
    assert!(s.publications() >= 1);
}
