use crate::constants::{GLITCH_MIN_MS, GLITCH_PROBABILITY, GLITCH_SPAN_MS};
use crate::random::RandomSource;
use crate::shared::{published, Publisher, Subscriber};

/// Low-frequency random flicker. The host fires [`GlitchTimer::on_interval`]
/// every `GLITCH_INTERVAL_MS`; when it returns a duration the host schedules
/// a one-shot timeout that calls [`GlitchTimer::on_timeout`].
pub struct GlitchTimer<R> {
    rng: R,
    flag: Publisher<bool>,
    pending_off: bool,
    flickers: u64,
}

impl<R: RandomSource> GlitchTimer<R> {
    pub fn new(rng: R) -> Self {
        let (flag, _) = published(false);
        Self {
            rng,
            flag,
            pending_off: false,
            flickers: 0,
        }
    }

    pub fn subscribe(&self) -> Subscriber<bool> {
        self.flag.subscribe()
    }

    pub fn is_on(&self) -> bool {
        *self.flag.peek()
    }

    pub fn flickers(&self) -> u64 {
        self.flickers
    }

    /// Returns the on-duration in ms if a flicker starts now. An interval
    /// landing inside a running flicker neither draws nor restarts it.
    pub fn on_interval(&mut self) -> Option<u32> {
        if self.pending_off {
            return None;
        }
        if self.rng.next_unit() >= GLITCH_PROBABILITY {
            return None;
        }
        let duration = (GLITCH_MIN_MS + self.rng.next_unit() * GLITCH_SPAN_MS) as u32;
        self.pending_off = true;
        self.flickers += 1;
        self.flag.publish(true);
        Some(duration)
    }

    pub fn on_timeout(&mut self) {
        self.pending_off = false;
        if self.is_on() {
            self.flag.publish(false);
        }
    }

    /// Drop the flag without waiting for the timeout (teardown).
    pub fn reset(&mut self) {
        self.on_timeout();
    }
}
