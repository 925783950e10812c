//! Real-time bookkeeping for passive income.
//!
//! The host calls `tick(elapsed)` at whatever rate its frame loop runs.
//! [`SecondAccumulator`] turns those variable deltas into whole seconds
//! without ever dropping the fractional remainder, and [`Clock`] supplies
//! the wall-clock timestamps used for offline catch-up.

use std::cell::Cell;
use std::rc::Rc;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Whole-second accumulator with an exact carry buffer.
///
/// Elapsed time is stored as integer nanoseconds so that e.g. ten 0.1s
/// ticks add up to exactly one second.
#[derive(Clone, Debug, Default)]
pub struct SecondAccumulator {
    /// Nanoseconds not yet consumed as whole seconds (always < 1s).
    carry_nanos: u64,
    /// Total whole seconds handed out since creation.
    pub total_seconds: u64,
}

impl SecondAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `elapsed_secs` of real (unscaled) time.
    /// Returns the number of whole seconds crossed by this call.
    ///
    /// Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, elapsed_secs: f64) -> u64 {
        if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return 0;
        }
        let nanos = (elapsed_secs * NANOS_PER_SEC as f64).round() as u64;
        let total = self.carry_nanos.saturating_add(nanos);
        let whole = total / NANOS_PER_SEC;
        self.carry_nanos = total % NANOS_PER_SEC;
        self.total_seconds += whole;
        whole
    }

    /// Fraction of a second currently carried forward.
    pub fn carry_secs(&self) -> f64 {
        self.carry_nanos as f64 / NANOS_PER_SEC as f64
    }

    pub fn clear(&mut self) {
        self.carry_nanos = 0;
    }
}

/// Source of wall-clock time in unix seconds.
pub trait Clock {
    fn now_unix_secs(&self) -> u64;
}

/// The platform clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_unix_secs(&self) -> u64 {
        (js_sys::Date::now() / 1000.0).max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_unix_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one
/// handle and move the other into an `Economy`.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(now_unix_secs: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_unix_secs)),
        }
    }

    pub fn set(&self, now_unix_secs: u64) {
        self.now.set(now_unix_secs);
    }

    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get().saturating_add(secs));
    }
}

impl Clock for ManualClock {
    fn now_unix_secs(&self) -> u64 {
        self.now.get()
    }
}

/// Days since the unix epoch (UTC) for a unix timestamp.
pub fn day_index(unix_secs: u64) -> u64 {
    unix_secs / 86_400
}
