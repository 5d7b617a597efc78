use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

// -------------------------------------------------------------------------------------------------

/// A source of wall-clock time in milliseconds, used to drive the modulation strategies.
///
/// Returned times must not decrease between calls.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds.
    fn now_ms(&self) -> f64;
}

// -------------------------------------------------------------------------------------------------

/// High resolution session clock: counts milliseconds since the clock got created.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

// -------------------------------------------------------------------------------------------------

/// A clock which only moves when told so. Useful for tests and offline rendering.
///
/// The time is stored as f64 bits in an atomic, so the clock can be shared with and
/// modified while a driver is running.
#[derive(Debug, Default)]
pub struct ManualClock {
    time_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(time_ms: f64) -> Self {
        Self {
            time_ms: AtomicU64::new(time_ms.to_bits()),
        }
    }

    /// Set a new absolute time in milliseconds.
    pub fn set(&self, time_ms: f64) {
        debug_assert!(time_ms.is_finite(), "Invalid clock time");
        self.time_ms.store(time_ms.to_bits(), Ordering::Relaxed);
    }

    /// Move the clock forward by the given amount of milliseconds.
    pub fn advance(&self, delta_ms: f64) {
        debug_assert!(delta_ms >= 0.0, "Clocks can't run backwards");
        let _ = self
            .time_ms
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + delta_ms).to_bits())
            });
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.time_ms.load(Ordering::Relaxed))
    }
}

// -------------------------------------------------------------------------------------------------
