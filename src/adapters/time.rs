//! Host time adapters.
//!
//! - [`MonotonicClock`] implements [`Clock`] over `std::time::Instant`.
//! - [`StdDelay`] implements `embedded_hal::delay::DelayNs` by sleeping the
//!   calling thread; the tick loop has no other work competing for it.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use crate::app::ports::Clock;

/// Milliseconds since the adapter was created.
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Blocking delay backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
