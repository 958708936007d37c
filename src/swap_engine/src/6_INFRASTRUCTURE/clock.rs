//! Time source for quote staleness
//!
//! Timestamps are nanoseconds since the Unix epoch.

use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock {
    fn now_nanos(&self) -> u64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0)
    }
}

/// Hand-advanced clock shared between a test and the session it drives
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<u64>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn advance_secs(&self, seconds: u64) {
        self.now.set(self.now.get() + seconds * crate::infrastructure::NANOS_PER_SECOND);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_nanos(&self) -> u64 {
        self.now.get()
    }
}
