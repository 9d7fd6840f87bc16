//! Injected time source.
//!
//! The engine never samples wall-clock time itself; the controller asks
//! its clock, which tests replace with a manual one.

use coursetrack_core::Time;

/// Source of "now" timestamps.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> Time;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        chrono::Utc::now()
    }
}
