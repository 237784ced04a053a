//! Injectable time source.
//!
//! Services never call `Utc::now()` directly; they ask a [`Clock`] so tests
//! can move time forward past session and code expiry.

use crate::types::Timestamp;

/// Source of the current UTC time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }
}
