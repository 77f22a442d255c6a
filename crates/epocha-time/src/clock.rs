//! Wall clocks for the Epocha Time Engine

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use epocha_core::EpochSeconds;

/// Source of "now" for mount and visibility refresh
pub trait Clock: Send + Sync {
    /// Current wall-clock time, truncated to whole seconds
    fn now(&self) -> EpochSeconds;
}

/// Host system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> EpochSeconds {
        let secs = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_secs() as i64,
            // Before 1970: floor toward the earlier second
            Err(err) => {
                let before = err.duration();
                let whole = before.as_secs() as i64;
                if before.subsec_nanos() > 0 {
                    -whole - 1
                } else {
                    -whole
                }
            }
        };
        EpochSeconds::from_secs_saturating(secs)
    }
}

/// Manually driven clock
/// Clones share the same reading, so a test can keep a handle after
/// moving the clock into an engine.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    value: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: EpochSeconds) -> Self {
        ManualClock {
            value: Arc::new(AtomicI64::new(start.as_secs())),
        }
    }

    /// Jump to a specific time
    pub fn set(&self, now: EpochSeconds) {
        self.value.store(now.as_secs(), Ordering::SeqCst);
    }

    /// Move forward (or backward) by a number of seconds, saturating at the valid range
    pub fn advance(&self, secs: i64) -> EpochSeconds {
        let next = self.now().checked_add_secs(secs).unwrap_or(if secs < 0 {
            EpochSeconds::MIN
        } else {
            EpochSeconds::MAX
        });
        self.value.store(next.as_secs(), Ordering::SeqCst);
        next
    }
}

impl Clock for ManualClock {
    fn now(&self) -> EpochSeconds {
        EpochSeconds::from_secs_saturating(self.value.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now().as_secs() > 1_577_836_800);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(EpochSeconds::from_secs(100).unwrap());
        let handle = clock.clone();

        handle.set(EpochSeconds::from_secs(500).unwrap());
        assert_eq!(clock.now().as_secs(), 500);

        assert_eq!(handle.advance(-20).as_secs(), 480);
        assert_eq!(clock.now().as_secs(), 480);
    }

    #[test]
    fn test_manual_clock_saturates() {
        let clock = ManualClock::new(EpochSeconds::MAX);
        assert_eq!(clock.advance(i64::MAX), EpochSeconds::MAX);

        clock.set(EpochSeconds::MIN);
        assert_eq!(clock.advance(-1), EpochSeconds::MIN);
        assert_eq!(clock.advance(i64::MIN), EpochSeconds::MIN);
        assert_eq!(clock.advance(5).as_secs(), EpochSeconds::MIN.as_secs() + 5);
    }
}
