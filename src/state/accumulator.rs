//! Configured duration built from hour/minute/second increments

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TimerStatus;
use crate::error::TimerError;

/// Unit of a single `add_time` increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    pub fn seconds_per_unit(self) -> u64 {
        match self {
            TimeUnit::Hours => 3600,
            TimeUnit::Minutes => 60,
            TimeUnit::Seconds => 1,
        }
    }

    /// Convert an amount of this unit to seconds, `None` on overflow
    pub fn to_seconds(self, amount: u64) -> Option<u64> {
        amount.checked_mul(self.seconds_per_unit())
    }
}

/// Largest total whose millisecond count still fits in a `u64`
pub const MAX_TOTAL_SECONDS: u64 = u64::MAX / 1000;

/// Holds the total countdown length in seconds
///
/// While a countdown is running the controller locks the accumulator, and
/// every mutation is rejected until it is unlocked again.
#[derive(Debug, Clone, Default)]
pub struct DurationAccumulator {
    total_seconds: u64,
    max_seconds: Option<u64>,
    locked: bool,
}

impl DurationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator that refuses totals above `max_seconds`
    pub fn with_limit(max_seconds: Option<u64>) -> Self {
        Self {
            max_seconds,
            ..Self::default()
        }
    }

    pub fn add_time(&mut self, amount: i64, unit: TimeUnit) -> Result<u64, TimerError> {
        self.ensure_unlocked("add time")?;

        let amount = u64::try_from(amount)
            .ok()
            .filter(|a| *a > 0)
            .ok_or_else(|| TimerError::InvalidArgument(format!("amount must be positive, got {}", amount)))?;

        let total = unit
            .to_seconds(amount)
            .and_then(|secs| self.total_seconds.checked_add(secs))
            .filter(|total| *total <= MAX_TOTAL_SECONDS)
            .ok_or_else(|| TimerError::InvalidArgument("duration overflow".to_string()))?;

        if let Some(max) = self.max_seconds {
            if total > max {
                return Err(TimerError::InvalidArgument(format!(
                    "duration {}s exceeds limit of {}s",
                    total, max
                )));
            }
        }

        debug!("Duration {}s -> {}s (+{} {:?})", self.total_seconds, total, amount, unit);
        self.total_seconds = total;
        Ok(total)
    }

    pub fn reset(&mut self) -> Result<(), TimerError> {
        self.ensure_unlocked("reset")?;
        self.total_seconds = 0;
        Ok(())
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn max_seconds(&self) -> Option<u64> {
        self.max_seconds
    }

    /// Replace the total outright (used when restoring saved state)
    pub(crate) fn set_total(&mut self, total_seconds: u64) -> Result<(), TimerError> {
        self.ensure_unlocked("restore")?;
        self.total_seconds = total_seconds;
        Ok(())
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }

    pub(crate) fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn ensure_unlocked(&self, operation: &'static str) -> Result<(), TimerError> {
        if self.locked {
            Err(TimerError::invalid_state(operation, TimerStatus::Running))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_increments_across_units() {
        let mut acc = DurationAccumulator::new();
        acc.add_time(1, TimeUnit::Hours).unwrap();
        acc.add_time(5, TimeUnit::Minutes).unwrap();
        acc.add_time(10, TimeUnit::Seconds).unwrap();
        acc.add_time(10, TimeUnit::Seconds).unwrap();
        assert_eq!(acc.total_seconds(), 3600 + 300 + 20);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut acc = DurationAccumulator::new();
        acc.add_time(10, TimeUnit::Minutes).unwrap();
        acc.reset().unwrap();
        assert_eq!(acc.total_seconds(), 0);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let mut acc = DurationAccumulator::new();
        acc.add_time(3, TimeUnit::Seconds).unwrap();

        for amount in [0, -1, i64::MIN] {
            let err = acc.add_time(amount, TimeUnit::Minutes).unwrap_err();
            assert!(matches!(err, TimerError::InvalidArgument(_)));
        }
        assert_eq!(acc.total_seconds(), 3);
    }

    #[test]
    fn locked_accumulator_is_not_mutated() {
        let mut acc = DurationAccumulator::new();
        acc.add_time(5, TimeUnit::Seconds).unwrap();
        acc.lock();

        assert_eq!(
            acc.add_time(1, TimeUnit::Hours),
            Err(TimerError::invalid_state("add time", TimerStatus::Running))
        );
        assert!(matches!(acc.reset(), Err(TimerError::InvalidState { .. })));
        assert_eq!(acc.total_seconds(), 5);

        acc.unlock();
        acc.reset().unwrap();
        assert_eq!(acc.total_seconds(), 0);
    }

    #[test]
    fn limit_is_enforced_without_partial_update() {
        let mut acc = DurationAccumulator::with_limit(Some(99 * 3600 + 59 * 60 + 59));
        for _ in 0..9 {
            acc.add_time(10, TimeUnit::Hours).unwrap();
        }
        acc.add_time(9, TimeUnit::Hours).unwrap();
        assert!(acc.add_time(1, TimeUnit::Hours).is_err());
        assert_eq!(acc.total_seconds(), 99 * 3600);
        acc.add_time(59, TimeUnit::Minutes).unwrap();
        acc.add_time(59, TimeUnit::Seconds).unwrap();
        assert!(acc.add_time(1, TimeUnit::Seconds).is_err());
    }

    #[test]
    fn overflow_is_an_argument_error() {
        let mut acc = DurationAccumulator::new();
        let err = acc.add_time(i64::MAX, TimeUnit::Hours).unwrap_err();
        assert_eq!(err, TimerError::InvalidArgument("duration overflow".to_string()));
        assert_eq!(acc.total_seconds(), 0);
    }

    #[test]
    fn total_stays_startable_in_milliseconds() {
        let mut acc = DurationAccumulator::new();
        acc.add_time(MAX_TOTAL_SECONDS as i64, TimeUnit::Seconds).unwrap();
        assert!(acc.total_seconds().checked_mul(1000).is_some());

        let err = acc.add_time(1, TimeUnit::Seconds).unwrap_err();
        assert_eq!(err, TimerError::InvalidArgument("duration overflow".to_string()));
        assert_eq!(acc.total_seconds(), MAX_TOTAL_SECONDS);
    }

    #[test]
    fn time_unit_uses_lowercase_names() {
        let unit: TimeUnit = serde_json::from_str("\"minutes\"").unwrap();
        assert_eq!(unit, TimeUnit::Minutes);
        assert_eq!(serde_json::to_string(&TimeUnit::Hours).unwrap(), "\"hours\"");
    }
}
