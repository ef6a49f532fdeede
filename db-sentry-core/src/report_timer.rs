#[cfg(feature = "std")]
pub use std::time::{Duration, Instant};

#[cfg(all(not(feature = "std"), feature = "embassy"))]
pub use embassy_time::{Duration, Instant};

use crate::config::MeterConfig;

/// "has a reporting interval passed yet?"
///
/// Checked between frames on the processing thread, so reporting never races a band update.
pub struct ReportTimer {
    last: Instant,
    interval: Duration,
}

impl ReportTimer {
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            last: start,
            interval,
        }
    }

    pub fn from_millis(interval_ms: u32, start: Instant) -> Self {
        Self::new(Duration::from_millis(interval_ms as u64), start)
    }

    pub fn from_config(config: &MeterConfig, start: Instant) -> Self {
        Self::from_millis(config.report_interval_ms, start)
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// true at most once per interval. the next interval starts at `now`
    pub fn is_due(&mut self, now: Instant) -> bool {
        // a clock that stepped backwards waits out the interval again
        let elapsed = now.checked_duration_since(self.last).unwrap_or_default();

        if elapsed >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_is_due() {
        let start = Instant::now();
        let mut timer = ReportTimer::from_millis(1_000, start);

        assert!(!timer.is_due(start));
        assert!(!timer.is_due(start + Duration::from_millis(999)));
        assert!(timer.is_due(start + Duration::from_millis(1_000)));

        // the interval restarted
        assert!(!timer.is_due(start + Duration::from_millis(1_500)));
        assert!(timer.is_due(start + Duration::from_millis(2_100)));
        assert!(!timer.is_due(start + Duration::from_millis(3_000)));
        assert!(timer.is_due(start + Duration::from_millis(3_100)));
    }

    #[test]
    fn test_earlier_now_is_not_due() {
        let start = Instant::now() + Duration::from_secs(10);
        let mut timer = ReportTimer::from_millis(1_000, start);

        assert!(!timer.is_due(start - Duration::from_secs(5)));
        assert!(timer.is_due(start + Duration::from_millis(1_000)));
    }

    #[test]
    fn test_from_config() {
        let start = Instant::now();

        let mut config = MeterConfig::default();
        config.report_interval_ms = 250;

        let mut timer = ReportTimer::from_config(&config, start);

        assert_eq!(timer.interval(), Duration::from_millis(250));
        assert!(!timer.is_due(start + Duration::from_millis(249)));
        assert!(timer.is_due(start + Duration::from_millis(250)));
    }
}
