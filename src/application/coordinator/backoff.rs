//! Exponential backoff schedule for channel reconnection.

use std::time::Duration;

use crate::config::BackoffConfig;

/// Computes retry delays for failed reconnection attempts.
///
/// Attempt 0 waits the base delay; each further attempt multiplies the
/// delay by the configured factor, saturating at the cap. The schedule
/// itself is stateless; the attempt counter lives on the channel entry so
/// it can be reset on successful reconnect or a manual retry.
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    base: Duration,
    factor: f64,
    cap: Duration,
}

impl BackoffSchedule {
    /// Build a schedule from configuration.
    pub fn new(config: &BackoffConfig) -> Self {
        Self {
            base: config.base_delay(),
            factor: config.factor,
            cap: config.max_delay(),
        }
    }

    /// Delay to wait before the given retry attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = self.base.as_millis() as f64;
        let cap_ms = self.cap.as_millis() as f64;
        // Large attempt counts overflow to infinity, which the cap absorbs.
        let scaled = base_ms * self.factor.powi(attempt.min(64) as i32);
        Duration::from_millis(scaled.min(cap_ms) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> BackoffSchedule {
        BackoffSchedule::new(&BackoffConfig::default())
    }

    #[test]
    fn first_attempt_waits_the_base_delay() {
        assert_eq!(schedule().delay_for(0), Duration::from_secs(1));
    }

    #[test]
    fn delays_double_per_attempt() {
        let schedule = schedule();
        assert_eq!(schedule.delay_for(1), Duration::from_secs(2));
        assert_eq!(schedule.delay_for(2), Duration::from_secs(4));
        assert_eq!(schedule.delay_for(3), Duration::from_secs(8));
    }

    #[test]
    fn delays_saturate_at_the_cap() {
        let schedule = schedule();
        assert_eq!(schedule.delay_for(5), Duration::from_secs(30));
        assert_eq!(schedule.delay_for(30), Duration::from_secs(30));
        assert_eq!(schedule.delay_for(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn custom_factor_is_honored() {
        let config = BackoffConfig {
            base_delay_ms: 100,
            factor: 3.0,
            max_delay_ms: 10_000,
        };
        let schedule = BackoffSchedule::new(&config);
        assert_eq!(schedule.delay_for(0), Duration::from_millis(100));
        assert_eq!(schedule.delay_for(1), Duration::from_millis(300));
        assert_eq!(schedule.delay_for(2), Duration::from_millis(900));
    }
}
