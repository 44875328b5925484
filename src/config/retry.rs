//! Attempt budgets and backoff schedules.
//!
//! Two loops in this crate repeat work until it succeeds: the
//! [`ApiClient`](crate::ApiClient) while a gateway is still picking up
//! configuration, and [`Client::wait_for_tenant`](crate::Client::wait_for_tenant)
//! while a freshly signed-up tenant is being provisioned. Both are driven by a
//! [`RetryConfig`].

use std::time::Duration;

/// How long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// The same pause after every failed attempt.
    Fixed(Duration),
    /// `start * factor^(n - 1)` after the n-th failed attempt, never more
    /// than `cap`.
    Exponential {
        /// Pause after the first failure.
        start: Duration,
        /// Growth per failure.
        factor: f64,
        /// Upper bound on any single pause.
        cap: Duration,
    },
}

impl Backoff {
    fn pause(&self, failures: u32) -> Duration {
        match *self {
            Self::Fixed(pause) => pause,
            Self::Exponential { start, factor, cap } => {
                let exponent = i32::try_from(failures.saturating_sub(1)).unwrap_or(i32::MAX);
                let secs = start.as_secs_f64() * factor.powi(exponent);
                if secs.is_finite() && secs < cap.as_secs_f64() {
                    Duration::from_secs_f64(secs)
                } else {
                    cap
                }
            },
        }
    }
}

/// Attempt budget, pause schedule and the set of statuses worth another try.
///
/// The default targets a 3scale gateway: 8 attempts in total, pausing
/// 1s, 2s, 4s and so on, and retrying `503` (configuration not loaded yet)
/// and `404` (mapping rule not propagated yet). Connection failures are
/// retried as well.
///
/// ```rust
/// use std::time::Duration;
/// use threescale::RetryConfig;
///
/// let config = RetryConfig::new()
///     .without_statuses([404])
///     .with_max_attempts(4);
/// assert!(config.should_retry_status(503));
/// assert!(!config.should_retry_status(404));
/// assert_eq!(config.delay_for_attempt(3), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, the first one included. Never below 1.
    pub max_attempts: u32,
    /// Pause schedule.
    pub backoff: Backoff,
    /// Random spread applied to each pause, as a fraction of it (0.0..=1.0).
    pub jitter: f64,
    /// Response statuses treated as transient.
    pub retry_statuses: Vec<u16>,
    /// Whether connect and timeout failures are retried.
    pub retry_on_connection_error: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            backoff: Backoff::Exponential {
                start: Duration::from_secs(1),
                factor: 2.0,
                cap: Duration::from_secs(120),
            },
            jitter: 0.0,
            retry_statuses: vec![503, 404],
            retry_on_connection_error: true,
        }
    }
}

impl RetryConfig {
    /// Same as [`RetryConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// `max_attempts` attempts spaced `interval` apart.
    pub fn constant(interval: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Fixed(interval),
            ..Self::default()
        }
    }

    /// Tenant provisioning poll: every 6s, 90 times (about 9 minutes).
    pub fn tenant_readiness() -> Self {
        Self::constant(Duration::from_secs(6), 90)
    }

    /// Sets the attempt budget; 0 becomes 1.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Replaces the pause schedule.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Spreads each pause by up to `±jitter` of its length. Clamped to 0..=1.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Drops statuses from the transient set, e.g. `404` when a test
    /// expects a deliberate not-found.
    #[must_use]
    pub fn without_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        let dropped: Vec<u16> = statuses.into_iter().collect();
        self.retry_statuses.retain(|status| !dropped.contains(status));
        self
    }

    /// Whether a response with `status` earns another attempt.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Pause after `failures` failed attempts. Zero failures means no pause.
    pub fn delay_for_attempt(&self, failures: u32) -> Duration {
        if failures == 0 {
            return Duration::ZERO;
        }
        let pause = self.backoff.pause(failures);
        if self.jitter <= 0.0 {
            return pause;
        }
        let spread = pause.as_secs_f64() * self.jitter;
        let offset = fastrand::f64().mul_add(2.0 * spread, -spread);
        Duration::from_secs_f64((pause.as_secs_f64() + offset).max(0.0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_schedule_doubles_from_one_second() {
        let config = RetryConfig::default();
        let pauses: Vec<u64> = (1..config.max_attempts)
            .map(|n| config.delay_for_attempt(n).as_secs())
            .collect();
        assert_eq!(pauses, vec![1, 2, 4, 8, 16, 32, 64]);
        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
    }

    #[test]
    fn test_exponential_pause_stops_at_cap() {
        let config = RetryConfig::new().with_backoff(Backoff::Exponential {
            start: Duration::from_secs(3),
            factor: 10.0,
            cap: Duration::from_secs(45),
        });
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(30));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(45));
        assert_eq!(config.delay_for_attempt(400), Duration::from_secs(45));
    }

    #[test]
    fn test_tenant_poll_is_fixed_interval() {
        let config = RetryConfig::tenant_readiness();
        assert_eq!(config.max_attempts, 90);
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(6));
        assert_eq!(config.delay_for_attempt(89), Duration::from_secs(6));
    }

    #[test]
    fn test_attempt_budget_never_zero() {
        assert_eq!(RetryConfig::new().with_max_attempts(0).max_attempts, 1);
        assert_eq!(RetryConfig::constant(Duration::from_secs(1), 0).max_attempts, 1);
    }

    #[test]
    fn test_dropping_not_found_keeps_unavailable() {
        let config = RetryConfig::new().without_statuses([404, 418]);
        assert_eq!(config.retry_statuses, vec![503]);
        assert!(!config.should_retry_status(404));
    }

    #[test]
    fn test_jitter_stays_within_spread() {
        let config = RetryConfig::constant(Duration::from_millis(200), 3).with_jitter(0.25);
        for _ in 0..50 {
            let pause = config.delay_for_attempt(1);
            assert!(pause >= Duration::from_millis(150), "{pause:?}");
            assert!(pause <= Duration::from_millis(250), "{pause:?}");
        }
        assert_eq!(RetryConfig::new().with_jitter(7.0).jitter, 1.0);
    }
}
