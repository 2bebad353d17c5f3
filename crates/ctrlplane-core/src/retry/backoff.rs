//! Linear backoff schedules.

use std::time::Duration;

/// A lazy, unbounded schedule of wait intervals.
///
/// The n-th interval (0-indexed) is `base + n * coefficient` seconds,
/// clamped toward `ceiling`: the ceiling is an upper bound when
/// `coefficient` is non-negative and a lower bound when it is negative. A
/// zero `coefficient` produces the constant sequence used for
/// fixed-interval polling.
///
/// # Examples
///
/// ```rust
/// use ctrlplane_core::retry::LinearBackoff;
/// use std::time::Duration;
///
/// let mut backoff = LinearBackoff::new(2.0, 2.0, 120.0);
/// assert_eq!(backoff.next_interval(), Duration::from_secs(2));
/// assert_eq!(backoff.next_interval(), Duration::from_secs(4));
/// assert_eq!(backoff.next_interval(), Duration::from_secs(6));
/// ```
///
/// The schedule carries its own position; there is no reset. Restarting
/// means constructing a new value.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base: f64,
    coefficient: f64,
    ceiling: f64,
    attempt: u32,
}

impl LinearBackoff {
    /// Create a schedule from `base`, `coefficient`, and `ceiling`, all in
    /// seconds.
    pub fn new(base: f64, coefficient: f64, ceiling: f64) -> Self {
        Self {
            base,
            coefficient,
            ceiling,
            attempt: 0,
        }
    }

    /// Constant schedule that yields `interval` forever.
    pub fn fixed(interval: Duration) -> Self {
        let secs = interval.as_secs_f64();
        Self::new(secs, 0.0, secs)
    }

    /// Produce the next interval and advance the schedule.
    ///
    /// Never exhausts. Candidates that clamp below zero floor at a zero
    /// interval, since a wait cannot be negative.
    pub fn next_interval(&mut self) -> Duration {
        let candidate = self.base + f64::from(self.attempt) * self.coefficient;
        let clamped = if self.coefficient >= 0.0 {
            candidate.min(self.ceiling)
        } else {
            candidate.max(self.ceiling)
        };
        self.attempt += 1;
        Duration::from_secs_f64(clamped.max(0.0))
    }
}

impl From<Duration> for LinearBackoff {
    fn from(interval: Duration) -> Self {
        Self::fixed(interval)
    }
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_interval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increasing_sequence_clamps_at_ceiling() {
        let mut backoff = LinearBackoff::new(2.0, 2.0, 120.0);

        let produced: Vec<u64> = (0..62).map(|_| backoff.next_interval().as_secs()).collect();

        // 2, 4, 6, ..., 120, then pinned at 120.
        for (n, secs) in produced.iter().enumerate().take(60) {
            assert_eq!(*secs, 2 + 2 * n as u64);
        }
        assert_eq!(produced[60], 120);
        assert_eq!(produced[61], 120);
    }

    #[test]
    fn test_sequence_is_non_decreasing() {
        let backoff = LinearBackoff::new(0.5, 1.5, 30.0);

        let produced: Vec<Duration> = backoff.take(50).collect();
        assert!(produced.windows(2).all(|w| w[0] <= w[1]));
        assert!(produced.iter().all(|d| *d <= Duration::from_secs(30)));
    }

    #[test]
    fn test_negative_coefficient_clamps_from_below() {
        let mut backoff = LinearBackoff::new(10.0, -3.0, 1.0);

        assert_eq!(backoff.next_interval(), Duration::from_secs(10));
        assert_eq!(backoff.next_interval(), Duration::from_secs(7));
        assert_eq!(backoff.next_interval(), Duration::from_secs(4));
        // 10 - 9 = 1, then clamped to the floor of 1.
        assert_eq!(backoff.next_interval(), Duration::from_secs(1));
        assert_eq!(backoff.next_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_coefficient_is_constant() {
        let mut backoff = LinearBackoff::new(5.0, 0.0, 120.0);

        for _ in 0..10 {
            assert_eq!(backoff.next_interval(), Duration::from_secs(5));
        }
    }

    #[test]
    fn test_fixed_matches_zero_coefficient_schedule() {
        let mut fixed = LinearBackoff::fixed(Duration::from_secs(7));
        let mut linear = LinearBackoff::new(7.0, 0.0, 7.0);

        for _ in 0..20 {
            assert_eq!(fixed.next_interval(), linear.next_interval());
        }
    }

    #[test]
    fn test_negative_clamp_floors_at_zero() {
        let mut backoff = LinearBackoff::new(1.0, -1.0, -5.0);

        assert_eq!(backoff.next_interval(), Duration::from_secs(1));
        assert_eq!(backoff.next_interval(), Duration::ZERO);
        assert_eq!(backoff.next_interval(), Duration::ZERO);
    }

    #[test]
    fn test_from_duration_is_fixed() {
        let mut backoff = LinearBackoff::from(Duration::from_millis(250));

        assert_eq!(backoff.next_interval(), Duration::from_millis(250));
        assert_eq!(backoff.next_interval(), Duration::from_millis(250));
    }
}
