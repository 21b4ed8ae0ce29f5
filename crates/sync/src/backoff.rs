use std::time::Duration;

/// Retry policy for the initial remote fetch: a bounded number of attempts
/// with the delay doubling per attempt. Exhausting the attempts is a
/// degraded-freshness condition, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after failed attempt `attempt` (0-based):
    /// `base_delay * 2^attempt`, saturating.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(800));
    }

    #[test]
    fn large_attempt_counts_saturate() {
        let policy = RetryPolicy::default();
        let huge = policy.delay_for_attempt(u32::MAX);
        assert!(huge >= policy.delay_for_attempt(40));
    }
}
