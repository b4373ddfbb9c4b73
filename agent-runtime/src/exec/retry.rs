//! Retry policy applied to the `call_llm` step only; tool errors are
//! surfaced to the model instead of retried (see `steps::execute_tools`).

use std::time::Duration;

#[derive(Debug, Clone)]
pub enum RetryPolicy {
    None,
    Fixed {
        max_attempts: usize,
        interval: Duration,
    },
    Exponential {
        max_attempts: usize,
        initial_interval: Duration,
        max_interval: Duration,
        multiplier: f64,
    },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::None
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: usize, interval: Duration) -> Self {
        Self::Fixed {
            max_attempts,
            interval,
        }
    }

    pub fn exponential(
        max_attempts: usize,
        initial_interval: Duration,
        max_interval: Duration,
        multiplier: f64,
    ) -> Self {
        Self::Exponential {
            max_attempts,
            initial_interval,
            max_interval,
            multiplier,
        }
    }

    pub fn should_retry(&self, attempt: usize) -> bool {
        match self {
            RetryPolicy::None => false,
            RetryPolicy::Fixed { max_attempts, .. } => attempt < *max_attempts,
            RetryPolicy::Exponential { max_attempts, .. } => attempt < *max_attempts,
        }
    }

    pub fn delay(&self, attempt: usize) -> Duration {
        match self {
            RetryPolicy::None => Duration::ZERO,
            RetryPolicy::Fixed { interval, .. } => *interval,
            RetryPolicy::Exponential {
                initial_interval,
                max_interval,
                multiplier,
                ..
            } => {
                let secs = initial_interval.as_secs_f64() * multiplier.powi(attempt as i32);
                Duration::from_secs_f64(secs).min(*max_interval)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_policy_retries_up_to_max_attempts() {
        let policy = RetryPolicy::fixed(2, Duration::from_millis(10));
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(1));
        assert!(!policy.should_retry(2));
    }

    #[test]
    fn exponential_delay_is_capped_at_max_interval() {
        let policy = RetryPolicy::exponential(
            5,
            Duration::from_secs(1),
            Duration::from_secs(5),
            2.0,
        );
        assert_eq!(policy.delay(3), Duration::from_secs(5));
    }
}
