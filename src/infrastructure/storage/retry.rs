//! Bounded exponential backoff for storage bootstrap

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry schedule for opening a storage backend.
///
/// Used only when bringing storage up; report generation never retries.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(3),
            multiplier: 1.5,
            max_delay: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    /// Policy that tries once and never sleeps
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Sleep durations between consecutive attempts
    pub fn delays(&self) -> Vec<Duration> {
        let mut delays = Vec::new();
        let mut delay = self.initial_delay;

        for _ in 1..self.max_attempts {
            delays.push(delay);
            delay = delay.mul_f64(self.multiplier).min(self.max_delay);
        }

        delays
    }

    /// Run `operation` until it succeeds or attempts run out.
    /// The last error is returned when every attempt fails.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut delays = self.delays().into_iter();
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => match delays.next() {
                    Some(delay) => {
                        log::warn!(
                            "{label} attempt {attempt}/{} failed: {e}. Retrying in {:.1}s",
                            self.max_attempts,
                            delay.as_secs_f64()
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        log::error!("{label} failed after {attempt} attempt(s): {e}");
                        return Err(e);
                    }
                },
            }
        }
    }
}
