use crate::domain::errors::StoreError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Replays a store operation while it fails with a transient error.
///
/// Each attempt runs the whole unit of work again from scratch; nothing from
/// a failed attempt is carried into the next one.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Randomize delays by +/-25% so colliding writers spread out
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(500),
            jitter: true,
        }
    }
}

/// Error from the last attempt, together with how many attempts were made
#[derive(Debug)]
pub struct RetryFailure {
    pub attempts: u32,
    pub error: StoreError,
}

impl RetryPolicy {
    /// No retries, no waiting
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
        }
    }

    /// Delay before retry number `attempt` (0-indexed), doubling up to `max_delay`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64 * 2f64.powi(attempt.min(31) as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out.
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, RetryFailure>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && attempt <= self.max_retries => {
                    let delay = self.delay_for_attempt(attempt - 1);
                    warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient store error, retrying: {}",
                        error
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    return Err(RetryFailure {
                        attempts: attempt,
                        error,
                    });
                }
            }
        }
    }
}
