//! Bounded retry for provider calls
//!
//! Only the rate/permission error class is retried; every other failure
//! surfaces immediately. The classification predicate is injectable so
//! tests can drive the policy without a real provider.

use crate::config::Settings;
use crate::provider::{ProviderError, ProviderResult};
use std::fmt;
use std::time::Duration;

type Predicate = Box<dyn Fn(&ProviderError) -> bool + Send + Sync>;

/// Fixed-delay retry policy applied to every remote mutation.
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
    predicate: Predicate,
}

impl RetryPolicy {
    /// Policy retrying [`ProviderError::is_rate_limited`] failures.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            predicate: Box::new(ProviderError::is_rate_limited),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.max_retries, settings.retry_delay_duration())
    }

    /// Replace the retry classification.
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&ProviderError) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Box::new(predicate);
        self
    }

    /// Run `op`, retrying up to `max_retries` times on matching errors.
    pub fn run<T>(&self, mut op: impl FnMut() -> ProviderResult<T>) -> ProviderResult<T> {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries && (self.predicate)(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        "provider call rate-limited, retrying ({attempt}/{}): {e}",
                        self.max_retries
                    );
                    std::thread::sleep(self.delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
