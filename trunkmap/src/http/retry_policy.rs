use super::HttpError;
use std::time::Duration;

/// longest wait between two attempts
const MAX_BACKOFF_SECS: f64 = 300.0;

/// bounded retries with exponential backoff for online calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> RetryPolicy {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// wait before the next attempt after `failures` consecutive failures:
    /// `base * 2^(failures - 1)`, capped.
    pub fn backoff(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(8) as i32;
        let secs = (self.base_delay.as_secs_f64() * 2.0_f64.powi(exponent)).min(MAX_BACKOFF_SECS);
        Duration::from_secs_f64(secs)
    }

    /// runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts are used up. the last error is returned.
    pub fn run<T>(
        &self,
        description: &str,
        mut op: impl FnMut() -> Result<T, HttpError>,
    ) -> Result<T, HttpError> {
        let mut failures = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && failures + 1 < self.max_attempts => {
                    failures += 1;
                    let wait = self.backoff(failures);
                    log::warn!(
                        "{description} failed (attempt {failures}/{}): {e}; retrying in {:.1}s",
                        self.max_attempts,
                        wait.as_secs_f32()
                    );
                    std::thread::sleep(wait);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, Duration::from_secs(2))
    }
}

#[cfg(test)]
mod tests {
    use super::RetryPolicy;
    use crate::http::HttpError;
    use std::{cell::Cell, time::Duration};

    fn status(code: u16) -> HttpError {
        HttpError::Status {
            url: String::from("http://localhost"),
            status: code,
            body: String::new(),
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(3, Duration::from_secs(2));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
        assert_eq!(policy.backoff(20), Duration::from_secs(300));
    }

    #[test]
    fn retries_server_errors_until_success() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let calls = Cell::new(0);
        let result = policy.run("test", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(status(503))
            } else {
                Ok("done")
            }
        });
        match result {
            Ok(v) => assert_eq!(v, "done"),
            Err(e) => panic!("{e}"),
        }
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        let calls = Cell::new(0);
        let result: Result<(), _> = policy.run("test", || {
            calls.set(calls.get() + 1);
            Err(status(429))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn client_errors_are_not_retried() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let calls = Cell::new(0);
        let result: Result<(), _> = policy.run("test", || {
            calls.set(calls.get() + 1);
            Err(status(400))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
