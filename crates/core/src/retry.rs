//! Bounded retry with a fixed pause.

use std::thread;
use std::time::Duration;

use crate::worksheet::WorksheetError;

/// How often and how patiently a remote call is repeated.
///
/// A plain value the caller can override per write; tests run with a
/// zero pause. The pause is fixed, not exponential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total invocations before giving up, first attempt included.
    pub attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

/// Why a retried operation ultimately failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError {
    /// The backend reported a permanent failure; no retry was attempted.
    Rejected(String),
    /// Every attempt failed transiently.
    Exhausted { attempts: u32, last: String },
}

impl std::fmt::Display for RetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryError::Rejected(msg) => write!(f, "rejected: {}", msg),
            RetryError::Exhausted { attempts, last } => {
                write!(f, "gave up after {} attempts ({})", attempts, last)
            }
        }
    }
}

impl std::error::Error for RetryError {}

impl RetryPolicy {
    /// `attempts` is clamped to at least 1 — a policy that never calls
    /// the operation has no meaningful outcome.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// Transient failures pause for [`delay`](RetryPolicy::delay) and go
    /// around; permanent ones return immediately. The pause sits between
    /// attempts, so `attempts` invocations sleep at most `attempts - 1`
    /// times. `what` names the operation in the warning lines.
    pub fn run<T>(
        &self,
        what: &str,
        mut op: impl FnMut() -> Result<T, WorksheetError>,
    ) -> Result<T, RetryError> {
        let mut last = String::new();

        for attempt in 1..=self.attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(WorksheetError::Permanent(msg)) => return Err(RetryError::Rejected(msg)),
                Err(WorksheetError::Transient(msg)) => {
                    last = msg;
                    if attempt < self.attempts {
                        eprintln!(
                            "warning: {} failed, retry {}/{} in {}s ({})",
                            what,
                            attempt,
                            self.attempts,
                            self.delay.as_secs(),
                            last,
                        );
                        thread::sleep(self.delay);
                    }
                }
            }
        }

        Err(RetryError::Exhausted {
            attempts: self.attempts,
            last,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;

    fn instant() -> RetryPolicy {
        RetryPolicy::new(5, Duration::ZERO)
    }

    #[test]
    fn test_first_success_makes_one_call() {
        let calls = StdCell::new(0u32);
        let result = instant().run("op", || {
            calls.set(calls.get() + 1);
            Ok::<_, WorksheetError>(7)
        });
        assert_eq!(result, Ok(7));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_transient_failures_until_success() {
        // Four transient failures, then success on the fifth and final
        // attempt.
        let calls = StdCell::new(0u32);
        let result = instant().run("op", || {
            calls.set(calls.get() + 1);
            if calls.get() < 5 {
                Err(WorksheetError::Transient(format!("boom {}", calls.get())))
            } else {
                Ok(99)
            }
        });
        assert_eq!(result, Ok(99));
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn test_exhaustion_reports_last_error() {
        let calls = StdCell::new(0u32);
        let result = instant().run("op", || {
            calls.set(calls.get() + 1);
            Err::<(), _>(WorksheetError::Transient(format!("boom {}", calls.get())))
        });
        assert_eq!(calls.get(), 5);
        assert_eq!(
            result,
            Err(RetryError::Exhausted {
                attempts: 5,
                last: "boom 5".to_string(),
            })
        );
    }

    #[test]
    fn test_permanent_failure_stops_immediately() {
        let calls = StdCell::new(0u32);
        let result = instant().run("op", || {
            calls.set(calls.get() + 1);
            Err::<(), _>(WorksheetError::Permanent("401".to_string()))
        });
        assert_eq!(calls.get(), 1);
        assert_eq!(result, Err(RetryError::Rejected("401".to_string())));
    }

    #[test]
    fn test_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.attempts, 1);

        let calls = StdCell::new(0u32);
        let result = policy.run("op", || {
            calls.set(calls.get() + 1);
            Err::<(), _>(WorksheetError::Transient("down".to_string()))
        });
        assert_eq!(calls.get(), 1);
        assert_eq!(
            result,
            Err(RetryError::Exhausted {
                attempts: 1,
                last: "down".to_string(),
            })
        );
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }
}
