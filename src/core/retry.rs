//! Bounded retry with a fixed delay.
//!
//! Store reads are retried a fixed number of times with a constant backoff.
//! There is no exponential growth and no jitter.

use std::fmt::Display;
use std::time::Duration;

use tracing::{debug, warn};

/// Something that can block the current thread for a while.
///
/// Production code sleeps for real; tests record the requested delays.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Attempt bound and delay for one retried operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. At least 1.
    pub max_attempts: u32,
    /// Delay between consecutive attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// A policy that tries exactly once.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

/// All attempts failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    /// Attempts made.
    pub attempts: u32,
    /// Error from the final attempt.
    pub last: E,
}

/// Run `op` until it succeeds or the policy's attempts are used up.
///
/// Sleeps `policy.backoff` between attempts, never after the last one.
/// Returns the value together with the number of attempts it took.
pub fn retry<T, E, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    label: &str,
    mut op: F,
) -> Result<(T, u32), Exhausted<E>>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    let max = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        debug!(name = %label, attempt, max, "attempting");
        match op() {
            Ok(value) => {
                debug!(name = %label, attempt, "retrieved");
                return Ok((value, attempt));
            }
            Err(e) if attempt >= max => {
                return Err(Exhausted {
                    attempts: attempt,
                    last: e,
                });
            }
            Err(e) => {
                warn!(
                    name = %label,
                    attempt,
                    max,
                    error = %e,
                    "attempt failed, retrying in {}s",
                    policy.backoff.as_secs()
                );
                sleeper.sleep(policy.backoff);
                attempt += 1;
            }
        }
    }
}
