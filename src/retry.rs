//! Bounded retry and polling with a fixed interval

use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::{Error, Result};

/// How many times to try and how long to wait between tries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    #[serde(rename = "interval_ms", with = "millis")]
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            interval: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self { max_attempts, interval }
    }

    /// Try exactly once
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts < 1 {
            return Err(Error::Config("max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

mod millis {
    use serde::{ser, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(d.as_millis())
            .map_err(|_| <S::Error as ser::Error>::custom("interval does not fit in u64 milliseconds"))?;
        s.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// Blocks the current thread between attempts
#[cfg_attr(test, mockall::automock)]
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// `Sleeper` backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Run `op` until it succeeds or the policy runs out of attempts.
///
/// `op` receives the 1-based attempt number. There is no sleep after the
/// final failure.
pub fn retry<T, E, F>(policy: &RetryPolicy, op: F) -> Result<T>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> std::result::Result<T, E>,
{
    retry_with(policy, &ThreadSleeper, op)
}

pub fn retry_with<T, E, F>(policy: &RetryPolicy, sleeper: &dyn Sleeper, mut op: F) -> Result<T>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> std::result::Result<T, E>,
{
    policy.validate()?;

    let mut last = String::new();
    for attempt in 1..=policy.max_attempts {
        match op(attempt) {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                last = e.to_string();
                tracing::warn!(attempt, max_attempts = policy.max_attempts, error = %last, "Attempt failed");
                if attempt < policy.max_attempts {
                    sleeper.sleep(policy.interval);
                }
            }
        }
    }

    Err(Error::RetryExhausted {
        attempts: policy.max_attempts,
        last,
    })
}

/// Poll `check` until it reports `true`, returning the attempt that did.
///
/// A check error stops polling immediately.
pub fn poll_until<F>(policy: &RetryPolicy, check: F) -> Result<u32>
where
    F: FnMut() -> Result<bool>,
{
    poll_until_with(policy, &ThreadSleeper, check)
}

pub fn poll_until_with<F>(policy: &RetryPolicy, sleeper: &dyn Sleeper, mut check: F) -> Result<u32>
where
    F: FnMut() -> Result<bool>,
{
    policy.validate()?;

    for attempt in 1..=policy.max_attempts {
        if check()? {
            tracing::debug!(attempt, "Condition reached");
            return Ok(attempt);
        }
        tracing::debug!(attempt, max_attempts = policy.max_attempts, "Condition not reached yet");
        if attempt < policy.max_attempts {
            sleeper.sleep(policy.interval);
        }
    }

    Err(Error::Timeout {
        attempts: policy.max_attempts,
        waited: policy.interval.saturating_mul(policy.max_attempts - 1),
    })
}
