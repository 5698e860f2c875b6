use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use std::time::Duration;

/// How long - and how often - a waiter polls.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct WaitPolicy {
    /// Pause between two consecutive polls
    #[serde_as(as = "DisplayFromStr")]
    pub interval: humantime::Duration,

    /// Maximum number of polls; `None` means no ceiling
    #[serde(default)]
    pub max_attempts: Option<u32>,

    /// Wall-clock deadline; `None` means no deadline
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub timeout: Option<humantime::Duration>,
}

impl WaitPolicy {
    /// Policy used for provider operations: 5 seconds between polls, giving
    /// up after 5 minutes.
    pub fn operation() -> Self {
        Self {
            interval: Duration::from_secs(5).into(),
            max_attempts: None,
            timeout: Some(Duration::from_secs(300).into()),
        }
    }

    /// Policy used while waiting for a fresh disk to become `READY`: 60 polls,
    /// 5 seconds apart.
    pub fn disk_readiness() -> Self {
        Self {
            interval: Duration::from_secs(5).into(),
            max_attempts: Some(60),
            timeout: None,
        }
    }

    pub fn interval(&self) -> Duration {
        *self.interval
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(|timeout| *timeout)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.map(Into::into);
        self
    }

    /// Longest time a wait governed by this policy can block for; `None` if
    /// it can block indefinitely.
    pub fn worst_case(&self) -> Option<Duration> {
        let by_attempts = self
            .max_attempts
            .map(|attempts| self.interval().saturating_mul(attempts));

        match (self.timeout(), by_attempts) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
