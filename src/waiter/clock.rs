use super::Cancellation;
use std::thread;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;

    /// Sleeps for given duration; returns `false` if the sleep got
    /// interrupted by cancellation.
    fn sleep(&self, duration: Duration, cancellation: &Cancellation) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    const SLICE: Duration = Duration::from_millis(100);
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration, cancellation: &Cancellation) -> bool {
        let deadline = Instant::now() + duration;

        loop {
            if cancellation.is_cancelled() {
                return false;
            }

            let now = Instant::now();

            if now >= deadline {
                return true;
            }

            thread::sleep((deadline - now).min(Self::SLICE));
        }
    }
}

#[cfg(test)]
pub use self::fake::*;
