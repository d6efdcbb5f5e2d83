// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backoff between snapshot polls.
//!
//! Both the delay and the jitter are multiplied on every sleep, so the delays
//! of concurrent requesters that started with different jitter drift apart
//! quickly. There is no cap; callers bound the number of attempts.

use rand::Rng;
use std::time::Duration;

/// Initial delay in seconds.
pub const INITIAL_DELAY_SECS: f64 = 0.2;
/// Growth factor applied to delay and jitter after each sleep.
pub const MULTIPLIER: f64 = 2.0;

/// Something that can block the current thread.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Real thread sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone)]
pub struct BackoffSleeper<S = ThreadSleeper> {
    /// Next delay, in seconds
    pub duration: f64,
    /// Added to the delay before each growth step, in seconds
    pub jitter: f64,
    pub multiplier: f64,
    sleeps: u32,
    sleeper: S,
}

impl BackoffSleeper<ThreadSleeper> {
    pub fn new(jitter: f64) -> Self {
        Self::with_sleeper(jitter, ThreadSleeper)
    }

    /// Draw the jitter from `rng`, uniformly in `[0, 1)`.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen::<f64>())
    }
}

impl<S: Sleeper> BackoffSleeper<S> {
    pub fn with_sleeper(jitter: f64, sleeper: S) -> Self {
        Self { duration: INITIAL_DELAY_SECS, jitter, multiplier: MULTIPLIER, sleeps: 0, sleeper }
    }

    /// Block for the current delay, then grow delay and jitter.
    pub fn sleep(&mut self) {
        let delay = Duration::try_from_secs_f64(self.duration).unwrap_or(Duration::MAX);
        tracing::debug!(delay_ms = delay.as_millis() as u64, "backing off");
        self.sleeper.sleep(delay);

        self.duration = (self.duration + self.jitter) * self.multiplier;
        self.jitter *= self.multiplier;
        self.sleeps += 1;
    }

    /// Number of completed sleeps.
    pub fn sleeps(&self) -> u32 {
        self.sleeps
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }
}

/// Sleeper that records requested delays instead of blocking.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Default)]
pub struct FakeSleeper {
    slept: std::sync::Arc<parking_lot::Mutex<Vec<Duration>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far, oldest first.
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Sleeper for FakeSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.lock().push(duration);
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
