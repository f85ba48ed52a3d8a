//! Task cycle module
//!
//! The controller that walks the task list through work and break phases,
//! together with the commands and events it consumes.

pub mod commands;
pub mod controller;

use std::time::Duration;

use tokio::time::Instant;

pub use commands::{Command, CountdownId, CycleEvent, Reply};
pub use controller::TaskCycle;

use crate::timer::DEFAULT_TICK;

/// Bounded retry for persisting a task completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, at least one
    pub attempts: u32,
    /// Delay after the first failure; grows linearly with each attempt
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

/// Durations the controller is constructed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSettings {
    pub work: Duration,
    /// Break duration
    pub rest: Duration,
    pub tick: Duration,
    pub retry: RetryPolicy,
}

/// Far enough ahead that a countdown never expires in practice
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + duration`, clamped when the sum does not fit in an `Instant`
pub(crate) fn deadline_after(now: Instant, duration: Duration) -> Instant {
    now.checked_add(duration)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            work: Duration::from_secs(25 * 60),
            rest: Duration::from_secs(5 * 60),
            tick: DEFAULT_TICK,
            retry: RetryPolicy::default(),
        }
    }
}
