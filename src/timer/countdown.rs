//! Countdown engine
//!
//! A countdown is a spawned task that wakes every tick, reports the time left
//! until its deadline and fires its expiry callback once the deadline has
//! passed. It is cancelled through the [`CountdownHandle`] returned by
//! [`start`].

use std::{fmt, time::Duration};

use serde::Serialize;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Default tick interval
pub const DEFAULT_TICK: Duration = Duration::from_millis(1000);

/// Time left until a deadline, split for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Remaining {
    /// Signed milliseconds until the deadline; zero or negative once expired
    pub total_ms: i64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    pub fn until(deadline: Instant, now: Instant) -> Self {
        let total_ms = if deadline >= now {
            millis(deadline - now)
        } else {
            -millis(now - deadline)
        };
        let whole_secs = total_ms.max(0) as u64 / 1000;
        Self {
            total_ms,
            minutes: whole_secs / 60,
            seconds: whole_secs % 60,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.total_ms <= 0
    }

    /// Remaining time as a duration, zero once expired
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.total_ms.max(0) as u64)
    }
}

fn millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

/// Cancels a running countdown
#[derive(Debug)]
pub struct CountdownHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Stop the countdown. Calling it again, or after expiry, does nothing.
    pub fn stop(&self) {
        if !self.stop_tx.send_replace(true) {
            debug!("Stopping countdown");
        }
    }

    /// True once the countdown expired or observed a stop
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Start a countdown towards `deadline`.
///
/// The first tick fires one `tick` after the call. Every tick calls `on_tick`;
/// the tick that sees the deadline reached calls `on_tick` and then
/// `on_expire`, after which the countdown ends. Dropping the handle stops the
/// countdown as well.
pub fn start<T, E>(deadline: Instant, tick: Duration, mut on_tick: T, on_expire: E) -> CountdownHandle
where
    T: FnMut(Remaining) + Send + 'static,
    E: FnOnce() + Send + 'static,
{
    let tick = tick.max(Duration::from_millis(1));
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + tick, tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                // Stop requested or handle dropped
                _ = stop_rx.changed() => return,

                _ = interval.tick() => {
                    if *stop_rx.borrow() {
                        return;
                    }
                    let remaining = Remaining::until(deadline, Instant::now());
                    on_tick(remaining);
                    if remaining.is_expired() {
                        break;
                    }
                }
            }
        }

        debug!("Countdown expired");
        on_expire();
    });

    CountdownHandle { stop_tx, task }
}
