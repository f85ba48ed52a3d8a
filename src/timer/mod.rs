//! Countdown timer module

pub mod countdown;

pub use countdown::{start as start_countdown, CountdownHandle, Remaining, DEFAULT_TICK};
