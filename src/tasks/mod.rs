//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod cycle_runner;

// Re-export main functions
pub use cycle_runner::{cycle_task, spawn_cycle, CycleChannels};
