//! Pomotask - A pomodoro task cycle server
//!
//! This library provides the countdown engine, the task cycle controller that
//! sequences work and break phases over a task list, and the collaborators it
//! talks to: the remote task API, the status board renderer and the HTTP API.

pub mod config;
pub mod error;
pub mod state;
pub mod timer;
pub mod cycle;
pub mod render;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiError, CycleError};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
