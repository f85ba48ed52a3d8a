//! State management module
//!
//! This module contains the task model, the cycle snapshot and the shared
//! state handed to the HTTP layer.

pub mod task;
pub mod cycle_state;
pub mod app_state;

// Re-export main types
pub use task::{NewTask, Task, TaskId};
pub use cycle_state::{CycleSnapshot, Phase};
pub use app_state::AppState;
