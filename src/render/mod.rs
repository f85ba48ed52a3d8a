//! Rendering module
//!
//! The controller never formats output itself; it signals a [`Renderer`].
//! [`StatusBoard`] keeps the rendered view in memory for the HTTP API.

pub mod board;

pub use board::{BoardView, StatusBoard, TaskRow};

use crate::state::{Task, TaskId};

/// Receives everything the controller wants shown to the user
pub trait Renderer: Send + Sync {
    /// Show `task` as row `index` (1-based)
    fn render_task(&self, task: &Task, index: usize);

    fn render_countdown(&self, label: &str, minutes: u64, seconds: u64);

    fn remove_task(&self, id: &TaskId);

    fn mark_completed(&self, id: &TaskId);

    /// Highlight `id` as the task being worked on
    fn mark_active(&self, id: &TaskId);

    fn render_finished(&self);

    /// Toggle the "adding..." indicator of the new-task form
    fn set_adding(&self, adding: bool);

    /// Blocking notification for failures the user has to act on
    fn notify(&self, message: &str);
}
