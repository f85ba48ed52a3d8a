//! Error types for the task API and the task cycle controller

use crate::state::TaskId;

/// Failures talking to the task store
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Task API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Task {0} not found")]
    NotFound(TaskId),
}

/// Failures surfaced by the task cycle controller
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("Task API error: {0}")]
    Api(#[from] ApiError),

    #[error("Failed to complete task {task} after {attempts} attempts: {source}")]
    Completion {
        task: TaskId,
        attempts: u32,
        #[source]
        source: ApiError,
    },

    #[error("Task title must not be empty")]
    EmptyTitle,

    #[error("Unknown task {0}")]
    UnknownTask(TaskId),

    #[error("No running countdown to pause")]
    NothingToPause,

    #[error("All tasks are done; reload to start a new cycle")]
    Finished,

    #[error("Task cycle controller is not running")]
    ControllerUnavailable,
}
