//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    render::BoardView,
    state::{CycleSnapshot, Task},
};

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub cycle: CycleSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, cycle: CycleSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            cycle,
            task: None,
        }
    }

    /// Create a success response
    pub fn ok(message: String, cycle: CycleSnapshot) -> Self {
        Self::new("ok", message, cycle)
    }

    /// Create an error response
    pub fn error(message: String, cycle: CycleSnapshot) -> Self {
        Self::new("error", message, cycle)
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.task = Some(task);
        self
    }
}

/// Body of POST /tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaskRequest {
    pub title: String,
}

/// Status response with the rendered board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub cycle: CycleSnapshot,
    pub board: BoardView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
