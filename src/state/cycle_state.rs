//! Cycle phase and snapshot published by the task cycle controller

use serde::{Deserialize, Serialize};

use super::TaskId;

/// Phase of the work/break cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    Working,
    OnBreak,
    Finished,
}

impl Phase {
    /// Text shown in front of the countdown
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Working => "You're working",
            Phase::OnBreak => "Chill",
            Phase::Finished => "Done",
        }
    }
}

/// Point-in-time view of the controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleSnapshot {
    pub phase: Phase,
    pub current_task: Option<TaskId>,
    pub countdown_active: bool,
    pub paused_remaining_ms: Option<u64>,
    /// Break ended but the task completion could not be stored yet
    pub completion_pending: bool,
    pub last_error: Option<String>,
    pub total_tasks: usize,
    pub open_tasks: usize,
}

impl CycleSnapshot {
    /// Snapshot of a controller that has not started yet
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            current_task: None,
            countdown_active: false,
            paused_remaining_ms: None,
            completion_pending: false,
            last_error: None,
            total_tasks: 0,
            open_tasks: 0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_remaining_ms.is_some()
    }
}

impl Default for CycleSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}
