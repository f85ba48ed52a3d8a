//! Messages consumed by the task cycle controller

use std::fmt;

use tokio::sync::oneshot;

use crate::{
    error::CycleError,
    state::{CycleSnapshot, Task, TaskId},
};

/// Channel the controller answers a command on
pub type Reply<T> = oneshot::Sender<Result<T, CycleError>>;

/// User actions forwarded to the controller
#[derive(Debug)]
pub enum Command {
    /// Start the cycle, resume a paused countdown or retry a pending completion
    Start(Reply<CycleSnapshot>),
    Pause(Reply<CycleSnapshot>),
    AddTask { title: String, reply: Reply<Task> },
    DeleteTask { id: TaskId, reply: Reply<()> },
    /// Re-fetch the task list and return to idle
    Reload(Reply<usize>),
}

impl Command {
    /// Short name used for logging and last-action tracking
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start(_) => "start",
            Command::Pause(_) => "pause",
            Command::AddTask { .. } => "add-task",
            Command::DeleteTask { .. } => "delete-task",
            Command::Reload(_) => "reload",
        }
    }
}

/// Identifies one countdown instance so stale expirations can be dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownId(pub u64);

impl fmt::Display for CountdownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notifications coming from running countdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEvent {
    Expired(CountdownId),
}
