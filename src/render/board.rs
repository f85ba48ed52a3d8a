//! In-memory status board

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Renderer;
use crate::state::{Task, TaskId};

/// Notifications kept before the oldest are dropped
const MAX_NOTIFICATIONS: usize = 20;

pub const FINISHED_TEXT: &str = "All tasks are done 🎉";

/// One rendered task row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub index: usize,
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Everything currently on screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardView {
    pub rows: Vec<TaskRow>,
    pub timer_text: Option<String>,
    pub adding: bool,
    pub notifications: Vec<Notification>,
}

impl BoardView {
    fn row_mut(&mut self, id: &TaskId) -> Option<&mut TaskRow> {
        self.rows.iter_mut().find(|row| &row.id == id)
    }

    pub fn row(&self, id: &TaskId) -> Option<&TaskRow> {
        self.rows.iter().find(|row| &row.id == id)
    }
}

/// Renderer that keeps its output for the status endpoint
#[derive(Debug, Default)]
pub struct StatusBoard {
    view: Mutex<BoardView>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BoardView> {
        self.view.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the current view
    pub fn view(&self) -> BoardView {
        self.lock().clone()
    }

    /// Dismiss all notifications, returning how many were shown
    pub fn clear_notifications(&self) -> usize {
        let mut view = self.lock();
        let count = view.notifications.len();
        view.notifications.clear();
        count
    }
}

impl Renderer for StatusBoard {
    fn render_task(&self, task: &Task, index: usize) {
        let row = TaskRow {
            index,
            id: task.id.clone(),
            title: task.title.clone(),
            completed: task.completed,
            active: false,
        };
        let mut view = self.lock();
        match view.row_mut(&task.id) {
            Some(existing) => *existing = row,
            None => view.rows.push(row),
        }
    }

    fn render_countdown(&self, label: &str, minutes: u64, seconds: u64) {
        self.lock().timer_text = Some(format!("{}: {}:{:02}", label, minutes, seconds));
    }

    fn remove_task(&self, id: &TaskId) {
        self.lock().rows.retain(|row| &row.id != id);
    }

    fn mark_completed(&self, id: &TaskId) {
        if let Some(row) = self.lock().row_mut(id) {
            row.active = false;
            row.completed = true;
        }
    }

    fn mark_active(&self, id: &TaskId) {
        let mut view = self.lock();
        for row in view.rows.iter_mut() {
            row.active = &row.id == id;
        }
        debug!("Task {} is now active", id);
    }

    fn render_finished(&self) {
        let mut view = self.lock();
        for row in view.rows.iter_mut() {
            row.active = false;
        }
        view.timer_text = Some(FINISHED_TEXT.to_string());
        info!("{}", FINISHED_TEXT);
    }

    fn set_adding(&self, adding: bool) {
        self.lock().adding = adding;
    }

    fn notify(&self, message: &str) {
        warn!("Notifying user: {}", message);
        let mut view = self.lock();
        if view.notifications.len() == MAX_NOTIFICATIONS {
            view.notifications.remove(0);
        }
        view.notifications.push(Notification {
            message: message.to_string(),
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(tasks: &[Task]) -> StatusBoard {
        let board = StatusBoard::new();
        for (i, task) in tasks.iter().enumerate() {
            board.render_task(task, i + 1);
        }
        board
    }

    #[test]
    fn active_row_moves_and_completed_rows_stay_completed() {
        let board = board_with(&[Task::new("1", "Plan"), Task::new("2", "Write")]);
        let (one, two) = (TaskId::new("1"), TaskId::new("2"));

        board.mark_active(&one);
        board.mark_completed(&one);
        board.mark_active(&two);

        let view = board.view();
        assert_eq!(view.row(&one).map(|r| (r.completed, r.active)), Some((true, false)));
        assert_eq!(view.row(&two).map(|r| (r.completed, r.active)), Some((false, true)));
    }

    #[test]
    fn countdown_text_pads_seconds() {
        let board = StatusBoard::new();
        board.render_countdown("Chill", 4, 5);
        assert_eq!(board.view().timer_text.as_deref(), Some("Chill: 4:05"));

        board.render_finished();
        assert_eq!(board.view().timer_text.as_deref(), Some(FINISHED_TEXT));
    }

    #[test]
    fn notifications_are_bounded_and_clearable() {
        let board = StatusBoard::new();
        for i in 0..(MAX_NOTIFICATIONS + 5) {
            board.notify(&format!("failure {}", i));
        }

        let view = board.view();
        assert_eq!(view.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(view.notifications[0].message, "failure 5");
        assert_eq!(board.clear_notifications(), MAX_NOTIFICATIONS);
        assert!(board.view().notifications.is_empty());
    }

    #[test]
    fn removed_rows_disappear() {
        let board = board_with(&[Task::new("1", "Plan")]);
        board.remove_task(&TaskId::new("1"));
        assert!(board.view().rows.is_empty());
    }
}
