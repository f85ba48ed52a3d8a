//! Shared state handed to the HTTP handlers

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::warn;

use super::CycleSnapshot;
use crate::{
    cycle::{Command, Reply},
    error::CycleError,
    render::StatusBoard,
};

/// Handles the HTTP layer uses to reach the task cycle controller
#[derive(Debug)]
pub struct AppState {
    /// Commands for the controller task
    pub commands: mpsc::Sender<Command>,
    /// Latest controller snapshot
    pub snapshots: watch::Receiver<CycleSnapshot>,
    /// Rendered task rows, timer text and notifications
    pub board: Arc<StatusBoard>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(
        commands: mpsc::Sender<Command>,
        snapshots: watch::Receiver<CycleSnapshot>,
        board: Arc<StatusBoard>,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            commands,
            snapshots,
            board,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Send a command to the controller and wait for its answer
    pub async fn request<T, F>(&self, make: F) -> Result<T, CycleError>
    where
        F: FnOnce(Reply<T>) -> Command,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = make(reply_tx);
        self.record_action(command.name());

        if self.commands.send(command).await.is_err() {
            warn!("Controller task is gone, dropping command");
            return Err(CycleError::ControllerUnavailable);
        }
        reply_rx.await.map_err(|_| CycleError::ControllerUnavailable)?
    }

    /// Get the latest controller snapshot
    pub fn snapshot(&self) -> CycleSnapshot {
        self.snapshots.borrow().clone()
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
