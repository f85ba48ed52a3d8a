//! Task cycle controller
//!
//! Walks the task list through `idle -> working -> on-break -> working ... ->
//! finished`. The controller owns all cycle state and is driven one message
//! at a time: user commands and countdown expirations.
//!
//! ## Transitions
//!
//! ```text
//! start (nothing active)  -> first open task working, or finished
//! working expired         -> on-break (task not completed yet)
//! on-break expired        -> persist completion, then select next task
//! pause                   -> countdown cancelled, remaining kept
//! start (paused)          -> same phase resumed with the kept remaining
//! ```

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    time::{self, Instant},
};
use tracing::{debug, error, info, warn};

use super::{deadline_after, Command, CountdownId, CycleEvent, CycleSettings, Reply};
use crate::{
    error::{ApiError, CycleError},
    render::Renderer,
    services::TaskApi,
    state::{CycleSnapshot, Phase, Task, TaskId},
    timer::{self, CountdownHandle},
};

/// The countdown currently owned by the controller
#[derive(Debug)]
struct ActiveCountdown {
    id: CountdownId,
    deadline: Instant,
    handle: CountdownHandle,
}

pub struct TaskCycle {
    api: Arc<dyn TaskApi>,
    renderer: Arc<dyn Renderer>,
    settings: CycleSettings,
    tasks: Vec<Task>,
    current: Option<TaskId>,
    phase: Phase,
    active: Option<ActiveCountdown>,
    paused_remaining: Option<Duration>,
    completion_pending: bool,
    last_error: Option<String>,
    next_countdown: u64,
    events_tx: mpsc::UnboundedSender<CycleEvent>,
    snapshot_tx: watch::Sender<CycleSnapshot>,
}

impl TaskCycle {
    /// Create an idle controller.
    ///
    /// Countdown expirations are delivered on the returned receiver and must
    /// be fed back through [`TaskCycle::handle_event`].
    pub fn new(
        api: Arc<dyn TaskApi>,
        renderer: Arc<dyn Renderer>,
        settings: CycleSettings,
    ) -> (Self, mpsc::UnboundedReceiver<CycleEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(CycleSnapshot::idle());

        let cycle = Self {
            api,
            renderer,
            settings,
            tasks: Vec::new(),
            current: None,
            phase: Phase::Idle,
            active: None,
            paused_remaining: None,
            completion_pending: false,
            last_error: None,
            next_countdown: 0,
            events_tx,
            snapshot_tx,
        };
        (cycle, events_rx)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn current_task(&self) -> Option<&Task> {
        let id = self.current.as_ref()?;
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Deadline of the running countdown
    pub fn deadline(&self) -> Option<Instant> {
        self.active.as_ref().map(|a| a.deadline)
    }

    pub fn paused_remaining(&self) -> Option<Duration> {
        self.paused_remaining
    }

    pub fn snapshot(&self) -> CycleSnapshot {
        CycleSnapshot {
            phase: self.phase,
            current_task: self.current.clone(),
            countdown_active: self.active.is_some(),
            paused_remaining_ms: self.paused_remaining.map(|d| d.as_millis() as u64),
            completion_pending: self.completion_pending,
            last_error: self.last_error.clone(),
            total_tasks: self.tasks.len(),
            open_tasks: self.tasks.iter().filter(|t| !t.completed).count(),
        }
    }

    /// Watch the snapshot published after every command and event
    pub fn subscribe(&self) -> watch::Receiver<CycleSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn handle_command(&mut self, command: Command) {
        debug!("Handling command: {}", command.name());
        match command {
            Command::Start(reply) => {
                let result = self.start().await.map(|_| self.snapshot());
                self.answer(reply, result);
            }
            Command::Pause(reply) => {
                let result = self.pause().map(|_| self.snapshot());
                self.answer(reply, result);
            }
            Command::AddTask { title, reply } => {
                let result = self.add_task(&title).await;
                self.answer(reply, result);
            }
            Command::DeleteTask { id, reply } => {
                let result = self.delete_task(&id).await;
                self.answer(reply, result);
            }
            Command::Reload(reply) => {
                let result = self.load().await;
                self.answer(reply, result);
            }
        }
    }

    /// Publish the new snapshot before the caller sees the result
    fn answer<T>(&self, reply: Reply<T>, result: Result<T, CycleError>) {
        self.publish();
        if reply.send(result).is_err() {
            debug!("Caller went away before the reply");
        }
    }

    pub async fn handle_event(&mut self, event: CycleEvent) -> Result<(), CycleError> {
        let result = match event {
            CycleEvent::Expired(id) => self.on_expired(id).await,
        };
        self.publish();
        result
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }

    /// Fetch the task list and render it, returning to idle
    pub async fn load(&mut self) -> Result<usize, CycleError> {
        let tasks = match self.api.fetch_tasks().await {
            Ok(tasks) => tasks,
            Err(e) => {
                error!("Failed to fetch tasks: {}", e);
                self.renderer.notify(&format!("Could not load tasks: {}", e));
                self.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        self.stop_active();
        for task in &self.tasks {
            self.renderer.remove_task(&task.id);
        }
        self.tasks = tasks;
        self.current = None;
        self.phase = Phase::Idle;
        self.paused_remaining = None;
        self.completion_pending = false;
        self.last_error = None;

        for (i, task) in self.tasks.iter().enumerate() {
            self.renderer.render_task(task, i + 1);
        }
        info!("Loaded {} tasks", self.tasks.len());
        Ok(self.tasks.len())
    }

    /// Start the cycle, resume a paused countdown or retry a pending completion
    pub async fn start(&mut self) -> Result<Phase, CycleError> {
        if self.phase == Phase::Finished {
            return Err(CycleError::Finished);
        }
        if self.completion_pending {
            info!("Retrying pending task completion");
            self.finish_break().await?;
        } else if let Some(remaining) = self.paused_remaining {
            info!("Resuming {:?} with {}s left", self.phase, remaining.as_secs());
            self.start_countdown(self.phase, remaining);
        } else if self.active.is_some() {
            debug!("Countdown already running, ignoring start");
        } else {
            self.select_next_task();
        }
        Ok(self.phase)
    }

    /// Cancel the running countdown and keep its remaining time
    pub fn pause(&mut self) -> Result<Duration, CycleError> {
        let active = self.active.take().ok_or(CycleError::NothingToPause)?;
        active.handle.stop();
        let remaining = active.deadline.saturating_duration_since(Instant::now());
        self.paused_remaining = Some(remaining);
        info!("Paused {:?} with {}ms left", self.phase, remaining.as_millis());
        Ok(remaining)
    }

    pub async fn add_task(&mut self, title: &str) -> Result<Task, CycleError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CycleError::EmptyTitle);
        }

        self.renderer.set_adding(true);
        let created = self.api.create_task(title).await;
        self.renderer.set_adding(false);

        let task = created.map_err(|e| {
            warn!("Failed to create task '{}': {}", title, e);
            CycleError::from(e)
        })?;
        self.tasks.push(task.clone());
        self.renderer.render_task(&task, self.tasks.len());
        info!("Added task {} '{}'", task.id, task.title);
        Ok(task)
    }

    pub async fn delete_task(&mut self, id: &TaskId) -> Result<(), CycleError> {
        if !self.tasks.iter().any(|t| &t.id == id) {
            return Err(CycleError::UnknownTask(id.clone()));
        }

        if let Err(e) = self.api.delete_task(id).await {
            error!("Failed to delete task {}: {}", id, e);
            self.renderer.notify(&format!("Could not delete task {}: {}", id, e));
            return Err(e.into());
        }

        self.tasks.retain(|t| &t.id != id);
        self.renderer.remove_task(id);
        if self.current.as_ref() == Some(id) {
            debug!("Deleted the current task, its countdown keeps running");
        }
        info!("Deleted task {}", id);
        Ok(())
    }

    async fn on_expired(&mut self, id: CountdownId) -> Result<(), CycleError> {
        if self.active.as_ref().map(|a| a.id) != Some(id) {
            debug!("Ignoring expiry of stale countdown {}", id);
            return Ok(());
        }
        self.active = None;

        match self.phase {
            Phase::Working => {
                info!("Work phase over, taking a break");
                self.start_countdown(Phase::OnBreak, self.settings.rest);
                Ok(())
            }
            Phase::OnBreak => self.finish_break().await,
            phase => {
                warn!("Countdown expired while {:?}", phase);
                Ok(())
            }
        }
    }

    /// Persist the current task as completed, then move to the next one
    async fn finish_break(&mut self) -> Result<(), CycleError> {
        let pending = self
            .current_task()
            .filter(|t| !t.completed)
            .cloned();

        match pending {
            Some(task) => {
                if let Err(source) = self.complete_with_retry(&task).await {
                    let attempts = self.settings.retry.attempts;
                    error!("Giving up completing task {}: {}", task.id, source);
                    self.completion_pending = true;
                    self.last_error = Some(source.to_string());
                    self.renderer
                        .notify(&format!("Could not complete '{}': {}", task.title, source));
                    return Err(CycleError::Completion {
                        task: task.id,
                        attempts,
                        source,
                    });
                }
                if let Some(stored) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    stored.completed = true;
                }
                self.renderer.mark_completed(&task.id);
                info!("Task {} completed", task.id);
            }
            None => debug!("Current task already completed or deleted, skipping completion"),
        }

        self.completion_pending = false;
        self.last_error = None;
        self.select_next_task();
        Ok(())
    }

    async fn complete_with_retry(&self, task: &Task) -> Result<(), ApiError> {
        let policy = self.settings.retry;
        let mut attempt = 1;
        loop {
            match self.api.complete_task(task).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt >= policy.attempts => return Err(e),
                Err(e) => {
                    let delay = policy.delay_after(attempt);
                    warn!(
                        "Completing task {} failed (attempt {}/{}): {}, retrying in {}ms",
                        task.id,
                        attempt,
                        policy.attempts,
                        e,
                        delay.as_millis()
                    );
                    time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Pick the first open task in list order and start working on it
    fn select_next_task(&mut self) {
        self.paused_remaining = None;
        let next = self.tasks.iter().find(|t| !t.completed).map(|t| t.id.clone());

        match next {
            Some(id) => {
                info!("Starting work on task {}", id);
                self.renderer.mark_active(&id);
                self.current = Some(id);
                self.start_countdown(Phase::Working, self.settings.work);
            }
            None => self.finish(),
        }
    }

    fn finish(&mut self) {
        self.stop_active();
        self.current = None;
        self.paused_remaining = None;
        self.phase = Phase::Finished;
        self.renderer.render_finished();
        info!("No open tasks left, cycle finished");
    }

    /// Replace any running countdown with a new one for `phase`
    fn start_countdown(&mut self, phase: Phase, duration: Duration) {
        self.stop_active();
        self.next_countdown += 1;
        let id = CountdownId(self.next_countdown);
        let deadline = deadline_after(Instant::now(), duration);

        let renderer = Arc::clone(&self.renderer);
        let label = phase.label();
        let events = self.events_tx.clone();
        let handle = timer::start_countdown(
            deadline,
            self.settings.tick,
            move |remaining| renderer.render_countdown(label, remaining.minutes, remaining.seconds),
            move || {
                if events.send(CycleEvent::Expired(id)).is_err() {
                    warn!("Controller gone, dropping expiry of countdown {}", id);
                }
            },
        );

        debug!("Started countdown {} for {:?} ({}s)", id, phase, duration.as_secs());
        self.phase = phase;
        self.paused_remaining = None;
        self.active = Some(ActiveCountdown { id, deadline, handle });
    }

    fn stop_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.handle.stop();
        }
    }
}

impl Drop for TaskCycle {
    fn drop(&mut self) {
        self.stop_active();
    }
}
