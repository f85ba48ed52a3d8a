//! Task cycle background task

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::{
    cycle::{Command, CycleEvent, CycleSettings, TaskCycle},
    render::Renderer,
    services::TaskApi,
    state::CycleSnapshot,
};

/// Commands waiting for the controller before senders block
const COMMAND_BUFFER: usize = 32;

/// Handles returned by [`spawn_cycle`]
#[derive(Debug)]
pub struct CycleChannels {
    pub commands: mpsc::Sender<Command>,
    pub snapshots: watch::Receiver<CycleSnapshot>,
}

/// Build the controller and run it on its own task
pub fn spawn_cycle(
    api: Arc<dyn TaskApi>,
    renderer: Arc<dyn Renderer>,
    settings: CycleSettings,
) -> CycleChannels {
    let (cycle, events) = TaskCycle::new(api, renderer, settings);
    let snapshots = cycle.subscribe();
    let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);

    tokio::spawn(async move {
        cycle_task(cycle, command_rx, events).await;
    });

    CycleChannels { commands, snapshots }
}

/// Load the task list, then feed commands and countdown expirations to the
/// controller one at a time until every command sender is dropped
pub async fn cycle_task(
    mut cycle: TaskCycle,
    mut commands: mpsc::Receiver<Command>,
    mut events: mpsc::UnboundedReceiver<CycleEvent>,
) {
    info!("Starting task cycle controller");

    if let Err(e) = cycle.load().await {
        warn!("Starting with an empty task list: {}", e);
    }

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => cycle.handle_command(command).await,
                None => {
                    debug!("All command senders dropped");
                    break;
                }
            },

            Some(event) = events.recv() => {
                if let Err(e) = cycle.handle_event(event).await {
                    error!("Cycle transition failed: {}", e);
                }
            }
        }
    }

    info!("Task cycle controller stopped");
}
