//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    cycle::Command,
    error::CycleError,
    state::{AppState, TaskId},
};
use super::responses::{ApiResponse, HealthResponse, NewTaskRequest, StatusResponse};

type Reply = (StatusCode, Json<ApiResponse>);

/// HTTP status for a failed command
fn status_for(error: &CycleError) -> StatusCode {
    match error {
        CycleError::EmptyTitle => StatusCode::BAD_REQUEST,
        CycleError::UnknownTask(_) => StatusCode::NOT_FOUND,
        CycleError::NothingToPause | CycleError::Finished => StatusCode::CONFLICT,
        CycleError::Api(_) | CycleError::Completion { .. } => StatusCode::BAD_GATEWAY,
        CycleError::ControllerUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn failure(state: &AppState, action: &str, error: CycleError) -> Reply {
    let status = status_for(&error);
    if status.is_server_error() {
        error!("{} failed: {}", action, error);
    } else {
        warn!("{} rejected: {}", action, error);
    }
    (status, Json(ApiResponse::error(error.to_string(), state.snapshot())))
}

/// Handle POST /start - Start, resume or retry the cycle
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Reply {
    match state.request(Command::Start).await {
        Ok(cycle) => {
            info!("Start endpoint called - phase is now {:?}", cycle.phase);
            let message = match cycle.current_task {
                Some(ref id) => format!("{} on task {}", cycle.phase.label(), id),
                None => cycle.phase.label().to_string(),
            };
            (StatusCode::OK, Json(ApiResponse::ok(message, cycle)))
        }
        Err(e) => failure(&state, "Start", e),
    }
}

/// Handle POST /pause - Pause the running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Reply {
    match state.request(Command::Pause).await {
        Ok(cycle) => {
            let seconds = cycle.paused_remaining_ms.unwrap_or(0) / 1000;
            info!("Pause endpoint called - {}s left", seconds);
            (
                StatusCode::OK,
                Json(ApiResponse::ok(format!("Paused with {}s left", seconds), cycle)),
            )
        }
        Err(e) => failure(&state, "Pause", e),
    }
}

/// Handle POST /tasks - Create a task
pub async fn add_task_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewTaskRequest>,
) -> Reply {
    let result = state
        .request(|reply| Command::AddTask { title: body.title, reply })
        .await;

    match result {
        Ok(task) => {
            let response = ApiResponse::ok(format!("Task {} added", task.id), state.snapshot())
                .with_task(task);
            (StatusCode::CREATED, Json(response))
        }
        Err(e) => failure(&state, "Add task", e),
    }
}

/// Handle DELETE /tasks/:id - Delete a task
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Reply {
    let id = TaskId::new(id);
    let message = format!("Task {} deleted", id);

    match state.request(|reply| Command::DeleteTask { id, reply }).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok(message, state.snapshot()))),
        Err(e) => failure(&state, "Delete task", e),
    }
}

/// Handle POST /reload - Re-fetch tasks and return to idle
pub async fn reload_handler(State(state): State<Arc<AppState>>) -> Reply {
    match state.request(Command::Reload).await {
        Ok(count) => (
            StatusCode::OK,
            Json(ApiResponse::ok(format!("Loaded {} tasks", count), state.snapshot())),
        ),
        Err(e) => failure(&state, "Reload", e),
    }
}

/// Handle DELETE /notifications - Dismiss notifications
pub async fn clear_notifications_handler(State(state): State<Arc<AppState>>) -> Reply {
    let cleared = state.board.clear_notifications();
    (
        StatusCode::OK,
        Json(ApiResponse::ok(format!("Dismissed {} notifications", cleared), state.snapshot())),
    )
}

/// Handle GET /status - Return cycle state and the rendered board
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        cycle: state.snapshot(),
        board: state.board.view(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
