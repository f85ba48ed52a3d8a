//! Signal handling for graceful shutdown

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::{info, warn};

/// Resolve once SIGTERM or SIGINT arrives.
///
/// Falls back to Ctrl+C only when the signal stream cannot be registered.
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Failed to register signal handlers: {}, waiting for Ctrl+C", e);
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Ctrl+C handler failed: {}", e);
            }
            return;
        }
    };

    if let Some(signal) = signals.next().await {
        let name = if signal == SIGTERM { "SIGTERM" } else { "SIGINT" };
        info!("Received {}, stopping the task cycle", name);
    }
    signals.handle().close();
}
