//! Daemon info and lifecycle command handlers.

use std::sync::Arc;

use contactbook_directory::ContactDirectory;
use serde_json::Value;
use tracing::info;

use super::{directory_error, Result};
use crate::DaemonState;

/// Version, data location and store size.
pub async fn get_daemon_info(state: &Arc<DaemonState>) -> Result {
    let contact_count = state
        .directory
        .lock()
        .await
        .count()
        .map_err(directory_error)?;

    Ok(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "data_dir": state.config.data_dir().display().to_string(),
        "contact_count": contact_count,
    }))
}

/// Acknowledge a stop request. The connection handler raises the shutdown
/// signal once this reply is flushed.
pub async fn shutdown(state: &Arc<DaemonState>) -> Result {
    info!(
        "Shutdown requested over IPC ({} listeners)",
        state.shutdown_tx.receiver_count()
    );
    Ok(serde_json::json!({"stopping": true}))
}
