//! contactbook-daemon: the contact book service.
//!
//! Single OS process running a Tokio async runtime. Clients talk to the
//! daemon via JSON-RPC over a Unix socket in the data directory.

mod commands;
mod config;
mod rpc;

use std::path::PathBuf;
use std::sync::Arc;

use contactbook_directory::SqliteDirectory;
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};

use crate::config::DaemonConfig;
use crate::rpc::RpcServer;

/// Daemon-wide shared state.
pub struct DaemonState {
    /// Contact directory over the single database connection.
    pub directory: Arc<Mutex<SqliteDirectory>>,
    /// Configuration.
    pub config: DaemonConfig,
    /// Shutdown signal sender.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl DaemonState {
    fn new(directory: SqliteDirectory, config: DaemonConfig) -> Self {
        let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);
        Self {
            directory: Arc::new(Mutex::new(directory)),
            config,
            shutdown_tx,
        }
    }

    /// State over an empty in-memory store.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Arc<Self> {
        let directory = SqliteDirectory::open_memory().expect("open in-memory directory");
        Arc::new(Self::new(directory, DaemonConfig::default()))
    }
}

fn init_tracing(config: &DaemonConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("contactbook={}", config.logging.log_level).parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Open the on-disk store, seeding demo contacts into a new one if enabled.
fn open_store(config: &DaemonConfig) -> anyhow::Result<SqliteDirectory> {
    std::fs::create_dir_all(config.data_dir())?;

    let db_path = config.database_path();
    info!("Opening contact store at {:?}", db_path);
    let directory = SqliteDirectory::open(&db_path)?;

    if config.storage.seed_demo_data {
        let now = contactbook_db::now_secs();
        contactbook_db::seed::seed_if_empty(directory.connection(), now)?;
    }
    Ok(directory)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DaemonConfig::load()?;
    init_tracing(&config)?;
    info!("Contactbook daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let directory = open_store(&config)?;
    let socket_path: PathBuf = config.socket_path();
    let state = Arc::new(DaemonState::new(directory, config));
    let server = RpcServer::new(Arc::clone(&state), socket_path.clone());

    let mut shutdown_rx = state.shutdown_tx.subscribe();
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("IPC server stopped: {}", e);
            }
        }
        _ = shutdown_rx.recv() => info!("Shutdown requested by client"),
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    if let Err(e) = std::fs::remove_file(&socket_path) {
        warn!("Could not remove socket {:?}: {}", socket_path, e);
    }
    info!("Daemon stopped");
    Ok(())
}
