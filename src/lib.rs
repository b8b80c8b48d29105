pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use crate::domain::error::Result;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::db::SqliteStateStore;
use crate::interfaces::http::{start_server, HttpState};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Load configuration, wire the use cases and serve until shutdown.
pub async fn run() -> Result<()> {
    let config = ConfigService::new().load()?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .try_init();

    let store = SqliteStateStore::new(config.database_path.clone());
    if !store.path().exists() {
        warn!(
            database_path = %store.path().display(),
            "Lookup database not found; /state_mappings will fail until it exists"
        );
    }

    let state =
        Arc::new(HttpState::new(Arc::new(store)).with_body_limit(config.max_body_bytes));
    let server = start_server(state, &config).map_err(|err| {
        error!(error = %err, host = %config.host, port = config.port, "Failed to bind HTTP server");
        err
    })?;

    server.await?;
    info!("HTTP server stopped");
    Ok(())
}
