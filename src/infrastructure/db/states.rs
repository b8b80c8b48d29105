use crate::domain::error::{AppError, Result};
use crate::domain::region::StateRecord;
use crate::domain::table::Cell;
use crate::infrastructure::db::StateLookupStore;
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteRow},
    ConnectOptions, Connection, Row,
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SELECT_STATES: &str = "SELECT entityName, entityLGDCode, entityNameVariants FROM states";

/// SQLite-backed lookup store. Opens one read-only connection per call and
/// never creates the database file.
pub struct SqliteStateStore {
    path: PathBuf,
}

impl SqliteStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateLookupStore for SqliteStateStore {
    async fn load_states(&self) -> Result<Vec<StateRecord>> {
        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(true)
            .create_if_missing(false);

        let mut conn = options.connect().await.map_err(|e| {
            AppError::StoreAccess(format!(
                "Failed to open {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let fetched = sqlx::query(SELECT_STATES).fetch_all(&mut conn).await;

        if let Err(err) = conn.close().await {
            warn!(error = %err, "Failed to close lookup connection");
        }

        let rows = fetched
            .map_err(|e| AppError::StoreAccess(format!("Failed to read states: {}", e)))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(record) = decode_state(row)? {
                records.push(record);
            }
        }

        debug!(rows = rows.len(), records = records.len(), "Loaded state lookup rows");
        Ok(records)
    }
}

fn decode_state(row: &SqliteRow) -> Result<Option<StateRecord>> {
    let entity_name: Option<String> = row
        .try_get("entityName")
        .map_err(|e| AppError::StoreAccess(format!("Invalid entityName: {}", e)))?;

    let Some(entity_name) = entity_name else {
        warn!("Skipping states row with NULL entityName");
        return Ok(None);
    };

    let entity_name_variants: Option<String> = row
        .try_get("entityNameVariants")
        .map_err(|e| AppError::StoreAccess(format!("Invalid entityNameVariants: {}", e)))?;

    Ok(Some(StateRecord {
        entity_name,
        entity_lgd_code: decode_code(row)?,
        entity_name_variants,
    }))
}

// SQLite columns are dynamically typed, so the code may be stored as any scalar.
fn decode_code(row: &SqliteRow) -> Result<Cell> {
    if let Ok(code) = row.try_get::<Option<i64>, _>("entityLGDCode") {
        return Ok(code.map(Cell::Int).unwrap_or(Cell::Null));
    }
    if let Ok(Some(code)) = row.try_get::<Option<f64>, _>("entityLGDCode") {
        return Ok(Cell::Float(code));
    }
    row.try_get::<Option<String>, _>("entityLGDCode")
        .map(|code| code.map(Cell::Text).unwrap_or(Cell::Null))
        .map_err(|e| AppError::StoreAccess(format!("Invalid entityLGDCode: {}", e)))
}
