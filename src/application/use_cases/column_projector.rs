use crate::domain::error::{AppError, Result};
use crate::domain::region::REGION_COLUMNS;
use crate::domain::table::{is_falsy, Table};
use serde_json::Value;
use tracing::debug;

/// Keeps only the administrative-region columns of a payload.
#[derive(Debug, Default)]
pub struct ColumnProjectorUseCase;

impl ColumnProjectorUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Project a request payload and return it as `{column: {rowIndex: value}}`.
    pub fn execute(&self, payload: &Value) -> Result<Value> {
        if is_falsy(payload) {
            return Err(AppError::EmptyBody);
        }

        let table = Table::from_json(payload)?;
        let projected = self.project(&table)?;

        debug!(
            rows = projected.len(),
            columns = ?projected.columns(),
            "Projected region columns"
        );

        Ok(projected.to_columnar_json())
    }

    pub fn project(&self, table: &Table) -> Result<Table> {
        let present: Vec<&str> = REGION_COLUMNS
            .iter()
            .copied()
            .filter(|column| table.has_column(column))
            .collect();

        if present.is_empty() {
            return Err(AppError::NoMatchingColumns);
        }

        Ok(table.project(&present))
    }
}
