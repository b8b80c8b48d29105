use crate::domain::error::{AppError, Result};
use crate::domain::region::{CodeMapping, STATE_CODE_COLUMN, STATE_NAME_COLUMN, UNMAPPED_CODE};
use crate::domain::table::{is_falsy, Cell, Table};
use serde_json::Value;
use tracing::{debug, info};

/// Applies a state name -> code mapping onto a dataset.
#[derive(Debug, Default)]
pub struct DatasetMapperUseCase;

impl DatasetMapperUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Handle a `{"dataset": .., "mapping": ..}` body and return row records.
    pub fn execute(&self, body: &Value) -> Result<Value> {
        let body = body.as_object().ok_or_else(|| {
            AppError::ParseError("Request body must be a JSON object".to_string())
        })?;

        let (dataset, mapping) = match (body.get("dataset"), body.get("mapping")) {
            (Some(dataset), Some(mapping)) if !is_falsy(dataset) && !is_falsy(mapping) => {
                (dataset, mapping)
            }
            _ => return Err(AppError::MissingParameter),
        };

        let mapping = parse_mapping(mapping)?;
        let mut table = Table::from_json(dataset)?;
        self.map_table(&mut table, &mapping)?;

        Ok(table.to_records_json())
    }

    /// Trim `state_name`, then fill `state_code` from the lowercased name.
    /// Names the mapping does not know get `UNMAPPED_CODE`.
    pub fn map_table(&self, table: &mut Table, mapping: &CodeMapping) -> Result<()> {
        table.update_column(STATE_NAME_COLUMN, |cell| match cell {
            Cell::Text(name) => Ok(Cell::Text(name.trim().to_string())),
            Cell::Null => Ok(Cell::Null),
            other => Err(AppError::SchemaMismatch(format!(
                "'{}' values must be strings, found {}",
                STATE_NAME_COLUMN,
                other.kind()
            ))),
        })?;

        let mut unmapped = 0usize;
        table.derive_column(STATE_CODE_COLUMN, |row| {
            let code = row
                .get(STATE_NAME_COLUMN)
                .and_then(Cell::as_text)
                .and_then(|name| mapping.get(&name.to_lowercase()))
                .filter(|code| !code.is_null());

            match code {
                Some(code) => code.clone(),
                None => {
                    unmapped += 1;
                    Cell::Int(UNMAPPED_CODE)
                }
            }
        });

        if unmapped > 0 {
            debug!(unmapped, "Rows without a matching state code");
        }
        info!(rows = table.len(), unmapped, "Mapped dataset state codes");

        Ok(())
    }
}

fn parse_mapping(value: &Value) -> Result<CodeMapping> {
    let entries = value
        .as_object()
        .ok_or_else(|| AppError::ParseError("'mapping' must be a JSON object".to_string()))?;

    entries
        .iter()
        .map(|(key, code)| Cell::from_json(code).map(|cell| (key.clone(), cell)))
        .collect()
}
