// ============================================================
// CELL VALUE
// ============================================================
// Tagged scalar stored in a table cell

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{AppError, Result};

/// A single JSON scalar held by a table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Convert a JSON value into a cell, rejecting nested arrays and objects
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Cell::Null),
            Value::Bool(b) => Ok(Cell::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Cell::Int(i)),
                None => Ok(n.as_f64().map(Cell::Float).unwrap_or(Cell::Null)),
            },
            Value::String(s) => Ok(Cell::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(AppError::ParseError(
                "Nested arrays or objects are not supported as cell values".to_string(),
            )),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Bool(_) => "bool",
            Cell::Int(_) => "int",
            Cell::Float(_) => "float",
            Cell::Text(_) => "text",
        }
    }
}

impl From<&Cell> for Value {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Int(i) => Value::from(*i),
            // NaN and infinities have no JSON form
            Cell::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}
