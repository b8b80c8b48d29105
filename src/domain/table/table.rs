// ============================================================
// SCHEMA-LESS TABLE
// ============================================================
// Ordered rows of named cells, built from request JSON

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::Cell;
use crate::domain::error::{AppError, Result};

/// One table row keyed by column name
pub type Row = BTreeMap<String, Cell>;

/// Column-aware table with a string row index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in first-seen order
    columns: Vec<String>,

    /// Row labels, "0".."n-1" unless the payload carried its own
    index: Vec<String>,

    rows: Vec<Row>,
}

impl Table {
    /// Build a table from already-shaped rows. Every row is filled so it
    /// holds exactly `columns`.
    pub fn from_rows(columns: Vec<String>, index: Vec<String>, mut rows: Vec<Row>) -> Self {
        for row in rows.iter_mut() {
            for column in &columns {
                row.entry(column.clone()).or_insert(Cell::Null);
            }
            row.retain(|key, _| columns.contains(key));
        }
        Self {
            columns,
            index,
            rows,
        }
    }

    /// Coerce a JSON payload into a table.
    ///
    /// Accepts records (`[{..}, ..]`), positional rows (`[[..], ..]`), a list
    /// of scalars, column arrays (`{col: [..]}`) and indexed columns
    /// (`{col: {row: ..}}`). Scalars next to column arrays are broadcast.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => Self::from_array(items),
            Value::Object(map) => Self::from_object(map),
            _ => Err(AppError::ParseError(
                "JSON payload must be an array or an object".to_string(),
            )),
        }
    }

    fn from_array(items: &[Value]) -> Result<Self> {
        if items.is_empty() {
            return Ok(Self::default());
        }

        if items.iter().all(Value::is_object) {
            let mut columns: Vec<String> = Vec::new();
            let mut rows = Vec::with_capacity(items.len());
            for item in items {
                let mut row = Row::new();
                if let Value::Object(record) = item {
                    for (key, value) in record {
                        if !columns.contains(key) {
                            columns.push(key.clone());
                        }
                        row.insert(key.clone(), Cell::from_json(value)?);
                    }
                }
                rows.push(row);
            }
            return Ok(Self::from_rows(columns, default_index(items.len()), rows));
        }

        if items.iter().all(Value::is_array) {
            let width = items
                .iter()
                .filter_map(Value::as_array)
                .map(Vec::len)
                .max()
                .unwrap_or(0);
            let columns: Vec<String> = (0..width).map(|i| i.to_string()).collect();
            let mut rows = Vec::with_capacity(items.len());
            for item in items.iter().filter_map(Value::as_array) {
                let mut row = Row::new();
                for (position, value) in item.iter().enumerate() {
                    row.insert(position.to_string(), Cell::from_json(value)?);
                }
                rows.push(row);
            }
            return Ok(Self::from_rows(columns, default_index(items.len()), rows));
        }

        if items.iter().all(|v| !v.is_array() && !v.is_object()) {
            let rows = items
                .iter()
                .map(|value| {
                    Cell::from_json(value).map(|cell| Row::from([("0".to_string(), cell)]))
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::from_rows(
                vec!["0".to_string()],
                default_index(items.len()),
                rows,
            ));
        }

        Err(AppError::ParseError(
            "JSON array mixes records, arrays and scalar values".to_string(),
        ))
    }

    fn from_object(map: &Map<String, Value>) -> Result<Self> {
        if map.is_empty() {
            return Ok(Self::default());
        }

        let has_arrays = map.values().any(Value::is_array);
        let has_objects = map.values().any(Value::is_object);

        if !has_arrays && !has_objects {
            return Err(AppError::ParseError(
                "If using all scalar values, you must pass an index".to_string(),
            ));
        }
        if has_arrays && has_objects {
            return Err(AppError::ParseError(
                "Cannot mix column arrays with indexed column objects".to_string(),
            ));
        }

        let columns: Vec<String> = map.keys().cloned().collect();

        if has_arrays {
            let mut length: Option<usize> = None;
            for values in map.values().filter_map(Value::as_array) {
                match length {
                    Some(expected) if expected != values.len() => {
                        return Err(AppError::ParseError(
                            "All arrays must be of the same length".to_string(),
                        ));
                    }
                    _ => length = Some(values.len()),
                }
            }
            let length = length.unwrap_or(0);

            let mut rows = vec![Row::new(); length];
            for (column, value) in map {
                match value {
                    Value::Array(values) => {
                        for (row, value) in rows.iter_mut().zip(values) {
                            row.insert(column.clone(), Cell::from_json(value)?);
                        }
                    }
                    scalar => {
                        let cell = Cell::from_json(scalar)?;
                        for row in rows.iter_mut() {
                            row.insert(column.clone(), cell.clone());
                        }
                    }
                }
            }
            return Ok(Self::from_rows(columns, default_index(length), rows));
        }

        let mut index: Vec<String> = Vec::new();
        for inner in map.values().filter_map(Value::as_object) {
            for label in inner.keys() {
                if !index.contains(label) {
                    index.push(label.clone());
                }
            }
        }

        let mut rows = vec![Row::new(); index.len()];
        for (column, value) in map {
            match value {
                Value::Object(inner) => {
                    for (row, label) in rows.iter_mut().zip(&index) {
                        if let Some(value) = inner.get(label) {
                            row.insert(column.clone(), Cell::from_json(value)?);
                        }
                    }
                }
                scalar => {
                    let cell = Cell::from_json(scalar)?;
                    for row in rows.iter_mut() {
                        row.insert(column.clone(), cell.clone());
                    }
                }
            }
        }
        Ok(Self::from_rows(columns, index, rows))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Keep only the named columns that exist, in the order given.
    pub fn project(&self, keep: &[&str]) -> Self {
        let columns: Vec<String> = keep
            .iter()
            .filter(|name| self.has_column(name))
            .map(|name| name.to_string())
            .collect();
        Self::from_rows(columns, self.index.clone(), self.rows.clone())
    }

    /// Replace every cell of `column` with the result of `f`.
    pub fn update_column<F>(&mut self, column: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&Cell) -> Result<Cell>,
    {
        if !self.has_column(column) {
            return Err(AppError::SchemaMismatch(format!(
                "Column '{}' not found in dataset",
                column
            )));
        }
        for row in self.rows.iter_mut() {
            if let Some(cell) = row.get_mut(column) {
                *cell = f(cell)?;
            }
        }
        Ok(())
    }

    /// Add (or overwrite) `target` with a value derived from each row.
    pub fn derive_column<F>(&mut self, target: &str, mut f: F)
    where
        F: FnMut(&Row) -> Cell,
    {
        if !self.has_column(target) {
            self.columns.push(target.to_string());
        }
        for row in self.rows.iter_mut() {
            let value = f(row);
            row.insert(target.to_string(), value);
        }
    }

    /// `{column: {rowIndex: value}}`
    pub fn to_columnar_json(&self) -> Value {
        let mut out = Map::new();
        for column in &self.columns {
            let mut values = Map::new();
            for (label, row) in self.index.iter().zip(&self.rows) {
                let cell = row.get(column).unwrap_or(&Cell::Null);
                values.insert(label.clone(), Value::from(cell));
            }
            out.insert(column.clone(), Value::Object(values));
        }
        Value::Object(out)
    }

    /// `[{column: value}, ..]`
    pub fn to_records_json(&self) -> Value {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let record: Map<String, Value> = self
                    .columns
                    .iter()
                    .map(|column| {
                        let cell = row.get(column).unwrap_or(&Cell::Null);
                        (column.clone(), Value::from(cell))
                    })
                    .collect();
                Value::Object(record)
            })
            .collect();
        Value::Array(records)
    }
}

fn default_index(length: usize) -> Vec<String> {
    (0..length).map(|i| i.to_string()).collect()
}

/// Truthiness of a JSON value: null, false, zero, "" and empty containers are falsy.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_fill_missing_with_null() {
        let table =
            Table::from_json(&json!([{"state_name": "A", "foo": 1}, {"state_name": "B"}])).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_column("foo"));
        assert_eq!(table.rows()[1].get("foo"), Some(&Cell::Null));
        assert_eq!(table.index(), &["0".to_string(), "1".to_string()]);
    }

    #[test]
    fn test_records_keep_first_seen_column_order() {
        let table = Table::from_json(&json!([
            {"village_name": "V", "state_name": "S"},
            {"block_name": "B", "state_name": "T"}
        ]))
        .unwrap();

        assert_eq!(table.columns(), &["village_name", "state_name", "block_name"]);
    }

    #[test]
    fn test_indexed_columns_keep_row_order_past_ten_rows() {
        let names: Vec<String> = (0..12).map(|i| format!("S{i}")).collect();
        let column: Map<String, Value> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (i.to_string(), json!(name)))
            .collect();

        let table = Table::from_json(&json!({"state_name": column})).unwrap();

        let expected_index: Vec<String> = (0..12).map(|i| i.to_string()).collect();
        assert_eq!(table.index(), expected_index.as_slice());
        let values: Vec<&str> = table
            .rows()
            .iter()
            .map(|row| row["state_name"].as_text().unwrap())
            .collect();
        assert_eq!(values, names);
    }

    #[test]
    fn test_column_arrays() {
        let table = Table::from_json(&json!({"state_name": ["Kerala ", " Unknown"]})).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows()[0].get("state_name"),
            Some(&Cell::Text("Kerala ".to_string()))
        );
    }

    #[test]
    fn test_column_arrays_length_mismatch() {
        let err = Table::from_json(&json!({"a": [1, 2], "b": [1]})).unwrap_err();
        assert_eq!(
            err,
            AppError::ParseError("All arrays must be of the same length".to_string())
        );
    }

    #[test]
    fn test_scalars_broadcast_next_to_arrays() {
        let table = Table::from_json(&json!({"a": [1, 2], "b": "x"})).unwrap();
        assert_eq!(table.rows()[1].get("b"), Some(&Cell::Text("x".to_string())));
    }

    #[test]
    fn test_all_scalars_need_index() {
        assert!(Table::from_json(&json!({"a": 1, "b": 2})).is_err());
    }

    #[test]
    fn test_indexed_columns_keep_labels() {
        let table = Table::from_json(&json!({
            "district_name": {"3": "A", "7": "B"},
            "state_name": {"7": "S"}
        }))
        .unwrap();

        assert_eq!(table.index(), &["3".to_string(), "7".to_string()]);
        assert_eq!(table.rows()[0].get("state_name"), Some(&Cell::Null));
        assert_eq!(
            table.to_columnar_json()["state_name"],
            json!({"3": null, "7": "S"})
        );
    }

    #[test]
    fn test_positional_rows_and_scalar_list() {
        let table = Table::from_json(&json!([[1, 2], [3]])).unwrap();
        assert_eq!(table.columns(), &["0".to_string(), "1".to_string()]);
        assert_eq!(table.rows()[1].get("1"), Some(&Cell::Null));

        let table = Table::from_json(&json!(["a", "b"])).unwrap();
        assert_eq!(table.columns(), &["0".to_string()]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_mixed_array_is_rejected() {
        assert!(Table::from_json(&json!([{"a": 1}, 2])).is_err());
        assert!(Table::from_json(&json!("text")).is_err());
    }

    #[test]
    fn test_project_keeps_requested_order_and_drops_absent() {
        let table = Table::from_json(&json!([{"b": 1, "a": 2, "c": 3}])).unwrap();
        let projected = table.project(&["c", "z", "a"]);

        assert_eq!(projected.columns(), &["c".to_string(), "a".to_string()]);
        assert_eq!(projected.rows()[0].len(), 2);
    }

    #[test]
    fn test_records_json_round_shape() {
        let mut table = Table::from_json(&json!({"state_name": ["A"]})).unwrap();
        table.derive_column("state_code", |_| Cell::Int(-2));

        assert_eq!(
            table.to_records_json(),
            json!([{"state_name": "A", "state_code": -2}])
        );
    }

    #[test]
    fn test_update_missing_column_fails() {
        let mut table = Table::from_json(&json!({"a": [1]})).unwrap();
        let err = table.update_column("state_name", |c| Ok(c.clone())).unwrap_err();
        assert!(matches!(err, AppError::SchemaMismatch(_)));
    }

    #[test]
    fn test_is_falsy() {
        assert!(is_falsy(&json!(null)));
        assert!(is_falsy(&json!({})));
        assert!(is_falsy(&json!([])));
        assert!(is_falsy(&json!("")));
        assert!(is_falsy(&json!(0)));
        assert!(is_falsy(&json!(false)));
        assert!(!is_falsy(&json!({"a": 1})));
        assert!(!is_falsy(&json!([0])));
    }
}
