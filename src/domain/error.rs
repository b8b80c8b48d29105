use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    NoMatchingColumns,
    EmptyBody,
    MissingParameter,
    StoreAccess(String),
    SchemaMismatch(String),
    PayloadTooLarge(usize),
    ParseError(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NoMatchingColumns => {
                write!(f, "None of the specified columns are present in the JSON data.")
            }
            AppError::EmptyBody => write!(f, "No JSON data was provided in the request body."),
            AppError::MissingParameter => write!(
                f,
                "Both 'dataset' and 'mapping' are required in the request JSON."
            ),
            AppError::StoreAccess(msg) => write!(f, "Database error: {}", msg),
            AppError::SchemaMismatch(msg) => write!(f, "Schema mismatch: {}", msg),
            AppError::PayloadTooLarge(limit) => {
                write!(f, "Request body exceeds the {} byte limit.", limit)
            }
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
