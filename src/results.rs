//! Shaping of fetched rows into records, and classification of database
//! error codes reported by the transport.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Pagination window over a fetched result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultWindow {
    /// Number of leading rows to skip
    pub start: usize,
    /// Maximum number of rows to return
    pub rows: usize,
}

/// Label positional tuples with their column names and apply the window.
pub fn shape_rows(columns: &[String], rows: Vec<Vec<Value>>, window: ResultWindow) -> Vec<Map<String, Value>> {
    rows.into_iter()
        .skip(window.start)
        .take(window.rows)
        .map(|row| columns.iter().cloned().zip(row).collect())
        .collect()
}

/// Category of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    QueryParsingError,
    SearchDoesNotExist,
    InvalidParameter,
    RemoteSystemUnavailable,
    AuthCredentials,
    ModuleDefault,
}

/// Map a PostgreSQL SQLSTATE code to a failure category.
pub fn classify_error_code(code: &str) -> TransportErrorKind {
    match code {
        // syntax error
        "42601" => TransportErrorKind::QueryParsingError,
        // undefined table, unknown database
        "42P01" | "3D000" => TransportErrorKind::SearchDoesNotExist,
        // unique violation
        "23505" => TransportErrorKind::InvalidParameter,
        "08001" => TransportErrorKind::RemoteSystemUnavailable,
        "28000" => TransportErrorKind::AuthCredentials,
        // out of memory, disk full, internal error
        "53200" | "53100" | "XX000" => TransportErrorKind::ModuleDefault,
        _ => {
            warn!("failed to map error code: {}", code);
            TransportErrorKind::ModuleDefault
        }
    }
}
