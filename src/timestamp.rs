//! ISO-8601 to epoch-millisecond conversion for temporal fields and qualifiers.

use crate::ast::{Literal, Qualifier};
use crate::error::{Result, TranslateError};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Fields whose values are compared as epoch milliseconds.
pub const TIMESTAMP_FIELDS: [&str; 10] = [
    "created",
    "modified",
    "accessed",
    "ctime",
    "mtime",
    "atime",
    "created_time",
    "modified_time",
    "start",
    "end",
];

pub fn is_timestamp_field(field: &str) -> bool {
    TIMESTAMP_FIELDS.contains(&field)
}

/// Convert a timestamp such as `t'2020-01-01T00:00:00.000Z'` to epoch millis.
/// Quote characters and the `t` literal prefix are ignored.
pub fn to_epoch_millis(raw: &str) -> Result<i64> {
    let unquoted: String = raw.chars().filter(|c| *c != '\'').collect();
    let trimmed = unquoted.trim();
    let text = trimmed.strip_prefix('t').unwrap_or(trimmed);

    parse_datetime(text)
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| TranslateError::MalformedTimestamp {
            value: raw.to_string(),
        })
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

/// Normalize a temporal literal. Sets are normalized member by member;
/// numbers are assumed to already be epoch values.
pub fn normalize_literal(value: &Literal) -> Result<Literal> {
    match value {
        Literal::String(s) => to_epoch_millis(s).map(Literal::Integer),
        Literal::Set(values) => values
            .iter()
            .map(normalize_literal)
            .collect::<Result<Vec<_>>>()
            .map(Literal::Set),
        Literal::Integer(_) => Ok(value.clone()),
        other => Err(TranslateError::MalformedTimestamp {
            value: other.to_string(),
        }),
    }
}

/// Extract the (start, stop) bounds of a qualifier. The bounds are the first
/// and second single-quoted timestamps in the qualifier text.
pub fn qualifier_bounds(qualifier: &Qualifier) -> Result<(i64, i64)> {
    let parts: Vec<&str> = qualifier.0.split('\'').collect();
    if parts.len() < 4 {
        return Err(TranslateError::MalformedQualifier {
            qualifier: qualifier.0.clone(),
        });
    }
    let start = to_epoch_millis(parts[1])?;
    let stop = to_epoch_millis(parts[3])?;
    Ok((start, stop))
}
