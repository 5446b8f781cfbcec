//! Comparator-specific rendering of literal values into native query text.

use crate::ast::{Comparator, Literal};

/// Characters that are backslash-escaped inside string literals.
const ESCAPED_CHARS: [char; 5] = ['\\', '\'', '"', '(', ')'];

/// Render a literal the way the given comparator expects it.
pub fn format_value(comparator: Comparator, value: &Literal) -> String {
    match comparator {
        Comparator::Equal | Comparator::NotEqual => format_equality(value),
        Comparator::Like => format_like(value),
        Comparator::Matches => format_match(value),
        Comparator::In => format_set(value),
        _ => escape(value),
    }
}

/// Escape string literals; numbers and booleans pass through untouched.
pub fn escape(value: &Literal) -> String {
    match value {
        Literal::String(s) => {
            let mut escaped = String::with_capacity(s.len());
            for c in s.chars() {
                if ESCAPED_CHARS.contains(&c) {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            escaped
        }
        other => other.to_string(),
    }
}

fn format_equality(value: &Literal) -> String {
    format!("'{}'", escape(value))
}

fn format_like(value: &Literal) -> String {
    format!("'%{}%'", escape(value))
}

/// Turn a regex-style pattern into a wildcard pattern: a leading `^` or a
/// trailing `$` anchors that end, otherwise `.*` is added.
fn format_match(value: &Literal) -> String {
    let raw = escape(value);
    let pattern = match raw.strip_prefix('^') {
        Some(rest) => rest.to_string(),
        None => format!(".*{}", raw),
    };
    match pattern.strip_suffix('$') {
        Some(rest) => format!("'{}'", rest),
        None => format!("'{}.*'", pattern),
    }
}

/// Sets render as an OR-disjunction of escaped members, not as a SQL list.
fn format_set(value: &Literal) -> String {
    let members = match value {
        Literal::Set(values) => values.iter().map(escape).collect::<Vec<_>>(),
        single => vec![escape(single)],
    };
    format!("({})", members.join(" OR "))
}
