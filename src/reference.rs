//! Reference fields: address-like fields whose literal shape decides which
//! mapped columns the comparison may be tested against.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Fields whose values are classified before being routed to columns.
pub const REFERENCE_FIELDS: [&str; 2] = ["src_ref.value", "dst_ref.value"];

pub fn is_reference_field(field: &str) -> bool {
    REFERENCE_FIELDS.contains(&field)
}

/// Concrete shape of a reference literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralShape {
    Ipv6,
    Ipv6Cidr,
    Ipv4,
    Ipv4Cidr,
    Mac,
}

const IPV4: &str = r"(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";

const IPV6: &str = concat!(
    r"(?:",
    r"(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}",
    r"|(?:[0-9a-fA-F]{1,4}:){1,7}:",
    r"|(?:[0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}",
    r"|(?:[0-9a-fA-F]{1,4}:){1,5}(?::[0-9a-fA-F]{1,4}){1,2}",
    r"|(?:[0-9a-fA-F]{1,4}:){1,4}(?::[0-9a-fA-F]{1,4}){1,3}",
    r"|(?:[0-9a-fA-F]{1,4}:){1,3}(?::[0-9a-fA-F]{1,4}){1,4}",
    r"|(?:[0-9a-fA-F]{1,4}:){1,2}(?::[0-9a-fA-F]{1,4}){1,5}",
    r"|[0-9a-fA-F]{1,4}:(?::[0-9a-fA-F]{1,4}){1,6}",
    r"|:(?:(?::[0-9a-fA-F]{1,4}){1,7}|:)",
    r")"
);

/// Classifiers in priority order; the first match wins.
static CLASSIFIERS: LazyLock<Vec<(LiteralShape, Regex)>> = LazyLock::new(|| {
    let patterns = [
        (LiteralShape::Ipv6, format!("^{IPV6}$")),
        (LiteralShape::Ipv6Cidr, format!(r"^{IPV6}/(?:12[0-8]|1[01][0-9]|[1-9]?[0-9])$")),
        (LiteralShape::Ipv4, format!("^{IPV4}$")),
        (LiteralShape::Ipv4Cidr, format!(r"^{IPV4}/(?:3[0-2]|[12]?[0-9])$")),
        (LiteralShape::Mac, r"^(?:[0-9a-fA-F]{2}[:-]){5}[0-9a-fA-F]{2}$".to_string()),
    ];
    patterns
        .into_iter()
        .filter_map(|(shape, pattern)| match Regex::new(&pattern) {
            Ok(re) => Some((shape, re)),
            Err(e) => {
                warn!("Invalid classifier pattern for {:?}: {}", shape, e);
                None
            }
        })
        .collect()
});

/// Determine the shape of a literal, or None when no classifier matches.
pub fn classify(value: &str) -> Option<LiteralShape> {
    CLASSIFIERS
        .iter()
        .find(|(_, re)| re.is_match(value))
        .map(|(shape, _)| *shape)
}

/// Which literal shapes each native column accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceRegistry {
    columns: HashMap<String, HashSet<LiteralShape>>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
        }
    }

    pub fn with_column(mut self, column: &str, shapes: &[LiteralShape]) -> Self {
        self.columns
            .insert(column.to_string(), shapes.iter().copied().collect());
        self
    }

    /// Whether `column` accepts literals of `shape`. Unregistered columns
    /// accept nothing.
    pub fn accepts(&self, column: &str, shape: LiteralShape) -> bool {
        match self.columns.get(column) {
            Some(shapes) => shapes.contains(&shape),
            None => {
                warn!("Column '{}' has no reference type registration", column);
                false
            }
        }
    }

    /// Build `<column> <comparator> <value>` fragments for the columns that
    /// accept the literal's shape.
    pub fn resolve(&self, raw_value: &str, columns: &[String], comparator: &str, value: &str) -> Vec<String> {
        let Some(shape) = classify(raw_value) else {
            debug!("Reference value '{}' matches no known shape", raw_value);
            return Vec::new();
        };

        columns
            .iter()
            .filter(|column| {
                let accepted = self.accepts(column, shape);
                if !accepted {
                    debug!("Column '{}' does not accept {:?} values", column, shape);
                }
                accepted
            })
            .map(|column| format!("{} {} {}", column, comparator, value))
            .collect()
    }
}

impl Default for ReferenceRegistry {
    fn default() -> Self {
        Self::new()
            .with_column(
                "source_ipaddr",
                &[
                    LiteralShape::Ipv4,
                    LiteralShape::Ipv4Cidr,
                    LiteralShape::Ipv6,
                    LiteralShape::Ipv6Cidr,
                ],
            )
            .with_column("dest_ipaddr", &[LiteralShape::Ipv4, LiteralShape::Ipv4Cidr])
    }
}
