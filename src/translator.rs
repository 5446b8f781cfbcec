//! Translator that compiles a pattern expression tree into a relational
//! predicate string.
//!
//! The translator is a single recursive match over [`Expression`]. Comparison
//! leaves are resolved through the [`FieldMapper`]; combinations fold their
//! operands together. A leaf that has no applicable column produces an empty
//! fragment, and any combination containing an empty fragment is itself empty.

use crate::ast::{Comparison, ComparisonOperator, Expression, ObservationOperator, Qualifier};
use crate::error::{Result, TranslateError};
use crate::formatter::format_value;
use crate::mapping::FieldMapper;
use crate::reference::{is_reference_field, ReferenceRegistry};
use crate::timestamp::{is_timestamp_field, normalize_literal, qualifier_bounds};
use std::collections::HashMap;
use tracing::debug;

/// Column holding the record ingestion time, used for START/STOP qualifiers.
pub const DEFAULT_TIME_COLUMN: &str = "entry_time";

/// Which operands of a qualified observation combination get the qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualifierScope {
    /// Only the last observation is time-qualified.
    #[default]
    LastObservation,
    /// Every observation is time-qualified.
    EachObservation,
}

/// Configuration for the translator
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    pub qualifier_scope: QualifierScope,
    pub references: ReferenceRegistry,
    pub time_column: String,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            qualifier_scope: QualifierScope::default(),
            references: ReferenceRegistry::default(),
            time_column: DEFAULT_TIME_COLUMN.to_string(),
        }
    }
}

/// Pattern translator bound to one data model mapping.
pub struct PatternTranslator<M> {
    mapper: M,
    /// Operator tokens, read once from the mapping
    comparators: HashMap<String, String>,
    options: TranslatorOptions,
}

impl<M: FieldMapper> PatternTranslator<M> {
    pub fn new(mapper: M) -> Self {
        Self::with_options(mapper, TranslatorOptions::default())
    }

    pub fn with_options(mapper: M, options: TranslatorOptions) -> Self {
        let comparators = mapper.map_comparator();
        Self {
            mapper,
            comparators,
            options,
        }
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Translate a whole pattern. An empty string means no part of the
    /// pattern applies to this data source.
    pub fn translate(&self, expression: &Expression) -> Result<String> {
        self.translate_expression(expression, None)
    }

    fn translate_expression(&self, expression: &Expression, qualifier: Option<&Qualifier>) -> Result<String> {
        match expression {
            Expression::Comparison(comparison) => {
                let fragment = self.translate_comparison(comparison)?;
                self.apply_qualifier(fragment, qualifier)
            }
            Expression::CombinedComparison { left, right, operator } => {
                let token = self.lookup_operator(operator.lookup_key())?;
                let left = self.translate_expression(left, None)?;
                let right = self.translate_expression(right, None)?;
                let Some(joined) = join_fragments(&left, &right, token, *operator == ComparisonOperator::And) else {
                    return Ok(String::new());
                };
                self.apply_qualifier(joined, qualifier)
            }
            Expression::Observation { comparison } => self.translate_expression(comparison, qualifier),
            Expression::CombinedObservation { left, right, operator } => {
                self.translate_observations(left, right, *operator, qualifier)
            }
            // The innermost qualifier wins over one forwarded from above.
            Expression::Qualified { inner, qualifier } => self.translate_expression(inner, Some(qualifier)),
        }
    }

    fn translate_observations(
        &self,
        left: &Expression,
        right: &Expression,
        operator: ObservationOperator,
        qualifier: Option<&Qualifier>,
    ) -> Result<String> {
        let token = self.lookup_operator(operator.lookup_key())?;

        match qualifier {
            None => {
                let left = self.translate_expression(left, None)?;
                let right = self.translate_expression(right, None)?;
                Ok(join_fragments(&left, &right, token, operator == ObservationOperator::And).unwrap_or_default())
            }
            Some(qualifier) => {
                let left_qualifier = match self.options.qualifier_scope {
                    QualifierScope::LastObservation => None,
                    QualifierScope::EachObservation => Some(qualifier),
                };
                let left = self.translate_expression(left, left_qualifier)?;
                let right = self.translate_expression(right, Some(qualifier))?;
                Ok(join_fragments(&left, &right, token, false).unwrap_or_default())
            }
        }
    }

    fn translate_comparison(&self, comparison: &Comparison) -> Result<String> {
        let (object_type, field) = comparison
            .split_path()
            .ok_or_else(|| TranslateError::MalformedObjectPath {
                path: comparison.object_path.clone(),
            })?;
        // Multiple native columns may back the same field
        let columns = self.mapper.map_field(object_type, field);
        let comparator = self.lookup_operator(comparison.comparator.lookup_key())?;

        // Temporal values are compared as epoch millis, then formatted as usual
        let normalized;
        let literal = if is_timestamp_field(field) {
            normalized = normalize_literal(&comparison.value)?;
            &normalized
        } else {
            &comparison.value
        };
        let value = format_value(comparison.comparator, literal);

        let fragment = if is_reference_field(field) {
            self.options
                .references
                .resolve(&comparison.value.to_string(), &columns, comparator, &value)
                .join(" OR ")
        } else {
            let parts: Vec<String> = columns
                .iter()
                .map(|column| format!("{} {} {}", column, comparator, value))
                .collect();
            if parts.len() > 1 {
                format!("({})", parts.join(" OR "))
            } else {
                parts.join(" OR ")
            }
        };

        if fragment.is_empty() {
            debug!("No applicable column for {}", comparison.object_path);
            return Ok(fragment);
        }

        if comparison.negated {
            Ok(format!("NOT({})", fragment))
        } else {
            Ok(fragment)
        }
    }

    /// Append the qualifier's time range to a fragment. The qualifier is
    /// validated even when the fragment is empty.
    fn apply_qualifier(&self, fragment: String, qualifier: Option<&Qualifier>) -> Result<String> {
        let Some(qualifier) = qualifier else {
            return Ok(fragment);
        };
        let (start, stop) = qualifier_bounds(qualifier)?;
        if fragment.is_empty() {
            return Ok(fragment);
        }
        let column = &self.options.time_column;
        Ok(format!(
            "{} AND ({} >= {} AND {} <= {})",
            fragment, column, start, column, stop
        ))
    }

    fn lookup_operator(&self, key: &str) -> Result<&str> {
        self.comparators
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| TranslateError::UnsupportedOperator {
                operator: key.to_string(),
            })
    }
}

/// Join two fragments with an operator token. Returns None when either side
/// is empty. Conjunctions are parenthesized, disjunctions are not.
fn join_fragments(left: &str, right: &str, token: &str, grouped: bool) -> Option<String> {
    if left.is_empty() || right.is_empty() {
        debug!("Dropping combination with an empty operand");
        return None;
    }
    if grouped {
        Some(format!("({} {} {})", left, token, right))
    } else {
        Some(format!("{} {} {}", left, token, right))
    }
}
