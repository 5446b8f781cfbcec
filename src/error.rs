use thiserror::Error;

/// Failures raised while translating a pattern into a predicate.
///
/// An inapplicable sub-expression is not an error: it translates to an empty
/// fragment and is absorbed by the enclosing combination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The comparator or combination operator has no entry in the operator map.
    #[error("Comparison operator {operator} unsupported for this data source")]
    UnsupportedOperator { operator: String },

    #[error("Malformed timestamp: {value}")]
    MalformedTimestamp { value: String },

    /// The qualifier text does not carry a quoted start and stop bound.
    #[error("Malformed START/STOP qualifier: {qualifier}")]
    MalformedQualifier { qualifier: String },

    #[error("Malformed object path '{path}', expected '<object-type>:<field>'")]
    MalformedObjectPath { path: String },
}

pub type Result<T> = std::result::Result<T, TranslateError>;
