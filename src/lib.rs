//! Translation of STIX-style pattern expression trees into relational query
//! predicates.

pub mod ast;
pub mod config;
pub mod error;
pub mod formatter;
pub mod mapping;
pub mod reference;
pub mod results;
pub mod statement;
pub mod timestamp;
pub mod translator;

pub use ast::{Comparator, Comparison, Expression, Literal, ObservationOperator, Qualifier};
pub use config::{ConfigError, MappingConfig};
pub use error::{Result, TranslateError};
pub use mapping::FieldMapper;
pub use translator::{PatternTranslator, QualifierScope, TranslatorOptions};
