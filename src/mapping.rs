//! The data model mapping consumed by the translator.

use std::collections::HashMap;

/// Resolves logical pattern fields and operators to native ones.
pub trait FieldMapper {
    /// Native columns for an object field, in order. Unmapped fields yield an
    /// empty list.
    fn map_field(&self, object_type: &str, field: &str) -> Vec<String>;

    /// Logical operator key (e.g. `ComparisonComparators.Equal`) to native token.
    fn map_comparator(&self) -> HashMap<String, String>;
}

impl<T: FieldMapper + ?Sized> FieldMapper for &T {
    fn map_field(&self, object_type: &str, field: &str) -> Vec<String> {
        (**self).map_field(object_type, field)
    }

    fn map_comparator(&self) -> HashMap<String, String> {
        (**self).map_comparator()
    }
}
