//! Wraps a translated predicate into a full SELECT statement using sea-query.

use sea_query::{Asterisk, Expr, Iden, PostgresQueryBuilder, SelectStatement};

/// Table identifier for sea-query
#[derive(Debug, Clone)]
pub struct TableName(pub String);

impl Iden for TableName {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "{}", self.0).unwrap();
    }
}

/// Build `SELECT * FROM <table> WHERE <predicate>`. Returns None for an empty
/// predicate, since nothing in the pattern applies to the data source.
pub fn build_select(table: &str, predicate: &str) -> Option<String> {
    if predicate.trim().is_empty() {
        return None;
    }

    let mut select = SelectStatement::new();
    select
        .column(Asterisk)
        .from(TableName(table.to_string()))
        .and_where(Expr::cust(predicate.to_string()));

    Some(select.to_string(PostgresQueryBuilder))
}
