use rust_decimal::Decimal;
use serde::Serialize;

/// A value bound to a numbered placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

/// Predicate operator with the value it binds, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Case-insensitive substring match against a `%...%` pattern
    ILike(SqlValue),
    Gte(SqlValue),
    Lte(SqlValue),
    /// `> 0`
    Positive,
}

impl FilterOp {
    pub fn sql(&self) -> &'static str {
        match self {
            FilterOp::ILike(_) => "ILIKE",
            FilterOp::Gte(_) => ">=",
            FilterOp::Lte(_) => "<=",
            FilterOp::Positive => ">",
        }
    }

    pub fn value(&self) -> Option<&SqlValue> {
        match self {
            FilterOp::ILike(v) | FilterOp::Gte(v) | FilterOp::Lte(v) => Some(v),
            FilterOp::Positive => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
}

/// Generated clause text and the values for its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlValue>,
}

impl SqlResult {
    pub fn empty() -> Self {
        Self { query: String::new(), params: vec![] }
    }

    /// Number of `$n` placeholders already consumed
    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

/// Quote an identifier, keeping a `table.column` qualifier intact.
pub fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}
