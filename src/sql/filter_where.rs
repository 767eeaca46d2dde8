use super::types::{quote_identifier, FilterOp, FilterWhereInfo, SqlResult, SqlValue};

/// Accumulates typed predicates and renders them as ` AND ...` fragments
/// suitable for appending to `SELECT ... WHERE 1=1`.
///
/// Placeholders are only assigned during [`FilterWhere::generate`], so the
/// Nth `$n` always binds the Nth value regardless of which predicates were
/// pushed.
#[derive(Debug, Default)]
pub struct FilterWhere {
    conditions: Vec<FilterWhereInfo>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column ILIKE '%value%'`. LIKE wildcards in the input match literally.
    pub fn contains(&mut self, column: &str, needle: &str) -> &mut Self {
        let pattern = format!("%{}%", Self::escape_like(needle));
        self.push(column, FilterOp::ILike(SqlValue::Text(pattern)))
    }

    pub fn at_least(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.push(column, FilterOp::Gte(value.into()))
    }

    pub fn at_most(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.push(column, FilterOp::Lte(value.into()))
    }

    /// `column > 0`, only when `enabled` is true.
    pub fn positive_if(&mut self, column: &str, enabled: bool) -> &mut Self {
        if enabled {
            self.push(column, FilterOp::Positive);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn generate(&self) -> SqlResult {
        self.generate_from(0)
    }

    /// Render with placeholders numbered after `starting_param_index`
    /// already-bound parameters.
    pub fn generate_from(&self, starting_param_index: usize) -> SqlResult {
        let mut params = Vec::with_capacity(self.conditions.len());
        let mut query = String::new();

        for condition in &self.conditions {
            let column = quote_identifier(&condition.column);
            let op = &condition.operator;
            let predicate = match op.value() {
                None => format!("{} {} 0", column, op.sql()),
                Some(value) => {
                    params.push(value.clone());
                    let placeholder = starting_param_index + params.len();
                    format!("{} {} ${}", column, op.sql(), placeholder)
                }
            };
            query.push_str(" AND ");
            query.push_str(&predicate);
        }

        SqlResult { query, params }
    }

    fn push(&mut self, column: &str, operator: FilterOp) -> &mut Self {
        self.conditions.push(FilterWhereInfo { column: column.to_string(), operator });
        self
    }

    fn escape_like(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            if matches!(c, '\\' | '%' | '_') {
                out.push('\\');
            }
            out.push(c);
        }
        out
    }
}
