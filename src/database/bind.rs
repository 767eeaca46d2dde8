use sqlx::{postgres::PgArguments, FromRow, Postgres};

use crate::sql::SqlValue;

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q SqlValue,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Decimal(d) => q.bind(*d),
        SqlValue::Text(s) => q.bind(s.as_str()),
    }
}

/// `sqlx::query_as` with every parameter bound in order.
pub fn query_as_with<'q, O>(
    sql: &'q str,
    params: &'q [SqlValue],
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    params
        .iter()
        .fold(sqlx::query_as::<_, O>(sql), bind_param_query_as::<O>)
}

