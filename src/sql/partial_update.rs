use std::collections::HashMap;

use super::error::SqlBuildError;
use super::types::{quote_identifier, SqlResult, SqlValue};

/// Logical field name -> new value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePayload {
    entries: Vec<(String, SqlValue)>,
}

impl UpdatePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Re-setting an existing key replaces its value in place.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    /// Set a field only when a value is present.
    pub fn set_opt<V: Into<SqlValue>>(&mut self, field: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.set(field, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for UpdatePayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (k, v) in iter {
            payload.set(k, v);
        }
        payload
    }
}

/// Logical field name -> storage column. Unlisted fields use their own name.
#[derive(Debug, Clone, Default)]
pub struct FieldTranslations {
    columns: HashMap<String, String>,
}

impl FieldTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    pub fn column_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map(String::as_str).unwrap_or(field)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FieldTranslations {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |t, (field, column)| t.map(field, column))
    }
}

pub struct PartialUpdate;

impl PartialUpdate {
    /// Build the body of a `SET` clause: `"col1"=$1, "col2"=$2`.
    pub fn build(payload: &UpdatePayload, translations: &FieldTranslations) -> Result<SqlResult, SqlBuildError> {
        if payload.is_empty() {
            return Err(SqlBuildError::InvalidInput("No data".to_string()));
        }

        let mut fragments = Vec::with_capacity(payload.len());
        let mut params = Vec::with_capacity(payload.len());
        for (idx, (field, value)) in payload.iter().enumerate() {
            let column = quote_identifier(translations.column_for(field));
            fragments.push(format!("{}=${}", column, idx + 1));
            params.push(value.clone());
        }

        Ok(SqlResult { query: fragments.join(", "), params })
    }

    /// Full `UPDATE` statement; the key value binds after the SET values.
    pub fn statement(
        table: &str,
        payload: &UpdatePayload,
        translations: &FieldTranslations,
        key_column: &str,
        key_value: impl Into<SqlValue>,
        returning: &str,
    ) -> Result<SqlResult, SqlBuildError> {
        let set = Self::build(payload, translations)?;
        let key_index = set.param_count() + 1;
        let query = format!(
            "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
            quote_identifier(table),
            set.query,
            quote_identifier(key_column),
            key_index,
            returning
        );
        let mut params = set.params;
        params.push(key_value.into());
        Ok(SqlResult { query, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_mapped_fields_and_keeps_order() {
        let payload: UpdatePayload = [("firstName", SqlValue::from("Aliya")), ("age", SqlValue::from(32))]
            .into_iter()
            .collect();
        let translations = FieldTranslations::from([("firstName", "first_name")]);

        let result = PartialUpdate::build(&payload, &translations).unwrap();
        assert_eq!(result.query, "\"first_name\"=$1, \"age\"=$2");
        assert_eq!(result.params, vec![SqlValue::from("Aliya"), SqlValue::from(32)]);
    }

    #[test]
    fn empty_payload_is_rejected() {
        let err = PartialUpdate::build(&UpdatePayload::new(), &FieldTranslations::new()).unwrap_err();
        assert_eq!(err, SqlBuildError::InvalidInput("No data".to_string()));
    }

    #[test]
    fn one_placeholder_per_key() {
        let mut payload = UpdatePayload::new();
        payload.set("a", 1).set("b", "two").set("c", true).set("d", 4);
        let result = PartialUpdate::build(&payload, &FieldTranslations::new()).unwrap();

        assert_eq!(result.query.matches('$').count(), payload.len());
        assert_eq!(result.query, "\"a\"=$1, \"b\"=$2, \"c\"=$3, \"d\"=$4");
        let keys: Vec<&str> = payload.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn resetting_a_key_keeps_its_position() {
        let mut payload = UpdatePayload::new();
        payload.set("name", "old").set("logoUrl", "x").set("name", "new");
        let result = PartialUpdate::build(&payload, &FieldTranslations::from([("logoUrl", "logo_url")])).unwrap();
        assert_eq!(result.query, "\"name\"=$1, \"logo_url\"=$2");
        assert_eq!(result.params[0], SqlValue::from("new"));
    }

    #[test]
    fn output_is_deterministic() {
        let mut payload = UpdatePayload::new();
        payload.set("numEmployees", 10).set("description", "d");
        let translations = FieldTranslations::from([("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);
        let first = PartialUpdate::build(&payload, &translations).unwrap();
        let second = PartialUpdate::build(&payload, &translations).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn statement_binds_key_last() {
        let mut payload = UpdatePayload::new();
        payload.set("title", "New").set_opt::<i32>("salary", None);
        let result = PartialUpdate::statement("jobs", &payload, &FieldTranslations::new(), "id", 7, "id, title").unwrap();

        assert_eq!(result.query, "UPDATE \"jobs\" SET \"title\"=$1 WHERE \"id\" = $2 RETURNING id, title");
        assert_eq!(result.params, vec![SqlValue::from("New"), SqlValue::from(7)]);
    }
}
