use crate::error::{ApiError, FieldErrors};

/// Request-level constraint checks beyond what deserialization enforces.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

/// Collects per-field messages; the first failure for a field wins.
#[derive(Debug, Default)]
pub struct Checks {
    errors: FieldErrors,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
        self
    }

    pub fn length(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) -> &mut Self {
        if let Some(v) = value {
            let len = v.chars().count();
            if len < min || len > max {
                self.fail(field, format!("must be between {} and {} characters", min, max));
            }
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: Option<i32>) -> &mut Self {
        if matches!(value, Some(v) if v < 0) {
            self.fail(field, "must be greater than or equal to 0");
        }
        self
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            let valid = match v.split_once('@') {
                Some((local, domain)) => {
                    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
                }
                None => false,
            };
            if !valid {
                self.fail(field, "must be a valid email");
            }
        }
        self
    }

    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            if url::Url::parse(v).is_err() {
                self.fail(field, "must be a valid URL");
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let errors = std::mem::take(&mut self.errors);
        Err(ApiError::validation_error("Invalid request", Some(errors)))
    }
}
