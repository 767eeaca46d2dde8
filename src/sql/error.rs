use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SqlBuildError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{lower_field} cannot be greater than {upper_field}")]
    InvalidRange {
        lower_field: &'static str,
        upper_field: &'static str,
    },
}
