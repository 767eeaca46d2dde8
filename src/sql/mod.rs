pub mod error;
pub mod filter_where;
pub mod partial_update;
pub mod types;

pub use error::SqlBuildError;
pub use filter_where::FilterWhere;
pub use partial_update::{FieldTranslations, PartialUpdate, UpdatePayload};
pub use types::{SqlResult, SqlValue};
