pub mod bind;
pub mod manager;

pub use bind::query_as_with;
pub use manager::{DatabaseError, DatabaseManager};
