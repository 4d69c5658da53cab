pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

// Re-export handler functions for use in routing
pub use create::create as student_create;
pub use delete::delete as student_delete;
pub use get::by_id as student_get;
pub use get::by_national_id as student_get_by_national_id;
pub use list::list as student_list;
pub use update::update as student_update;

use crate::error::ApiError;

/// Path ids are taken as strings so a bad one yields our JSON error body
/// instead of the framework's plain-text rejection.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid student id '{}'", raw)))
}
