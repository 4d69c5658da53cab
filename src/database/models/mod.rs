pub mod student;

pub use student::{FieldError, Student, StudentPayload, ValidationError};
