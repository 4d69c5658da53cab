use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;

pub const NATIONAL_ID_LEN: usize = 11;
pub const REGISTRATION_ID_LEN: usize = 9;

/// Persisted student row. `deleted_at` is the soft-delete marker: rows with it
/// set are hidden from every read but stay in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub national_id: String,
    pub registration_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Overwrite all three domain fields. Missing body fields arrive here as
    /// empty strings, never as "keep the old value".
    pub fn apply(&mut self, payload: StudentPayload, now: DateTime<Utc>) {
        self.name = payload.name;
        self.national_id = payload.national_id;
        self.registration_id = payload.registration_id;
        self.updated_at = now;
    }
}

/// Request body for create and update. Server-owned fields (`id`, timestamps)
/// are not part of it, so clients cannot set them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub national_id: String,
    #[serde(default)]
    pub registration_id: String,
}

impl StudentPayload {
    pub fn new(
        name: impl Into<String>,
        national_id: impl Into<String>,
        registration_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            national_id: national_id.into(),
            registration_id: registration_id.into(),
        }
    }

    /// Check every field and report all failures at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        }
        if !is_digits_of_len(&self.national_id, NATIONAL_ID_LEN) {
            errors.push(FieldError::new(
                "national_id",
                format!("must be exactly {} digits", NATIONAL_ID_LEN),
            ));
        }
        if !is_digits_of_len(&self.registration_id, REGISTRATION_ID_LEN) {
            errors.push(FieldError::new(
                "registration_id",
                format!("must be exactly {} digits", REGISTRATION_ID_LEN),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }
}

fn is_digits_of_len(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// One or more field-level constraint violations, detected before any write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid student: {}", join_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    #[cfg(test)]
    pub(crate) fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
