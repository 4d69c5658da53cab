// handlers/students/create.rs - POST /students handler

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::database::models::{Student, StudentPayload};
use crate::error::ApiResult;
use crate::state::AppState;

/// Validates, then inserts. Answers 200 (not 201) with the stored row,
/// including its generated id and timestamps.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> ApiResult<Json<Student>> {
    let Json(payload) = payload?;
    payload.validate()?;

    let student = state.store.insert(payload).await?;
    tracing::info!("Created student {}", student.id);
    Ok(Json(student))
}
