// handlers/students/update.rs - PATCH /students/:id (also PUT)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};

use super::parse_id;
use crate::database::models::{Student, StudentPayload};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Full overwrite of name, national_id and registration_id, even under PATCH.
/// Fields missing from the body become empty and are rejected by validation.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> ApiResult<Json<Student>> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;

    if state.store.find_by_id(id).await?.is_none() {
        tracing::warn!("Update of missing student {}", id);
        return Err(ApiError::student_not_found(id));
    }

    payload.validate()?;

    // Row may have been deleted between lookup and write
    let student = state
        .store
        .update(id, payload)
        .await?
        .ok_or_else(|| ApiError::student_not_found(id))?;

    tracing::info!("Updated student {}", student.id);
    Ok(Json(student))
}
