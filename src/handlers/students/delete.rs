// handlers/students/delete.rs - DELETE /students/:id handler

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Soft delete. A second delete of the same id is a not-found.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;

    if !state.store.soft_delete(id).await? {
        tracing::warn!("Delete of missing student {}", id);
        return Err(ApiError::student_not_found(id));
    }

    tracing::info!("Soft-deleted student {}", id);
    Ok(Json(json!({ "data": "Student deleted successfully" })))
}
