// handlers/students/get.rs - GET /students/id/:id and GET /students/nationalid/:nid

use axum::{
    extract::{Path, State},
    response::Json,
};

use super::parse_id;
use crate::database::models::Student;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /students/id/:id - Get a single student by primary key
pub async fn by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Student>> {
    let id = parse_id(&id)?;

    match state.store.find_by_id(id).await? {
        Some(student) => Ok(Json(student)),
        None => {
            tracing::warn!("Student {} not found", id);
            Err(ApiError::student_not_found(id))
        }
    }
}

/// GET /students/nationalid/:nid - First student holding the national id
pub async fn by_national_id(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
) -> ApiResult<Json<Student>> {
    state
        .store
        .find_by_national_id(&national_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            tracing::warn!("No student with national id {}", national_id);
            ApiError::not_found(format!("Student with national id {} not found", national_id))
        })
}
