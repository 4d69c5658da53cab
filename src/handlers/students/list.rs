// handlers/students/list.rs - GET /students handler

use axum::{extract::State, response::Json};

use crate::database::models::Student;
use crate::error::ApiResult;
use crate::state::AppState;

/// All live students, oldest first. No paging or filtering.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Student>>> {
    let students = state.store.list().await?;
    tracing::debug!("Listed {} students", students.len());
    Ok(Json(students))
}
