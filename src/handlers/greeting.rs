// handlers/greeting.rs - GET /:name handler

use axum::{extract::Path, response::Json};
use serde_json::{json, Value};

/// Echoes the path segment back verbatim inside a fixed sentence.
pub async fn greeting(Path(name): Path<String>) -> Json<Value> {
    Json(json!({ "API says:": format!("Hey {}, how's it going?", name) }))
}
