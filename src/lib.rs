pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::state::AppState;

pub use crate::database::{MemoryStudentStore, PgStudentStore, StudentStore};

/// Build the full router: routes, shared state and global middleware.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .merge(student_routes())
        // Catch-all greeting; static routes above take priority
        .route("/:name", get(handlers::greeting))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn student_routes() -> Router<AppState> {
    use handlers::students;

    Router::new()
        .route(
            "/students",
            get(students::student_list).post(students::student_create),
        )
        .route("/students/id/:id", get(students::student_get))
        .route(
            "/students/nationalid/:nid",
            get(students::student_get_by_national_id),
        )
        // PATCH kept for compatibility; both verbs overwrite every field
        .route(
            "/students/:id",
            axum::routing::patch(students::student_update)
                .put(students::student_update)
                .delete(students::student_delete),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
