pub mod health;
pub mod questions;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{middleware::auth::require_teacher, AppState};

/// Full application router: public health check plus the teacher-only
/// question upload workflow.
pub fn app_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    let teacher_routes = Router::new()
        .route(questions::UPLOAD_PATH, get(questions::upload_form))
        .route(questions::PREVIEW_PATH, post(questions::preview_upload))
        .route(questions::STORE_PATH, post(questions::store_uploaded))
        .route(questions::TEMPLATE_PATH, get(questions::download_template))
        .layer(middleware::from_fn_with_state(state.clone(), require_teacher));

    Router::new()
        .route("/health", get(health::health))
        .merge(teacher_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
}
