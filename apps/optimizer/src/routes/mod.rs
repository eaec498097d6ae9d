pub mod generate;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api",
            get(generate::handle_generate_info).post(generate::handle_generate),
        )
        .route(
            "/api/upload",
            post(upload::handle_upload).layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}
