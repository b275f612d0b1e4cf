pub mod error;
pub mod handlers;
pub mod pages;
pub mod state;

use axum::Router;
use axum::routing::{get, post};

pub use error::ApiError;
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/notebooks", get(handlers::list_notebooks))
        .route("/notebooks/{name}", get(handlers::notebook))
        .route("/about", get(handlers::about))
        .route("/projects", get(handlers::projects))
        .route("/update/sources", post(handlers::update_sources))
        .route("/update/notebooks", post(handlers::update_notebooks))
        .fallback(handlers::not_found)
        .with_state(state)
}
