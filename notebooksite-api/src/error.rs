use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use notebooksite_store::StoreError;

use crate::pages;

// Failure details go to the log only; update stderr can name remotes and paths.
const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Maps store failures onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            StoreError::NotFound(name) => {
                tracing::info!(%name, "notebook not found");
                (
                    StatusCode::NOT_FOUND,
                    Html(pages::not_found().into_string()),
                )
                    .into_response()
            }
            err => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
        }
    }
}
