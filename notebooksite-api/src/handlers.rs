use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;

use crate::error::ApiError;
use crate::pages;
use crate::state::AppState;

type PageResult = Result<Html<String>, ApiError>;

pub async fn home(State(state): State<AppState>) -> PageResult {
    let index = state.repository.load().await;
    let mut articles = Vec::new();
    for entry in index.recent(state.home_count) {
        articles.push(state.cache.ensure_rendered(&index, &entry.name).await?);
    }
    Ok(Html(pages::home(&articles).into_string()))
}

pub async fn list_notebooks(State(state): State<AppState>) -> Html<String> {
    let index = state.repository.load().await;
    Html(pages::notebooks(&index.by_year()).into_string())
}

pub async fn notebook(State(state): State<AppState>, Path(name): Path<String>) -> PageResult {
    let index = state.repository.load().await;
    let content = state.cache.ensure_rendered(&index, &name).await?;
    Ok(Html(pages::notebook(&name, &content).into_string()))
}

pub async fn about() -> Html<String> {
    Html(pages::about().into_string())
}

pub async fn projects() -> Html<String> {
    Html(pages::projects().into_string())
}

pub async fn update_sources(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state.updates.update_sources().await?;
    tracing::info!("sources updated");
    Ok("OK")
}

pub async fn update_notebooks(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state.updates.update_notebooks().await?;
    tracing::info!("notebooks updated");
    Ok("OK")
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(pages::not_found().into_string()))
}
