use crate::{AppState, pages};
use axum::{extract::State, response::IntoResponse};

pub const INDEX_ENDPOINT: &str = "/";

pub async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    pages::render_landing(state.registry.projects())
}
