use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::session::CurrentSession;
use crate::views::page_context;

pub async fn about(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(page_context(&state, &session)?))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
