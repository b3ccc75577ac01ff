//! REST API handlers for tool suggestions

use super::{
    document::read_document,
    models::{SuggestError, SuggestToolsInput, SuggestToolsOutput},
};
use crate::{error::ApiError, state::SharedState};
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    routing::post,
    Json, Router,
};

/// Creates routes for suggestion requests
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/suggestions", post(suggest_from_text))
        .route("/suggestions/upload", post(suggest_from_upload))
}

/// Endpoint: POST /suggestions
/// Suggests tools for a typed project description.
async fn suggest_from_text(
    State(state): State<SharedState>,
    Json(payload): Json<SuggestToolsInput>,
) -> Result<Json<SuggestToolsOutput>, ApiError> {
    if payload.document_content.trim().is_empty() {
        return Err(SuggestError::EmptyInput.into());
    }
    suggest(&state, &payload.document_content).await
}

/// Endpoint: POST /suggestions/upload
/// Suggests tools for an uploaded document sent as the raw request body.
async fn suggest_from_upload(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SuggestToolsOutput>, ApiError> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let text = read_document(content_type, &body)?;
    suggest(&state, &text).await
}

async fn suggest(state: &SharedState, text: &str) -> Result<Json<SuggestToolsOutput>, ApiError> {
    let suggested_tools = state.suggestions.suggest(text).await?;
    Ok(Json(SuggestToolsOutput { suggested_tools }))
}
