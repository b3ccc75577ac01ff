//! REST API handlers for catalog browsing
//!
//! Responses borrow from the catalog, so each handler serializes before
//! returning.

use super::{
    helpers::{quote, rental_days_between},
    models::{
        ArticleQueryParams, CompareParams, QuoteParams, ToolDetail, ToolQuery, ToolQueryParams,
    },
};
use crate::{error::ApiError, state::SharedState};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::debug;

/// Creates routes for catalog and comparison queries
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/catalog/tools", get(list_tools))
        .route("/catalog/tools/:id", get(tool_detail))
        .route("/catalog/tools/:id/quote", get(quote_tool))
        .route("/catalog/categories", get(list_categories))
        .route("/catalog/topics", get(list_topics))
        .route("/catalog/articles", get(list_articles))
        .route("/catalog/articles/:slug", get(article_detail))
        .route("/compare", get(compare_tools))
}

/// Endpoint: GET /catalog/tools
async fn list_tools(
    State(state): State<SharedState>,
    Query(params): Query<ToolQueryParams>,
) -> Response {
    let query = ToolQuery::from(params);
    let tools = state.catalog.search(&query);
    debug!(?query, matches = tools.len(), "catalog search");
    Json(tools).into_response()
}

/// Endpoint: GET /catalog/tools/:id
/// Tool with its stock flags and up to four related tools.
async fn tool_detail(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let tool = state
        .catalog
        .lookup(&id)
        .ok_or_else(|| ApiError::ToolNotFound(id.clone()))?;

    let detail = ToolDetail {
        tool,
        low_stock: tool.is_low_stock(),
        in_stock: tool.stock > 0,
        recommended: state.catalog.recommended(tool),
    };
    Ok(Json(detail).into_response())
}

/// Endpoint: GET /catalog/tools/:id/quote
async fn quote_tool(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<QuoteParams>,
) -> Result<Response, ApiError> {
    if params.quantity == 0 {
        return Err(ApiError::InvalidQuantity);
    }
    let tool = state
        .catalog
        .lookup(&id)
        .ok_or(ApiError::ToolNotFound(id))?;

    let days = rental_days_between(params.start, params.end);
    Ok(Json(quote(tool, days, params.quantity)).into_response())
}

/// Endpoint: GET /catalog/categories
async fn list_categories(State(state): State<SharedState>) -> Response {
    Json(state.catalog.categories()).into_response()
}

/// Endpoint: GET /catalog/topics
async fn list_topics(State(state): State<SharedState>) -> Response {
    Json(state.catalog.quick_topics()).into_response()
}

/// Endpoint: GET /catalog/articles
async fn list_articles(
    State(state): State<SharedState>,
    Query(params): Query<ArticleQueryParams>,
) -> Response {
    Json(state.catalog.articles(params.difficulty)).into_response()
}

/// Endpoint: GET /catalog/articles/:slug
async fn article_detail(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let article = state
        .catalog
        .find_article(&slug)
        .ok_or(ApiError::ArticleNotFound(slug))?;
    Ok(Json(article).into_response())
}

/// Endpoint: GET /compare?products=1,2,3
async fn compare_tools(
    State(state): State<SharedState>,
    Query(params): Query<CompareParams>,
) -> Response {
    Json(state.catalog.compare(params.products.as_deref())).into_response()
}
