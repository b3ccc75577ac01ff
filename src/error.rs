//! [`ApiError`] definitions.

use crate::{checkout::models::CheckoutError, suggest::models::SuggestError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Error returned by any HTTP handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("article not found: {0}")]
    ArticleNotFound(String),

    #[error("rental not found: {0}")]
    RentalNotFound(String),

    #[error("{tool_id} is out of stock")]
    OutOfStock { tool_id: String },

    #[error("only {available} unit(s) of {tool_id} available, {requested} requested")]
    InsufficientStock {
        tool_id: String,
        requested: u64,
        available: u32,
    },

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("invalid session id")]
    InvalidSession,

    #[error("payment attempt was interrupted, please retry")]
    PaymentInterrupted,

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Suggest(#[from] SuggestError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ToolNotFound(_) | Self::ArticleNotFound(_) | Self::RentalNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::OutOfStock { .. } | Self::InsufficientStock { .. } => StatusCode::CONFLICT,
            Self::InvalidQuantity | Self::InvalidSession => StatusCode::BAD_REQUEST,
            Self::PaymentInterrupted => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Checkout(e) => match e {
                CheckoutError::AgreementDeclined => StatusCode::BAD_REQUEST,
                CheckoutError::EmptyCart | CheckoutError::InvalidTransition { .. } => {
                    StatusCode::CONFLICT
                }
            },
            Self::Suggest(e) => match e {
                SuggestError::EmptyInput | SuggestError::UnreadableFile => StatusCode::BAD_REQUEST,
                SuggestError::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                SuggestError::Service(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
