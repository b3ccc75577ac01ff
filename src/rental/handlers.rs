//! REST API handlers for rental history

use super::{
    helpers::today,
    models::{RentalDetailParams, RentalView},
};
use crate::{error::ApiError, session::Session, state::SharedState};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

/// Creates routes for the rental ledger
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/rentals", get(list_rentals))
        .route("/rentals/:id", get(rental_detail))
}

/// Endpoint: GET /rentals
/// Rentals of the session, newest first.
async fn list_rentals(State(state): State<SharedState>, session: Session) -> impl IntoResponse {
    let rentals = state.read_store(session.id(), |store| store.rentals().to_vec());
    (session, Json(rentals))
}

/// Endpoint: GET /rentals/:id?payment_status=success|failure
async fn rental_detail(
    State(state): State<SharedState>,
    session: Session,
    Path(id): Path<String>,
    Query(params): Query<RentalDetailParams>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .read_store(session.id(), |store| store.rental_by_id(&id).cloned())
        .ok_or(ApiError::RentalNotFound(id))?;

    let view = RentalView::new(entry, params.payment_status, today());
    Ok((session, Json(view)))
}
