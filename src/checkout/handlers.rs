//! REST API handlers for the checkout flow
//!
//! Each endpoint performs one transition of the session's checkout.

use super::{
    models::{AgreementInput, CheckoutView, PaymentResponse, PaymentStatus, StartCheckoutInput},
    payment::PaymentOutcome,
};
use crate::{
    error::ApiError,
    rental::{helpers::today, NewRental},
    session::Session,
    state::SharedState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, warn};

/// Creates routes for checkout operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/checkout", get(current_checkout))
        .route("/checkout/start", post(start_checkout))
        .route("/checkout/agreement", post(answer_agreement))
        .route("/checkout/payment", post(submit_payment))
}

/// Endpoint: GET /checkout
async fn current_checkout(
    State(state): State<SharedState>,
    session: Session,
) -> impl IntoResponse {
    let view = state.checkout_view(session.id());
    (session, Json(view))
}

/// Endpoint: POST /checkout/start
/// Snapshots the cart with the chosen add-ons and asks for the agreement.
async fn start_checkout(
    State(state): State<SharedState>,
    session: Session,
    Json(payload): Json<StartCheckoutInput>,
) -> Result<impl IntoResponse, ApiError> {
    // Cart guard is released before the checkout guard is taken.
    let items = state.read_store(session.id(), |store| store.items().to_vec());

    let view = {
        let mut checkout = state.checkout(session.id());
        checkout.begin(items, payload.addons)?;
        checkout.view()
    };
    info!(session_id = session.id(), amount = view.amount, "checkout started");

    Ok((session, Json(view)))
}

/// Endpoint: POST /checkout/agreement
async fn answer_agreement(
    State(state): State<SharedState>,
    session: Session,
    Json(payload): Json<AgreementInput>,
) -> Result<impl IntoResponse, ApiError> {
    let view: CheckoutView = {
        let mut checkout = state.checkout(session.id());
        checkout.accept_agreement(payload.accepted)?;
        checkout.view()
    };
    Ok((session, Json(view)))
}

/// Endpoint: POST /checkout/payment
/// Charges the checkout amount; on success records the rental and takes the
/// purchased lines out of the cart.
async fn submit_payment(
    State(state): State<SharedState>,
    session: Session,
) -> Result<impl IntoResponse, ApiError> {
    let amount = state.checkout(session.id()).start_payment()?;

    // The attempt settles on its own task, even when this request is dropped.
    let settlement = tokio::spawn(settle_payment(
        state.clone(),
        session.id().to_string(),
        amount,
    ));
    let response = match settlement.await {
        Ok(result) => result?,
        Err(e) => {
            error!(session_id = session.id(), error = %e, "payment task failed");
            state.checkout(session.id()).abort_payment()?;
            return Err(ApiError::PaymentInterrupted);
        }
    };

    Ok((session, Json(response)))
}

async fn settle_payment(
    state: SharedState,
    session_id: String,
    amount: u64,
) -> Result<PaymentResponse, ApiError> {
    let outcome = state.payments.charge(amount).await;

    let mut checkout = state.checkout(&session_id);
    checkout.finish_payment(outcome)?;

    let payment_status = match outcome {
        PaymentOutcome::Approved => {
            let rental = NewRental::from_checkout(checkout.items(), checkout.amount(), today());
            let rental_id = {
                let mut store = state.store(&session_id);
                let id = store.add_rental_to_history(rental);
                store.remove_purchased(checkout.items());
                id
            };
            info!(%session_id, %rental_id, amount, "payment succeeded");
            checkout.confirm(rental_id)?;
            PaymentStatus::Success
        }
        PaymentOutcome::Declined => {
            warn!(
                %session_id,
                attempt = checkout.attempts(),
                amount,
                "payment declined"
            );
            PaymentStatus::Failure
        }
    };

    Ok(PaymentResponse {
        payment_status,
        checkout: checkout.view(),
    })
}
