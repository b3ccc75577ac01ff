//! Checkout Module
//!
//! Walks a session from its cart through the rental agreement and payment
//! to a confirmed rental:
//! - State machine and add-on pricing
//! - Payment gateway seam
//! - REST API handlers

pub mod handlers;
pub mod models;
pub mod payment;

pub use handlers::routes;
pub use models::{CheckoutError, CheckoutPhase, CheckoutSession};
pub use payment::{FixedPaymentGateway, PaymentGateway, PaymentOutcome, SimulatedPaymentGateway};
