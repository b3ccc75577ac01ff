//! Payment Gateways
//!
//! No real payment provider is integrated. The service charges through a
//! simulated gateway; tests use a fixed one.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Approved,
    Declined,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges `amount` and reports whether the payment went through.
    async fn charge(&self, amount: u64) -> PaymentOutcome;
}

/// Approves a random share of payments after an artificial delay.
#[derive(Debug, Clone)]
pub struct SimulatedPaymentGateway {
    delay: Duration,
    success_rate: f64,
}

impl SimulatedPaymentGateway {
    /// `success_rate` is clamped to `0.0..=1.0`.
    pub fn new(delay: Duration, success_rate: f64) -> Self {
        let success_rate = if success_rate.is_nan() {
            0.0
        } else {
            success_rate.clamp(0.0, 1.0)
        };
        Self {
            delay,
            success_rate,
        }
    }
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(2500), 0.8)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn charge(&self, amount: u64) -> PaymentOutcome {
        tokio::time::sleep(self.delay).await;

        let approved = rand::thread_rng().gen_bool(self.success_rate);
        debug!(amount, approved, "simulated payment finished");

        if approved {
            PaymentOutcome::Approved
        } else {
            PaymentOutcome::Declined
        }
    }
}

/// Always answers with the same outcome.
#[derive(Debug, Clone, Copy)]
pub struct FixedPaymentGateway(pub PaymentOutcome);

#[async_trait]
impl PaymentGateway for FixedPaymentGateway {
    async fn charge(&self, _amount: u64) -> PaymentOutcome {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn extreme_rates_are_deterministic() {
        let always = SimulatedPaymentGateway::new(Duration::ZERO, 1.0);
        let never = SimulatedPaymentGateway::new(Duration::ZERO, 0.0);

        for _ in 0..20 {
            assert_eq!(always.charge(100).await, PaymentOutcome::Approved);
            assert_eq!(never.charge(100).await, PaymentOutcome::Declined);
        }
    }

    #[tokio::test]
    async fn out_of_range_rates_are_clamped() {
        let gateway = SimulatedPaymentGateway::new(Duration::ZERO, 7.5);
        assert_eq!(gateway.charge(1).await, PaymentOutcome::Approved);

        let gateway = SimulatedPaymentGateway::new(Duration::ZERO, f64::NAN);
        assert_eq!(gateway.charge(1).await, PaymentOutcome::Declined);
    }

    #[tokio::test]
    async fn fixed_gateway_returns_its_outcome() {
        let gateway = FixedPaymentGateway(PaymentOutcome::Declined);
        assert_eq!(gateway.charge(3500).await, PaymentOutcome::Declined);
    }
}
