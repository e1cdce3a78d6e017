use crate::domain::payment::{GatewayConfirmation, OrderRequest, PaymentOrder};
use crate::domain::ports::PaymentGateway;
use crate::domain::signature;
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

pub const SANDBOX_KEY_ID: &str = "sandbox";

/// An in-process gateway for development and tests.
///
/// Orders are issued locally and confirmations are signed with the same
/// HMAC contract as the hosted gateway, using the sandbox secret.
#[derive(Clone)]
pub struct SandboxGateway {
    secret: String,
}

impl SandboxGateway {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Produces the signature a real checkout would hand back for this payment.
    pub fn sign_payment(&self, order_id: &str, payment_id: &str) -> Result<String> {
        signature::sign(&self.secret, order_id, payment_id)
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    fn key_id(&self) -> &str {
        SANDBOX_KEY_ID
    }

    async fn create_order(&self, request: OrderRequest) -> Result<PaymentOrder> {
        let id = Uuid::new_v4().simple().to_string();
        Ok(PaymentOrder {
            order_id: format!("order_{}", &id[..14]),
            booking_id: request.booking_id,
            amount: request.amount,
            amount_minor: request.amount.to_minor_units(),
            currency: request.currency,
            created_at: Utc::now(),
        })
    }

    fn verify(&self, confirmation: &GatewayConfirmation) -> Result<()> {
        signature::verify(
            &self.secret,
            &confirmation.order_id,
            &confirmation.payment_id,
            &confirmation.signature,
        )
    }
}
