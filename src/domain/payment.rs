use super::booking::BookingId;
use super::plan::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the session asks the gateway to create.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub booking_id: BookingId,
    pub amount: Amount,
    pub currency: String,
}

/// A gateway order scoped to one booking.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentOrder {
    pub order_id: String,
    pub booking_id: BookingId,
    pub amount: Amount,
    /// Amount in the gateway's minor currency unit.
    pub amount_minor: u64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// The signed result the checkout widget hands back to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfirmation {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ManualPaymentClaim {
    pub booking_id: BookingId,
    pub transaction_reference: String,
    pub submitted_at: DateTime<Utc>,
}

impl ManualPaymentClaim {
    pub fn new(booking_id: BookingId, transaction_reference: impl Into<String>) -> Self {
        Self {
            booking_id,
            transaction_reference: transaction_reference.into(),
            submitted_at: Utc::now(),
        }
    }
}
