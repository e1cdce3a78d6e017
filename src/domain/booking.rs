use super::plan::{Amount, Plan};
use super::session::SessionStage;
use crate::error::BookingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque booking identifier, formatted `BK-` + 8 upper-case hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("BK-{}", hex[..8].to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BookingId {
    fn from(value: String) -> Self {
        Self(value.trim().to_string())
    }
}

impl From<&str> for BookingId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payment disposition of a booking.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    /// Money provably received through a verified gateway payment.
    Confirmed,
    /// The customer claims a manual transfer; awaits human reconciliation.
    PendingManualReview,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::PendingManualReview => "pending_manual_review",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw booking form contents as submitted by the customer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub plan: String,
    pub amount: Option<Amount>,
}

/// A booking form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_contact: String,
    pub plan: &'static Plan,
    pub amount: Amount,
}

fn required(field: &str, value: &str) -> Result<String, BookingError> {
    let value = value.trim();
    if value.is_empty() {
        Err(BookingError::ValidationError(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}

fn validate_email(email: &str) -> Result<(), BookingError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(BookingError::ValidationError(format!(
            "email is not a valid address: {email}"
        ))),
    }
}

impl BookingForm {
    pub fn validate(&self) -> Result<NewBooking, BookingError> {
        let customer_name = required("name", &self.name)?;
        let customer_email = required("email", &self.email)?;
        validate_email(&customer_email)?;
        let customer_contact = required("contact", &self.contact)?;
        let plan_name = required("plan", &self.plan)?;

        let plan = Plan::find(&plan_name)
            .ok_or_else(|| BookingError::ValidationError(format!("unknown plan: {plan_name}")))?;
        let amount = self
            .amount
            .ok_or_else(|| BookingError::ValidationError("amount is required".to_string()))?;
        if amount != plan.price() {
            return Err(BookingError::ValidationError(format!(
                "amount {amount} does not match the price of '{}' ({})",
                plan.name, plan.price
            )));
        }

        Ok(NewBooking {
            customer_name,
            customer_email,
            customer_contact,
            plan,
            amount,
        })
    }
}

/// The verified gateway payment that confirmed a booking.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct GatewayPayment {
    pub order_id: String,
    pub payment_id: String,
    pub verified_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Booking {
    pub id: BookingId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_contact: String,
    pub plan_name: String,
    pub amount: Amount,
    pub uploaded_asset_reference: Option<String>,
    pub status: BookingStatus,
    pub stage: SessionStage,
    pub gateway_payment: Option<GatewayPayment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(booking: NewBooking, uploaded_asset_reference: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::generate(),
            customer_name: booking.customer_name,
            customer_email: booking.customer_email,
            customer_contact: booking.customer_contact,
            plan_name: booking.plan.name.to_string(),
            amount: booking.amount,
            uploaded_asset_reference,
            status: BookingStatus::Pending,
            stage: SessionStage::Created,
            gateway_payment: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
