//! Typed request and response bodies, one pair per endpoint.

use crate::application::booking_session::{CheckoutOrder, CreatedBooking, VerificationOutcome};
use crate::domain::booking::{Booking, BookingForm, BookingStatus};
use crate::domain::lead::{Lead, LeadForm};
use crate::domain::payment::GatewayConfirmation;
use crate::domain::plan::{Amount, Plan};
use crate::domain::session::{PaymentPath, SessionStage};
use crate::error::BookingError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PlanView {
    pub name: &'static str,
    pub price: u64,
}

impl From<&Plan> for PlanView {
    fn from(plan: &Plan) -> Self {
        Self {
            name: plan.name,
            price: plan.price,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl TryFrom<CreateBookingRequest> for BookingForm {
    type Error = BookingError;

    fn try_from(request: CreateBookingRequest) -> Result<Self, Self::Error> {
        let amount = request.amount.map(Amount::try_from).transpose()?;
        Ok(BookingForm {
            name: request.name,
            email: request.email,
            contact: request.contact,
            plan: request.plan,
            amount,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    pub booking_id: String,
    pub amount: u64,
    pub status: BookingStatus,
}

impl From<CreatedBooking> for CreateBookingResponse {
    fn from(created: CreatedBooking) -> Self {
        Self {
            booking_id: created.booking_id.to_string(),
            amount: created.amount,
            status: created.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChoosePaymentPathRequest {
    pub booking_id: String,
    pub path: PaymentPath,
}

#[derive(Debug, Serialize)]
pub struct ChoosePaymentPathResponse {
    pub booking_id: String,
    pub stage: SessionStage,
}

#[derive(Debug, Deserialize)]
pub struct CreateGatewayOrderRequest {
    pub booking_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateGatewayOrderResponse {
    pub order_id: String,
    pub booking_id: String,
    pub amount: u64,
    pub amount_minor: u64,
    pub currency: String,
    pub key_id: String,
}

impl From<CheckoutOrder> for CreateGatewayOrderResponse {
    fn from(checkout: CheckoutOrder) -> Self {
        let order = checkout.order;
        Self {
            order_id: order.order_id,
            booking_id: order.booking_id.to_string(),
            amount: order.amount.value(),
            amount_minor: order.amount_minor,
            currency: order.currency,
            key_id: checkout.key_id,
        }
    }
}

/// Accepts both plain names and the `razorpay_*` names the checkout widget emits.
#[derive(Debug, Deserialize)]
pub struct VerifyGatewayPaymentRequest {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
    pub booking_id: String,
}

impl VerifyGatewayPaymentRequest {
    pub fn confirmation(&self) -> GatewayConfirmation {
        GatewayConfirmation {
            order_id: self.order_id.clone(),
            payment_id: self.payment_id.clone(),
            signature: self.signature.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyGatewayPaymentResponse {
    pub success: bool,
    pub booking_id: String,
    pub status: BookingStatus,
    pub already_confirmed: bool,
}

impl From<VerificationOutcome> for VerifyGatewayPaymentResponse {
    fn from(outcome: VerificationOutcome) -> Self {
        Self {
            success: true,
            booking_id: outcome.booking_id.to_string(),
            status: outcome.status,
            already_confirmed: outcome.already_confirmed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitManualPaymentRequest {
    pub booking_id: String,
    #[serde(alias = "transaction_id", default)]
    pub transaction_reference: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitManualPaymentResponse {
    pub success: bool,
    pub booking_id: String,
    pub status: BookingStatus,
}

#[derive(Debug, Serialize)]
pub struct BookingStatusResponse {
    pub booking_id: String,
    pub status: BookingStatus,
    pub stage: SessionStage,
    pub plan: String,
    pub amount: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingStatusResponse {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.id.to_string(),
            status: booking.status,
            stage: booking.stage,
            plan: booking.plan_name,
            amount: booking.amount.value(),
            created_at: booking.created_at,
        }
    }
}

/// Admin listing entry.
#[derive(Debug, Serialize)]
pub struct BookingSummary {
    pub booking_id: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub plan: String,
    pub amount: u64,
    pub status: BookingStatus,
    pub stage: SessionStage,
    pub uploaded_asset_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingSummary {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.id.to_string(),
            name: booking.customer_name,
            email: booking.customer_email,
            contact: booking.customer_contact,
            plan: booking.plan_name,
            amount: booking.amount.value(),
            status: booking.status,
            stage: booking.stage,
            uploaded_asset_reference: booking.uploaded_asset_reference,
            created_at: booking.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CollectUserDataRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl From<CollectUserDataRequest> for LeadForm {
    fn from(request: CollectUserDataRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            phone: request.phone,
            source: request.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollectUserDataResponse {
    pub success: bool,
    pub message: &'static str,
    pub download_url: String,
}

/// Admin listing entry for a captured lead.
#[derive(Debug, Serialize)]
pub struct LeadView {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: String,
    pub captured_at: DateTime<Utc>,
}

impl From<Lead> for LeadView {
    fn from(lead: Lead) -> Self {
        Self {
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            source: lead.source,
            captured_at: lead.captured_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
