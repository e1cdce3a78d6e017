use crate::domain::payment::{GatewayConfirmation, OrderRequest, PaymentOrder};
use crate::domain::ports::PaymentGateway;
use crate::domain::signature;
use crate::error::{BookingError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: u8,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: u64,
    currency: String,
}

/// Razorpay Orders API client.
pub struct RazorpayGateway {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BookingError::GatewayUnavailable(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(&self, request: OrderRequest) -> Result<PaymentOrder> {
        let url = format!("{}/v1/orders", self.base_url);
        let body = CreateOrderBody {
            amount: request.amount.to_minor_units(),
            currency: &request.currency,
            receipt: request.booking_id.as_str(),
            payment_capture: 1,
        };

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| BookingError::GatewayUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, booking_id = %request.booking_id, "razorpay rejected order");
            return Err(BookingError::GatewayUnavailable(format!(
                "order creation returned {status}: {detail}"
            )));
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| BookingError::GatewayUnavailable(format!("malformed order: {e}")))?;

        tracing::info!(order_id = %order.id, booking_id = %request.booking_id, "razorpay order created");

        Ok(PaymentOrder {
            order_id: order.id,
            booking_id: request.booking_id,
            amount: request.amount,
            amount_minor: order.amount,
            currency: order.currency,
            created_at: Utc::now(),
        })
    }

    fn verify(&self, confirmation: &GatewayConfirmation) -> Result<()> {
        signature::verify(
            &self.key_secret,
            &confirmation.order_id,
            &confirmation.payment_id,
            &confirmation.signature,
        )
    }
}
