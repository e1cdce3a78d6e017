//! HTTP surface of the booking relay.

pub mod dto;
pub mod extract;
pub mod handlers;

use crate::application::booking_session::BookingSession;
use crate::application::leads::LeadCapture;
use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::error::BookingError;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dto::ErrorResponse;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<BookingSession>,
    pub leads: Arc<LeadCapture>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(session: BookingSession, leads: LeadCapture) -> Self {
        Self {
            session: Arc::new(session),
            leads: Arc::new(leads),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/plans", get(handlers::list_plans))
        .route("/api/create-booking", post(handlers::create_booking))
        .route("/api/choose-payment-path", post(handlers::choose_payment_path))
        .route("/api/create-gateway-order", post(handlers::create_gateway_order))
        .route("/api/verify-gateway-payment", post(handlers::verify_gateway_payment))
        .route("/api/submit-manual-payment", post(handlers::submit_manual_payment))
        .route("/api/booking-status/:id", get(handlers::booking_status))
        .route("/api/booking-receipt/:id", get(handlers::booking_receipt))
        .route("/api/bookings", get(handlers::list_bookings))
        .route("/api/leads", get(handlers::list_leads))
        .route("/api/collect-user-data", post(handlers::collect_user_data))
        .route("/api/mediakit-track", post(handlers::track_media_kit))
        .route("/api/mediakit-download/:filename", get(handlers::download_media_kit))
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl BookingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::PaymentVerificationFailed(_) => StatusCode::UNAUTHORIZED,
            Self::PersistenceError(_)
            | Self::GatewayUnavailable(_)
            | Self::ConfigError(_)
            | Self::CsvError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
