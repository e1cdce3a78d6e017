use super::AppState;
use super::dto::*;
use super::extract::ApiJson;
use crate::domain::booking::{BookingForm, BookingId};
use crate::domain::lead::MediaKitDownload;
use crate::domain::plan::Plan;
use crate::domain::ports::UploadedAsset;
use crate::interfaces::receipt;
use crate::error::{BookingError, Result};
use axum::Json;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use std::str::FromStr;

const FILE_FIELDS: [&str; 2] = ["video_file", "file"];

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn list_plans() -> Json<Vec<PlanView>> {
    Json(Plan::all().iter().map(PlanView::from).collect())
}

/// Accepts either a JSON body or a `multipart/form-data` form with an
/// optional video part.
pub async fn create_booking(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<CreateBookingResponse>)> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let (form, asset) = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| BookingError::ValidationError(e.body_text()))?;
        read_booking_multipart(multipart).await?
    } else {
        let ApiJson(body) = ApiJson::<CreateBookingRequest>::from_request(request, &state).await?;
        (BookingForm::try_from(body)?, None)
    };

    let created = state.session.create(form, asset).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn read_booking_multipart(
    mut multipart: Multipart,
) -> Result<(BookingForm, Option<UploadedAsset>)> {
    let mut request = CreateBookingRequest::default();
    let mut asset = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BookingError::ValidationError(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if FILE_FIELDS.contains(&name.as_str()) {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| BookingError::ValidationError(e.body_text()))?;
            // Browsers send an empty part when no file was picked.
            if !bytes.is_empty() {
                asset = Some(UploadedAsset {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| BookingError::ValidationError(e.body_text()))?;
        match name.as_str() {
            "name" => request.name = value,
            "email" => request.email = value,
            "contact" => request.contact = value,
            "plan" => request.plan = value,
            "amount" if !value.trim().is_empty() => {
                let amount = Decimal::from_str(value.trim()).map_err(|_| {
                    BookingError::ValidationError(format!("amount is not a number: {value}"))
                })?;
                request.amount = Some(amount);
            }
            _ => {}
        }
    }

    Ok((BookingForm::try_from(request)?, asset))
}

pub async fn choose_payment_path(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ChoosePaymentPathRequest>,
) -> Result<Json<ChoosePaymentPathResponse>> {
    let id = BookingId::from(body.booking_id);
    let stage = state.session.choose_payment_path(&id, body.path).await?;
    Ok(Json(ChoosePaymentPathResponse {
        booking_id: id.to_string(),
        stage,
    }))
}

pub async fn create_gateway_order(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateGatewayOrderRequest>,
) -> Result<Json<CreateGatewayOrderResponse>> {
    let id = BookingId::from(body.booking_id);
    let checkout = state.session.initiate_gateway_order(&id).await?;
    Ok(Json(checkout.into()))
}

pub async fn verify_gateway_payment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerifyGatewayPaymentRequest>,
) -> Result<Json<VerifyGatewayPaymentResponse>> {
    let id = BookingId::from(body.booking_id.as_str());
    let outcome = state
        .session
        .verify_gateway_payment(body.confirmation(), &id)
        .await?;
    Ok(Json(outcome.into()))
}

pub async fn submit_manual_payment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubmitManualPaymentRequest>,
) -> Result<Json<SubmitManualPaymentResponse>> {
    let id = BookingId::from(body.booking_id);
    let status = state
        .session
        .submit_manual_reference(&id, &body.transaction_reference)
        .await?;
    Ok(Json(SubmitManualPaymentResponse {
        success: true,
        booking_id: id.to_string(),
        status,
    }))
}

pub async fn booking_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingStatusResponse>> {
    let booking = state.session.booking_status(&BookingId::from(id)).await?;
    Ok(Json(booking.into()))
}

pub async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<BookingSummary>>> {
    let bookings = state.session.list_bookings().await?;
    Ok(Json(bookings.into_iter().map(BookingSummary::from).collect()))
}

/// Plain-text receipt served as a file download.
pub async fn booking_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let booking = state.session.booking_status(&BookingId::from(id)).await?;
    let body = receipt::render_receipt(&booking);
    let file_name = receipt::receipt_file_name(&booking);
    Ok(attachment("text/plain; charset=utf-8", &file_name, body.into_bytes()))
}

pub async fn download_media_kit(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response> {
    let bytes = state.leads.download_media_kit(&file_name).await?;
    Ok(attachment("application/pdf", &file_name, bytes))
}

fn attachment(content_type: &'static str, file_name: &str, bytes: Vec<u8>) -> Response {
    let mut response = (
        [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
        bytes,
    )
        .into_response();
    // Names reaching here are restricted to header-safe characters.
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\"")) {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

pub async fn list_leads(State(state): State<AppState>) -> Result<Json<Vec<LeadView>>> {
    let leads = state.leads.leads().await?;
    Ok(Json(leads.into_iter().map(LeadView::from).collect()))
}

pub async fn collect_user_data(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CollectUserDataRequest>,
) -> Result<Json<CollectUserDataResponse>> {
    let download_url = state.leads.capture(body.into()).await?;
    Ok(Json(CollectUserDataResponse {
        success: true,
        message: "User data collected successfully",
        download_url,
    }))
}

/// Tracking is best-effort; the download itself never waits on it.
pub async fn track_media_kit(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MediaKitDownload>,
) -> Json<AckResponse> {
    state.leads.track_download(&body).await;
    Json(AckResponse { success: true })
}
