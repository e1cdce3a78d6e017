use crate::error::BookingError;
use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;

/// `Json` whose rejection is reported as a `ValidationError` in the API error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(BookingError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for BookingError {
    fn from(rejection: JsonRejection) -> Self {
        BookingError::ValidationError(rejection.body_text())
    }
}
