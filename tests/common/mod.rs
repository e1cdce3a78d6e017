#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use story_booking::application::booking_session::{
    BookingSession, DEFAULT_CURRENCY, SessionCollaborators,
};
use story_booking::application::leads::LeadCapture;
use story_booking::domain::booking::{Booking, BookingForm, BookingId};
use story_booking::domain::payment::{GatewayConfirmation, OrderRequest, PaymentOrder};
use story_booking::domain::plan::Amount;
use story_booking::domain::ports::{BookingNotifier, BookingStore, PaymentGateway, PaymentGatewayBox};
use story_booking::error::{BookingError, Result};
use story_booking::infrastructure::in_memory::{
    InMemoryAssetStore, InMemoryBookingStore, InMemoryLeadStore, InMemoryManualClaimStore,
    InMemoryPaymentOrderStore,
};
use story_booking::infrastructure::media_kit::MediaKitLibrary;
use story_booking::infrastructure::sandbox_gateway::SandboxGateway;
use story_booking::interfaces::http::{AppState, router};

pub const SECRET: &str = "integration_secret";

pub fn asha() -> BookingForm {
    BookingForm {
        name: "Asha".to_string(),
        email: "a@x.com".to_string(),
        contact: "999".to_string(),
        plan: "One Day Story".to_string(),
        amount: Some(Amount::new(999).unwrap()),
    }
}

pub fn sandbox() -> SandboxGateway {
    SandboxGateway::new(SECRET)
}

/// Signs a confirmation the way the hosted checkout would.
pub fn confirmation(order_id: &str, payment_id: &str) -> GatewayConfirmation {
    GatewayConfirmation {
        order_id: order_id.to_string(),
        payment_id: payment_id.to_string(),
        signature: sandbox().sign_payment(order_id, payment_id).unwrap(),
    }
}

/// A session over in-memory stores; `bookings` shares data with the session's store.
pub struct Harness {
    pub session: BookingSession,
    pub bookings: InMemoryBookingStore,
    pub notices: Arc<AtomicUsize>,
}

pub fn harness() -> Harness {
    harness_with_gateway(Box::new(sandbox()))
}

pub fn harness_with_gateway(gateway: PaymentGatewayBox) -> Harness {
    let bookings = InMemoryBookingStore::new();
    build(gateway, Box::new(bookings.clone()), bookings)
}

/// A session whose booking store rejects every write.
pub fn failing_store_session() -> BookingSession {
    build(
        Box::new(sandbox()),
        Box::new(FailingBookingStore),
        InMemoryBookingStore::new(),
    )
    .session
}

fn build(
    gateway: PaymentGatewayBox,
    store: Box<dyn BookingStore>,
    bookings: InMemoryBookingStore,
) -> Harness {
    let notices = Arc::new(AtomicUsize::new(0));
    let session = BookingSession::new(
        SessionCollaborators {
            bookings: store,
            orders: Box::new(InMemoryPaymentOrderStore::new()),
            claims: Box::new(InMemoryManualClaimStore::new()),
            assets: Box::new(InMemoryAssetStore::new()),
            gateway,
            notifier: Box::new(FlakyNotifier {
                count: notices.clone(),
            }),
        },
        DEFAULT_CURRENCY,
    );

    Harness {
        session,
        bookings,
        notices,
    }
}

pub fn app() -> Router {
    let session = harness().session;
    router(AppState::new(session, lead_capture()))
}

/// Router whose media-kit downloads are served from `dir`.
pub fn app_with_media_kit(dir: &Path) -> Router {
    let session = harness().session;
    let leads = lead_capture().with_media_kit(MediaKitLibrary::new(dir));
    router(AppState::new(session, leads))
}

fn lead_capture() -> LeadCapture {
    LeadCapture::new(Box::new(InMemoryLeadStore::new()), None, "/downloads/guide.pdf")
}

/// Counts confirmation notices and then fails to deliver them.
pub struct FlakyNotifier {
    pub count: Arc<AtomicUsize>,
}

#[async_trait]
impl BookingNotifier for FlakyNotifier {
    async fn booking_confirmed(&self, _booking: &Booking) -> Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Err(BookingError::GatewayUnavailable("mail relay offline".to_string()))
    }
}

/// A gateway that is always unreachable.
pub struct DownGateway;

#[async_trait]
impl PaymentGateway for DownGateway {
    fn key_id(&self) -> &str {
        "down"
    }

    async fn create_order(&self, _request: OrderRequest) -> Result<PaymentOrder> {
        Err(BookingError::GatewayUnavailable(
            "connection refused".to_string(),
        ))
    }

    fn verify(&self, _confirmation: &GatewayConfirmation) -> Result<()> {
        Err(BookingError::PaymentVerificationFailed(
            "gateway offline".to_string(),
        ))
    }
}

/// A booking store whose writes always fail.
pub struct FailingBookingStore;

#[async_trait]
impl BookingStore for FailingBookingStore {
    async fn create(&self, _booking: Booking) -> Result<()> {
        Err(BookingError::persistence("database unavailable"))
    }

    async fn update(&self, _booking: Booking) -> Result<()> {
        Err(BookingError::persistence("database unavailable"))
    }

    async fn get(&self, _id: &BookingId) -> Result<Option<Booking>> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<Booking>> {
        Ok(Vec::new())
    }
}
