use crate::domain::booking::{Booking, BookingForm, BookingId, BookingStatus, GatewayPayment};
use crate::domain::payment::{GatewayConfirmation, ManualPaymentClaim, OrderRequest, PaymentOrder};
use crate::domain::ports::{
    AssetStoreBox, BookingNotifierBox, BookingStoreBox, ManualClaimStoreBox, PaymentGatewayBox,
    PaymentOrderStoreBox, UploadedAsset,
};
use crate::domain::session::{PaymentPath, SessionEvent, SessionStage};
use crate::error::{BookingError, Result};
use chrono::Utc;
use tokio::sync::Mutex;

pub const DEFAULT_CURRENCY: &str = "INR";

/// Everything the booking session talks to.
pub struct SessionCollaborators {
    pub bookings: BookingStoreBox,
    pub orders: PaymentOrderStoreBox,
    pub claims: ManualClaimStoreBox,
    pub assets: AssetStoreBox,
    pub gateway: PaymentGatewayBox,
    pub notifier: BookingNotifierBox,
}

/// Result of a successful `create`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedBooking {
    pub booking_id: BookingId,
    pub amount: u64,
    pub status: BookingStatus,
}

/// A gateway order together with the key the checkout widget needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOrder {
    pub order: PaymentOrder,
    pub key_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationOutcome {
    pub booking_id: BookingId,
    pub status: BookingStatus,
    /// The booking was already confirmed by an earlier, identical verification.
    pub already_confirmed: bool,
}

/// Orchestrates a booking from form submission to a payment disposition.
///
/// All state lives in the injected stores. Mutating operations run under a
/// single guard so retried or duplicated requests observe each other's effects.
pub struct BookingSession {
    bookings: BookingStoreBox,
    orders: PaymentOrderStoreBox,
    claims: ManualClaimStoreBox,
    assets: AssetStoreBox,
    gateway: PaymentGatewayBox,
    notifier: BookingNotifierBox,
    currency: String,
    guard: Mutex<()>,
}

impl BookingSession {
    pub fn new(collaborators: SessionCollaborators, currency: impl Into<String>) -> Self {
        Self {
            bookings: collaborators.bookings,
            orders: collaborators.orders,
            claims: collaborators.claims,
            assets: collaborators.assets,
            gateway: collaborators.gateway,
            notifier: collaborators.notifier,
            currency: currency.into(),
            guard: Mutex::new(()),
        }
    }

    async fn load(&self, id: &BookingId) -> Result<Booking> {
        self.bookings
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("booking {id}")))
    }

    async fn save_stage(&self, booking: &mut Booking, stage: SessionStage) -> Result<()> {
        booking.stage = stage;
        booking.touch();
        self.bookings.update(booking.clone()).await
    }

    /// Validates the form, stores the optional asset and persists a pending booking.
    ///
    /// Duplicate submissions create distinct bookings.
    pub async fn create(
        &self,
        form: BookingForm,
        asset: Option<UploadedAsset>,
    ) -> Result<CreatedBooking> {
        let new_booking = form.validate()?;

        let asset_reference = match asset {
            Some(asset) => Some(self.assets.save(asset).await?),
            None => None,
        };

        let booking = Booking::new(new_booking, asset_reference.clone());
        let created = CreatedBooking {
            booking_id: booking.id.clone(),
            amount: booking.amount.value(),
            status: booking.status,
        };

        if let Err(err) = self.bookings.create(booking).await {
            if let Some(reference) = &asset_reference
                && let Err(cleanup) = self.assets.remove(reference).await
            {
                tracing::warn!(asset = %reference, error = %cleanup, "orphaned asset left behind");
            }
            return Err(err);
        }
        tracing::info!(booking_id = %created.booking_id, amount = created.amount, "booking created");
        Ok(created)
    }

    /// Routes a pending booking to the online or manual payment path.
    pub async fn choose_payment_path(
        &self,
        id: &BookingId,
        path: PaymentPath,
    ) -> Result<SessionStage> {
        let _guard = self.guard.lock().await;
        let mut booking = self.load(id).await?;

        let event = SessionEvent::PathChosen(path);
        if booking.status != BookingStatus::Pending {
            return Err(BookingError::InvalidTransition {
                stage: booking.stage,
                event,
            });
        }

        let next = booking.stage.next(event)?;
        self.save_stage(&mut booking, next).await?;
        tracing::info!(booking_id = %id, stage = %next, "payment path chosen");
        Ok(next)
    }

    /// Creates a gateway order for a booking on the online path.
    ///
    /// A gateway failure sends the booking back to the payment choice.
    pub async fn initiate_gateway_order(&self, id: &BookingId) -> Result<CheckoutOrder> {
        let _guard = self.guard.lock().await;
        let mut booking = self.load(id).await?;
        booking.stage.next(SessionEvent::OrderRequested)?;

        let request = OrderRequest {
            booking_id: booking.id.clone(),
            amount: booking.amount,
            currency: self.currency.clone(),
        };

        let order = match self.gateway.create_order(request).await {
            Ok(order) => order,
            Err(err) => {
                tracing::warn!(booking_id = %id, error = %err, "gateway order failed");
                let fallback = booking.stage.next(SessionEvent::OrderFailed)?;
                self.save_stage(&mut booking, fallback).await?;
                return Err(err);
            }
        };

        self.orders.create(order.clone()).await?;
        tracing::info!(booking_id = %id, order_id = %order.order_id, "gateway order created");
        Ok(CheckoutOrder {
            order,
            key_id: self.gateway.key_id().to_string(),
        })
    }

    /// Confirms a booking from a signed gateway confirmation.
    ///
    /// The signature and the order's ownership are checked before anything
    /// else, so a forged payload is rejected even for confirmed bookings.
    pub async fn verify_gateway_payment(
        &self,
        confirmation: GatewayConfirmation,
        id: &BookingId,
    ) -> Result<VerificationOutcome> {
        let _guard = self.guard.lock().await;
        let mut booking = self.load(id).await?;

        if let Err(err) = self.authenticate(&confirmation, id).await {
            tracing::warn!(booking_id = %id, order_id = %confirmation.order_id, error = %err, "payment verification failed");
            if booking.status == BookingStatus::Pending
                && let Ok(fallback) = booking.stage.next(SessionEvent::VerificationFailed)
            {
                self.save_stage(&mut booking, fallback).await?;
            }
            return Err(err);
        }

        if booking.status == BookingStatus::Confirmed {
            if let Some(payment) = &booking.gateway_payment
                && payment.payment_id != confirmation.payment_id
            {
                tracing::warn!(
                    booking_id = %id,
                    payment_id = %confirmation.payment_id,
                    confirmed_payment_id = %payment.payment_id,
                    "additional verified payment for an already confirmed booking"
                );
            }
            return Ok(VerificationOutcome {
                booking_id: booking.id,
                status: booking.status,
                already_confirmed: true,
            });
        }

        // A verified payment supersedes a manual claim still awaiting review.
        let next = match (booking.stage, booking.status) {
            (SessionStage::Completed, BookingStatus::PendingManualReview) => {
                tracing::info!(booking_id = %id, "verified payment supersedes manual claim");
                SessionStage::Completed
            }
            (stage, _) => stage.next(SessionEvent::PaymentVerified)?,
        };
        booking.status = BookingStatus::Confirmed;
        booking.gateway_payment = Some(GatewayPayment {
            order_id: confirmation.order_id,
            payment_id: confirmation.payment_id,
            verified_at: Utc::now(),
        });
        self.save_stage(&mut booking, next).await?;
        tracing::info!(booking_id = %id, "booking confirmed");

        if let Err(err) = self.notifier.booking_confirmed(&booking).await {
            tracing::warn!(booking_id = %id, error = %err, "confirmation notice failed");
        }

        Ok(VerificationOutcome {
            booking_id: booking.id,
            status: booking.status,
            already_confirmed: false,
        })
    }

    async fn authenticate(&self, confirmation: &GatewayConfirmation, id: &BookingId) -> Result<()> {
        self.gateway.verify(confirmation)?;

        let order = self.orders.get(&confirmation.order_id).await?.ok_or_else(|| {
            BookingError::PaymentVerificationFailed(format!(
                "unknown order {}",
                confirmation.order_id
            ))
        })?;
        if &order.booking_id != id {
            return Err(BookingError::PaymentVerificationFailed(format!(
                "order {} does not belong to booking {id}",
                order.order_id
            )));
        }
        Ok(())
    }

    /// Records a manual transfer reference for human reconciliation.
    ///
    /// The booking moves to `pending_manual_review`, never to `confirmed`.
    pub async fn submit_manual_reference(
        &self,
        id: &BookingId,
        transaction_reference: &str,
    ) -> Result<BookingStatus> {
        let reference = transaction_reference.trim();
        if reference.is_empty() {
            return Err(BookingError::ValidationError(
                "transaction reference is required".to_string(),
            ));
        }

        let _guard = self.guard.lock().await;
        let mut booking = self.load(id).await?;

        if booking.status == BookingStatus::PendingManualReview
            && let Some(claim) = self.claims.get(id).await?
            && claim.transaction_reference == reference
        {
            return Ok(booking.status);
        }

        let next = booking.stage.next(SessionEvent::ManualReferenceSubmitted)?;
        self.claims
            .create(ManualPaymentClaim::new(booking.id.clone(), reference))
            .await?;
        booking.status = BookingStatus::PendingManualReview;
        self.save_stage(&mut booking, next).await?;

        tracing::info!(booking_id = %id, "manual payment reference submitted");
        Ok(booking.status)
    }

    /// Read-only view of a booking.
    pub async fn booking_status(&self, id: &BookingId) -> Result<Booking> {
        self.load(id).await
    }

    /// All bookings, newest first.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.bookings.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::Amount;
    use crate::infrastructure::in_memory::{
        InMemoryAssetStore, InMemoryBookingStore, InMemoryManualClaimStore,
        InMemoryPaymentOrderStore,
    };
    use crate::infrastructure::asset_store::LocalAssetStore;
    use crate::infrastructure::notifier::LogNotifier;
    use crate::infrastructure::sandbox_gateway::SandboxGateway;

    const SECRET: &str = "unit_test_secret";

    fn session() -> (BookingSession, InMemoryBookingStore) {
        let bookings = InMemoryBookingStore::new();
        let session = BookingSession::new(
            SessionCollaborators {
                bookings: Box::new(bookings.clone()),
                orders: Box::new(InMemoryPaymentOrderStore::new()),
                claims: Box::new(InMemoryManualClaimStore::new()),
                assets: Box::new(InMemoryAssetStore::new()),
                gateway: Box::new(SandboxGateway::new(SECRET)),
                notifier: Box::new(LogNotifier),
            },
            DEFAULT_CURRENCY,
        );
        (session, bookings)
    }

    fn asha() -> BookingForm {
        BookingForm {
            name: "Asha".to_string(),
            email: "a@x.com".to_string(),
            contact: "999".to_string(),
            plan: "One Day Story".to_string(),
            amount: Some(Amount::new(999).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_online_scenario() {
        let (session, _) = session();
        let created = session.create(asha(), None).await.unwrap();
        assert_eq!(created.status, BookingStatus::Pending);

        let stage = session
            .choose_payment_path(&created.booking_id, PaymentPath::Online)
            .await
            .unwrap();
        assert_eq!(stage, SessionStage::PayingOnline);

        let checkout = session
            .initiate_gateway_order(&created.booking_id)
            .await
            .unwrap();
        assert_eq!(checkout.order.amount.value(), 999);
        assert_eq!(checkout.order.currency, "INR");

        let signature = SandboxGateway::new(SECRET)
            .sign_payment(&checkout.order.order_id, "pay_1")
            .unwrap();
        let outcome = session
            .verify_gateway_payment(
                GatewayConfirmation {
                    order_id: checkout.order.order_id.clone(),
                    payment_id: "pay_1".to_string(),
                    signature,
                },
                &created.booking_id,
            )
            .await
            .unwrap();
        assert_eq!(outcome.status, BookingStatus::Confirmed);
        assert!(!outcome.already_confirmed);

        let booking = session.booking_status(&created.booking_id).await.unwrap();
        assert_eq!(booking.stage, SessionStage::Completed);
        assert_eq!(
            booking.gateway_payment.unwrap().order_id,
            checkout.order.order_id
        );
    }

    #[tokio::test]
    async fn test_order_requires_online_path() {
        let (session, _) = session();
        let created = session.create(asha(), None).await.unwrap();

        assert!(matches!(
            session.initiate_gateway_order(&created.booking_id).await,
            Err(BookingError::InvalidTransition {
                stage: SessionStage::Created,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_create_stores_asset_reference() {
        let (session, bookings) = session();
        let asset = UploadedAsset {
            file_name: Some("story.mp4".to_string()),
            content_type: Some("video/mp4".to_string()),
            bytes: vec![1, 2, 3],
        };

        let created = session.create(asha(), Some(asset)).await.unwrap();
        let stored = crate::domain::ports::BookingStore::get(&bookings, &created.booking_id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.uploaded_asset_reference.is_some());
    }

    struct UnavailableBookingStore;

    #[async_trait::async_trait]
    impl crate::domain::ports::BookingStore for UnavailableBookingStore {
        async fn create(&self, _booking: Booking) -> Result<()> {
            Err(BookingError::persistence("disk full"))
        }

        async fn update(&self, _booking: Booking) -> Result<()> {
            Err(BookingError::persistence("disk full"))
        }

        async fn get(&self, _id: &BookingId) -> Result<Option<Booking>> {
            Ok(None)
        }

        async fn list(&self) -> Result<Vec<Booking>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_failed_create_removes_stored_asset() {
        let dir = tempfile::tempdir().unwrap();
        let session = BookingSession::new(
            SessionCollaborators {
                bookings: Box::new(UnavailableBookingStore),
                orders: Box::new(InMemoryPaymentOrderStore::new()),
                claims: Box::new(InMemoryManualClaimStore::new()),
                assets: Box::new(LocalAssetStore::new(dir.path())),
                gateway: Box::new(SandboxGateway::new(SECRET)),
                notifier: Box::new(LogNotifier),
            },
            DEFAULT_CURRENCY,
        );
        let asset = UploadedAsset {
            file_name: Some("story.mp4".to_string()),
            content_type: Some("video/mp4".to_string()),
            bytes: vec![1, 2, 3],
        };

        assert!(matches!(
            session.create(asha(), Some(asset)).await,
            Err(BookingError::PersistenceError(_))
        ));
        let leftover = std::fs::read_dir(dir.path().join("uploaded_videos"))
            .unwrap()
            .count();
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn test_unknown_booking() {
        let (session, _) = session();
        let missing = BookingId::from("BK-DEADBEEF");

        assert!(matches!(
            session.booking_status(&missing).await,
            Err(BookingError::NotFound(_))
        ));
        assert!(matches!(
            session
                .choose_payment_path(&missing, PaymentPath::Manual)
                .await,
            Err(BookingError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_manual_resubmission_is_idempotent() {
        let (session, _) = session();
        let created = session.create(asha(), None).await.unwrap();
        session
            .choose_payment_path(&created.booking_id, PaymentPath::Manual)
            .await
            .unwrap();

        let first = session
            .submit_manual_reference(&created.booking_id, " UTR123 ")
            .await
            .unwrap();
        let second = session
            .submit_manual_reference(&created.booking_id, "UTR123")
            .await
            .unwrap();
        assert_eq!(first, BookingStatus::PendingManualReview);
        assert_eq!(second, BookingStatus::PendingManualReview);

        assert!(matches!(
            session
                .submit_manual_reference(&created.booking_id, "UTR999")
                .await,
            Err(BookingError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_path_cannot_change_after_manual_claim() {
        let (session, _) = session();
        let created = session.create(asha(), None).await.unwrap();
        session
            .choose_payment_path(&created.booking_id, PaymentPath::Manual)
            .await
            .unwrap();
        session
            .submit_manual_reference(&created.booking_id, "UTR123")
            .await
            .unwrap();

        assert!(matches!(
            session
                .choose_payment_path(&created.booking_id, PaymentPath::Online)
                .await,
            Err(BookingError::InvalidTransition { .. })
        ));
    }
}
