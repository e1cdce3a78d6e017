use crate::domain::booking::{Booking, BookingId};
use crate::domain::lead::Lead;
use crate::domain::payment::{ManualPaymentClaim, PaymentOrder};
use crate::domain::ports::{
    AssetStore, BookingStore, LeadStore, ManualClaimStore, PaymentOrderStore, UploadedAsset,
};
use crate::error::{BookingError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for bookings.
///
/// Uses `Arc<RwLock<HashMap<BookingId, Booking>>>` so clones share the same data.
/// Ideal for tests and single-process deployments where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryBookingStore {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingStore {
    /// Creates a new, empty in-memory booking store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create(&self, booking: Booking) -> Result<()> {
        let mut bookings = self.bookings.write().await;
        if bookings.contains_key(&booking.id) {
            return Err(BookingError::persistence(format!(
                "booking {} already exists",
                booking.id
            )));
        }
        bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn update(&self, booking: Booking) -> Result<()> {
        let mut bookings = self.bookings.write().await;
        match bookings.get_mut(&booking.id) {
            Some(existing) => {
                *existing = booking;
                Ok(())
            }
            None => Err(BookingError::NotFound(format!("booking {}", booking.id))),
        }
    }

    async fn get(&self, id: &BookingId) -> Result<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut all: Vec<Booking> = bookings.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

/// In-memory gateway orders, keyed by gateway order id.
#[derive(Default, Clone)]
pub struct InMemoryPaymentOrderStore {
    orders: Arc<RwLock<HashMap<String, PaymentOrder>>>,
}

impl InMemoryPaymentOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentOrderStore for InMemoryPaymentOrderStore {
    async fn create(&self, order: PaymentOrder) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.order_id.clone(), order);
        Ok(())
    }

    async fn get(&self, order_id: &str) -> Result<Option<PaymentOrder>> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_id).cloned())
    }
}

/// In-memory manual payment claims, one per booking.
#[derive(Default, Clone)]
pub struct InMemoryManualClaimStore {
    claims: Arc<RwLock<HashMap<BookingId, ManualPaymentClaim>>>,
}

impl InMemoryManualClaimStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ManualClaimStore for InMemoryManualClaimStore {
    async fn create(&self, claim: ManualPaymentClaim) -> Result<()> {
        let mut claims = self.claims.write().await;
        claims.insert(claim.booking_id.clone(), claim);
        Ok(())
    }

    async fn get(&self, booking_id: &BookingId) -> Result<Option<ManualPaymentClaim>> {
        let claims = self.claims.read().await;
        Ok(claims.get(booking_id).cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryLeadStore {
    leads: Arc<RwLock<Vec<Lead>>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn create(&self, lead: Lead) -> Result<()> {
        self.leads.write().await.push(lead);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Lead>> {
        Ok(self.leads.read().await.clone())
    }
}

/// Keeps uploaded assets in memory; references look like `memory://<uuid>`.
#[derive(Default, Clone)]
pub struct InMemoryAssetStore {
    assets: Arc<RwLock<HashMap<String, UploadedAsset>>>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, reference: &str) -> Option<UploadedAsset> {
        self.assets.read().await.get(reference).cloned()
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn save(&self, asset: UploadedAsset) -> Result<String> {
        let reference = format!("memory://{}", Uuid::new_v4().simple());
        self.assets.write().await.insert(reference.clone(), asset);
        Ok(reference)
    }

    async fn remove(&self, reference: &str) -> Result<()> {
        self.assets.write().await.remove(reference);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{BookingForm, BookingStatus};
    use crate::domain::plan::Amount;

    fn booking() -> Booking {
        let form = BookingForm {
            name: "Asha".to_string(),
            email: "a@x.com".to_string(),
            contact: "999".to_string(),
            plan: "One Day Story".to_string(),
            amount: Some(Amount::new(999).unwrap()),
        };
        Booking::new(form.validate().unwrap(), None)
    }

    #[tokio::test]
    async fn test_in_memory_booking_store() {
        let store = InMemoryBookingStore::new();
        let mut booking = booking();

        store.create(booking.clone()).await.unwrap();
        assert_eq!(store.get(&booking.id).await.unwrap().unwrap(), booking);

        booking.status = BookingStatus::Confirmed;
        store.update(booking.clone()).await.unwrap();
        assert_eq!(
            store.get(&booking.id).await.unwrap().unwrap().status,
            BookingStatus::Confirmed
        );

        assert!(store.get(&BookingId::from("BK-MISSING")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let store = InMemoryBookingStore::new();
        let booking = booking();

        store.create(booking.clone()).await.unwrap();
        assert!(matches!(
            store.create(booking).await,
            Err(BookingError::PersistenceError(_))
        ));
    }

    #[tokio::test]
    async fn test_update_unknown_booking() {
        let store = InMemoryBookingStore::new();
        assert!(matches!(
            store.update(booking()).await,
            Err(BookingError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = InMemoryBookingStore::new();
        let mut older = booking();
        older.created_at -= chrono::Duration::minutes(5);
        let newer = booking();

        store.create(older.clone()).await.unwrap();
        store.create(newer.clone()).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, newer.id);
        assert_eq!(all[1].id, older.id);
    }

    #[tokio::test]
    async fn test_in_memory_asset_store() {
        let store = InMemoryAssetStore::new();
        let asset = UploadedAsset {
            file_name: Some("clip.mp4".to_string()),
            content_type: Some("video/mp4".to_string()),
            bytes: b"fake video".to_vec(),
        };

        let reference = store.save(asset.clone()).await.unwrap();
        assert!(reference.starts_with("memory://"));
        assert_eq!(store.get(&reference).await.unwrap(), asset);
    }
}
