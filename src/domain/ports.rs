use super::booking::{Booking, BookingId};
use super::lead::Lead;
use super::payment::{GatewayConfirmation, ManualPaymentClaim, OrderRequest, PaymentOrder};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, booking: Booking) -> Result<()>;
    async fn update(&self, booking: Booking) -> Result<()>;
    async fn get(&self, id: &BookingId) -> Result<Option<Booking>>;
    async fn list(&self) -> Result<Vec<Booking>>;
}

#[async_trait]
pub trait PaymentOrderStore: Send + Sync {
    async fn create(&self, order: PaymentOrder) -> Result<()>;
    async fn get(&self, order_id: &str) -> Result<Option<PaymentOrder>>;
}

#[async_trait]
pub trait ManualClaimStore: Send + Sync {
    async fn create(&self, claim: ManualPaymentClaim) -> Result<()>;
    async fn get(&self, booking_id: &BookingId) -> Result<Option<ManualPaymentClaim>>;
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn create(&self, lead: Lead) -> Result<()>;
    async fn list(&self) -> Result<Vec<Lead>>;
}

/// A file attached to a booking form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedAsset {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Stores the asset and returns a reference to keep on the booking.
    async fn save(&self, asset: UploadedAsset) -> Result<String>;
    /// Deletes an asset previously returned by `save`.
    async fn remove(&self, reference: &str) -> Result<()>;
}

/// Hosted checkout provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key the checkout widget is opened with.
    fn key_id(&self) -> &str;
    async fn create_order(&self, request: OrderRequest) -> Result<PaymentOrder>;
    /// Must fail with `PaymentVerificationFailed` for any forged confirmation.
    fn verify(&self, confirmation: &GatewayConfirmation) -> Result<()>;
}

#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn booking_confirmed(&self, booking: &Booking) -> Result<()>;
}

pub type BookingStoreBox = Box<dyn BookingStore>;
pub type PaymentOrderStoreBox = Box<dyn PaymentOrderStore>;
pub type ManualClaimStoreBox = Box<dyn ManualClaimStore>;
pub type LeadStoreBox = Box<dyn LeadStore>;
pub type AssetStoreBox = Box<dyn AssetStore>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type BookingNotifierBox = Box<dyn BookingNotifier>;

pub type BookingStoreFactory = Box<dyn Fn() -> BookingStoreBox + Send + Sync>;
