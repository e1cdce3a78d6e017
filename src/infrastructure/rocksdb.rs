use crate::domain::booking::{Booking, BookingId};
use crate::domain::lead::Lead;
use crate::domain::payment::{ManualPaymentClaim, PaymentOrder};
use crate::domain::ports::{BookingStore, LeadStore, ManualClaimStore, PaymentOrderStore};
use crate::error::{BookingError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for booking records.
pub const CF_BOOKINGS: &str = "bookings";
/// Column Family for gateway orders.
pub const CF_PAYMENT_ORDERS: &str = "payment_orders";
/// Column Family for manual payment claims.
pub const CF_MANUAL_CLAIMS: &str = "manual_claims";
/// Column Family for download leads.
pub const CF_LEADS: &str = "leads";

/// A persistent store implementation using RocksDB.
///
/// Every entity lives in its own Column Family, JSON-encoded and keyed by its
/// identifier. `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, creating any
    /// missing column families.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_BOOKINGS, CF_PAYMENT_ORDERS, CF_MANUAL_CLAIMS, CF_LEADS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| BookingError::persistence(format!("{name} column family not found")))
    }

    fn put_json<T: Serialize>(&self, cf: &str, key: &[u8], value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(self.cf(cf)?, key, bytes)?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, cf: &str, key: &[u8]) -> Result<Option<T>> {
        match self.db.get_pinned_cf(self.cf(cf)?, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn exists(&self, cf: &str, key: &[u8]) -> Result<bool> {
        Ok(self.db.get_pinned_cf(self.cf(cf)?, key)?.is_some())
    }

    fn scan_json<T: DeserializeOwned>(&self, cf: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for item in self.db.iterator_cf(self.cf(cf)?, IteratorMode::Start) {
            let (_key, value) = item?;
            items.push(serde_json::from_slice(&value)?);
        }
        Ok(items)
    }
}

#[async_trait]
impl BookingStore for RocksDBStore {
    async fn create(&self, booking: Booking) -> Result<()> {
        let key = booking.id.as_str().as_bytes();
        if self.exists(CF_BOOKINGS, key)? {
            return Err(BookingError::persistence(format!(
                "booking {} already exists",
                booking.id
            )));
        }
        self.put_json(CF_BOOKINGS, key, &booking)
    }

    async fn update(&self, booking: Booking) -> Result<()> {
        let key = booking.id.as_str().as_bytes();
        if !self.exists(CF_BOOKINGS, key)? {
            return Err(BookingError::NotFound(format!("booking {}", booking.id)));
        }
        self.put_json(CF_BOOKINGS, key, &booking)
    }

    async fn get(&self, id: &BookingId) -> Result<Option<Booking>> {
        self.get_json(CF_BOOKINGS, id.as_str().as_bytes())
    }

    async fn list(&self) -> Result<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self.scan_json(CF_BOOKINGS)?;
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}

#[async_trait]
impl PaymentOrderStore for RocksDBStore {
    async fn create(&self, order: PaymentOrder) -> Result<()> {
        self.put_json(CF_PAYMENT_ORDERS, order.order_id.as_bytes(), &order)
    }

    async fn get(&self, order_id: &str) -> Result<Option<PaymentOrder>> {
        self.get_json(CF_PAYMENT_ORDERS, order_id.as_bytes())
    }
}

#[async_trait]
impl ManualClaimStore for RocksDBStore {
    async fn create(&self, claim: ManualPaymentClaim) -> Result<()> {
        self.put_json(CF_MANUAL_CLAIMS, claim.booking_id.as_str().as_bytes(), &claim)
    }

    async fn get(&self, booking_id: &BookingId) -> Result<Option<ManualPaymentClaim>> {
        self.get_json(CF_MANUAL_CLAIMS, booking_id.as_str().as_bytes())
    }
}

#[async_trait]
impl LeadStore for RocksDBStore {
    async fn create(&self, lead: Lead) -> Result<()> {
        self.put_json(CF_LEADS, lead.id.as_bytes(), &lead)
    }

    async fn list(&self) -> Result<Vec<Lead>> {
        let mut leads: Vec<Lead> = self.scan_json(CF_LEADS)?;
        leads.sort_by(|a, b| a.captured_at.cmp(&b.captured_at));
        Ok(leads)
    }
}
