//! Adapters for the domain ports.

pub mod asset_store;
pub mod in_memory;
pub mod lead_log;
pub mod media_kit;
pub mod notifier;
pub mod razorpay;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod sandbox_gateway;
