//! Adapters that drive the application: the HTTP API, receipts and CLI output.

pub mod csv;
pub mod http;
pub mod receipt;
