//! Domain types and the ports the application layer depends on.

pub mod booking;
pub mod lead;
pub mod payment;
pub mod plan;
pub mod ports;
pub mod session;
pub mod signature;
