//! Application layer orchestrating the domain through its ports.
//!
//! `BookingSession` owns the booking-and-payment state progression;
//! `LeadCapture` handles free-download leads.

pub mod booking_session;
pub mod leads;
