use crate::domain::booking::Booking;
use crate::domain::ports::BookingNotifier;
use crate::error::Result;
use async_trait::async_trait;

/// Emits a structured event for every confirmed booking.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl BookingNotifier for LogNotifier {
    async fn booking_confirmed(&self, booking: &Booking) -> Result<()> {
        tracing::info!(
            booking_id = %booking.id,
            email = %booking.customer_email,
            plan = %booking.plan_name,
            "booking confirmation notice"
        );
        Ok(())
    }
}
