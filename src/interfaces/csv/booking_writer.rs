use crate::domain::booking::Booking;
use crate::domain::plan::Plan;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BookingRow<'a> {
    booking_id: &'a str,
    name: &'a str,
    email: &'a str,
    contact: &'a str,
    plan: &'a str,
    amount: u64,
    status: &'static str,
    stage: &'static str,
    created_at: String,
}

#[derive(Serialize)]
struct PlanRow<'a> {
    plan: &'a str,
    price: u64,
}

/// Writes bookings as CSV, one row per booking.
pub struct BookingWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BookingWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes the header even when `bookings` is empty.
    pub fn write_bookings(&mut self, bookings: &[Booking]) -> Result<()> {
        if bookings.is_empty() {
            self.writer.write_record([
                "booking_id", "name", "email", "contact", "plan", "amount", "status", "stage",
                "created_at",
            ])?;
        }
        for booking in bookings {
            self.writer.serialize(BookingRow {
                booking_id: booking.id.as_str(),
                name: &booking.customer_name,
                email: &booking.customer_email,
                contact: &booking.customer_contact,
                plan: &booking.plan_name,
                amount: booking.amount.value(),
                status: booking.status.as_str(),
                stage: booking.stage.as_str(),
                created_at: booking.created_at.to_rfc3339(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_plans(&mut self, plans: &[Plan]) -> Result<()> {
        for plan in plans {
            self.writer.serialize(PlanRow {
                plan: plan.name,
                price: plan.price,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::BookingForm;
    use crate::domain::plan::Amount;

    #[test]
    fn test_write_bookings() {
        let form = BookingForm {
            name: "Asha".to_string(),
            email: "a@x.com".to_string(),
            contact: "999".to_string(),
            plan: "One Day Story".to_string(),
            amount: Some(Amount::new(999).unwrap()),
        };
        let booking = Booking::new(form.validate().unwrap(), None);

        let mut out = Vec::new();
        BookingWriter::new(&mut out)
            .write_bookings(std::slice::from_ref(&booking))
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "booking_id,name,email,contact,plan,amount,status,stage,created_at"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with(&format!(
            "{},Asha,a@x.com,999,One Day Story,999,pending,created,",
            booking.id
        )));
    }

    #[test]
    fn test_empty_export_has_header() {
        let mut out = Vec::new();
        BookingWriter::new(&mut out).write_bookings(&[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "booking_id,name,email,contact,plan,amount,status,stage,created_at\n"
        );
    }

    #[test]
    fn test_write_plans() {
        let mut out = Vec::new();
        BookingWriter::new(&mut out).write_plans(Plan::all()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("plan,price\nOne Day Story,999\n"));
        assert!(text.contains("Two's Story & Post,1499"));
    }
}
