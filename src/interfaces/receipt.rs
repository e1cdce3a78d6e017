//! Plain-text booking receipts.

use crate::domain::booking::Booking;
use std::fmt::Write;

pub fn receipt_file_name(booking: &Booking) -> String {
    format!("booking_{}.txt", booking.id)
}

pub fn render_receipt(booking: &Booking) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Booking Confirmation - {}", booking.id);
    let _ = writeln!(out, "Name: {}", booking.customer_name);
    let _ = writeln!(out, "Email: {}", booking.customer_email);
    let _ = writeln!(out, "Plan: {}", booking.plan_name);
    let _ = writeln!(out, "Amount: ₹{}", booking.amount);
    let _ = writeln!(out, "Status: {}", booking.status);
    let _ = writeln!(
        out,
        "Date: {}",
        booking.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out
}
