//! CSV output for the command line.

pub mod booking_writer;
