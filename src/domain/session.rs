//! Booking session stages and the transition rules between them.
//!
//! Only the stages after a booking exists are persisted. A form that has not
//! passed validation yet is just a [`BookingForm`](super::booking::BookingForm),
//! and a failed operation is reported through its `Err` value.

use crate::error::{BookingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentPath {
    Online,
    Manual,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStage {
    #[default]
    Created,
    AwaitingPaymentChoice,
    PayingOnline,
    AwaitingManualReference,
    Completed,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SessionEvent {
    PathChosen(PaymentPath),
    OrderRequested,
    OrderFailed,
    PaymentVerified,
    VerificationFailed,
    ManualReferenceSubmitted,
}

impl SessionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AwaitingPaymentChoice => "awaiting_payment_choice",
            Self::PayingOnline => "paying_online",
            Self::AwaitingManualReference => "awaiting_manual_reference",
            Self::Completed => "completed",
        }
    }

    /// Applies `event`, returning the next stage or `InvalidTransition`.
    pub fn next(self, event: SessionEvent) -> Result<SessionStage> {
        use SessionEvent::*;
        use SessionStage::*;

        let next = match (self, event) {
            (
                Created | AwaitingPaymentChoice | PayingOnline | AwaitingManualReference,
                PathChosen(PaymentPath::Online),
            ) => PayingOnline,
            (
                Created | AwaitingPaymentChoice | PayingOnline | AwaitingManualReference,
                PathChosen(PaymentPath::Manual),
            ) => AwaitingManualReference,
            (PayingOnline, OrderRequested) => PayingOnline,
            (PayingOnline, OrderFailed | VerificationFailed) => AwaitingPaymentChoice,
            // An authenticated payment for an owned order completes any open stage.
            (AwaitingPaymentChoice | PayingOnline | AwaitingManualReference, PaymentVerified) => {
                Completed
            }
            (AwaitingManualReference, ManualReferenceSubmitted) => Completed,
            (stage, event) => return Err(BookingError::InvalidTransition { stage, event }),
        };
        Ok(next)
    }
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathChosen(PaymentPath::Online) => f.write_str("choose online payment"),
            Self::PathChosen(PaymentPath::Manual) => f.write_str("choose manual payment"),
            Self::OrderRequested => f.write_str("create gateway order"),
            Self::OrderFailed => f.write_str("gateway order failed"),
            Self::PaymentVerified => f.write_str("confirm verified payment"),
            Self::VerificationFailed => f.write_str("reject payment"),
            Self::ManualReferenceSubmitted => f.write_str("submit manual reference"),
        }
    }
}
