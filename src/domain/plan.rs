use crate::error::BookingError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minor units (paise) per whole currency unit, as expected by the gateway.
pub const MINOR_UNITS_PER_UNIT: u64 = 100;

/// A positive, whole-unit price or payment amount.
///
/// Amounts are kept in the unit the catalog is priced in (whole rupees). The
/// gateway wire format uses minor units, see [`Amount::to_minor_units`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Result<Self, BookingError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(BookingError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn to_minor_units(&self) -> u64 {
        self.0.saturating_mul(MINOR_UNITS_PER_UNIT)
    }
}

impl TryFrom<u64> for Amount {
    type Error = BookingError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Form submissions send amounts as `999` or `"999.00"`; anything with a
/// fractional part is rejected.
impl TryFrom<Decimal> for Amount {
    type Error = BookingError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if !value.fract().is_zero() {
            return Err(BookingError::ValidationError(format!(
                "Amount must be a whole number, got {value}"
            )));
        }
        let whole = value.trunc().to_u64().ok_or_else(|| {
            BookingError::ValidationError(format!("Amount out of range: {value}"))
        })?;
        Self::new(whole)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A purchasable service plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub name: &'static str,
    pub price: u64,
}

pub static CATALOG: [Plan; 4] = [
    Plan {
        name: "One Day Story",
        price: 999,
    },
    Plan {
        name: "Two's Story & Post",
        price: 1499,
    },
    Plan {
        name: "Seven Days Premium",
        price: 4999,
    },
    Plan {
        name: "Permanent Posting",
        price: 7999,
    },
];

impl Plan {
    /// Looks up a catalog plan by its exact (trimmed) name.
    pub fn find(name: &str) -> Option<&'static Plan> {
        let name = name.trim();
        CATALOG.iter().find(|plan| plan.name == name)
    }

    pub fn all() -> &'static [Plan] {
        &CATALOG
    }

    pub fn price(&self) -> Amount {
        Amount(self.price)
    }
}
