//! # Amount Value Object
//!
//! Decimal money amount used for listing prices and every turn of a
//! negotiation.
//!
//! # Examples
//!
//! ```
//! use offer_negotiation::domain::value_objects::Amount;
//!
//! let offer: Amount = "70.00".parse().unwrap();
//! let counter = Amount::from_cents(8500);
//!
//! assert!(offer < counter);
//! assert_eq!(counter.to_string(), "85.00");
//! ```

use crate::domain::errors::DomainError;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A money amount in the marketplace currency.
///
/// Any decimal value can be represented; whether it is an acceptable offer is
/// decided by [`NegotiationRules`](crate::domain::services::rules::NegotiationRules).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wraps a decimal value.
    #[inline]
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Creates an amount from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is strictly greater than zero.
    #[inline]
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|e| DomainError::ValidationError(format!("invalid amount '{s}': {e}")))
    }
}
