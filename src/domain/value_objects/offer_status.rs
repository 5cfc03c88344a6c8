//! # Offer Status
//!
//! Offer lifecycle state machine.
//!
//! # State Machine
//!
//! ```text
//! Pending ──→ Countered ──→ Countered (loop while both sides keep countering)
//!   │             │
//!   ├─────────────┴→ Accepted
//!   ├─────────────┴→ Rejected
//!   └─────────────┴→ Expired
//! ```
//!
//! # Examples
//!
//! ```
//! use offer_negotiation::domain::value_objects::offer_status::OfferStatus;
//!
//! let status = OfferStatus::Pending;
//! assert!(status.can_transition_to(OfferStatus::Countered));
//! assert!(!status.can_transition_to(OfferStatus::Pending));
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Offer lifecycle status.
///
/// # Terminal States
///
/// - [`Accepted`](OfferStatus::Accepted): both parties agreed on a price
/// - [`Rejected`](OfferStatus::Rejected): the responding party declined
/// - [`Expired`](OfferStatus::Expired): the negotiation ran out of time
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum OfferStatus {
    /// The buyer's initial offer awaits the seller's response.
    #[default]
    Pending = 0,

    /// At least one counter-offer has been made and awaits a response.
    Countered = 1,

    /// The last amount in the chain was accepted (terminal).
    Accepted = 2,

    /// The negotiation was rejected (terminal).
    Rejected = 3,

    /// The negotiation timed out (terminal).
    Expired = 4,
}

impl OfferStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Countered,
        Self::Accepted,
        Self::Rejected,
        Self::Expired,
    ];

    /// Returns true if this is a terminal status.
    ///
    /// Terminal offers are immutable.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Expired)
    }

    /// Returns true if the offer can still be countered, accepted or rejected.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this status can transition to the target status.
    ///
    /// - Pending → Countered, Accepted, Rejected, Expired
    /// - Countered → Countered, Accepted, Rejected, Expired
    /// - Terminal statuses → (none)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Pending | Self::Countered,
                Self::Countered | Self::Accepted | Self::Rejected | Self::Expired
            )
        )
    }

    /// Returns the valid next statuses from this status.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Pending | Self::Countered => vec![
                Self::Countered,
                Self::Accepted,
                Self::Rejected,
                Self::Expired,
            ],
            Self::Accepted | Self::Rejected | Self::Expired => vec![],
        }
    }

    /// Returns the persisted string form of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Countered => "COUNTERED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOfferStatusError(
    /// The unrecognized value.
    pub String,
);

impl fmt::Display for InvalidOfferStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid offer status: {}", self.0)
    }
}

impl std::error::Error for InvalidOfferStatusError {}

impl FromStr for OfferStatus {
    type Err = InvalidOfferStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidOfferStatusError(s.to_string()))
    }
}
