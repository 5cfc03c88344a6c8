//! # Domain Errors
//!
//! Business-rule violations raised by the negotiation rule set and the offer
//! state machine. None of these are transient: they are returned to the
//! caller as-is and never retried.

use crate::domain::value_objects::{Amount, ArithmeticError, OfferStatus, Side, Timestamp};
use thiserror::Error;

/// Error raised by pure domain logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The actor is not a party to the offer, or not the party whose turn it is.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// A mutation was attempted on a terminal offer.
    #[error("offer is no longer active (status {status})")]
    NotActive {
        /// The terminal status the offer is in.
        status: OfferStatus,
    },

    /// The same side tried to move twice in a row.
    #[error("wrong turn: the {expected} must respond before the {actual} can counter again")]
    WrongTurn {
        /// Side whose turn it is.
        expected: Side,
        /// Side that attempted to move.
        actual: Side,
    },

    /// A counter moved the price away from the other party.
    #[error(
        "{side} counter of {proposed} must be {} than {previous}",
        .side.converging_direction()
    )]
    WrongDirection {
        /// Side that countered.
        side: Side,
        /// The same side's previous amount (listing price before the seller's first turn).
        previous: Amount,
        /// The rejected amount.
        proposed: Amount,
    },

    /// Amount outside the allowed floor/ceiling for the listing.
    #[error("amount {amount} out of bounds: must be at least {floor} and below {ceiling}")]
    OutOfBounds {
        /// The rejected amount.
        amount: Amount,
        /// Lowest acceptable amount (inclusive).
        floor: Amount,
        /// Listing price (exclusive upper bound).
        ceiling: Amount,
    },

    /// Status change not permitted by the state machine.
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: OfferStatus,
        /// Requested status.
        to: OfferStatus,
    },

    /// Expiry requested before the deadline.
    #[error("offer does not expire until {expires_at}")]
    NotYetExpired {
        /// The offer's current deadline.
        expires_at: Timestamp,
    },

    /// Message exceeds the configured length.
    #[error("message is {length} characters, maximum is {max}")]
    MessageTooLong {
        /// Length of the submitted message in characters.
        length: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Money arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    /// Malformed input.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Creates a not-authorized error.
    #[must_use]
    pub fn not_authorized(reason: impl Into<String>) -> Self {
        Self::NotAuthorized(reason.into())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
