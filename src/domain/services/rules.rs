//! # Negotiation Rules
//!
//! Pure validation for every negotiation move. No I/O, no clock.
//!
//! | Check          | Error                            |
//! |----------------|----------------------------------|
//! | party          | `DomainError::NotAuthorized`     |
//! | terminal       | `DomainError::NotActive`         |
//! | alternation    | `DomainError::WrongTurn`         |
//! | floor/ceiling  | `DomainError::OutOfBounds`       |
//! | convergence    | `DomainError::WrongDirection`    |
//!
//! # Examples
//!
//! ```
//! use offer_negotiation::domain::errors::DomainError;
//! use offer_negotiation::domain::services::rules::NegotiationRules;
//! use offer_negotiation::domain::value_objects::Amount;
//!
//! let rules = NegotiationRules::default();
//! let listing_price = Amount::from_cents(10000);
//!
//! assert!(rules.validate_create(listing_price, Amount::from_cents(7000)).is_ok());
//! assert!(matches!(
//!     rules.validate_create(listing_price, Amount::from_cents(4000)),
//!     Err(DomainError::OutOfBounds { .. })
//! ));
//! ```

use crate::domain::entities::offer::Offer;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Amount, CheckedArithmetic, Side, UserId};
use rust_decimal::Decimal;

/// Default lowest acceptable fraction of the listing price.
pub const DEFAULT_FLOOR_RATIO: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Default maximum message length in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1000;

/// The negotiation rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationRules {
    floor_ratio: Decimal,
    max_message_length: usize,
}

impl Default for NegotiationRules {
    fn default() -> Self {
        Self {
            floor_ratio: DEFAULT_FLOOR_RATIO,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }
}

impl NegotiationRules {
    /// Creates a rule set.
    ///
    /// # Arguments
    ///
    /// * `floor_ratio` - Lowest acceptable amount as a fraction of the listing price
    /// * `max_message_length` - Longest accepted message, in characters
    #[must_use]
    pub fn new(floor_ratio: Decimal, max_message_length: usize) -> Self {
        Self {
            floor_ratio,
            max_message_length,
        }
    }

    /// Returns the floor ratio.
    #[inline]
    #[must_use]
    pub fn floor_ratio(&self) -> Decimal {
        self.floor_ratio
    }

    /// Returns the maximum message length.
    #[inline]
    #[must_use]
    pub fn max_message_length(&self) -> usize {
        self.max_message_length
    }

    /// Returns the lowest acceptable amount for a listing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn floor_for(&self, listing_price: Amount) -> DomainResult<Amount> {
        Ok(Amount::new(listing_price.get().safe_mul(self.floor_ratio)?))
    }

    /// Checks `0 < amount < listing_price` and `amount >= floor`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfBounds` if either bound is violated.
    pub fn validate_bounds(&self, listing_price: Amount, amount: Amount) -> DomainResult<()> {
        let floor = self.floor_for(listing_price)?;
        if !amount.is_positive() || amount >= listing_price || amount < floor {
            return Err(DomainError::OutOfBounds {
                amount,
                floor,
                ceiling: listing_price,
            });
        }
        Ok(())
    }

    /// Validates the buyer's opening amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfBounds` if the amount violates the bounds.
    pub fn validate_create(&self, listing_price: Amount, amount: Amount) -> DomainResult<()> {
        self.validate_bounds(listing_price, amount)
    }

    /// Validates that a user is not making an offer on their own listing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotAuthorized` if buyer and seller are the same user.
    pub fn validate_parties(&self, buyer: &UserId, seller: &UserId) -> DomainResult<()> {
        if buyer == seller {
            return Err(DomainError::not_authorized(format!(
                "{buyer} cannot make an offer on their own listing"
            )));
        }
        Ok(())
    }

    /// Trims a message and enforces the length limit.
    ///
    /// Blank messages become `None`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MessageTooLong` if the trimmed message is too long.
    pub fn normalize_message(&self, message: Option<String>) -> DomainResult<Option<String>> {
        let Some(message) = message else {
            return Ok(None);
        };
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let length = trimmed.chars().count();
        if length > self.max_message_length {
            return Err(DomainError::MessageTooLong {
                length,
                max: self.max_message_length,
            });
        }
        Ok(Some(trimmed.to_string()))
    }

    /// Validates a counter-offer and returns the side making it.
    ///
    /// Checks run in order: party, active, turn, bounds, direction.
    ///
    /// Direction is measured against the actor's own previous turn: the
    /// seller only comes down (their first turn is measured against the
    /// listing price) and the buyer only goes up from their last amount.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotAuthorized` if `actor` is not buyer or seller
    /// - `DomainError::NotActive` if the offer is terminal
    /// - `DomainError::WrongTurn` if `actor` made the latest chain entry
    /// - `DomainError::OutOfBounds` if the amount violates the bounds
    /// - `DomainError::WrongDirection` if the amount does not converge
    pub fn validate_counter(
        &self,
        offer: &Offer,
        actor: &UserId,
        amount: Amount,
    ) -> DomainResult<Side> {
        let side = offer.side_of(actor).ok_or_else(|| {
            DomainError::not_authorized(format!("{actor} is not a party to offer {}", offer.id()))
        })?;

        if offer.status().is_terminal() {
            return Err(DomainError::NotActive {
                status: offer.status(),
            });
        }

        let last_mover = offer.last_mover();
        if side == last_mover {
            return Err(DomainError::WrongTurn {
                expected: last_mover.opposite(),
                actual: side,
            });
        }

        self.validate_bounds(offer.listing_price(), amount)?;

        let previous = offer
            .chain()
            .filter(|(turn, _)| *turn == side)
            .last()
            .map_or(offer.listing_price(), |(_, prior)| prior);
        let converges = match side {
            Side::Seller => amount < previous,
            Side::Buyer => amount > previous,
        };
        if !converges {
            return Err(DomainError::WrongDirection {
                side,
                previous,
                proposed: amount,
            });
        }

        Ok(side)
    }

    /// Validates an accept and returns the accepting side.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotActive` if the offer is terminal
    /// - `DomainError::NotAuthorized` unless `actor` is the side due to respond
    pub fn validate_accept(&self, offer: &Offer, actor: &UserId) -> DomainResult<Side> {
        Self::validate_response(offer, actor, "accept")
    }

    /// Validates a reject and returns the rejecting side.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotActive` if the offer is terminal
    /// - `DomainError::NotAuthorized` unless `actor` is the side due to respond
    pub fn validate_reject(&self, offer: &Offer, actor: &UserId) -> DomainResult<Side> {
        Self::validate_response(offer, actor, "reject")
    }

    fn validate_response(offer: &Offer, actor: &UserId, verb: &str) -> DomainResult<Side> {
        let Some(responder) = offer.awaiting_response_from() else {
            return Err(DomainError::NotActive {
                status: offer.status(),
            });
        };

        match offer.side_of(actor) {
            Some(side) if side == responder => Ok(side),
            Some(side) => Err(DomainError::not_authorized(format!(
                "the {side} cannot {verb} their own latest amount"
            ))),
            None => Err(DomainError::not_authorized(format!(
                "{actor} is not a party to offer {}",
                offer.id()
            ))),
        }
    }
}
