//! # Domain Enums
//!
//! Small enumerations shared across the negotiation domain.
//!
//! - [`Side`]: which party authored a turn in the negotiation chain
//! - [`Role`]: which side of an offer a user is listing offers for
//! - [`TransitionKind`]: the kind of state change an operation committed

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A party to a negotiation.
///
/// # Examples
///
/// ```
/// use offer_negotiation::domain::value_objects::enums::Side;
///
/// assert_eq!(Side::Buyer.opposite(), Side::Seller);
/// assert_eq!(Side::from_seller_flag(true), Side::Seller);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// The user making offers on the listing.
    Buyer,
    /// The user who owns the listing.
    Seller,
}

impl Side {
    /// Returns the other party.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buyer => Self::Seller,
            Self::Seller => Self::Buyer,
        }
    }

    /// Maps the persisted `fromSeller` flag to a side.
    #[inline]
    #[must_use]
    pub const fn from_seller_flag(from_seller: bool) -> Self {
        if from_seller { Self::Seller } else { Self::Buyer }
    }

    /// Returns true if this is the seller.
    #[inline]
    #[must_use]
    pub const fn is_seller(self) -> bool {
        matches!(self, Self::Seller)
    }

    /// Direction a counter from this side must move the price.
    ///
    /// Sellers come down toward the buyer, buyers come up toward the seller.
    #[must_use]
    pub const fn converging_direction(self) -> &'static str {
        match self {
            Self::Buyer => "higher",
            Self::Seller => "lower",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buyer => write!(f, "buyer"),
            Self::Seller => write!(f, "seller"),
        }
    }
}

/// The perspective a user lists offers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Offers the user made.
    Buyer,
    /// Offers received on the user's listings.
    Seller,
}

impl From<Role> for Side {
    fn from(role: Role) -> Self {
        match role {
            Role::Buyer => Self::Buyer,
            Role::Seller => Self::Seller,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Side::from(*self).fmt(f)
    }
}

/// Kind of state change committed to an offer.
///
/// Handed to the notification collaborator together with the offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionKind {
    /// A new offer was placed.
    Created,
    /// A counter-offer was appended to the chain.
    Countered,
    /// The current amount was accepted.
    Accepted,
    /// The offer was rejected.
    Rejected,
    /// The offer ran past its deadline.
    Expired,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "CREATED",
            Self::Countered => "COUNTERED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        };
        f.write_str(s)
    }
}
