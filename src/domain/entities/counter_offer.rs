//! # Counter-Offer Entity
//!
//! One turn in an offer's negotiation chain.
//!
//! Counter-offers are owned by their parent [`Offer`](super::offer::Offer);
//! `offer_id` is a back-reference only. Creation order is significant: it
//! encodes whose turn it is.

use crate::domain::value_objects::{Amount, CounterOfferId, OfferId, Side, Timestamp};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A counter-offer made by either party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CounterOffer {
    /// Unique identifier for this counter-offer.
    id: CounterOfferId,
    /// The offer this turn belongs to.
    offer_id: OfferId,
    /// The proposed price for this turn.
    amount: Amount,
    /// `false` means the buyer made this turn.
    from_seller: bool,
    /// Optional note from the author.
    message: Option<String>,
    /// When the turn was taken.
    created_at: Timestamp,
}

impl CounterOffer {
    /// Creates a new counter-offer.
    ///
    /// Validation is the caller's responsibility; see
    /// [`NegotiationRules::validate_counter`](crate::domain::services::rules::NegotiationRules::validate_counter).
    #[must_use]
    pub fn new(
        offer_id: OfferId,
        side: Side,
        amount: Amount,
        message: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: CounterOfferId::new_v4(),
            offer_id,
            amount,
            from_seller: side.is_seller(),
            message,
            created_at,
        }
    }

    /// Returns the counter-offer ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> CounterOfferId {
        self.id
    }

    /// Returns the parent offer ID.
    #[inline]
    #[must_use]
    pub fn offer_id(&self) -> OfferId {
        self.offer_id
    }

    /// Returns the proposed amount.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns true if the seller made this turn.
    #[inline]
    #[must_use]
    pub fn from_seller(&self) -> bool {
        self.from_seller
    }

    /// Returns the side that made this turn.
    #[inline]
    #[must_use]
    pub fn side(&self) -> Side {
        Side::from_seller_flag(self.from_seller)
    }

    /// Returns the optional message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns when the turn was taken.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

impl fmt::Display for CounterOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.side(), self.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at() -> Timestamp {
        Timestamp::from_secs(1_700_000_000).unwrap()
    }

    #[test]
    fn new_records_side_as_flag() {
        let offer_id = OfferId::new_v4();
        let counter = CounterOffer::new(
            offer_id,
            Side::Seller,
            Amount::from_cents(8500),
            Some("meet me halfway".to_string()),
            at(),
        );

        assert!(counter.from_seller());
        assert_eq!(counter.side(), Side::Seller);
        assert_eq!(counter.offer_id(), offer_id);
        assert_eq!(counter.message(), Some("meet me halfway"));
        assert_eq!(counter.to_string(), "seller:85.00");
    }

    #[test]
    fn serializes_persisted_shape() {
        let counter = CounterOffer::new(
            OfferId::new_v4(),
            Side::Buyer,
            Amount::from_cents(8000),
            None,
            at(),
        );
        let json = serde_json::to_value(&counter).unwrap();

        assert_eq!(json["fromSeller"], serde_json::json!(false));
        assert!(json.get("offerId").is_some());
        assert!(json.get("createdAt").is_some());

        let back: CounterOffer = serde_json::from_value(json).unwrap();
        assert_eq!(back, counter);
    }
}
