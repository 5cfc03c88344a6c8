//! # Offer Aggregate
//!
//! The root negotiation record for one buyer's pursuit of one listing.
//!
//! This module provides the [`Offer`] aggregate root, which owns the ordered
//! [`CounterOffer`] chain, the sliding expiry deadline and the optimistic
//! concurrency `version`.
//!
//! # Negotiation Chain
//!
//! ```text
//! [buyer: initial_amount] → [seller: counter] → [buyer: counter] → ...
//! ```
//!
//! The chain strictly alternates. The side that did *not* make the latest
//! entry is the one expected to respond (counter, accept or reject).
//!
//! Mutation happens only through
//! [`OfferStateMachine`](crate::domain::services::state_machine::OfferStateMachine),
//! which produces a new record from the current one.

use crate::domain::entities::counter_offer::CounterOffer;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    Amount, ListingId, OfferId, OfferStatus, Side, Timestamp, UserId,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version assigned to a freshly created offer.
pub const INITIAL_VERSION: u64 = 1;

/// Payload handed to the payment collaborator once an offer is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// The accepted offer.
    pub offer_id: OfferId,
    /// Agreed price.
    pub accepted_amount: Amount,
    /// Paying party.
    pub buyer_id: UserId,
    /// Receiving party.
    pub seller_id: UserId,
}

/// Offer aggregate root.
///
/// # Invariants
///
/// - `buyer_id != seller_id`
/// - `listing_price`, `initial_amount` and `initial_message` never change
/// - `counter_offers` alternate sides, starting with the seller
/// - once the status is terminal the record never changes again
///
/// # Examples
///
/// ```
/// use offer_negotiation::domain::services::state_machine::{OfferDraft, OfferStateMachine};
/// use offer_negotiation::domain::value_objects::{
///     Amount, ListingId, OfferStatus, Side, Timestamp, UserId,
/// };
///
/// let machine = OfferStateMachine::default();
/// let now = Timestamp::from_secs(1_700_000_000).unwrap();
/// let draft = OfferDraft {
///     listing_id: ListingId::new("listing-1"),
///     buyer_id: UserId::new("buyer"),
///     seller_id: UserId::new("seller"),
///     listing_price: Amount::from_cents(10000),
///     amount: Amount::from_cents(7000),
///     message: None,
/// };
///
/// let offer = machine.create(draft, now).unwrap().offer;
/// assert_eq!(offer.status(), OfferStatus::Pending);
/// assert_eq!(offer.current_amount(), Amount::from_cents(7000));
/// assert_eq!(offer.awaiting_response_from(), Some(Side::Seller));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Unique identifier for this offer.
    id: OfferId,
    /// The listing being negotiated.
    listing_id: ListingId,
    /// The user making the offer.
    buyer_id: UserId,
    /// The listing owner.
    seller_id: UserId,
    /// Asking price captured when the offer was made.
    listing_price: Amount,
    /// The buyer's opening amount.
    initial_amount: Amount,
    /// The buyer's opening note.
    initial_message: Option<String>,
    /// Current lifecycle status.
    status: OfferStatus,
    /// Counter-offers in the order they were made.
    counter_offers: Vec<CounterOffer>,
    /// Deadline after which an active offer expires.
    expires_at: Timestamp,
    /// Optimistic concurrency token.
    version: u64,
    /// When the offer was created.
    created_at: Timestamp,
    /// When the offer last changed.
    updated_at: Timestamp,
}

impl Offer {
    /// Creates a new pending offer.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        listing_id: ListingId,
        buyer_id: UserId,
        seller_id: UserId,
        listing_price: Amount,
        initial_amount: Amount,
        initial_message: Option<String>,
        created_at: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            id: OfferId::new_v4(),
            listing_id,
            buyer_id,
            seller_id,
            listing_price,
            initial_amount,
            initial_message,
            status: OfferStatus::Pending,
            counter_offers: Vec::new(),
            expires_at,
            version: INITIAL_VERSION,
            created_at,
            updated_at: created_at,
        }
    }

    /// Reconstructs an offer from storage.
    ///
    /// Bypasses validation; only use with records this crate persisted.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: OfferId,
        listing_id: ListingId,
        buyer_id: UserId,
        seller_id: UserId,
        listing_price: Amount,
        initial_amount: Amount,
        initial_message: Option<String>,
        status: OfferStatus,
        counter_offers: Vec<CounterOffer>,
        expires_at: Timestamp,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            listing_id,
            buyer_id,
            seller_id,
            listing_price,
            initial_amount,
            initial_message,
            status,
            counter_offers,
            expires_at,
            version,
            created_at,
            updated_at,
        }
    }

    /// Returns this record stamped with a new version.
    ///
    /// Only store adapters call this, after a successful compare-and-swap.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub(crate) fn transition_to(&mut self, target: OfferStatus, now: Timestamp) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    pub(crate) fn push_counter(&mut self, counter: CounterOffer, expires_at: Timestamp) {
        self.counter_offers.push(counter);
        self.expires_at = expires_at;
    }

    // ========== Accessors ==========

    /// Returns the offer ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> OfferId {
        self.id
    }

    /// Returns the listing ID.
    #[inline]
    #[must_use]
    pub fn listing_id(&self) -> &ListingId {
        &self.listing_id
    }

    /// Returns the buyer.
    #[inline]
    #[must_use]
    pub fn buyer_id(&self) -> &UserId {
        &self.buyer_id
    }

    /// Returns the seller.
    #[inline]
    #[must_use]
    pub fn seller_id(&self) -> &UserId {
        &self.seller_id
    }

    /// Returns the asking price snapshot.
    #[inline]
    #[must_use]
    pub fn listing_price(&self) -> Amount {
        self.listing_price
    }

    /// Returns the buyer's opening amount.
    #[inline]
    #[must_use]
    pub fn initial_amount(&self) -> Amount {
        self.initial_amount
    }

    /// Returns the buyer's opening message.
    #[must_use]
    pub fn initial_message(&self) -> Option<&str> {
        self.initial_message.as_deref()
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> OfferStatus {
        self.status
    }

    /// Returns the counter-offers in chain order.
    #[inline]
    #[must_use]
    pub fn counter_offers(&self) -> &[CounterOffer] {
        &self.counter_offers
    }

    /// Returns the expiry deadline.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns the optimistic concurrency token.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the offer was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the offer last changed.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========== Negotiation Position ==========

    /// Returns true if the offer can still change.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns the full chain as `(side, amount)` pairs, starting with the
    /// buyer's initial offer.
    pub fn chain(&self) -> impl Iterator<Item = (Side, Amount)> + '_ {
        std::iter::once((Side::Buyer, self.initial_amount))
            .chain(self.counter_offers.iter().map(|c| (c.side(), c.amount())))
    }

    /// Returns the side that made the latest chain entry.
    #[must_use]
    pub fn last_mover(&self) -> Side {
        self.counter_offers
            .last()
            .map_or(Side::Buyer, CounterOffer::side)
    }

    /// Returns the latest amount on the table.
    ///
    /// Degrades to the initial amount when nobody has countered yet.
    #[must_use]
    pub fn current_amount(&self) -> Amount {
        self.counter_offers
            .last()
            .map_or(self.initial_amount, CounterOffer::amount)
    }

    /// Returns the side expected to respond next, or `None` once terminal.
    #[must_use]
    pub fn awaiting_response_from(&self) -> Option<Side> {
        self.is_active().then(|| self.last_mover().opposite())
    }

    /// Returns the side `user` plays in this offer, if any.
    #[must_use]
    pub fn side_of(&self, user: &UserId) -> Option<Side> {
        if user == &self.buyer_id {
            Some(Side::Buyer)
        } else if user == &self.seller_id {
            Some(Side::Seller)
        } else {
            None
        }
    }

    /// Returns the user playing `side`.
    #[must_use]
    pub fn party(&self, side: Side) -> &UserId {
        match side {
            Side::Buyer => &self.buyer_id,
            Side::Seller => &self.seller_id,
        }
    }

    /// Returns true once an active offer has reached its deadline.
    #[must_use]
    pub fn is_due_for_expiry(&self, now: Timestamp) -> bool {
        self.is_active() && self.expires_at.has_passed(&now)
    }

    /// Returns the agreed price if the offer was accepted.
    #[must_use]
    pub fn accepted_amount(&self) -> Option<Amount> {
        (self.status == OfferStatus::Accepted).then(|| self.current_amount())
    }

    /// Returns the payment collaborator payload if the offer was accepted.
    #[must_use]
    pub fn payment_request(&self) -> Option<PaymentRequest> {
        self.accepted_amount().map(|accepted_amount| PaymentRequest {
            offer_id: self.id,
            accepted_amount,
            buyer_id: self.buyer_id.clone(),
            seller_id: self.seller_id.clone(),
        })
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Offer[{}] listing={} status={} current={} turns={} v{}",
            self.id,
            self.listing_id,
            self.status,
            self.current_amount(),
            self.counter_offers.len() + 1,
            self.version
        )
    }
}
