//! # Offer State Machine
//!
//! Computes the next offer record for an action as a pure function of the
//! current record, the action and the current time.
//!
//! ```text
//!            ┌──── counter ────┐
//!            ▼                 │
//! PENDING ──counter──► COUNTERED
//!    │                   │
//!    ├─ accept ──────────┼──► ACCEPTED
//!    ├─ reject ──────────┼──► REJECTED
//!    └─ expire ──────────┴──► EXPIRED
//! ```
//!
//! Nothing here touches storage or the clock; the caller passes `now` in and
//! commits the returned [`Transition`] through the concurrency guard.

use crate::domain::entities::counter_offer::CounterOffer;
use crate::domain::entities::offer::Offer;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::rules::NegotiationRules;
use crate::domain::value_objects::{
    Amount, ListingId, OfferStatus, Timestamp, TransitionKind, UserId,
};
use std::fmt;

/// Default offer time-to-live: 48 hours.
pub const DEFAULT_OFFER_TTL_SECS: i64 = 48 * 60 * 60;

/// Everything needed to open a negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferDraft {
    /// Listing being negotiated.
    pub listing_id: ListingId,
    /// User making the offer.
    pub buyer_id: UserId,
    /// Listing owner, from the listing snapshot.
    pub seller_id: UserId,
    /// Asking price, from the listing snapshot.
    pub listing_price: Amount,
    /// Buyer's opening amount.
    pub amount: Amount,
    /// Buyer's opening note.
    pub message: Option<String>,
}

/// A move against an existing offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferAction {
    /// Propose a new amount.
    Counter {
        /// User making the counter.
        actor: UserId,
        /// Proposed amount.
        amount: Amount,
        /// Optional note.
        message: Option<String>,
    },
    /// Accept the amount on the table.
    Accept {
        /// User accepting.
        actor: UserId,
    },
    /// Walk away.
    Reject {
        /// User rejecting.
        actor: UserId,
    },
    /// System-initiated expiry.
    Expire,
}

impl OfferAction {
    /// Returns the transition kind this action produces on success.
    #[must_use]
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::Counter { .. } => TransitionKind::Countered,
            Self::Accept { .. } => TransitionKind::Accepted,
            Self::Reject { .. } => TransitionKind::Rejected,
            Self::Expire => TransitionKind::Expired,
        }
    }
}

impl fmt::Display for OfferAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counter { actor, amount, .. } => write!(f, "counter({actor}, {amount})"),
            Self::Accept { actor } => write!(f, "accept({actor})"),
            Self::Reject { actor } => write!(f, "reject({actor})"),
            Self::Expire => f.write_str("expire"),
        }
    }
}

/// A candidate record plus what happened to it.
///
/// The record's `version` is still the one it was computed from; the store
/// assigns the next version on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The new record.
    pub offer: Offer,
    /// What changed.
    pub kind: TransitionKind,
}

/// Pure offer state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferStateMachine {
    rules: NegotiationRules,
    ttl_secs: i64,
}

impl Default for OfferStateMachine {
    fn default() -> Self {
        Self {
            rules: NegotiationRules::default(),
            ttl_secs: DEFAULT_OFFER_TTL_SECS,
        }
    }
}

impl OfferStateMachine {
    /// Creates a state machine with the given rules and offer TTL.
    #[must_use]
    pub fn new(rules: NegotiationRules, ttl_secs: i64) -> Self {
        Self { rules, ttl_secs }
    }

    /// Returns the rule set.
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &NegotiationRules {
        &self.rules
    }

    /// Returns the offer TTL in seconds.
    #[inline]
    #[must_use]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Opens a new negotiation in `PENDING` with `expires_at = now + ttl`.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotAuthorized` if the buyer owns the listing
    /// - `DomainError::OutOfBounds` if the opening amount violates the bounds
    /// - `DomainError::MessageTooLong` if the note is too long
    pub fn create(&self, draft: OfferDraft, now: Timestamp) -> DomainResult<Transition> {
        self.rules.validate_parties(&draft.buyer_id, &draft.seller_id)?;
        self.rules.validate_create(draft.listing_price, draft.amount)?;
        let message = self.rules.normalize_message(draft.message)?;

        let offer = Offer::new(
            draft.listing_id,
            draft.buyer_id,
            draft.seller_id,
            draft.listing_price,
            draft.amount,
            message,
            now,
            now.add_secs(self.ttl_secs),
        );

        Ok(Transition {
            offer,
            kind: TransitionKind::Created,
        })
    }

    /// Applies `action` to `current`, returning the candidate record.
    ///
    /// `current` is never modified.
    ///
    /// # Errors
    ///
    /// Any rule violation from [`NegotiationRules`], plus
    /// `DomainError::NotYetExpired` for an early expire.
    pub fn apply(
        &self,
        current: &Offer,
        action: OfferAction,
        now: Timestamp,
    ) -> DomainResult<Transition> {
        let kind = action.kind();
        let mut next = current.clone();

        match action {
            OfferAction::Counter {
                actor,
                amount,
                message,
            } => {
                let side = self.rules.validate_counter(current, &actor, amount)?;
                let message = self.rules.normalize_message(message)?;
                next.transition_to(OfferStatus::Countered, now)?;
                let counter = CounterOffer::new(current.id(), side, amount, message, now);
                next.push_counter(counter, now.add_secs(self.ttl_secs));
            }
            OfferAction::Accept { actor } => {
                self.rules.validate_accept(current, &actor)?;
                next.transition_to(OfferStatus::Accepted, now)?;
            }
            OfferAction::Reject { actor } => {
                self.rules.validate_reject(current, &actor)?;
                next.transition_to(OfferStatus::Rejected, now)?;
            }
            OfferAction::Expire => {
                if current.status().is_terminal() {
                    return Err(DomainError::NotActive {
                        status: current.status(),
                    });
                }
                if !current.is_due_for_expiry(now) {
                    return Err(DomainError::NotYetExpired {
                        expires_at: current.expires_at(),
                    });
                }
                next.transition_to(OfferStatus::Expired, now)?;
            }
        }

        Ok(Transition { offer: next, kind })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Side;

    fn t0() -> Timestamp {
        Timestamp::from_secs(1_700_000_000).unwrap()
    }

    fn buyer() -> UserId {
        UserId::new("buyer")
    }

    fn seller() -> UserId {
        UserId::new("seller")
    }

    fn cents(c: i64) -> Amount {
        Amount::from_cents(c)
    }

    fn draft(amount: i64) -> OfferDraft {
        OfferDraft {
            listing_id: ListingId::new("listing"),
            buyer_id: buyer(),
            seller_id: seller(),
            listing_price: cents(10000),
            amount: cents(amount),
            message: Some("  is this still available?  ".to_string()),
        }
    }

    fn machine() -> OfferStateMachine {
        OfferStateMachine::new(NegotiationRules::default(), 3600)
    }

    fn counter(actor: UserId, amount: i64) -> OfferAction {
        OfferAction::Counter {
            actor,
            amount: cents(amount),
            message: None,
        }
    }

    mod create {
        use super::*;

        #[test]
        fn opens_pending_offer_with_ttl() {
            let t = machine().create(draft(7000), t0()).unwrap();

            assert_eq!(t.kind, TransitionKind::Created);
            assert_eq!(t.offer.status(), OfferStatus::Pending);
            assert_eq!(t.offer.initial_amount(), cents(7000));
            assert_eq!(t.offer.initial_message(), Some("is this still available?"));
            assert_eq!(t.offer.expires_at(), t0().add_secs(3600));
            assert!(t.offer.counter_offers().is_empty());
        }

        #[test]
        fn rejects_lowball() {
            assert!(matches!(
                machine().create(draft(4000), t0()),
                Err(DomainError::OutOfBounds { .. })
            ));
        }

        #[test]
        fn rejects_offer_on_own_listing() {
            let mut d = draft(7000);
            d.seller_id = buyer();
            assert!(matches!(
                machine().create(d, t0()),
                Err(DomainError::NotAuthorized(_))
            ));
        }
    }

    mod counter {
        use super::*;

        #[test]
        fn appends_to_chain_and_slides_deadline() {
            let m = machine();
            let offer = m.create(draft(7000), t0()).unwrap().offer;
            let later = t0().add_secs(600);

            let t = m.apply(&offer, counter(seller(), 8500), later).unwrap();

            assert_eq!(t.kind, TransitionKind::Countered);
            assert_eq!(t.offer.status(), OfferStatus::Countered);
            assert_eq!(t.offer.counter_offers().len(), 1);
            assert_eq!(t.offer.current_amount(), cents(8500));
            assert_eq!(t.offer.expires_at(), later.add_secs(3600));
            assert_eq!(t.offer.updated_at(), later);
            assert_eq!(t.offer.version(), offer.version());
        }

        #[test]
        fn leaves_input_untouched_on_error() {
            let m = machine();
            let offer = m.create(draft(7000), t0()).unwrap().offer;
            let before = offer.clone();

            assert!(m.apply(&offer, counter(buyer(), 7500), t0()).is_err());
            assert_eq!(offer, before);
        }

        #[test]
        fn full_negotiation_reaches_acceptance() {
            let m = machine();
            let offer = m.create(draft(7000), t0()).unwrap().offer;
            let offer = m.apply(&offer, counter(seller(), 8500), t0()).unwrap().offer;
            let offer = m.apply(&offer, counter(buyer(), 8000), t0()).unwrap().offer;
            let t = m
                .apply(&offer, OfferAction::Accept { actor: seller() }, t0())
                .unwrap();

            assert_eq!(t.kind, TransitionKind::Accepted);
            assert_eq!(t.offer.accepted_amount(), Some(cents(8000)));
            let sides: Vec<Side> = t.offer.chain().map(|(side, _)| side).collect();
            assert_eq!(sides, vec![Side::Buyer, Side::Seller, Side::Buyer]);
        }
    }

    mod respond {
        use super::*;

        #[test]
        fn accept_on_pending_takes_initial_amount() {
            let m = machine();
            let offer = m.create(draft(7000), t0()).unwrap().offer;
            let t = m
                .apply(&offer, OfferAction::Accept { actor: seller() }, t0())
                .unwrap();

            assert_eq!(t.offer.status(), OfferStatus::Accepted);
            assert_eq!(t.offer.accepted_amount(), Some(cents(7000)));
            assert_eq!(t.offer.expires_at(), offer.expires_at());
        }

        #[test]
        fn reject_freezes_record() {
            let m = machine();
            let offer = m.create(draft(7000), t0()).unwrap().offer;
            let rejected = m
                .apply(&offer, OfferAction::Reject { actor: seller() }, t0())
                .unwrap()
                .offer;

            for action in [
                counter(seller(), 8500),
                OfferAction::Accept { actor: seller() },
                OfferAction::Reject { actor: seller() },
                OfferAction::Expire,
            ] {
                let err = m
                    .apply(&rejected, action, t0().add_secs(7200))
                    .unwrap_err();
                assert_eq!(
                    err,
                    DomainError::NotActive {
                        status: OfferStatus::Rejected
                    }
                );
            }
        }
    }

    mod expire {
        use super::*;

        #[test]
        fn expires_at_deadline() {
            let m = machine();
            let offer = m.create(draft(7000), t0()).unwrap().offer;
            let t = m
                .apply(&offer, OfferAction::Expire, offer.expires_at())
                .unwrap();

            assert_eq!(t.kind, TransitionKind::Expired);
            assert_eq!(t.offer.status(), OfferStatus::Expired);
        }

        #[test]
        fn refuses_before_deadline() {
            let m = machine();
            let offer = m.create(draft(7000), t0()).unwrap().offer;
            let err = m
                .apply(&offer, OfferAction::Expire, t0().add_secs(10))
                .unwrap_err();

            assert_eq!(
                err,
                DomainError::NotYetExpired {
                    expires_at: offer.expires_at()
                }
            );
        }
    }

    #[test]
    fn action_display() {
        assert_eq!(OfferAction::Expire.to_string(), "expire");
        assert_eq!(
            OfferAction::Accept { actor: seller() }.to_string(),
            "accept(seller)"
        );
    }
}
