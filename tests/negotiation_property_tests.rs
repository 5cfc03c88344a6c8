//! Property-based tests for the offer state machine.
//!
//! Random action sequences from both parties and an outsider are fed to
//! [`OfferStateMachine::apply`]. Whatever is accepted or refused, the
//! negotiation chain must stay well formed.

#![allow(clippy::unwrap_used)]

use offer_negotiation::domain::entities::Offer;
use offer_negotiation::domain::services::state_machine::{
    OfferAction, OfferDraft, OfferStateMachine,
};
use offer_negotiation::domain::value_objects::{
    Amount, ListingId, OfferStatus, Side, Timestamp, UserId,
};
use proptest::prelude::*;

const PRICE_CENTS: i64 = 10_000;
const FLOOR_CENTS: i64 = 5_000;

#[derive(Debug, Clone)]
enum Step {
    Counter { actor: usize, cents: i64 },
    Accept { actor: usize },
    Reject { actor: usize },
    Expire,
}

fn actor(index: usize) -> UserId {
    match index {
        0 => UserId::new("buyer"),
        1 => UserId::new("seller"),
        _ => UserId::new("outsider"),
    }
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (0usize..3, 1i64..=12_000).prop_map(|(actor, cents)| Step::Counter { actor, cents }),
        1 => (0usize..3).prop_map(|actor| Step::Accept { actor }),
        1 => (0usize..3).prop_map(|actor| Step::Reject { actor }),
        1 => Just(Step::Expire),
    ]
}

/// Steps paired with seconds elapsed before each one.
fn script_strategy() -> impl Strategy<Value = Vec<(Step, i64)>> {
    prop::collection::vec((step_strategy(), 0i64..=120_000), 1..=25)
}

fn to_action(step: &Step) -> OfferAction {
    match step {
        Step::Counter { actor: a, cents } => OfferAction::Counter {
            actor: actor(*a),
            amount: Amount::from_cents(*cents),
            message: None,
        },
        Step::Accept { actor: a } => OfferAction::Accept { actor: actor(*a) },
        Step::Reject { actor: a } => OfferAction::Reject { actor: actor(*a) },
        Step::Expire => OfferAction::Expire,
    }
}

fn open(machine: &OfferStateMachine, cents: i64, now: Timestamp) -> Offer {
    machine
        .create(
            OfferDraft {
                listing_id: ListingId::new("listing"),
                buyer_id: actor(0),
                seller_id: actor(1),
                listing_price: Amount::from_cents(PRICE_CENTS),
                amount: Amount::from_cents(cents),
                message: None,
            },
            now,
        )
        .unwrap()
        .offer
}

fn assert_well_formed(offer: &Offer) {
    let chain: Vec<(Side, Amount)> = offer.chain().collect();
    let floor = Amount::from_cents(FLOOR_CENTS);
    let price = Amount::from_cents(PRICE_CENTS);

    assert_eq!(chain.first().map(|(side, _)| *side), Some(Side::Buyer));
    for pair in chain.windows(2) {
        if let [(prev_side, _), (next_side, _)] = pair {
            assert_ne!(prev_side, next_side, "chain must alternate");
        }
    }
    for (_, amount) in &chain {
        assert!(*amount >= floor && *amount < price, "{amount} out of bounds");
    }

    let bids: Vec<Amount> = chain
        .iter()
        .filter(|(side, _)| *side == Side::Buyer)
        .map(|(_, a)| *a)
        .collect();
    assert!(bids.windows(2).all(|w| w[0] < w[1]), "buyer bids must rise");

    let asks: Vec<Amount> = chain
        .iter()
        .filter(|(side, _)| *side == Side::Seller)
        .map(|(_, a)| *a)
        .collect();
    assert!(asks.windows(2).all(|w| w[0] > w[1]), "seller asks must fall");

    let expected_status = if offer.counter_offers().is_empty() {
        OfferStatus::Pending
    } else {
        OfferStatus::Countered
    };
    if offer.is_active() {
        assert_eq!(offer.status(), expected_status);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn random_scripts_keep_the_chain_well_formed(
        opening in FLOOR_CENTS..PRICE_CENTS,
        script in script_strategy(),
    ) {
        let machine = OfferStateMachine::default();
        let mut now = Timestamp::from_secs(1_800_000_000).unwrap();
        let mut offer = open(&machine, opening, now);

        for (step, elapsed) in &script {
            now = now.add_secs(*elapsed);
            let was_active = offer.is_active();
            let before = offer.clone();

            match machine.apply(&offer, to_action(step), now) {
                Ok(transition) => {
                    prop_assert!(was_active, "terminal offer accepted {step:?}");
                    offer = transition.offer;
                }
                Err(_) => prop_assert_eq!(&offer, &before),
            }
            assert_well_formed(&offer);
        }
    }

    #[test]
    fn terminal_offers_refuse_everything(
        opening in FLOOR_CENTS..PRICE_CENTS,
        ending in 0usize..3,
        script in script_strategy(),
    ) {
        let machine = OfferStateMachine::default();
        let mut now = Timestamp::from_secs(1_800_000_000).unwrap();
        let offer = open(&machine, opening, now);

        let terminal = match ending {
            0 => machine.apply(&offer, OfferAction::Accept { actor: actor(1) }, now),
            1 => machine.apply(&offer, OfferAction::Reject { actor: actor(1) }, now),
            _ => machine.apply(&offer, OfferAction::Expire, offer.expires_at()),
        }
        .unwrap()
        .offer;
        prop_assert!(!terminal.is_active());

        for (step, elapsed) in &script {
            now = now.add_secs(*elapsed);
            prop_assert!(machine.apply(&terminal, to_action(step), now).is_err());
        }
    }

    #[test]
    fn outsiders_never_change_an_offer(
        opening in FLOOR_CENTS..PRICE_CENTS,
        cents in 1i64..=12_000,
    ) {
        let machine = OfferStateMachine::default();
        let now = Timestamp::from_secs(1_800_000_000).unwrap();
        let offer = open(&machine, opening, now);

        let outsider = actor(2);
        for action in [
            OfferAction::Counter { actor: outsider.clone(), amount: Amount::from_cents(cents), message: None },
            OfferAction::Accept { actor: outsider.clone() },
            OfferAction::Reject { actor: outsider },
        ] {
            prop_assert!(machine.apply(&offer, action, now).is_err());
        }
    }

    #[test]
    fn accepted_amount_is_the_last_chain_entry(
        opening in FLOOR_CENTS..9_000i64,
        seller_drop in 1i64..=900,
        buyer_raise in 1i64..=500,
    ) {
        let machine = OfferStateMachine::default();
        let now = Timestamp::from_secs(1_800_000_000).unwrap();
        let offer = open(&machine, opening, now);

        let ask = PRICE_CENTS - seller_drop;
        let offer = machine
            .apply(&offer, OfferAction::Counter { actor: actor(1), amount: Amount::from_cents(ask), message: None }, now)
            .unwrap()
            .offer;
        let bid = opening + buyer_raise;
        let offer = machine
            .apply(&offer, OfferAction::Counter { actor: actor(0), amount: Amount::from_cents(bid), message: None }, now)
            .unwrap()
            .offer;
        let accepted = machine
            .apply(&offer, OfferAction::Accept { actor: actor(1) }, now)
            .unwrap()
            .offer;

        prop_assert_eq!(accepted.status(), OfferStatus::Accepted);
        prop_assert_eq!(accepted.accepted_amount(), Some(Amount::from_cents(bid)));
    }
}
