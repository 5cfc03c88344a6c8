//! Shared fixtures for integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use offer_negotiation::NegotiationEngine;
use offer_negotiation::application::services::listing_catalog::ListingSnapshot;
use offer_negotiation::config::EngineConfig;
use offer_negotiation::domain::services::clock::ManualClock;
use offer_negotiation::domain::value_objects::{Amount, ListingId, Timestamp, UserId};
use offer_negotiation::infrastructure::notifications::InMemoryEventPublisher;
use offer_negotiation::infrastructure::persistence::OfferRepository;
use offer_negotiation::infrastructure::persistence::in_memory::{
    InMemoryListingCatalog, InMemoryOfferRepository,
};
use std::sync::Arc;

pub const LISTING: &str = "listing-bike";
pub const BUYER: &str = "buyer-ana";
pub const SELLER: &str = "seller-ben";
pub const STRANGER: &str = "user-carl";

/// Two days, the default offer TTL.
pub const TTL_SECS: i64 = 172_800;

pub fn buyer() -> UserId {
    UserId::new(BUYER)
}

pub fn seller() -> UserId {
    UserId::new(SELLER)
}

pub fn stranger() -> UserId {
    UserId::new(STRANGER)
}

pub fn listing() -> ListingId {
    ListingId::new(LISTING)
}

pub fn amount(units: i64) -> Amount {
    Amount::from_cents(units * 100)
}

pub struct Harness {
    pub engine: NegotiationEngine,
    pub clock: ManualClock,
    pub repository: Arc<InMemoryOfferRepository>,
    pub publisher: InMemoryEventPublisher,
}

impl Harness {
    /// Engine over one listing priced at 100.00, clock frozen at a fixed instant.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let repository = Arc::new(InMemoryOfferRepository::new());
        Self::with_repository(config, Arc::clone(&repository) as Arc<dyn OfferRepository>, repository)
    }

    pub fn with_repository(
        config: EngineConfig,
        store: Arc<dyn OfferRepository>,
        repository: Arc<InMemoryOfferRepository>,
    ) -> Self {
        let listings = InMemoryListingCatalog::new();
        listings.upsert(ListingSnapshot::new(listing(), seller(), amount(100)));

        let clock = ManualClock::new(Timestamp::from_secs(1_800_000_000).unwrap());
        let publisher = InMemoryEventPublisher::new();

        let engine = NegotiationEngine::builder(store, Arc::new(listings))
            .clock(Arc::new(clock.clone()))
            .publisher(Arc::new(publisher.clone()))
            .config(config)
            .build()
            .unwrap();

        Self {
            engine,
            clock,
            repository,
            publisher,
        }
    }
}
