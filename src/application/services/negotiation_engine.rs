//! # Negotiation Engine
//!
//! The facade the rest of the application calls.
//!
//! # Operations
//!
//! | Operation                                 | Mutates | Expiration applied |
//! |-------------------------------------------|---------|--------------------|
//! | [`create_offer`](NegotiationEngine::create_offer)   | insert  | n/a                |
//! | [`submit_counter`](NegotiationEngine::submit_counter) | CAS     | before validation  |
//! | [`accept`](NegotiationEngine::accept)               | CAS     | before validation  |
//! | [`reject`](NegotiationEngine::reject)               | CAS     | before validation  |
//! | [`get_offer`](NegotiationEngine::get_offer)         | lazily  | before returning   |
//! | [`list_offers`](NegotiationEngine::list_offers)     | lazily  | before returning   |
//!
//! The engine never calls payment or notification collaborators for
//! caller-initiated transitions. It returns the committed offer; the caller
//! takes [`Offer::payment_request`] after an accept and builds an
//! [`OfferTransitioned`](crate::domain::events::OfferTransitioned) for its
//! notifier after any change.
//!
//! # Examples
//!
//! ```
//! use offer_negotiation::application::services::listing_catalog::ListingSnapshot;
//! use offer_negotiation::application::services::negotiation_engine::NegotiationEngine;
//! use offer_negotiation::domain::value_objects::{Amount, ListingId, OfferStatus, UserId};
//! use offer_negotiation::infrastructure::persistence::in_memory::{
//!     InMemoryListingCatalog, InMemoryOfferRepository,
//! };
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let listings = InMemoryListingCatalog::new();
//! listings.upsert(ListingSnapshot::new(
//!     ListingId::new("bike"),
//!     UserId::new("seller"),
//!     Amount::from_cents(10000),
//! ));
//!
//! let engine = NegotiationEngine::builder(
//!     Arc::new(InMemoryOfferRepository::new()),
//!     Arc::new(listings),
//! )
//! .build()
//! .unwrap();
//!
//! let offer = engine
//!     .create_offer(UserId::new("buyer"), ListingId::new("bike"), Amount::from_cents(7000), None)
//!     .await
//!     .unwrap();
//! let offer = engine.accept(offer.id(), UserId::new("seller")).await.unwrap();
//! assert_eq!(offer.status(), OfferStatus::Accepted);
//! # }
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::concurrency_guard::{ConcurrencyGuard, GuardOutcome};
use crate::application::services::expiration::{ExpirationResolver, SweepReport};
use crate::application::services::listing_catalog::ListingCatalog;
use crate::application::services::notification::{NoopEventPublisher, OfferEventPublisher};
use crate::application::services::sweeper::{ExpirationSweeper, SweeperHandle};
use crate::config::EngineConfig;
use crate::domain::entities::offer::Offer;
use crate::domain::services::clock::{Clock, SystemClock};
use crate::domain::services::state_machine::{OfferAction, OfferDraft, OfferStateMachine};
use crate::domain::value_objects::{Amount, ListingId, OfferId, Role, UserId};
use crate::infrastructure::persistence::traits::OfferRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Builder for [`NegotiationEngine`].
#[derive(Debug)]
pub struct NegotiationEngineBuilder {
    repository: Arc<dyn OfferRepository>,
    listings: Arc<dyn ListingCatalog>,
    clock: Arc<dyn Clock>,
    publisher: Arc<dyn OfferEventPublisher>,
    config: EngineConfig,
}

impl NegotiationEngineBuilder {
    /// Sets the clock. Defaults to [`SystemClock`].
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the expiration publisher. Defaults to [`NoopEventPublisher`].
    #[must_use]
    pub fn publisher(mut self, publisher: Arc<dyn OfferEventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Sets the configuration. Defaults to [`EngineConfig::default`].
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the configuration is invalid.
    pub fn build(self) -> ApplicationResult<NegotiationEngine> {
        let machine = Arc::new(self.config.state_machine()?);
        let guard = Arc::new(ConcurrencyGuard::new(
            Arc::clone(&self.repository),
            Arc::clone(&machine),
            Arc::clone(&self.clock),
            self.publisher,
            self.config.max_attempts,
        ));
        let resolver = Arc::new(ExpirationResolver::new(
            Arc::clone(&guard),
            Arc::clone(&self.repository),
        ));

        Ok(NegotiationEngine {
            repository: self.repository,
            listings: self.listings,
            clock: self.clock,
            machine,
            guard,
            resolver,
            sweep_interval: self.config.sweep_interval(),
        })
    }
}

/// Offer negotiation facade.
#[derive(Debug, Clone)]
pub struct NegotiationEngine {
    repository: Arc<dyn OfferRepository>,
    listings: Arc<dyn ListingCatalog>,
    clock: Arc<dyn Clock>,
    machine: Arc<OfferStateMachine>,
    guard: Arc<ConcurrencyGuard>,
    resolver: Arc<ExpirationResolver>,
    sweep_interval: Duration,
}

impl NegotiationEngine {
    /// Starts building an engine over a store and a listing catalog.
    #[must_use]
    pub fn builder(
        repository: Arc<dyn OfferRepository>,
        listings: Arc<dyn ListingCatalog>,
    ) -> NegotiationEngineBuilder {
        NegotiationEngineBuilder {
            repository,
            listings,
            clock: Arc::new(SystemClock),
            publisher: Arc::new(NoopEventPublisher),
            config: EngineConfig::default(),
        }
    }

    /// Returns the state machine in use.
    #[must_use]
    pub fn state_machine(&self) -> &OfferStateMachine {
        &self.machine
    }

    /// Opens a negotiation on a listing.
    ///
    /// The listing's seller and price are snapshotted onto the offer.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` if the listing does not exist
    /// - `ApplicationError::Domain` (`NotAuthorized`, `OutOfBounds`, `MessageTooLong`)
    /// - `ApplicationError::Repository` on store failure
    #[instrument(skip_all, fields(buyer = %buyer_id, listing = %listing_id, amount = %amount))]
    pub async fn create_offer(
        &self,
        buyer_id: UserId,
        listing_id: ListingId,
        amount: Amount,
        message: Option<String>,
    ) -> ApplicationResult<Offer> {
        let listing = self
            .listings
            .snapshot(&listing_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Listing", listing_id.to_string()))?;

        let draft = OfferDraft {
            listing_id,
            buyer_id,
            seller_id: listing.seller_id,
            listing_price: listing.price,
            amount,
            message,
        };
        let transition = self.machine.create(draft, self.clock.now())?;
        self.repository.insert(&transition.offer).await?;

        info!(
            offer_id = %transition.offer.id(),
            expires_at = %transition.offer.expires_at(),
            "offer created"
        );
        Ok(transition.offer)
    }

    /// Proposes a new amount on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` if the offer does not exist
    /// - `ApplicationError::Domain` for any rule violation
    /// - `ApplicationError::Conflict` if concurrent writers exhaust the retry budget
    #[instrument(skip_all, fields(offer_id = %offer_id, actor = %actor, amount = %amount))]
    pub async fn submit_counter(
        &self,
        offer_id: OfferId,
        actor: UserId,
        amount: Amount,
        message: Option<String>,
    ) -> ApplicationResult<Offer> {
        let action = OfferAction::Counter {
            actor,
            amount,
            message,
        };
        self.mutate(offer_id, action).await
    }

    /// Accepts the amount currently on the table.
    ///
    /// The caller hands [`Offer::payment_request`] to its payment
    /// collaborator afterwards.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` if the offer does not exist
    /// - `ApplicationError::Domain` (`NotActive`, `NotAuthorized`)
    /// - `ApplicationError::Conflict` if concurrent writers exhaust the retry budget
    #[instrument(skip_all, fields(offer_id = %offer_id, actor = %actor))]
    pub async fn accept(&self, offer_id: OfferId, actor: UserId) -> ApplicationResult<Offer> {
        self.mutate(offer_id, OfferAction::Accept { actor }).await
    }

    /// Rejects the offer.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` if the offer does not exist
    /// - `ApplicationError::Domain` (`NotActive`, `NotAuthorized`)
    /// - `ApplicationError::Conflict` if concurrent writers exhaust the retry budget
    #[instrument(skip_all, fields(offer_id = %offer_id, actor = %actor))]
    pub async fn reject(&self, offer_id: OfferId, actor: UserId) -> ApplicationResult<Offer> {
        self.mutate(offer_id, OfferAction::Reject { actor }).await
    }

    /// Returns an offer, expiring it first if its deadline has passed.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` if the offer does not exist
    /// - `ApplicationError::Conflict` if a lazy expiry cannot commit
    #[instrument(skip_all, fields(offer_id = %offer_id))]
    pub async fn get_offer(&self, offer_id: OfferId) -> ApplicationResult<Offer> {
        let offer = self
            .repository
            .get(&offer_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Offer", offer_id.to_string()))?;
        self.resolver.resolve(offer).await
    }

    /// Lists offers where `user` plays `role`, newest first, each with
    /// expiration applied.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Repository` on store failure, or the first
    /// lazy-expiry failure.
    #[instrument(skip_all, fields(user = %user, role = %role))]
    pub async fn list_offers(&self, user: UserId, role: Role) -> ApplicationResult<Vec<Offer>> {
        let offers = match role {
            Role::Buyer => self.repository.find_by_buyer(&user).await?,
            Role::Seller => self.repository.find_by_seller(&user).await?,
        };
        let mut offers = self.resolver.resolve_all(offers).await?;
        offers.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(offers)
    }

    /// Expires every offer that is past its deadline.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Repository` if the due-offer query fails.
    pub async fn sweep_expired(&self) -> ApplicationResult<SweepReport> {
        self.resolver.sweep().await
    }

    /// Starts the periodic expiration sweep on the current tokio runtime.
    #[must_use]
    pub fn spawn_sweeper(&self) -> SweeperHandle {
        ExpirationSweeper::new(Arc::clone(&self.resolver), self.sweep_interval).spawn()
    }

    async fn mutate(&self, offer_id: OfferId, action: OfferAction) -> ApplicationResult<Offer> {
        let machine = &self.machine;
        let outcome = self
            .guard
            .run(offer_id, |current, now| {
                Ok(Some(machine.apply(current, action.clone(), now)?))
            })
            .await?;

        if let GuardOutcome::Committed { offer, kind } = &outcome {
            info!(
                offer_id = %offer.id(),
                %kind,
                status = %offer.status(),
                current = %offer.current_amount(),
                version = offer.version(),
                "offer transitioned"
            );
        }
        Ok(outcome.into_offer())
    }
}
