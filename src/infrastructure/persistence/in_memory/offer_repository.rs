//! # In-Memory Offer Repository
//!
//! In-memory implementation of [`OfferRepository`] for tests and
//! single-process deployments.
//!
//! Uses [`DashMap`] keyed by offer ID. The version check and the write in
//! [`compare_and_swap`](OfferRepository::compare_and_swap) happen under the
//! same shard lock, so concurrent writers to one offer are linearized while
//! writers to different offers proceed independently.
//!
//! # Examples
//!
//! ```
//! use offer_negotiation::infrastructure::persistence::in_memory::InMemoryOfferRepository;
//!
//! let repo = InMemoryOfferRepository::new();
//! assert!(repo.is_empty());
//! ```

use crate::domain::entities::offer::Offer;
use crate::domain::value_objects::{OfferId, Timestamp, UserId};
use crate::infrastructure::persistence::traits::{
    OfferRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

const ENTITY: &str = "Offer";

/// In-memory implementation of [`OfferRepository`].
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOfferRepository {
    offers: Arc<DashMap<OfferId, Offer>>,
}

impl InMemoryOfferRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored offers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Returns true if no offers are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    fn collect<P>(&self, predicate: P) -> Vec<Offer>
    where
        P: Fn(&Offer) -> bool,
    {
        self.offers
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn insert(&self, offer: &Offer) -> RepositoryResult<()> {
        match self.offers.entry(offer.id()) {
            Entry::Occupied(_) => Err(RepositoryError::duplicate(ENTITY, offer.id().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(offer.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &OfferId) -> RepositoryResult<Option<Offer>> {
        Ok(self.offers.get(id).map(|entry| entry.value().clone()))
    }

    async fn compare_and_swap(
        &self,
        expected_version: u64,
        offer: &Offer,
    ) -> RepositoryResult<Offer> {
        let mut stored = self
            .offers
            .get_mut(&offer.id())
            .ok_or_else(|| RepositoryError::not_found(ENTITY, offer.id().to_string()))?;

        let actual = stored.version();
        if actual != expected_version {
            return Err(RepositoryError::version_conflict(
                ENTITY,
                offer.id().to_string(),
                expected_version,
                actual,
            ));
        }

        let next = expected_version
            .checked_add(1)
            .ok_or_else(|| RepositoryError::internal("offer version overflow"))?;
        let committed = offer.clone().with_version(next);
        *stored = committed.clone();
        Ok(committed)
    }

    async fn find_by_buyer(&self, user: &UserId) -> RepositoryResult<Vec<Offer>> {
        Ok(self.collect(|offer| offer.buyer_id() == user))
    }

    async fn find_by_seller(&self, user: &UserId) -> RepositoryResult<Vec<Offer>> {
        Ok(self.collect(|offer| offer.seller_id() == user))
    }

    async fn find_due_for_expiry(&self, now: Timestamp) -> RepositoryResult<Vec<Offer>> {
        Ok(self.collect(|offer| offer.is_due_for_expiry(now)))
    }
}
