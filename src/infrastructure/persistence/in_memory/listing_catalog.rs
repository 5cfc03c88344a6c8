//! # In-Memory Listing Catalog
//!
//! In-memory implementation of [`ListingCatalog`] for tests and demos.

use crate::application::error::ApplicationResult;
use crate::application::services::listing_catalog::{ListingCatalog, ListingSnapshot};
use crate::domain::value_objects::ListingId;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory implementation of [`ListingCatalog`].
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryListingCatalog {
    listings: Arc<DashMap<ListingId, ListingSnapshot>>,
}

impl InMemoryListingCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a listing.
    pub fn upsert(&self, snapshot: ListingSnapshot) {
        self.listings.insert(snapshot.listing_id.clone(), snapshot);
    }

    /// Removes a listing, returning true if it existed.
    pub fn remove(&self, listing_id: &ListingId) -> bool {
        self.listings.remove(listing_id).is_some()
    }
}

#[async_trait]
impl ListingCatalog for InMemoryListingCatalog {
    async fn snapshot(&self, listing_id: &ListingId) -> ApplicationResult<Option<ListingSnapshot>> {
        Ok(self.listings.get(listing_id).map(|entry| entry.value().clone()))
    }
}
