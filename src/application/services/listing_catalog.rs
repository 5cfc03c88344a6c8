//! # Listing Catalog
//!
//! Port to the listing collaborator.
//!
//! The engine consults the catalog once, at offer creation, and keeps the
//! returned price as an immutable snapshot on the offer.

use crate::application::error::ApplicationResult;
use crate::domain::value_objects::{Amount, ListingId, UserId};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The parts of a listing an offer depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingSnapshot {
    /// The listing.
    pub listing_id: ListingId,
    /// Listing owner.
    pub seller_id: UserId,
    /// Current asking price.
    pub price: Amount,
}

impl ListingSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(listing_id: ListingId, seller_id: UserId, price: Amount) -> Self {
        Self {
            listing_id,
            seller_id,
            price,
        }
    }
}

/// Read-only access to listings.
#[async_trait]
pub trait ListingCatalog: Send + Sync + fmt::Debug {
    /// Returns the current snapshot of a listing.
    ///
    /// Returns `Ok(None)` if the listing does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Listing` if the collaborator fails.
    async fn snapshot(&self, listing_id: &ListingId) -> ApplicationResult<Option<ListingSnapshot>>;
}
