//! # In-Memory Adapters
//!
//! In-memory implementations for tests and single-process use.
//!
//! - [`InMemoryOfferRepository`]: Offer persistence
//! - [`InMemoryListingCatalog`]: Listing snapshots
//!
//! Both are backed by [`dashmap::DashMap`] and cheap to clone; clones share
//! storage.

pub mod listing_catalog;
pub mod offer_repository;

pub use listing_catalog::InMemoryListingCatalog;
pub use offer_repository::InMemoryOfferRepository;
