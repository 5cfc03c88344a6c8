//! # Repository Traits
//!
//! Port definitions for offer persistence.
//!
//! The store is the only shared mutable resource in the system. Every write
//! after the initial insert goes through
//! [`OfferRepository::compare_and_swap`], which commits only if the stored
//! version still equals the version the writer read.
//!
//! # Examples
//!
//! ```ignore
//! use offer_negotiation::infrastructure::persistence::traits::OfferRepository;
//!
//! async fn bump(repo: &impl OfferRepository, offer: &Offer) {
//!     let committed = repo.compare_and_swap(offer.version(), offer).await?;
//!     assert_eq!(committed.version(), offer.version() + 1);
//! }
//! ```

use crate::domain::entities::offer::Offer;
use crate::domain::value_objects::{OfferId, Timestamp, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Optimistic locking conflict.
    #[error(
        "Version conflict: {entity_type} with id {id} expected version {expected}, found {actual}"
    )]
    VersionConflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
        /// Expected version.
        expected: u64,
        /// Actual version.
        actual: u64,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a version conflict error.
    #[must_use]
    pub fn version_conflict(
        entity_type: &'static str,
        id: impl Into<String>,
        expected: u64,
        actual: u64,
    ) -> Self {
        Self::VersionConflict {
            entity_type,
            id: id.into(),
            expected,
            actual,
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if this is a version conflict error.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Returns true if the backing store was unreachable.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for offer aggregates.
///
/// Implementations must make [`compare_and_swap`](Self::compare_and_swap)
/// atomic per offer: the version check and the write are one step.
#[async_trait]
pub trait OfferRepository: Send + Sync + fmt::Debug {
    /// Stores a newly created offer as-is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the ID is already stored.
    async fn insert(&self, offer: &Offer) -> RepositoryResult<()>;

    /// Gets an offer by ID.
    ///
    /// Returns `None` if the offer does not exist.
    async fn get(&self, id: &OfferId) -> RepositoryResult<Option<Offer>>;

    /// Replaces the stored offer if its version still equals
    /// `expected_version`, storing `offer` with version `expected_version + 1`.
    ///
    /// Returns the committed record.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the offer does not exist
    /// - `RepositoryError::VersionConflict` if another writer committed first
    async fn compare_and_swap(&self, expected_version: u64, offer: &Offer)
    -> RepositoryResult<Offer>;

    /// Finds offers where `user` is the buyer.
    async fn find_by_buyer(&self, user: &UserId) -> RepositoryResult<Vec<Offer>>;

    /// Finds offers where `user` is the seller.
    async fn find_by_seller(&self, user: &UserId) -> RepositoryResult<Vec<Offer>>;

    /// Finds active offers whose deadline is at or before `now`.
    async fn find_due_for_expiry(&self, now: Timestamp) -> RepositoryResult<Vec<Offer>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_conflict_reports_versions() {
        let err = RepositoryError::version_conflict("Offer", "offer-1", 3, 4);
        assert!(err.is_version_conflict());
        assert!(err.to_string().contains("offer-1"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn helpers_build_matching_variants() {
        assert!(RepositoryError::not_found("Offer", "x").is_not_found());
        assert!(RepositoryError::duplicate("Offer", "x").is_duplicate());
        assert!(RepositoryError::connection("refused").is_transient());
        assert!(!RepositoryError::serialization("bad json").is_transient());
    }
}
