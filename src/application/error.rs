//! # Application Errors
//!
//! Error types for the negotiation engine.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)          - Business rule violations, never retried
//! ├── Repository(RepositoryError)  - Store failures
//! ├── NotFound                     - Unknown offer or listing
//! ├── Conflict                     - Concurrency guard gave up
//! ├── Listing(String)              - Listing collaborator failed
//! ├── Publish(String)              - Notification hook failed
//! └── Configuration(String)        - Invalid engine configuration
//! ```
//!
//! Callers translate errors into user-facing messages by matching on
//! [`ApplicationError::kind`].
//!
//! # Examples
//!
//! ```
//! use offer_negotiation::application::error::{ApplicationError, ErrorKind};
//!
//! let err = ApplicationError::not_found("Offer", "offer-123");
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//!
//! let err = ApplicationError::conflict("offer-123", 3);
//! assert_eq!(err.kind(), ErrorKind::Conflict);
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Caller-facing error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Actor is not a party, or not the party whose turn it is.
    NotAuthorized,
    /// Mutation attempted on a terminal offer.
    NotActive,
    /// Alternation violated.
    WrongTurn,
    /// Counter moved the price the wrong way.
    WrongDirection,
    /// Amount outside floor/ceiling.
    OutOfBounds,
    /// Concurrency retries exhausted; refresh and retry.
    Conflict,
    /// Unknown offer or listing.
    NotFound,
    /// Malformed request.
    InvalidInput,
    /// Store or collaborator unavailable.
    Unavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::NotActive => "NOT_ACTIVE",
            Self::WrongTurn => "WRONG_TURN",
            Self::WrongDirection => "WRONG_DIRECTION",
            Self::OutOfBounds => "OUT_OF_BOUNDS",
            Self::Conflict => "CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidInput => "INVALID_INPUT",
            Self::Unavailable => "UNAVAILABLE",
        };
        f.write_str(s)
    }
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Store failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: &'static str,
        /// Resource identifier.
        id: String,
    },

    /// Concurrency guard retry budget exhausted.
    #[error("conflict: offer {offer_id} changed concurrently {attempts} times, refresh and retry")]
    Conflict {
        /// Offer being written.
        offer_id: String,
        /// Attempts made.
        attempts: u32,
    },

    /// Listing collaborator failure.
    #[error("listing lookup failed: {0}")]
    Listing(String),

    /// Notification hook failure.
    #[error("event publishing error: {0}")]
    Publish(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(offer_id: impl fmt::Display, attempts: u32) -> Self {
        Self::Conflict {
            offer_id: offer_id.to_string(),
            attempts,
        }
    }

    /// Creates a listing collaborator error.
    #[must_use]
    pub fn listing(message: impl Into<String>) -> Self {
        Self::Listing(message.into())
    }

    /// Creates an event publish error.
    #[must_use]
    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Maps this error onto the caller-facing taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => match e {
                DomainError::NotAuthorized(_) => ErrorKind::NotAuthorized,
                DomainError::NotActive { .. } | DomainError::InvalidStatusTransition { .. } => {
                    ErrorKind::NotActive
                }
                DomainError::WrongTurn { .. } => ErrorKind::WrongTurn,
                DomainError::WrongDirection { .. } => ErrorKind::WrongDirection,
                DomainError::OutOfBounds { .. } | DomainError::Arithmetic(_) => {
                    ErrorKind::OutOfBounds
                }
                DomainError::NotYetExpired { .. }
                | DomainError::MessageTooLong { .. }
                | DomainError::ValidationError(_) => ErrorKind::InvalidInput,
            },
            Self::Repository(e) => match e {
                RepositoryError::NotFound { .. } => ErrorKind::NotFound,
                RepositoryError::VersionConflict { .. } | RepositoryError::Duplicate { .. } => {
                    ErrorKind::Conflict
                }
                _ => ErrorKind::Unavailable,
            },
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Listing(_) | Self::Publish(_) => ErrorKind::Unavailable,
            Self::Configuration(_) => ErrorKind::InvalidInput,
        }
    }

    /// Returns true if the caller may retry the same request unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Conflict { .. } | Self::Listing(_) => true,
            Self::Repository(e) => e.is_transient() || e.is_version_conflict(),
            _ => false,
        }
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns true if this is a concurrency conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Amount, OfferStatus, Side};

    mod kind {
        use super::*;

        #[test]
        fn domain_errors_map_to_taxonomy() {
            let cases = [
                (DomainError::not_authorized("x"), ErrorKind::NotAuthorized),
                (
                    DomainError::NotActive {
                        status: OfferStatus::Expired,
                    },
                    ErrorKind::NotActive,
                ),
                (
                    DomainError::WrongTurn {
                        expected: Side::Buyer,
                        actual: Side::Seller,
                    },
                    ErrorKind::WrongTurn,
                ),
                (
                    DomainError::WrongDirection {
                        side: Side::Buyer,
                        previous: Amount::from_cents(7000),
                        proposed: Amount::from_cents(6000),
                    },
                    ErrorKind::WrongDirection,
                ),
                (
                    DomainError::OutOfBounds {
                        amount: Amount::from_cents(4000),
                        floor: Amount::from_cents(5000),
                        ceiling: Amount::from_cents(10000),
                    },
                    ErrorKind::OutOfBounds,
                ),
                (
                    DomainError::MessageTooLong { length: 2, max: 1 },
                    ErrorKind::InvalidInput,
                ),
            ];

            for (err, kind) in cases {
                assert_eq!(ApplicationError::from(err).kind(), kind);
            }
        }

        #[test]
        fn repository_errors_map_to_taxonomy() {
            let err: ApplicationError = RepositoryError::not_found("Offer", "o").into();
            assert_eq!(err.kind(), ErrorKind::NotFound);

            let err: ApplicationError = RepositoryError::version_conflict("Offer", "o", 1, 2).into();
            assert_eq!(err.kind(), ErrorKind::Conflict);

            let err: ApplicationError = RepositoryError::connection("refused").into();
            assert_eq!(err.kind(), ErrorKind::Unavailable);
            assert!(err.is_retryable());
        }

        #[test]
        fn kind_display() {
            assert_eq!(ErrorKind::WrongDirection.to_string(), "WRONG_DIRECTION");
            assert_eq!(ErrorKind::Conflict.to_string(), "CONFLICT");
        }
    }

    #[test]
    fn conflict_is_retryable() {
        let err = ApplicationError::conflict("offer-1", 3);
        assert!(err.is_retryable());
        assert!(err.is_conflict());
        assert!(err.to_string().contains("offer-1"));
    }

    #[test]
    fn business_rule_errors_are_not_retryable() {
        let err: ApplicationError = DomainError::not_authorized("nope").into();
        assert!(!err.is_retryable());
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_helper() {
        let err = ApplicationError::not_found("Listing", "listing-9");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("listing-9"));
    }
}
