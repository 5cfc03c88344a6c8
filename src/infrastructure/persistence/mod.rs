//! # Persistence Layer
//!
//! ## Repository Traits (Ports)
//!
//! - [`OfferRepository`]: Offer storage with optimistic concurrency
//!
//! ## Implementations
//!
//! - `in_memory`: DashMap-backed adapters for tests and single-process use
//! - `postgres`: PostgreSQL adapter via sqlx

pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use traits::{OfferRepository, RepositoryError, RepositoryResult};
