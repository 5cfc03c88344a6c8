//! # PostgreSQL Adapters
//!
//! - [`PostgresOfferRepository`]: Offer persistence with conditional-update compare-and-swap

pub mod offer_repository;

pub use offer_repository::PostgresOfferRepository;
