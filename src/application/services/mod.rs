//! # Application Services
//!
//! Services that compose the pure domain with storage and collaborators.
//!
//! - [`NegotiationEngine`]: The public facade
//! - [`ConcurrencyGuard`]: Optimistic compare-and-swap retry loop
//! - [`ExpirationResolver`]: Lazy and periodic expiry
//! - [`ExpirationSweeper`]: Background sweep task
//! - [`ListingCatalog`], [`OfferEventPublisher`]: Collaborator ports

pub mod concurrency_guard;
pub mod expiration;
pub mod listing_catalog;
pub mod negotiation_engine;
pub mod notification;
pub mod sweeper;

pub use concurrency_guard::{ConcurrencyGuard, GuardOutcome};
pub use expiration::{ExpirationResolver, SweepReport};
pub use listing_catalog::{ListingCatalog, ListingSnapshot};
pub use negotiation_engine::{NegotiationEngine, NegotiationEngineBuilder};
pub use notification::{NoopEventPublisher, OfferEventPublisher};
pub use sweeper::{ExpirationSweeper, SweeperHandle};
