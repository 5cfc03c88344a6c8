//! # Domain Events
//!
//! Events emitted when an offer changes state.
//!
//! - [`OfferTransitioned`]: An offer was created, countered, accepted, rejected or expired

pub mod domain_event;
pub mod offer_events;

pub use domain_event::{DomainEvent, EventMetadata};
pub use offer_events::OfferTransitioned;
