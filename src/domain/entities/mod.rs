//! # Domain Entities
//!
//! ## Aggregates
//!
//! - [`Offer`]: Negotiation record with its counter-offer chain
//!
//! ## Entities
//!
//! - [`CounterOffer`]: One turn in the negotiation chain

pub mod counter_offer;
pub mod offer;

pub use counter_offer::CounterOffer;
pub use offer::{INITIAL_VERSION, Offer, PaymentRequest};
