//! # Domain Services
//!
//! Pure negotiation logic that doesn't belong to a single entity.
//!
//! ## Services
//!
//! - [`clock::Clock`]: Injected source of the current time
//! - [`rules::NegotiationRules`]: Validation of every negotiation move
//! - [`state_machine::OfferStateMachine`]: Computes the next offer record

pub mod clock;
pub mod rules;
pub mod state_machine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use rules::NegotiationRules;
pub use state_machine::{OfferAction, OfferDraft, OfferStateMachine, Transition};
