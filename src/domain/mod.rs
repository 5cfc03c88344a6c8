//! # Domain Layer
//!
//! Pure negotiation model: value objects, the offer aggregate, the rule set
//! and the state machine. Nothing in this layer performs I/O.

pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
