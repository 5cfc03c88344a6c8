//! # Infrastructure Layer
//!
//! Adapters for the engine's ports.
//!
//! - [`persistence`]: Offer storage (in-memory, PostgreSQL)
//! - [`notifications`]: Event publishers

pub mod notifications;
pub mod persistence;
