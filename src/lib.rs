//! # Offer Negotiation
//!
//! Engine for buyer/seller price negotiation on marketplace listings.
//!
//! A buyer opens an [`Offer`](domain::entities::Offer) below the asking
//! price. The parties then alternate counter-offers that move toward each
//! other until one side accepts, one side rejects, or the offer expires.
//! Every mutation is linearized per offer through an optimistic version
//! token, so racing actions resolve to exactly one winner.
//!
//! ## Layers
//!
//! - [`domain`]: Value objects, the offer aggregate, rules and state machine (pure)
//! - [`application`]: [`NegotiationEngine`](application::services::NegotiationEngine),
//!   concurrency guard, expiration
//! - [`infrastructure`]: In-memory and PostgreSQL stores, event publishers
//! - [`config`], [`telemetry`]: Deployment configuration and logging

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

pub use application::error::{ApplicationError, ApplicationResult, ErrorKind};
pub use application::services::NegotiationEngine;
pub use config::EngineConfig;
