//! # Application Layer
//!
//! Use-case orchestration: the negotiation engine, its concurrency guard and
//! expiration handling.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, ErrorKind};
