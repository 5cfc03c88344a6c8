//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`OfferId`], [`CounterOfferId`], [`EventId`]: UUID-based identifiers
//! - [`UserId`], [`ListingId`]: String-based identifiers
//!
//! ## Numeric and Time Types
//!
//! - [`Amount`]: Decimal money amount
//! - [`Timestamp`]: UTC point in time
//!
//! ## Domain Enums
//!
//! - [`OfferStatus`]: Offer lifecycle states
//! - [`Side`], [`Role`], [`TransitionKind`]

pub mod amount;
pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod offer_status;
pub mod timestamp;

pub use amount::Amount;
pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic};
pub use enums::{Role, Side, TransitionKind};
pub use ids::{CounterOfferId, EventId, ListingId, OfferId, UserId};
pub use offer_status::{InvalidOfferStatusError, OfferStatus};
pub use timestamp::Timestamp;
