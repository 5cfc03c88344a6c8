//! # Domain Event Trait
//!
//! Base trait for events published by the negotiation engine.
//!
//! # Examples
//!
//! ```
//! use offer_negotiation::domain::events::domain_event::EventMetadata;
//! use offer_negotiation::domain::value_objects::{OfferId, Timestamp};
//!
//! let at = Timestamp::from_secs(1_700_000_000).unwrap();
//! let metadata = EventMetadata::for_offer(OfferId::new_v4(), at);
//! assert_eq!(metadata.timestamp, at);
//! ```

use crate::domain::value_objects::{EventId, OfferId, Timestamp};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait for all domain events.
///
/// Events are immutable records of a committed state change.
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Returns the unique identifier for this event.
    fn event_id(&self) -> EventId;

    /// Returns the offer this event relates to.
    fn offer_id(&self) -> OfferId;

    /// Returns when this event occurred.
    fn timestamp(&self) -> Timestamp;

    /// Returns the human-readable name of this event.
    fn event_name(&self) -> &'static str;
}

/// Metadata shared by every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    /// Unique identifier for this event.
    pub event_id: EventId,
    /// The offer this event relates to.
    pub offer_id: OfferId,
    /// When this event occurred.
    pub timestamp: Timestamp,
}

impl EventMetadata {
    /// Creates metadata with a generated event ID.
    ///
    /// `timestamp` comes from the engine's clock, not the wall clock.
    #[must_use]
    pub fn for_offer(offer_id: OfferId, timestamp: Timestamp) -> Self {
        Self {
            event_id: EventId::new_v4(),
            offer_id,
            timestamp,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn for_offer_generates_distinct_ids() {
        let offer_id = OfferId::new_v4();
        let at = Timestamp::from_secs(1_000).unwrap();
        let a = EventMetadata::for_offer(offer_id, at);
        let b = EventMetadata::for_offer(offer_id, at);

        assert_eq!(a.offer_id, offer_id);
        assert_ne!(a.event_id, b.event_id);
    }

    #[test]
    fn serializes_camel_case() {
        let metadata = EventMetadata::for_offer(OfferId::new_v4(), Timestamp::from_secs(0).unwrap());
        let json = serde_json::to_value(metadata).unwrap();
        assert!(json.get("eventId").is_some());
        assert!(json.get("offerId").is_some());
    }
}
