//! # Offer Events
//!
//! Notification payload describing a committed offer transition.
//!
//! The engine publishes [`OfferTransitioned`] itself only for expirations,
//! which no caller initiates. For every other transition the caller builds
//! one from the returned offer with [`OfferTransitioned::for_offer`] and
//! hands it to its notification collaborator.

use crate::domain::entities::offer::Offer;
use crate::domain::events::domain_event::{DomainEvent, EventMetadata};
use crate::domain::value_objects::{EventId, OfferId, Timestamp, TransitionKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An offer changed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferTransitioned {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// What happened.
    pub kind: TransitionKind,
    /// The committed record, including listing, parties, chain and deadline.
    pub offer: Offer,
}

impl OfferTransitioned {
    /// Builds the event for a committed offer, stamped with its `updated_at`.
    #[must_use]
    pub fn for_offer(offer: &Offer, kind: TransitionKind) -> Self {
        Self {
            metadata: EventMetadata::for_offer(offer.id(), offer.updated_at()),
            kind,
            offer: offer.clone(),
        }
    }
}

impl DomainEvent for OfferTransitioned {
    fn event_id(&self) -> EventId {
        self.metadata.event_id
    }

    fn offer_id(&self) -> OfferId {
        self.metadata.offer_id
    }

    fn timestamp(&self) -> Timestamp {
        self.metadata.timestamp
    }

    fn event_name(&self) -> &'static str {
        "OfferTransitioned"
    }
}
