//! # Event Publishers
//!
//! [`OfferEventPublisher`] adapters.
//!
//! - [`LoggingEventPublisher`]: Emits each event as a structured log line
//! - [`InMemoryEventPublisher`]: Records events for inspection in tests

use crate::application::error::ApplicationResult;
use crate::application::services::notification::OfferEventPublisher;
use crate::domain::events::{DomainEvent, OfferTransitioned};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Publishes events to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEventPublisher;

#[async_trait]
impl OfferEventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: &OfferTransitioned) -> ApplicationResult<()> {
        tracing::info!(
            event_id = %event.event_id(),
            offer_id = %event.offer_id(),
            event = event.event_name(),
            kind = %event.kind,
            listing_id = %event.offer.listing_id(),
            status = %event.offer.status(),
            amount = %event.offer.current_amount(),
            version = event.offer.version(),
            "offer transition"
        );
        Ok(())
    }
}

/// Records published events.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    events: Arc<Mutex<Vec<OfferTransitioned>>>,
}

impl InMemoryEventPublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event published so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<OfferTransitioned> {
        self.events.lock().clone()
    }

    /// Returns the number of events published so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl OfferEventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: &OfferTransitioned) -> ApplicationResult<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::services::state_machine::{OfferDraft, OfferStateMachine};
    use crate::domain::value_objects::{Amount, ListingId, Timestamp, TransitionKind, UserId};

    fn event() -> OfferTransitioned {
        let offer = OfferStateMachine::default()
            .create(
                OfferDraft {
                    listing_id: ListingId::new("listing"),
                    buyer_id: UserId::new("buyer"),
                    seller_id: UserId::new("seller"),
                    listing_price: Amount::from_cents(10000),
                    amount: Amount::from_cents(7000),
                    message: None,
                },
                Timestamp::from_secs(1_700_000_000).unwrap(),
            )
            .unwrap()
            .offer;
        OfferTransitioned::for_offer(&offer, TransitionKind::Created)
    }

    #[tokio::test]
    async fn in_memory_records_in_order() {
        let publisher = InMemoryEventPublisher::new();
        let shared = publisher.clone();
        let first = event();
        let second = event();

        publisher.publish(&first).await.unwrap();
        shared.publish(&second).await.unwrap();

        assert_eq!(publisher.events(), vec![first, second]);
        assert_eq!(shared.len(), 2);
    }

    #[tokio::test]
    async fn logging_never_fails() {
        assert!(LoggingEventPublisher.publish(&event()).await.is_ok());
    }
}
