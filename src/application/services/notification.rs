//! # Notification Hook
//!
//! Port to the notification collaborator.
//!
//! The engine publishes only the expirations it commits itself; every other
//! transition is returned to the caller, which notifies on its own.
//! Delivery and retry semantics belong to the implementation.

use crate::application::error::ApplicationResult;
use crate::domain::events::OfferTransitioned;
use async_trait::async_trait;
use std::fmt;

/// Receives committed offer transitions.
#[async_trait]
pub trait OfferEventPublisher: Send + Sync + fmt::Debug {
    /// Publishes one event.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Publish` if delivery fails. The engine
    /// logs the failure and carries on.
    async fn publish(&self, event: &OfferTransitioned) -> ApplicationResult<()>;
}

/// Publisher that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventPublisher;

#[async_trait]
impl OfferEventPublisher for NoopEventPublisher {
    async fn publish(&self, _event: &OfferTransitioned) -> ApplicationResult<()> {
        Ok(())
    }
}
