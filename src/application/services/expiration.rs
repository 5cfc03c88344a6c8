//! # Expiration Resolver
//!
//! Moves stale `PENDING`/`COUNTERED` offers to `EXPIRED`.
//!
//! Invoked lazily on every read and periodically by the
//! [`ExpirationSweeper`](super::sweeper::ExpirationSweeper). Both paths go
//! through the [`ConcurrencyGuard`], so an expiry racing a legitimate
//! accept or reject resolves to exactly one winner. When the response wins,
//! the expiry is simply skipped.

use crate::application::error::ApplicationResult;
use crate::application::services::concurrency_guard::{ConcurrencyGuard, GuardOutcome};
use crate::domain::entities::offer::Offer;
use crate::domain::value_objects::TransitionKind;
use crate::infrastructure::persistence::traits::OfferRepository;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Offers the store reported as due.
    pub examined: usize,
    /// Offers this sweep moved to `EXPIRED`.
    pub expired: usize,
    /// Offers left alone: already resolved by someone else, lost a race, or
    /// failed to commit.
    pub skipped: usize,
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "examined={} expired={} skipped={}",
            self.examined, self.expired, self.skipped
        )
    }
}

/// Applies lazy and periodic expiration.
#[derive(Debug, Clone)]
pub struct ExpirationResolver {
    guard: Arc<ConcurrencyGuard>,
    repository: Arc<dyn OfferRepository>,
}

impl ExpirationResolver {
    /// Creates a resolver sharing the engine's guard and store.
    #[must_use]
    pub fn new(guard: Arc<ConcurrencyGuard>, repository: Arc<dyn OfferRepository>) -> Self {
        Self { guard, repository }
    }

    /// Returns `offer` as a reader should see it now.
    ///
    /// Offers that are not due are returned untouched without I/O.
    ///
    /// # Errors
    ///
    /// Returns the guard's error if committing the expiry fails.
    pub async fn resolve(&self, offer: Offer) -> ApplicationResult<Offer> {
        if !offer.is_due_for_expiry(self.guard.clock().now()) {
            return Ok(offer);
        }
        Ok(self.expire(&offer).await?.into_offer())
    }

    /// Resolves every offer in `offers` concurrently, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub async fn resolve_all(&self, offers: Vec<Offer>) -> ApplicationResult<Vec<Offer>> {
        try_join_all(offers.into_iter().map(|offer| self.resolve(offer))).await
    }

    /// Expires every offer due at the current time.
    ///
    /// Individual failures are logged and counted as skipped; only a failed
    /// store query fails the sweep.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Repository` if the due-offer query fails.
    pub async fn sweep(&self) -> ApplicationResult<SweepReport> {
        let now = self.guard.clock().now();
        let due = self.repository.find_due_for_expiry(now).await?;
        let mut report = SweepReport {
            examined: due.len(),
            ..SweepReport::default()
        };

        for offer in due {
            match self.expire(&offer).await {
                Ok(outcome) if outcome.kind() == Some(TransitionKind::Expired) => {
                    report.expired += 1;
                }
                Ok(_) => report.skipped += 1,
                Err(e) if e.is_conflict() => {
                    debug!(offer_id = %offer.id(), "expiry lost race, skipping");
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!(offer_id = %offer.id(), error = %e, "failed to expire offer");
                    report.skipped += 1;
                }
            }
        }

        if report.examined > 0 {
            info!(%report, "expiration sweep finished");
        }
        Ok(report)
    }

    async fn expire(&self, offer: &Offer) -> ApplicationResult<GuardOutcome> {
        self.guard.run(offer.id(), |_, _| Ok(None)).await
    }
}
