//! # Concurrency Guard
//!
//! Optimistic compare-and-swap loop around every offer mutation.
//!
//! # Attempt
//!
//! ```text
//! read ──► due for expiry? ──yes──► CAS(expire) ──conflict──► retry
//!               │no                     │ok
//!               ▼                        ▼
//!          step(current) ◄───────── publish Expired
//!               │
//!     None ─────┼──── Some(candidate) ──► CAS ──conflict──► retry
//!       │                                  │ok
//!       ▼                                  ▼
//!   Unchanged                          Committed
//! ```
//!
//! Domain errors from `step` are returned immediately and never retried.
//! Only version conflicts are retried, up to `max_attempts` reads; after
//! that the caller gets [`ApplicationError::Conflict`].

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::notification::OfferEventPublisher;
use crate::domain::entities::offer::Offer;
use crate::domain::events::OfferTransitioned;
use crate::domain::services::clock::Clock;
use crate::domain::services::state_machine::{OfferAction, OfferStateMachine, Transition};
use crate::domain::value_objects::{OfferId, Timestamp, TransitionKind};
use crate::infrastructure::persistence::traits::OfferRepository;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default number of read-validate-swap attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Result of a guarded run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// A transition was committed; `offer` carries the new version.
    Committed {
        /// The committed record.
        offer: Offer,
        /// What changed.
        kind: TransitionKind,
    },
    /// Nothing needed to change.
    Unchanged(Offer),
}

impl GuardOutcome {
    /// Returns the resulting record.
    #[must_use]
    pub fn offer(&self) -> &Offer {
        match self {
            Self::Committed { offer, .. } | Self::Unchanged(offer) => offer,
        }
    }

    /// Consumes the outcome, returning the resulting record.
    #[must_use]
    pub fn into_offer(self) -> Offer {
        match self {
            Self::Committed { offer, .. } | Self::Unchanged(offer) => offer,
        }
    }

    /// Returns the committed transition kind, if any.
    #[must_use]
    pub fn kind(&self) -> Option<TransitionKind> {
        match self {
            Self::Committed { kind, .. } => Some(*kind),
            Self::Unchanged(_) => None,
        }
    }
}

/// Runs offer mutations under optimistic concurrency.
#[derive(Debug, Clone)]
pub struct ConcurrencyGuard {
    repository: Arc<dyn OfferRepository>,
    machine: Arc<OfferStateMachine>,
    clock: Arc<dyn Clock>,
    publisher: Arc<dyn OfferEventPublisher>,
    max_attempts: u32,
}

impl ConcurrencyGuard {
    /// Creates a guard.
    ///
    /// `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(
        repository: Arc<dyn OfferRepository>,
        machine: Arc<OfferStateMachine>,
        clock: Arc<dyn Clock>,
        publisher: Arc<dyn OfferEventPublisher>,
        max_attempts: u32,
    ) -> Self {
        Self {
            repository,
            machine,
            clock,
            publisher,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Returns the retry budget.
    #[inline]
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the clock shared with the guard.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Reads offer `id`, expires it if due, then commits whatever `step`
    /// computes from the fresh record.
    ///
    /// `step` is re-run against a re-read record after every version
    /// conflict, so it must be a pure function of its inputs.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` if the offer does not exist
    /// - `ApplicationError::Domain` if `step` rejects the action
    /// - `ApplicationError::Conflict` once the retry budget is spent
    /// - `ApplicationError::Repository` on store failures
    pub async fn run<F>(&self, id: OfferId, mut step: F) -> ApplicationResult<GuardOutcome>
    where
        F: FnMut(&Offer, Timestamp) -> ApplicationResult<Option<Transition>> + Send,
    {
        for attempt in 1..=self.max_attempts {
            let now = self.clock.now();
            let mut current = self
                .repository
                .get(&id)
                .await?
                .ok_or_else(|| ApplicationError::not_found("Offer", id.to_string()))?;

            let mut expired_here = false;
            if current.is_due_for_expiry(now) {
                let expiry = self.machine.apply(&current, OfferAction::Expire, now)?;
                let Some(committed) = self.commit(&current, &expiry.offer, attempt).await? else {
                    continue;
                };
                info!(
                    offer_id = %id,
                    version = committed.version(),
                    expires_at = %committed.expires_at(),
                    "offer expired"
                );
                self.publish(&committed, TransitionKind::Expired).await;
                current = committed;
                expired_here = true;
            }

            let Some(candidate) = step(&current, now)? else {
                return Ok(if expired_here {
                    GuardOutcome::Committed {
                        offer: current,
                        kind: TransitionKind::Expired,
                    }
                } else {
                    GuardOutcome::Unchanged(current)
                });
            };

            if let Some(committed) = self.commit(&current, &candidate.offer, attempt).await? {
                return Ok(GuardOutcome::Committed {
                    offer: committed,
                    kind: candidate.kind,
                });
            }
        }

        warn!(
            offer_id = %id,
            attempts = self.max_attempts,
            "concurrency retry budget exhausted"
        );
        Err(ApplicationError::conflict(id, self.max_attempts))
    }

    /// Attempts one compare-and-swap. `Ok(None)` means another writer won.
    async fn commit(
        &self,
        read: &Offer,
        candidate: &Offer,
        attempt: u32,
    ) -> ApplicationResult<Option<Offer>> {
        match self
            .repository
            .compare_and_swap(read.version(), candidate)
            .await
        {
            Ok(committed) => Ok(Some(committed)),
            Err(e) if e.is_version_conflict() => {
                debug!(
                    offer_id = %read.id(),
                    version = read.version(),
                    attempt,
                    error = %e,
                    "version conflict, retrying"
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn publish(&self, offer: &Offer, kind: TransitionKind) {
        let event = OfferTransitioned::for_offer(offer, kind);
        if let Err(e) = self.publisher.publish(&event).await {
            warn!(
                offer_id = %offer.id(),
                error = %e,
                "failed to publish offer transition"
            );
        }
    }
}
