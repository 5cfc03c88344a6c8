//! # PostgreSQL Offer Repository
//!
//! PostgreSQL implementation of [`OfferRepository`] using sqlx.
//!
//! One row per offer. The counter-offer chain is stored as a JSONB array in
//! insertion order; timestamps are Unix milliseconds. Compare-and-swap is a
//! single conditional `UPDATE ... WHERE id = $1 AND version = $2`, so the
//! database row lock provides the per-offer atomicity.

use crate::domain::entities::counter_offer::CounterOffer;
use crate::domain::entities::offer::Offer;
use crate::domain::value_objects::{
    Amount, ListingId, OfferId, OfferStatus, Timestamp, UserId,
};
use crate::infrastructure::persistence::traits::{
    OfferRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const ENTITY: &str = "Offer";

const SELECT_COLUMNS: &str = r#"
    id, listing_id, buyer_id, seller_id, listing_price, initial_amount,
    initial_message, status, counter_offers, expires_at, version,
    created_at, updated_at
"#;

/// PostgreSQL implementation of [`OfferRepository`].
///
/// # Examples
///
/// ```ignore
/// use sqlx::PgPool;
/// use offer_negotiation::infrastructure::persistence::postgres::PostgresOfferRepository;
///
/// let pool = PgPool::connect("postgres://...").await?;
/// let repo = PostgresOfferRepository::new(pool);
/// repo.ensure_schema().await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresOfferRepository {
    pool: PgPool,
}

impl PostgresOfferRepository {
    /// Creates a new PostgreSQL offer repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `offers` table and its indexes if missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a DDL statement fails.
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS offers (
                id              UUID PRIMARY KEY,
                listing_id      TEXT NOT NULL,
                buyer_id        TEXT NOT NULL,
                seller_id       TEXT NOT NULL,
                listing_price   NUMERIC NOT NULL,
                initial_amount  NUMERIC NOT NULL,
                initial_message TEXT,
                status          TEXT NOT NULL,
                counter_offers  JSONB NOT NULL DEFAULT '[]'::jsonb,
                expires_at      BIGINT NOT NULL,
                version         BIGINT NOT NULL,
                created_at      BIGINT NOT NULL,
                updated_at      BIGINT NOT NULL,
                CHECK (buyer_id <> seller_id)
            )
            "#,
            "CREATE INDEX IF NOT EXISTS offers_buyer_idx ON offers (buyer_id)",
            "CREATE INDEX IF NOT EXISTS offers_seller_idx ON offers (seller_id)",
            r#"
            CREATE INDEX IF NOT EXISTS offers_active_expiry_idx ON offers (expires_at)
            WHERE status IN ('PENDING', 'COUNTERED')
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        }
        Ok(())
    }

    async fn fetch_where(&self, clause: &str, bind: Bind<'_>) -> RepositoryResult<Vec<Offer>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM offers WHERE {clause} ORDER BY created_at DESC");
        let query = sqlx::query_as::<_, OfferRow>(&sql);
        let query = match bind {
            Bind::Text(value) => query.bind(value),
            Bind::Millis(value) => query.bind(value),
        };

        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx_error)?;
        rows.into_iter().map(OfferRow::try_into_offer).collect()
    }
}

enum Bind<'a> {
    Text(&'a str),
    Millis(i64),
}

#[async_trait]
impl OfferRepository for PostgresOfferRepository {
    async fn insert(&self, offer: &Offer) -> RepositoryResult<()> {
        let counters = counters_to_json(offer.counter_offers())?;
        let version = version_to_db(offer.version())?;

        sqlx::query(
            r#"
            INSERT INTO offers (
                id, listing_id, buyer_id, seller_id, listing_price, initial_amount,
                initial_message, status, counter_offers, expires_at, version,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(offer.id().get())
        .bind(offer.listing_id().as_str())
        .bind(offer.buyer_id().as_str())
        .bind(offer.seller_id().as_str())
        .bind(offer.listing_price().get())
        .bind(offer.initial_amount().get())
        .bind(offer.initial_message())
        .bind(offer.status().as_str())
        .bind(counters)
        .bind(offer.expires_at().timestamp_millis())
        .bind(version)
        .bind(offer.created_at().timestamp_millis())
        .bind(offer.updated_at().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::duplicate(ENTITY, offer.id().to_string())
            } else {
                map_sqlx_error(e)
            }
        })?;

        Ok(())
    }

    async fn get(&self, id: &OfferId) -> RepositoryResult<Option<Offer>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM offers WHERE id = $1");
        let row: Option<OfferRow> = sqlx::query_as(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(OfferRow::try_into_offer).transpose()
    }

    async fn compare_and_swap(
        &self,
        expected_version: u64,
        offer: &Offer,
    ) -> RepositoryResult<Offer> {
        let expected = version_to_db(expected_version)?;
        let counters = counters_to_json(offer.counter_offers())?;

        let sql = format!(
            r#"
            UPDATE offers
            SET status = $3,
                counter_offers = $4,
                expires_at = $5,
                updated_at = $6,
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING {SELECT_COLUMNS}
            "#
        );
        let updated: Option<OfferRow> = sqlx::query_as(&sql)
            .bind(offer.id().get())
            .bind(expected)
            .bind(offer.status().as_str())
            .bind(counters)
            .bind(offer.expires_at().timestamp_millis())
            .bind(offer.updated_at().timestamp_millis())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if let Some(row) = updated {
            return row.try_into_offer();
        }

        let current: Option<(i64,)> = sqlx::query_as("SELECT version FROM offers WHERE id = $1")
            .bind(offer.id().get())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        match current {
            None => Err(RepositoryError::not_found(ENTITY, offer.id().to_string())),
            Some((actual,)) => Err(RepositoryError::version_conflict(
                ENTITY,
                offer.id().to_string(),
                expected_version,
                version_from_db(actual)?,
            )),
        }
    }

    async fn find_by_buyer(&self, user: &UserId) -> RepositoryResult<Vec<Offer>> {
        self.fetch_where("buyer_id = $1", Bind::Text(user.as_str()))
            .await
    }

    async fn find_by_seller(&self, user: &UserId) -> RepositoryResult<Vec<Offer>> {
        self.fetch_where("seller_id = $1", Bind::Text(user.as_str()))
            .await
    }

    async fn find_due_for_expiry(&self, now: Timestamp) -> RepositoryResult<Vec<Offer>> {
        self.fetch_where(
            "status IN ('PENDING', 'COUNTERED') AND expires_at <= $1",
            Bind::Millis(now.timestamp_millis()),
        )
        .await
    }
}

/// Row type for offer queries.
#[derive(Debug, sqlx::FromRow)]
struct OfferRow {
    id: Uuid,
    listing_id: String,
    buyer_id: String,
    seller_id: String,
    listing_price: Decimal,
    initial_amount: Decimal,
    initial_message: Option<String>,
    status: String,
    counter_offers: serde_json::Value,
    expires_at: i64,
    version: i64,
    created_at: i64,
    updated_at: i64,
}

impl OfferRow {
    fn try_into_offer(self) -> RepositoryResult<Offer> {
        let status: OfferStatus = self
            .status
            .parse()
            .map_err(|e| RepositoryError::serialization(format!("{e}")))?;
        let counter_offers: Vec<CounterOffer> = serde_json::from_value(self.counter_offers)
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;

        Ok(Offer::from_parts(
            OfferId::new(self.id),
            ListingId::new(self.listing_id),
            UserId::new(self.buyer_id),
            UserId::new(self.seller_id),
            Amount::new(self.listing_price),
            Amount::new(self.initial_amount),
            self.initial_message,
            status,
            counter_offers,
            millis_to_timestamp(self.expires_at)?,
            version_from_db(self.version)?,
            millis_to_timestamp(self.created_at)?,
            millis_to_timestamp(self.updated_at)?,
        ))
    }
}

fn counters_to_json(counters: &[CounterOffer]) -> RepositoryResult<serde_json::Value> {
    serde_json::to_value(counters).map_err(|e| RepositoryError::serialization(e.to_string()))
}

fn millis_to_timestamp(millis: i64) -> RepositoryResult<Timestamp> {
    Timestamp::from_millis(millis)
        .ok_or_else(|| RepositoryError::serialization(format!("timestamp out of range: {millis}")))
}

fn version_to_db(version: u64) -> RepositoryResult<i64> {
    i64::try_from(version)
        .map_err(|_| RepositoryError::internal(format!("version {version} exceeds BIGINT")))
}

fn version_from_db(version: i64) -> RepositoryResult<u64> {
    u64::try_from(version)
        .map_err(|_| RepositoryError::serialization(format!("negative version: {version}")))
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn map_sqlx_error(error: sqlx::Error) -> RepositoryError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::connection(error.to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            RepositoryError::serialization(error.to_string())
        }
        other => RepositoryError::query(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Side;

    fn row() -> OfferRow {
        let offer_id = Uuid::new_v4();
        let counter = CounterOffer::new(
            OfferId::new(offer_id),
            Side::Seller,
            Amount::from_cents(8500),
            None,
            Timestamp::from_millis(1_700_000_000_500).unwrap(),
        );
        OfferRow {
            id: offer_id,
            listing_id: "listing".to_string(),
            buyer_id: "buyer".to_string(),
            seller_id: "seller".to_string(),
            listing_price: Decimal::new(10000, 2),
            initial_amount: Decimal::new(7000, 2),
            initial_message: Some("hi".to_string()),
            status: "COUNTERED".to_string(),
            counter_offers: counters_to_json(&[counter]).unwrap(),
            expires_at: 1_700_172_800_000,
            version: 2,
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_500,
        }
    }

    #[test]
    fn row_converts_to_offer() {
        let offer = row().try_into_offer().unwrap();

        assert_eq!(offer.status(), OfferStatus::Countered);
        assert_eq!(offer.version(), 2);
        assert_eq!(offer.current_amount(), Amount::from_cents(8500));
        assert_eq!(offer.last_mover(), Side::Seller);
        assert_eq!(offer.initial_message(), Some("hi"));
    }

    #[test]
    fn wall_clock_offer_survives_millisecond_columns() {
        use crate::domain::services::state_machine::{OfferAction, OfferDraft, OfferStateMachine};

        let machine = OfferStateMachine::default();
        let opened = machine
            .create(
                OfferDraft {
                    listing_id: ListingId::new("listing"),
                    buyer_id: UserId::new("buyer"),
                    seller_id: UserId::new("seller"),
                    listing_price: Amount::from_cents(10000),
                    amount: Amount::from_cents(7000),
                    message: None,
                },
                Timestamp::now(),
            )
            .unwrap()
            .offer;
        let counter = OfferAction::Counter {
            actor: UserId::new("seller"),
            amount: Amount::from_cents(9000),
            message: Some("firm".to_string()),
        };
        let offer = machine
            .apply(&opened, counter, Timestamp::now())
            .unwrap()
            .offer;

        let stored = OfferRow {
            id: offer.id().get(),
            listing_id: offer.listing_id().as_str().to_string(),
            buyer_id: offer.buyer_id().as_str().to_string(),
            seller_id: offer.seller_id().as_str().to_string(),
            listing_price: offer.listing_price().get(),
            initial_amount: offer.initial_amount().get(),
            initial_message: offer.initial_message().map(str::to_string),
            status: offer.status().as_str().to_string(),
            counter_offers: counters_to_json(offer.counter_offers()).unwrap(),
            expires_at: offer.expires_at().timestamp_millis(),
            version: version_to_db(offer.version()).unwrap(),
            created_at: offer.created_at().timestamp_millis(),
            updated_at: offer.updated_at().timestamp_millis(),
        };

        let loaded = stored.try_into_offer().unwrap();
        assert_eq!(loaded.expires_at(), offer.expires_at());
        assert_eq!(loaded, offer);
    }

    #[test]
    fn unknown_status_is_serialization_error() {
        let mut bad = row();
        bad.status = "HAGGLING".to_string();
        assert!(matches!(
            bad.try_into_offer(),
            Err(RepositoryError::Serialization(_))
        ));
    }

    #[test]
    fn negative_version_is_rejected() {
        let mut bad = row();
        bad.version = -1;
        assert!(bad.try_into_offer().is_err());
    }

    #[test]
    fn version_bounds() {
        assert_eq!(version_to_db(7).unwrap(), 7);
        assert!(version_to_db(u64::MAX).is_err());
    }
}
