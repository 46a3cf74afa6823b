use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{TrackingId, UnLocode, Version, VoyageNumber};
use domain::{
    Cargo, CargoError, HandlingActivity, HandlingEvent, HandlingEventType, HandlingHistory,
    Itinerary, Leg, RouteSpecification,
};
use sqlx::types::Json;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    RepositoryError, Result,
    store::{CargoRepository, EventRepository},
};

const CARGO_COLUMNS: &str =
    "tracking_id, origin, destination, arrival_deadline, legs, last_event, version";
const EVENT_COLUMNS: &str = "tracking_id, event_type, location, voyage_number, completed_at";

/// Runs the database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// PostgreSQL-backed cargo repository.
///
/// The delivery projection is not stored; it is re-derived on every load
/// from the route specification, legs and last handling event.
#[derive(Clone)]
pub struct PostgresCargoRepository {
    pool: PgPool,
}

impl PostgresCargoRepository {
    /// Creates a new PostgreSQL cargo repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_cargo(row: PgRow) -> Result<Cargo> {
        let tracking_id = TrackingId::new(row.try_get::<String, _>("tracking_id")?);
        let origin = UnLocode::new(row.try_get::<String, _>("origin")?);
        let destination = UnLocode::new(row.try_get::<String, _>("destination")?);
        let arrival_deadline: DateTime<Utc> = row.try_get("arrival_deadline")?;
        let Json(legs): Json<Vec<Leg>> = row.try_get("legs")?;
        let last_event: Option<Json<HandlingEvent>> = row.try_get("last_event")?;
        let version = Version::new(row.try_get("version")?);

        let itinerary = Itinerary::new(legs).map_err(|source| RepositoryError::Corrupt {
            tracking_id: tracking_id.clone(),
            source,
        })?;
        let route_specification =
            RouteSpecification::new(origin.clone(), destination, arrival_deadline);

        Ok(Cargo::restore(
            tracking_id,
            origin,
            route_specification,
            itinerary,
            last_event.map(|Json(event)| event),
            version,
        ))
    }
}

#[async_trait]
impl CargoRepository for PostgresCargoRepository {
    async fn upsert(&self, cargo: Cargo) -> Result<Cargo> {
        let tracking_id = cargo.tracking_id();
        let spec = cargo.route_specification();
        let conflict = |actual: Version| RepositoryError::ConcurrencyConflict {
            tracking_id: tracking_id.clone(),
            expected: cargo.version(),
            actual,
        };

        let mut tx = self.pool.begin().await?;

        let current: Option<i64> =
            sqlx::query_scalar("SELECT version FROM cargos WHERE tracking_id = $1 FOR UPDATE")
                .bind(tracking_id.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        let actual = current.map_or(Version::initial(), Version::new);
        if actual != cargo.version() {
            return Err(conflict(actual));
        }

        let legs = Json(cargo.itinerary().legs());
        let last_event = cargo.delivery().last_event.as_ref().map(Json);
        let version = actual.next().as_i64();

        // Origin is written once, on insert.
        let insert = format!(
            r#"
            INSERT INTO cargos ({CARGO_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CARGO_COLUMNS}
            "#
        );
        let update = format!(
            r#"
            UPDATE cargos SET
                destination = $2,
                arrival_deadline = $3,
                legs = $4,
                last_event = $5,
                version = $6
            WHERE tracking_id = $1
            RETURNING {CARGO_COLUMNS}
            "#
        );

        let query = if current.is_none() {
            sqlx::query(&insert)
                .bind(tracking_id.as_str())
                .bind(cargo.origin().as_str())
        } else {
            sqlx::query(&update).bind(tracking_id.as_str())
        };

        let row = query
            .bind(spec.destination.as_str())
            .bind(spec.arrival_deadline)
            .bind(legs)
            .bind(last_event)
            .bind(version)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                // A concurrent first insert of the same cargo
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.constraint() == Some("cargos_pkey")
                {
                    return conflict(actual.next());
                }
                RepositoryError::Database(e)
            })?;

        tx.commit().await?;
        Self::row_to_cargo(row)
    }

    async fn find(&self, tracking_id: &TrackingId) -> Result<Cargo> {
        let query = format!("SELECT {CARGO_COLUMNS} FROM cargos WHERE tracking_id = $1");

        let row = sqlx::query(&query)
            .bind(tracking_id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::CargoNotFound(tracking_id.clone()))?;

        Self::row_to_cargo(row)
    }

    async fn find_all(&self) -> Result<Vec<Cargo>> {
        let query = format!("SELECT {CARGO_COLUMNS} FROM cargos");

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_cargo).collect()
    }
}

/// PostgreSQL-backed handling event log.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    /// Creates a new PostgreSQL event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_event(row: PgRow) -> Result<HandlingEvent> {
        let tracking_id = TrackingId::new(row.try_get::<String, _>("tracking_id")?);
        let corrupt = |source: CargoError| RepositoryError::Corrupt {
            tracking_id: tracking_id.clone(),
            source,
        };

        let event_type = HandlingEventType::try_from(i32::from(row.try_get::<i16, _>("event_type")?))
            .map_err(corrupt)?;
        let location: String = row.try_get("location")?;
        let voyage_number: Option<String> = row.try_get("voyage_number")?;
        let activity =
            HandlingActivity::new(event_type, location, voyage_number.map(VoyageNumber::new))
                .map_err(corrupt)?;

        Ok(HandlingEvent::new(
            tracking_id.clone(),
            activity,
            row.try_get("completed_at")?,
        ))
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn store(&self, event: HandlingEvent) -> Result<HandlingEvent> {
        let query = format!(
            r#"
            INSERT INTO handling_events ({EVENT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EVENT_COLUMNS}
            "#
        );

        let ordinal = i16::try_from(event.event_type().ordinal())
            .map_err(|_| RepositoryError::Corrupt {
                tracking_id: event.tracking_id.clone(),
                source: CargoError::UnknownEventType(event.event_type().ordinal()),
            })?;

        let row = sqlx::query(&query)
            .bind(event.tracking_id.as_str())
            .bind(ordinal)
            .bind(event.activity.location.as_str())
            .bind(event.activity.voyage_number.as_ref().map(VoyageNumber::as_str))
            .bind(event.completed_at)
            .fetch_one(&self.pool)
            .await?;

        Self::row_to_event(row)
    }

    async fn query_history(&self, tracking_id: &TrackingId) -> Result<HandlingHistory> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM handling_events WHERE tracking_id = $1 ORDER BY completed_at, id"
        );

        let rows = sqlx::query(&query)
            .bind(tracking_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        let events = rows
            .into_iter()
            .map(Self::row_to_event)
            .collect::<Result<Vec<_>>>()?;
        Ok(HandlingHistory::new(events))
    }
}
