use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::tokio_postgres::error::SqlState;
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::PostgresConnectionManager;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{check_schema, ReservationStore, StoreError};
use crate::models::reservation::{
    guests_range_message, FieldError, NewReservation, Reservation, INVALID_EMAIL_MESSAGE,
    INVALID_PHONE_MESSAGE, NAME_MAX_LENGTH,
};

pub type PostgresPool = Pool<PostgresConnectionManager<NoTls>>;

const FIRST_NAME_CHECK: &str = "reservations_first_name_check";
const LAST_NAME_CHECK: &str = "reservations_last_name_check";
const EMAIL_CHECK: &str = "reservations_email_check";
const PHONE_CHECK: &str = "reservations_phone_check";
const GUESTS_CHECK: &str = "reservations_guests_check";

const CREATE_RESERVATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS reservations (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL
        CONSTRAINT reservations_first_name_check CHECK (char_length(btrim(first_name)) BETWEEN 1 AND 30),
    last_name TEXT NOT NULL
        CONSTRAINT reservations_last_name_check CHECK (char_length(btrim(last_name)) BETWEEN 1 AND 30),
    email TEXT NOT NULL
        CONSTRAINT reservations_email_check CHECK (email ~ '^[^[:space:]@]+@[^[:space:]@]+\\.[^[:space:]@]+$'),
    phone TEXT NOT NULL
        CONSTRAINT reservations_phone_check CHECK (phone ~ '^[0-9]{10,15}$'),
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    guests INTEGER
        CONSTRAINT reservations_guests_check CHECK (guests BETWEEN 1 AND 50),
    created_at TIMESTAMPTZ NOT NULL
);";

/// Builds the connection pool shared by every request. A checkout that cannot
/// get a connection within `connect_timeout` fails the request.
pub async fn connect(
    database_url: &str,
    pool_size: u32,
    connect_timeout: Duration,
) -> anyhow::Result<PostgresPool> {
    let manager = PostgresConnectionManager::new_from_stringlike(database_url, NoTls)
        .context("Invalid DATABASE_URL")?;

    Pool::builder()
        .max_size(pool_size)
        .connection_timeout(connect_timeout)
        .build(manager)
        .await
        .context("Failed to build postgres connection pool")
}

pub struct PostgresConnectionRepo {
    postgres_connection: PostgresPool,
}

impl PostgresConnectionRepo {
    pub fn new(postgres_connection: PostgresPool) -> Self {
        Self {
            postgres_connection,
        }
    }

    /// One checkout per call; a failure is not retried.
    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<'_, PostgresConnectionManager<NoTls>>> {
        self.postgres_connection
            .get()
            .await
            .map_err(|e| {
                warn!("Failed to retrieve postgres connection due to: {}", e);
                anyhow!(e)
            })
            .context("Failed to retrieve a connection from the postgres pool")
    }

    /// Creates the reservations table when it does not exist yet.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        let conn = self.get_postgres_connection().await?;
        conn.batch_execute(CREATE_RESERVATIONS_TABLE)
            .await
            .context("Failed to create reservations table")?;
        info!("Reservations table is ready");
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for PostgresConnectionRepo {
    async fn create_reservation(
        &self,
        new_reservation: NewReservation,
    ) -> Result<Reservation, StoreError> {
        check_schema(&new_reservation)?;

        let reservation = new_reservation.into_reservation();
        let conn = self.get_postgres_connection().await?;
        let id = reservation.id.to_string();
        let guests = reservation.guests.map(|g| g as i32);

        conn.execute(
            "INSERT INTO reservations \
                (id, first_name, last_name, email, phone, date, time, guests, created_at) \
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9);",
            &[
                &id,
                &reservation.first_name,
                &reservation.last_name,
                &reservation.email,
                &reservation.phone,
                &reservation.date,
                &reservation.time,
                &guests,
                &reservation.created_at,
            ],
        )
        .await
        .map_err(into_store_error)?;

        Ok(reservation)
    }

    async fn retrieve_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, StoreError> {
        let conn = self.get_postgres_connection().await?;
        let row = conn
            .query_opt(
                "SELECT * FROM reservations WHERE id = $1 LIMIT 1;",
                &[&reservation_id.to_string()],
            )
            .await
            .with_context(|| format!("Failed to retrieve reservation {}", reservation_id))?;

        match row {
            Some(row) => Ok(Some(parse_row_into_reservation(&row)?)),
            None => Ok(None),
        }
    }
}

/// Constraint violations are the database's version of a schema failure;
/// anything else is an infrastructure problem. `check_schema` runs before every
/// insert, so this mapping only fires if the two rule sets drift apart.
fn into_store_error(e: bb8_postgres::tokio_postgres::Error) -> StoreError {
    if let Some(db_error) = e.as_db_error() {
        if let Some(field_error) =
            constraint_field_error(db_error.code(), db_error.column(), db_error.constraint())
        {
            warn!("Database rejected reservation: {}", db_error.message());
            return StoreError::Validation(vec![field_error]);
        }
    }

    StoreError::Infrastructure(anyhow!(e).context("Failed to insert reservation"))
}

/// Translates a constraint violation into the same wording `schema_errors`
/// uses, never the raw database message.
fn constraint_field_error(
    code: &SqlState,
    column: Option<&str>,
    constraint: Option<&str>,
) -> Option<FieldError> {
    if *code == SqlState::NOT_NULL_VIOLATION {
        let (field, label) = column_field(column.unwrap_or_default());
        return Some(FieldError::new(field, format!("{} is required", label)));
    }
    if *code != SqlState::CHECK_VIOLATION {
        return None;
    }

    let field_error = match constraint.unwrap_or_default() {
        FIRST_NAME_CHECK => FieldError::new(
            "firstName",
            format!("First name must be between 1 and {} characters", NAME_MAX_LENGTH),
        ),
        LAST_NAME_CHECK => FieldError::new(
            "lastName",
            format!("Last name must be between 1 and {} characters", NAME_MAX_LENGTH),
        ),
        EMAIL_CHECK => FieldError::new("email", INVALID_EMAIL_MESSAGE),
        PHONE_CHECK => FieldError::new("phone", INVALID_PHONE_MESSAGE),
        GUESTS_CHECK => FieldError::new("guests", guests_range_message()),
        _ => FieldError::new("reservation", "Reservation details are invalid"),
    };
    Some(field_error)
}

fn column_field(column: &str) -> (&'static str, &'static str) {
    match column {
        "first_name" => ("firstName", "First name"),
        "last_name" => ("lastName", "Last name"),
        "email" => ("email", "Email"),
        "phone" => ("phone", "Phone number"),
        "date" => ("date", "Date"),
        "time" => ("time", "Time"),
        _ => ("reservation", "Reservation field"),
    }
}

fn parse_row_into_reservation(row: &Row) -> anyhow::Result<Reservation> {
    let id: String = row.try_get("id")?;
    let guests: Option<i32> = row.try_get("guests")?;

    Ok(Reservation {
        id: Uuid::parse_str(&id).with_context(|| format!("Stored reservation id {} is not a uuid", id))?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        date: row.try_get("date")?,
        time: row.try_get("time")?,
        guests: guests.map(u32::try_from).transpose()?,
        created_at: row.try_get::<_, OffsetDateTime>("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::models::reservation::fixtures::ana_li;

    #[tokio::test]
    async fn unreachable_database_fails_without_retrying() {
        let manager =
            PostgresConnectionManager::new_from_stringlike("host=127.0.0.1 port=1 user=postgres", NoTls)
                .unwrap();
        let pool = Pool::builder()
            .connection_timeout(Duration::from_millis(200))
            .build_unchecked(manager);
        let repo = PostgresConnectionRepo::new(pool);

        let started = Instant::now();
        let err = repo.create_reservation(ana_li()).await.unwrap_err();

        assert!(matches!(err, StoreError::Infrastructure(_)), "got {err:?}");
        assert!(
            started.elapsed() < Duration::from_secs(3),
            "took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn check_violations_use_schema_wording() {
        let phone = constraint_field_error(&SqlState::CHECK_VIOLATION, None, Some(PHONE_CHECK)).unwrap();
        assert_eq!(phone, FieldError::new("phone", "Phone number must be 10-15 digits"));

        let email = constraint_field_error(&SqlState::CHECK_VIOLATION, None, Some(EMAIL_CHECK)).unwrap();
        assert_eq!(email.message, "Provide a valid email");

        let guests = constraint_field_error(&SqlState::CHECK_VIOLATION, None, Some(GUESTS_CHECK)).unwrap();
        assert_eq!(guests.message, "Guests must be between 1 and 50");

        let unknown =
            constraint_field_error(&SqlState::CHECK_VIOLATION, None, Some("reservations_other_check")).unwrap();
        assert_eq!(unknown.message, "Reservation details are invalid");
    }

    #[test]
    fn not_null_violation_names_the_field() {
        let error =
            constraint_field_error(&SqlState::NOT_NULL_VIOLATION, Some("last_name"), None).unwrap();
        assert_eq!(error, FieldError::new("lastName", "Last name is required"));
    }

    #[test]
    fn other_database_errors_are_not_validation() {
        assert!(constraint_field_error(&SqlState::UNIQUE_VIOLATION, Some("id"), None).is_none());
        assert!(constraint_field_error(&SqlState::CONNECTION_FAILURE, None, None).is_none());
    }
}
