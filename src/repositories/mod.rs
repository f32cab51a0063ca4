use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::reservation::{join_field_errors, FieldError, NewReservation, Reservation};

pub mod memory_repo;
pub mod postgres_repo;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The record broke a schema rule; one entry per offending field.
    #[error("{}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Infrastructure(#[from] anyhow::Error),
}

/// Persistence for reservation records. Records are created once and never
/// updated or removed.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn create_reservation(
        &self,
        new_reservation: NewReservation,
    ) -> Result<Reservation, StoreError>;

    async fn retrieve_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, StoreError>;
}

/// Applies the schema rules shared by every store before a write.
pub(crate) fn check_schema(new_reservation: &NewReservation) -> Result<(), StoreError> {
    let errors = new_reservation.schema_errors();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Validation(errors))
    }
}
