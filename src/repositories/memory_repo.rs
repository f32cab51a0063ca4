use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{check_schema, ReservationStore, StoreError};
use crate::models::reservation::{NewReservation, Reservation};

/// Keeps reservations in process memory. Backs the router and client tests.
#[derive(Default)]
pub struct MemoryReservationRepo {
    reservations: RwLock<Vec<Reservation>>,
}

impl MemoryReservationRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.reservations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reservations.read().await.is_empty()
    }

    pub async fn all(&self) -> Vec<Reservation> {
        self.reservations.read().await.clone()
    }
}

#[async_trait]
impl ReservationStore for MemoryReservationRepo {
    async fn create_reservation(
        &self,
        new_reservation: NewReservation,
    ) -> Result<Reservation, StoreError> {
        check_schema(&new_reservation)?;

        let reservation = new_reservation.into_reservation();
        self.reservations.write().await.push(reservation.clone());
        Ok(reservation)
    }

    async fn retrieve_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, StoreError> {
        Ok(self
            .reservations
            .read()
            .await
            .iter()
            .find(|r| r.id == reservation_id)
            .cloned())
    }
}
