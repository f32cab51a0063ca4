use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::controller::AppState;
use crate::error::ApiError;
use crate::mail::MailDispatcher;
use crate::models::reservation::{NewReservation, Reservation, SendReservationResponse};
use crate::repositories::ReservationStore;
use crate::validation::is_blank;

pub const INCOMPLETE_FORM_MESSAGE: &str = "Please Fill Full Reservation Form!";
pub const RESERVATION_SENT_MESSAGE: &str = "Reservation Sent Successfully!";

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/send", post(send_reservation))
        .route("/", get(retrieve_reservation))
        .route_layer(Extension(app_state.store))
        .route_layer(Extension(app_state.mailer))
}

/// Absent keys deserialize as `None` so they get the same response as
/// empty strings.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SendReservationRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub guests: Option<u32>,
}

impl SendReservationRequest {
    /// `None` if any of the six required fields is missing or blank.
    pub fn into_new_reservation(self) -> Option<NewReservation> {
        fn required(value: Option<String>) -> Option<String> {
            value.filter(|v| !is_blank(v))
        }

        Some(NewReservation {
            first_name: required(self.first_name)?,
            last_name: required(self.last_name)?,
            email: required(self.email)?,
            phone: required(self.phone)?,
            date: required(self.date)?,
            time: required(self.time)?,
            guests: self.guests,
        })
    }
}

pub async fn send_reservation(
    Extension(store): Extension<Arc<dyn ReservationStore>>,
    Extension(mailer): Extension<Option<Arc<MailDispatcher>>>,
    payload: Result<Json<SendReservationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let new_reservation = body
        .into_new_reservation()
        .ok_or_else(|| ApiError::Validation(INCOMPLETE_FORM_MESSAGE.to_string()))?;

    let reservation = store.create_reservation(new_reservation).await?;
    info!("Stored reservation {} for {}", reservation.id, reservation.date);

    if let Some(mailer) = mailer {
        spawn_reservation_emails(mailer, reservation.clone());
    }

    Ok((
        StatusCode::CREATED,
        Json(SendReservationResponse {
            success: true,
            message: RESERVATION_SENT_MESSAGE.to_string(),
            reservation_id: reservation.id,
        }),
    ))
}

/// Email delivery runs detached from the request; its outcome is only logged.
fn spawn_reservation_emails(mailer: Arc<MailDispatcher>, reservation: Reservation) {
    tokio::spawn(async move {
        match mailer.send_reservation_emails(&reservation).await {
            Ok(()) => info!("Sent reservation emails for {}", reservation.id),
            Err(e) => warn!("Reservation {} was stored but emails failed: {}", reservation.id, e),
        }
    });
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GetReservationQuery {
    pub id: Uuid,
}

pub async fn retrieve_reservation(
    Extension(store): Extension<Arc<dyn ReservationStore>>,
    query: Result<Query<GetReservationQuery>, QueryRejection>,
) -> Result<Json<Reservation>, ApiError> {
    let Query(query) = query?;
    store
        .retrieve_reservation(query.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Reservation {} not found", query.id)))
}
