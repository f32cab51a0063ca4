//! Browser-side half of the reservation flow: the typed form state and the
//! HTTP client that submits it.

pub mod form;

use reqwest::Client;
use tracing::warn;
use uuid::Uuid;

pub use form::{FormError, ReservationForm};

use crate::models::reservation::{ErrorResponse, SendReservationResponse};

pub const SEND_RESERVATION_PATH: &str = "/api/v1/reservation/send";
pub const SUCCESS_ROUTE: &str = "/success";
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Outcome of an accepted submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submitted {
    pub message: String,
    pub reservation_id: Uuid,
    /// Where the page navigates next.
    pub redirect_to: &'static str,
}

pub struct ReservationClient {
    http: Client,
    endpoint: String,
}

impl ReservationClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_http_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SEND_RESERVATION_PATH),
        }
    }

    /// Validates the form locally and, only if that passes, makes a single
    /// POST to the reservation endpoint. The form is cleared on success.
    pub async fn submit(&self, form: &mut ReservationForm) -> Result<Submitted, FormError> {
        form.validate()?;

        let response = match self.http.post(&self.endpoint).json(&*form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Reservation request to {} failed due to: {}", self.endpoint, e);
                return Err(FormError::Rejected(FALLBACK_ERROR_MESSAGE.to_string()));
            }
        };

        if !response.status().is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .map(|body| body.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
            return Err(FormError::Rejected(message));
        }

        let body = response
            .json::<SendReservationResponse>()
            .await
            .map_err(|e| {
                warn!("Unexpected reservation response body: {}", e);
                FormError::Rejected(FALLBACK_ERROR_MESSAGE.to_string())
            })?;

        form.clear();
        Ok(Submitted {
            message: body.message,
            reservation_id: body.reservation_id,
            redirect_to: SUCCESS_ROUTE,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use super::*;
    use crate::controller::{application, AppState};
    use crate::repositories::memory_repo::MemoryReservationRepo;

    async fn spawn_server(store: Arc<MemoryReservationRepo>) -> String {
        let app = application(AppState { store, mailer: None }, Vec::new());
        let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
            .serve(app.into_make_service());
        let address = server.local_addr();
        tokio::spawn(server);
        format!("http://{}", address)
    }

    fn ana_li_form() -> ReservationForm {
        ReservationForm {
            first_name: "Ana".to_string(),
            last_name: "Li".to_string(),
            email: "ana@example.com".to_string(),
            date: "2025-12-01".to_string(),
            time: "19:30".to_string(),
            phone: "9812345678".to_string(),
        }
    }

    #[tokio::test]
    async fn successful_submission_clears_form_and_redirects() {
        let store = Arc::new(MemoryReservationRepo::new());
        let client = ReservationClient::new(&spawn_server(store.clone()).await);
        let mut form = ana_li_form();

        let submitted = client.submit(&mut form).await.unwrap();

        assert_eq!(submitted.message, "Reservation Sent Successfully!");
        assert_eq!(submitted.redirect_to, "/success");
        assert_eq!(form, ReservationForm::default());

        let stored = store.all().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, submitted.reservation_id);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_server() {
        let store = Arc::new(MemoryReservationRepo::new());
        let client = ReservationClient::new(&spawn_server(store.clone()).await);

        let mut form = ReservationForm {
            email: "ana@example".to_string(),
            ..ana_li_form()
        };
        assert_eq!(client.submit(&mut form).await, Err(FormError::InvalidEmail));

        let mut form = ReservationForm {
            phone: "98-1234-5678".to_string(),
            ..ana_li_form()
        };
        assert_eq!(client.submit(&mut form).await, Err(FormError::InvalidPhone));

        // fields are kept so the visitor can correct them
        assert_eq!(form.phone, "98-1234-5678");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn server_message_is_shown_on_rejection() {
        let store = Arc::new(MemoryReservationRepo::new());
        let client = ReservationClient::new(&spawn_server(store.clone()).await);
        let mut form = ReservationForm {
            date: "01/12/2025".to_string(),
            ..ana_li_form()
        };

        let err = client.submit(&mut form).await.unwrap_err();

        assert_eq!(
            err,
            FormError::Rejected("Date must be in YYYY-MM-DD format".to_string())
        );
        assert_eq!(form.first_name, "Ana");
    }

    #[tokio::test]
    async fn unreachable_server_uses_fallback_message() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let client = ReservationClient::new(&format!("http://{}/", address));
        let err = client.submit(&mut ana_li_form()).await.unwrap_err();

        assert_eq!(err.to_string(), "An error occurred. Please try again.");
    }
}
