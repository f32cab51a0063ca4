use std::sync::Arc;

use tracing::{info, warn};

use super::templates::{reservation_confirmation, reservation_notification};
use super::{MailError, MailTransport, OutgoingMail};
use crate::config::MailConfig;
use crate::models::reservation::Reservation;

/// Sends the customer confirmation and the restaurant notification for a
/// reservation. Each message gets exactly one delivery attempt.
pub struct MailDispatcher {
    config: MailConfig,
    transport: Arc<dyn MailTransport>,
}

impl MailDispatcher {
    pub fn new(config: MailConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { config, transport }
    }

    pub fn confirmation_for(&self, reservation: &Reservation) -> OutgoingMail {
        OutgoingMail {
            from: self.config.sender.clone(),
            to: reservation.email.clone(),
            message: reservation_confirmation(&reservation.full_name(), reservation.into()),
        }
    }

    pub fn notification_for(&self, reservation: &Reservation) -> OutgoingMail {
        OutgoingMail {
            from: self.config.sender.clone(),
            to: self.config.restaurant_recipient.clone(),
            message: reservation_notification(reservation),
        }
    }

    /// Sends both emails concurrently. Succeeds only if both were delivered.
    pub async fn send_reservation_emails(&self, reservation: &Reservation) -> Result<(), MailError> {
        let confirmation = self.confirmation_for(reservation);
        let notification = self.notification_for(reservation);
        let recipients = [confirmation.to.clone(), notification.to.clone()];

        let (confirmation_res, notification_res) = futures::join!(
            self.transport.send(confirmation),
            self.transport.send(notification),
        );

        let mut failed = 0;
        for (recipient, res) in recipients.iter().zip([confirmation_res, notification_res]) {
            match res {
                Ok(()) => info!("Reservation {} email delivered to {}", reservation.id, recipient),
                Err(e) => {
                    failed += 1;
                    warn!("Failed to email {} for reservation {} due to: {}", recipient, reservation.id, e);
                }
            }
        }

        if failed == 0 {
            Ok(())
        } else {
            Err(MailError::Undelivered { failed, attempted: 2 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::testing::{mail_config, RecordingTransport};
    use crate::models::reservation::fixtures::ana_li;

    #[tokio::test]
    async fn delivers_confirmation_and_notification() {
        let (transport, _attempts) = RecordingTransport::delivering();
        let transport = Arc::new(transport);
        let dispatcher = MailDispatcher::new(mail_config(), transport.clone());
        let reservation = ana_li().into_reservation();

        dispatcher.send_reservation_emails(&reservation).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        let mut recipients: Vec<_> = sent.iter().map(|m| m.to.as_str()).collect();
        recipients.sort();
        assert_eq!(recipients, ["ana@example.com", "kitchen@goldenpalace.com"]);
        assert!(sent.iter().all(|m| m.from == "host@goldenpalace.com"));
    }

    #[tokio::test]
    async fn one_failed_delivery_fails_the_dispatch() {
        let (transport, _attempts) = RecordingTransport::new(&["kitchen@goldenpalace.com"]);
        let transport = Arc::new(transport);
        let dispatcher = MailDispatcher::new(mail_config(), transport.clone());

        let err = dispatcher
            .send_reservation_emails(&ana_li().into_reservation())
            .await
            .unwrap_err();

        assert!(matches!(err, MailError::Undelivered { failed: 1, attempted: 2 }));
        // the confirmation still went out
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn confirmation_goes_to_customer() {
        let (transport, _attempts) = RecordingTransport::delivering();
        let dispatcher = MailDispatcher::new(mail_config(), Arc::new(transport));
        let reservation = ana_li().into_reservation();

        let confirmation = dispatcher.confirmation_for(&reservation);
        assert_eq!(confirmation.to, "ana@example.com");
        assert!(confirmation.message.html.contains("Dear Ana Li,"));

        let notification = dispatcher.notification_for(&reservation);
        assert_eq!(notification.to, "kitchen@goldenpalace.com");
    }
}
