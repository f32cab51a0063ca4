use thiserror::Error;

pub mod dispatcher;
pub mod templates;
pub mod transport;

pub use dispatcher::MailDispatcher;
pub use templates::EmailMessage;
pub use transport::{MailTransport, OutgoingMail, SmtpMailTransport};

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mailbox {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Mail transport failed: {0}")]
    Transport(String),

    #[error("{failed} of {attempted} reservation emails were not delivered")]
    Undelivered { failed: usize, attempted: usize },
}
