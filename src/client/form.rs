use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{is_blank, is_valid_email, is_valid_phone};

/// The six inputs of the reservation form.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReservationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub phone: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all fields")]
    Incomplete,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    /// The endpoint refused the reservation or could not be reached.
    #[error("{0}")]
    Rejected(String),
}

impl ReservationForm {
    pub fn is_complete(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.date,
            &self.time,
            &self.phone,
        ]
        .iter()
        .all(|field| !is_blank(field))
    }

    pub fn email_is_valid(&self) -> bool {
        is_valid_email(&self.email)
    }

    pub fn phone_is_valid(&self) -> bool {
        is_valid_phone(&self.phone)
    }

    /// Checks run in the order the visitor sees the messages.
    pub fn validate(&self) -> Result<(), FormError> {
        if !self.is_complete() {
            return Err(FormError::Incomplete);
        }
        if !self.email_is_valid() {
            return Err(FormError::InvalidEmail);
        }
        if !self.phone_is_valid() {
            return Err(FormError::InvalidPhone);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
