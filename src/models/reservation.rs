use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::validation::{
    is_blank, is_valid_email, is_valid_phone, parse_reservation_date, parse_reservation_time,
};

pub const NAME_MAX_LENGTH: usize = 30;
pub const GUESTS_RANGE: std::ops::RangeInclusive<u32> = 1..=50;
pub const INVALID_EMAIL_MESSAGE: &str = "Provide a valid email";
pub const INVALID_PHONE_MESSAGE: &str = "Phone number must be 10-15 digits";

pub fn guests_range_message() -> String {
    format!(
        "Guests must be between {} and {}",
        GUESTS_RANGE.start(),
        GUESTS_RANGE.end()
    )
}

/// A booked table, as persisted by the reservation store.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub guests: Option<u32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Reservation {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Reservation fields supplied by the customer, before the store assigns an id.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub guests: Option<u32>,
}

impl NewReservation {
    /// Checks the record against the store schema, in field order.
    pub fn schema_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for (field, label, value) in [
            ("firstName", "First name", &self.first_name),
            ("lastName", "Last name", &self.last_name),
        ] {
            if is_blank(value) {
                errors.push(FieldError::new(field, format!("{label} is required")));
            } else if value.chars().count() > NAME_MAX_LENGTH {
                errors.push(FieldError::new(
                    field,
                    format!("{label} cannot exceed {NAME_MAX_LENGTH} characters"),
                ));
            }
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", INVALID_EMAIL_MESSAGE));
        }
        if !is_valid_phone(&self.phone) {
            errors.push(FieldError::new("phone", INVALID_PHONE_MESSAGE));
        }
        if parse_reservation_date(&self.date).is_none() {
            errors.push(FieldError::new("date", "Date must be in YYYY-MM-DD format"));
        }
        if parse_reservation_time(&self.time).is_none() {
            errors.push(FieldError::new("time", "Time must be in HH:MM format"));
        }
        if let Some(guests) = self.guests {
            if !GUESTS_RANGE.contains(&guests) {
                errors.push(FieldError::new("guests", guests_range_message()));
            }
        }

        errors
    }

    pub fn into_reservation(self) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            date: self.date,
            time: self.time,
            guests: self.guests,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendReservationResponse {
    pub success: bool,
    pub message: String,
    pub reservation_id: Uuid,
}

/// Body of every non-2xx response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    #[serde(default)]
    pub success: bool,
    pub message: String,
}


#[cfg(test)]
mod tests {
    use super::fixtures::ana_li;
    use super::*;

    #[test]
    fn valid_reservation_has_no_schema_errors() {
        assert!(ana_li().schema_errors().is_empty());
    }

    #[test]
    fn schema_errors_follow_field_order() {
        let reservation = NewReservation {
            first_name: "   ".to_string(),
            email: "ana".to_string(),
            phone: "12345".to_string(),
            time: "half past seven".to_string(),
            guests: Some(0),
            ..ana_li()
        };

        let fields: Vec<_> = reservation
            .schema_errors()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, ["firstName", "email", "phone", "time", "guests"]);
    }

    #[test]
    fn long_names_are_rejected() {
        let reservation = NewReservation {
            last_name: "L".repeat(NAME_MAX_LENGTH + 1),
            ..ana_li()
        };

        let errors = reservation.schema_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Last name cannot exceed 30 characters");
    }

    #[test]
    fn field_errors_join_into_one_message() {
        let errors = vec![
            FieldError::new("email", "Provide a valid email"),
            FieldError::new("phone", "Phone number must be 10-15 digits"),
        ];
        assert_eq!(
            join_field_errors(&errors),
            "Provide a valid email, Phone number must be 10-15 digits"
        );
    }

    #[test]
    fn into_reservation_keeps_fields_and_assigns_id() {
        let first = ana_li().into_reservation();
        let second = ana_li().into_reservation();

        assert_eq!(first.first_name, "Ana");
        assert_eq!(first.time, "19:30");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let reservation = ana_li().into_reservation();
        let value = serde_json::to_value(&reservation).unwrap();

        assert_eq!(value["firstName"], "Ana");
        assert_eq!(value["lastName"], "Li");
        assert!(value.get("guests").is_none());
        assert!(value["createdAt"].is_string());
    }
}
