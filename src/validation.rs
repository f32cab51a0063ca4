use std::sync::OnceLock;

use regex::Regex;
use time::macros::format_description;
use time::{Date, Time};

pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
pub const PHONE_PATTERN: &str = r"^[0-9]{10,15}$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Digits only, between 10 and 15 of them.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

/// Parses the `YYYY-MM-DD` value produced by a date input.
pub fn parse_reservation_date(date: &str) -> Option<Date> {
    Date::parse(date, format_description!("[year]-[month]-[day]")).ok()
}

/// Parses `HH:MM`, or `HH:MM:SS` when the browser sends seconds.
pub fn parse_reservation_time(time: &str) -> Option<Time> {
    Time::parse(time, format_description!("[hour]:[minute]"))
        .or_else(|_| Time::parse(time, format_description!("[hour]:[minute]:[second]")))
        .ok()
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
