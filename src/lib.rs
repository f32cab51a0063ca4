//! Reservation backend for the Golden Palace Restaurant site.
//!
//! A single endpoint accepts table reservations, stores them in PostgreSQL
//! and notifies both the customer and the restaurant by email. The
//! [`client`] module holds the typed reservation form used by the site to
//! validate input before it reaches the endpoint.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod mail;
pub mod models;
pub mod repositories;
pub mod validation;
