//! Payment Authorization - Idempotent payment authorization service
//!
//! Authorizes each payment at most once per idempotency key, persists the
//! Pending → Authorized | Declined transition durably, and publishes a
//! `PaymentAuthorized` event when a payment is approved.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod startup;
