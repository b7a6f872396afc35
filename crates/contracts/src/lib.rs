//! Shared DTOs between the dashboard and the back-office API.
//!
//! Everything here is plain serde data: records as returned by the API,
//! payloads produced by the wizard dialogs, and the response envelope.

pub mod domain;
pub mod shared;
