//! HTTP request handlers (route handlers).
//!
//! Each handler extracts the request data, calls exactly one service
//! operation and maps the result to a JSON response.

/// Account endpoints (user-facing and admin)
pub mod accounts;
/// Admin bank-link endpoints
pub mod bank_links;
/// Store and configuration diagnostics
pub mod diagnostics;
/// Liveness endpoint
pub mod health;
/// MPIN endpoints
pub mod mpin;
/// Admin transfer ledger endpoints
pub mod transfers;
