//! HTTP middleware components.
//!
//! Middleware run before route handlers and may short-circuit a request.

/// Admin API key middleware
pub mod auth;
