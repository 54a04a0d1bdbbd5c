//! Request extractors that report rejections through [`AppError`].
//!
//! Axum's stock `Json` and `Query` extractors answer malformed input with a
//! plain-text body. These wrappers keep the `{ "error": ... }` envelope.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON body extractor.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
