//! Admin API key middleware.
//!
//! When `ADMIN_API_KEY_HASH` is configured, every admin route requires an
//! `Authorization: Bearer <key>` header whose SHA-256 matches the configured
//! hash. Without a configured hash the admin routes are open.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::{error::AppError, state::AppState};

/// Hex-encoded SHA-256 of an API key.
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Admin authentication middleware function.
///
/// # Flow
///
/// 1. No configured hash: pass the request through
/// 2. Extract `Authorization: Bearer <key>`
/// 3. Hash `<key>` with SHA-256 and compare with the configured hash
/// 4. Match: call the next handler; otherwise 401
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.admin_api_key_hash.as_deref() else {
        return Ok(next.run(request).await);
    };

    let api_key = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    if !hash_api_key(api_key).eq_ignore_ascii_case(expected.trim()) {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request with wrong API key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::hash_api_key;

    #[test]
    fn hashes_to_lowercase_hex_sha256() {
        assert_eq!(
            hash_api_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
