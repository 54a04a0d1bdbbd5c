//! Account HTTP handlers.
//!
//! This module implements both the user-facing and the admin account endpoints:
//! - GET /api/users?identity= - Get account by identity
//! - POST /api/users - Create or update account after login
//! - PUT /api/users/{id}, PUT /api/admin/users/{id} - Patch account fields
//! - DELETE /api/users/{id}, DELETE /api/admin/users/{id} - Delete account
//! - GET /api/admin/users?query= - List or search accounts
//! - POST /api/admin/users - Admin create

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::AppError,
    extract::{AppJson, AppQuery},
    models::{
        DeleteResponse,
        account::{
            AccountPatch, AccountResponse, CreateAccountRequest, IdentityQuery, LoginRequest,
            LoginUpsert, SearchQuery,
        },
    },
    state::AppState,
};

/// Get the account for an identity.
///
/// # Endpoint
///
/// `GET /api/users?identity=<uid>`
///
/// # Response
///
/// - **Success (200 OK)**: the account
/// - **Error (400)**: `identity` missing
/// - **Error (404)**: no account for this identity
pub async fn get_account(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<IdentityQuery>,
) -> Result<Json<AccountResponse>, AppError> {
    let identity = query
        .identity
        .filter(|i| !i.is_empty())
        .ok_or_else(|| AppError::Validation("identity is required".to_string()))?;

    let account = state.accounts.get_by_identity(&identity).await?;

    Ok(Json(account.into()))
}

/// Create-or-update on login.
///
/// # Endpoint
///
/// `POST /api/users`
///
/// # Request Body
///
/// ```json
/// {
///   "identity": "firebase-uid-123",
///   "full_name": "Alice Johnson",
///   "email": "alice@example.com",
///   "profile_picture": "https://example.com/alice.png"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: first login, new account
/// - **200 OK**: returning user, profile refreshed
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let outcome = state.accounts.upsert_on_login(request).await?;

    let status = match outcome {
        LoginUpsert::Created(_) => StatusCode::CREATED,
        LoginUpsert::Updated(_) => StatusCode::OK,
    };

    Ok((status, Json(outcome.into_account().into())))
}

/// List all accounts, or search by name/email.
///
/// # Endpoint
///
/// `GET /api/admin/users?query=<text>`
pub async fn list_accounts(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = state
        .accounts
        .list_or_search(query.query.as_deref())
        .await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Admin create.
///
/// # Endpoint
///
/// `POST /api/admin/users`
///
/// # Response
///
/// - **201 Created**: the new account
/// - **400**: identity missing, negative balance, or id/identity already taken
pub async fn create_account(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let account = state.accounts.create(request).await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Patch account fields.
///
/// # Request Body
///
/// Any subset of `full_name`, `email`, `profile_picture`, `balance_cents`,
/// `linked_banks`, `is_profile_complete`.
pub async fn patch_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<AccountPatch>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state.accounts.patch(&id, patch).await?;

    Ok(Json(account.into()))
}

/// Delete an account. Its transfers and bank links are left in place.
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.accounts.remove(&id).await?;

    Ok(Json(DeleteResponse::one()))
}
