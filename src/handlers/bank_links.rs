//! Bank-link HTTP handlers (admin).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::AppError,
    extract::AppJson,
    models::{
        DeleteResponse,
        bank_link::{BankLink, BankLinkPatch, CreateBankLinkRequest},
    },
    state::AppState,
};

pub async fn list_bank_links(
    State(state): State<AppState>,
) -> Result<Json<Vec<BankLink>>, AppError> {
    Ok(Json(state.bank_links.list().await?))
}

/// Create a bank link.
///
/// # Request Body
///
/// ```json
/// {
///   "user_id": "user1",
///   "user_name": "Alice Johnson",
///   "bank_name": "HDFC Bank",
///   "account_number": "****1234"
/// }
/// ```
pub async fn create_bank_link(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateBankLinkRequest>,
) -> Result<(StatusCode, Json<BankLink>), AppError> {
    let link = state.bank_links.create(request).await?;

    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn patch_bank_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<BankLinkPatch>,
) -> Result<Json<BankLink>, AppError> {
    Ok(Json(state.bank_links.patch(&id, patch).await?))
}

/// Delete a bank link.
///
/// # Response
///
/// - **200 OK**: `{ "success": true, "deleted_count": 1 }`
/// - **404**: no bank link with this id
pub async fn delete_bank_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.bank_links.remove(&id).await?;

    Ok(Json(DeleteResponse::one()))
}
