//! Transfer ledger HTTP handlers (admin).
//!
//! - GET /api/admin/transactions?type= - Joined list, newest first
//! - POST /api/admin/transactions - Record a transfer
//! - PUT /api/admin/transactions/{id} - Patch a transfer

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::AppError,
    extract::{AppJson, AppQuery},
    models::transfer::{
        CreateTransferRequest, Transfer, TransferListQuery, TransferPatch, TransferView,
    },
    state::AppState,
};

/// List transfers with sender and receiver names.
///
/// # Response (200 OK)
///
/// ```json
/// [
///   {
///     "id": "tx1",
///     "sender_id": "user1",
///     "receiver_id": "user3",
///     "amount_cents": 10000,
///     "status": "Success",
///     "kind": "Sent",
///     "timestamp": "2024-07-29T10:00:00Z",
///     "sender_name": "Alice Johnson",
///     "receiver_name": "Charlie Brown"
///   }
/// ]
/// ```
pub async fn list_transfers(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TransferListQuery>,
) -> Result<Json<Vec<TransferView>>, AppError> {
    let transfers = state.transfers.list(query.kind.as_deref()).await?;

    Ok(Json(transfers))
}

/// Record a transfer. No balances change.
pub async fn create_transfer(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateTransferRequest>,
) -> Result<(StatusCode, Json<Transfer>), AppError> {
    let transfer = state.transfers.create(request).await?;

    Ok((StatusCode::CREATED, Json(transfer)))
}

pub async fn patch_transfer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<TransferPatch>,
) -> Result<Json<Transfer>, AppError> {
    let transfer = state.transfers.patch(&id, patch).await?;

    Ok(Json(transfer))
}
