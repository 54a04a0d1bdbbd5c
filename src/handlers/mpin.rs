//! MPIN HTTP handlers.
//!
//! - POST /api/mpin - setup, verify or change, selected by `action`
//! - GET /api/mpin?identity= - MPIN status for an account

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    extract::{AppJson, AppQuery},
    models::{
        account::IdentityQuery,
        mpin::{
            MpinAction, MpinActionResponse, MpinCheck, MpinRequest, MpinStatus,
            MpinStatusResponse, SetupOutcome,
        },
    },
    state::AppState,
};

/// Run one MPIN action.
///
/// # Request Body
///
/// ```json
/// { "identity": "firebase-uid-123", "value": "1234", "action": "setup" }
/// ```
///
/// # Response
///
/// - **200 OK**: `{ "success": true, "message": "..." }`
/// - **400**: missing fields, unknown action, or MPIN not set (verify/change)
/// - **401**: verify with a wrong MPIN
/// - **404**: no account for this identity
pub async fn mpin_action(
    State(state): State<AppState>,
    AppJson(request): AppJson<MpinRequest>,
) -> Result<Json<MpinActionResponse>, AppError> {
    let action = match request.action.as_deref() {
        None | Some("") => return Err(AppError::Validation("Missing required fields".to_string())),
        Some(raw) => MpinAction::parse(raw)
            .ok_or_else(|| AppError::Validation("Invalid action".to_string()))?,
    };

    tracing::info!(identity = %request.identity, ?action, "MPIN request");

    let credentials = &state.credentials;
    let response = match action {
        MpinAction::Setup => match credentials.setup(&request.identity, &request.value).await? {
            SetupOutcome::Stored => {
                MpinActionResponse::ok("MPIN set successfully").with_status(MpinStatus::Set)
            }
            SetupOutcome::Skipped => MpinActionResponse::ok("No matching account; nothing updated")
                .with_status(MpinStatus::NotSet),
        },
        MpinAction::Verify => match credentials.verify(&request.identity, &request.value).await? {
            MpinCheck::Match => MpinActionResponse::ok("MPIN verified successfully"),
            MpinCheck::Mismatch => return Err(AppError::CredentialMismatch),
        },
        MpinAction::Change => {
            credentials.change(&request.identity, &request.value).await?;
            MpinActionResponse::ok("MPIN changed successfully")
        }
    };

    Ok(Json(response))
}

/// MPIN status projection.
///
/// # Response (200 OK)
///
/// ```json
/// { "mpin_status": "Set", "has_mpin": true }
/// ```
pub async fn mpin_status(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<IdentityQuery>,
) -> Result<Json<MpinStatusResponse>, AppError> {
    let identity = query
        .identity
        .filter(|i| !i.is_empty())
        .ok_or_else(|| AppError::Validation("identity is required".to_string()))?;

    let status = state.credentials.status_of(&identity).await?;

    Ok(Json(status.into()))
}
