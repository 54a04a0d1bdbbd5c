//! MPIN (transaction PIN) request and response types.
//!
//! The credential itself lives on the account record as an optional sealed
//! value. Its status is never stored independently: an account is `Set`
//! exactly when a sealed value is present.

use serde::{Deserialize, Serialize};

/// Two-state credential status shown to clients.
///
/// Serialized as `"Set"` / `"Not Set"` to match what the mobile client renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MpinStatus {
    #[serde(rename = "Not Set")]
    NotSet,
    Set,
}

impl MpinStatus {
    pub fn from_stored(mpin: Option<&str>) -> Self {
        match mpin {
            Some(_) => MpinStatus::Set,
            None => MpinStatus::NotSet,
        }
    }
}

/// Action requested on `POST /api/mpin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpinAction {
    Setup,
    Verify,
    Change,
}

impl MpinAction {
    /// Parse the wire name of an action; unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "setup" => Some(MpinAction::Setup),
            "verify" => Some(MpinAction::Verify),
            "change" => Some(MpinAction::Change),
            _ => None,
        }
    }
}

/// Request body for `POST /api/mpin`.
///
/// # JSON Example
///
/// ```json
/// {
///   "identity": "firebase-uid-123",
///   "value": "1234",
///   "action": "verify"
/// }
/// ```
///
/// Fields default to empty so that a missing field is reported as
/// "Missing required fields" rather than a deserialization error.
#[derive(Debug, Deserialize)]
pub struct MpinRequest {
    #[serde(default)]
    pub identity: String,

    #[serde(default)]
    pub value: String,

    /// Parsed by the handler so an unknown action gets its own message
    #[serde(default)]
    pub action: Option<String>,
}

/// Result of comparing a submitted MPIN against the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpinCheck {
    Match,
    Mismatch,
}

/// Outcome of a setup call.
///
/// `Skipped` only occurs when setup is configured not to require an existing
/// account and no account matched the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    Stored,
    Skipped,
}

/// Read-only projection returned by `GET /api/mpin`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MpinStatusResponse {
    pub mpin_status: MpinStatus,
    pub has_mpin: bool,
}

impl From<MpinStatus> for MpinStatusResponse {
    fn from(status: MpinStatus) -> Self {
        Self {
            mpin_status: status,
            has_mpin: status == MpinStatus::Set,
        }
    }
}

/// Success envelope for MPIN actions.
#[derive(Debug, Serialize)]
pub struct MpinActionResponse {
    pub success: bool,
    pub message: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpin_status: Option<MpinStatus>,
}

impl MpinActionResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
            mpin_status: None,
        }
    }

    pub fn with_status(mut self, status: MpinStatus) -> Self {
        self.mpin_status = Some(status);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_parse_by_wire_name() {
        assert_eq!(MpinAction::parse("setup"), Some(MpinAction::Setup));
        assert_eq!(MpinAction::parse("verify"), Some(MpinAction::Verify));
        assert_eq!(MpinAction::parse("change"), Some(MpinAction::Change));
        assert_eq!(MpinAction::parse("Setup"), None);
        assert_eq!(MpinAction::parse("reset"), None);
    }

    #[test]
    fn unknown_action_still_deserializes() {
        let request: MpinRequest =
            serde_json::from_str(r#"{"identity":"u1","value":"1","action":"reset"}"#).unwrap();

        assert_eq!(request.action.as_deref(), Some("reset"));
    }
}
