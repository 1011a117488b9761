/// Message contract between extension contexts and the background relay

use serde::{Deserialize, Serialize};

use crate::error::MessageError;
use crate::token::AuthToken;

pub const MSG_MISSING_TOKEN: &str = "Missing token";
pub const MSG_SAVE_FAILED: &str = "Failed to save token";
pub const MSG_RETRIEVE_FAILED: &str = "Failed to retrieve token";
pub const MSG_NO_TOKEN: &str = "No token found";
pub const MSG_UNKNOWN_ACTION: &str = "unknown action";

/// Request sent over `chrome.runtime.sendMessage`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum RelayRequest {
    #[serde(rename = "storeToken")]
    StoreToken {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<AuthToken>,
    },
    #[serde(rename = "getUserToken")]
    GetUserToken,
    #[serde(other)]
    Unknown,
}

impl RelayRequest {
    pub fn store_token(token: AuthToken) -> Self {
        RelayRequest::StoreToken { token: Some(token) }
    }

    /// Parse an arbitrary message. The `action` decides the variant; a
    /// `token` that is not a string counts as missing. Anything without a
    /// recognised `action` maps to `Unknown` so the relay can still answer it.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value.get("action").and_then(serde_json::Value::as_str) {
            Some("storeToken") => RelayRequest::StoreToken {
                token: value
                    .get("token")
                    .and_then(serde_json::Value::as_str)
                    .map(AuthToken::new),
            },
            Some("getUserToken") => RelayRequest::GetUserToken,
            _ => RelayRequest::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayStatus {
    Success,
    Error,
}

/// Reply to a `RelayRequest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub status: RelayStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<AuthToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RelayResponse {
    pub fn success() -> Self {
        RelayResponse {
            status: RelayStatus::Success,
            token: None,
            message: None,
        }
    }

    pub fn with_token(token: AuthToken) -> Self {
        RelayResponse {
            status: RelayStatus::Success,
            token: Some(token),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        RelayResponse {
            status: RelayStatus::Error,
            token: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RelayStatus::Success
    }
}

/// Async channel from any extension context to the background relay.
/// The reply arrives after the relay's storage call resolves.
#[allow(async_fn_in_trait)]
pub trait MessageClient {
    async fn send(&self, request: RelayRequest) -> Result<RelayResponse, MessageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_store_token() {
        let request = RelayRequest::from_json(json!({"action": "storeToken", "token": "abc"}));

        assert_eq!(request, RelayRequest::store_token(AuthToken::new("abc")));
    }

    #[test]
    fn test_parse_store_token_without_token() {
        let request = RelayRequest::from_json(json!({"action": "storeToken"}));

        assert_eq!(request, RelayRequest::StoreToken { token: None });
    }

    #[test]
    fn test_parse_get_user_token() {
        let request = RelayRequest::from_json(json!({"action": "getUserToken"}));

        assert_eq!(request, RelayRequest::GetUserToken);
    }

    #[test]
    fn test_parse_unknown_action() {
        assert_eq!(
            RelayRequest::from_json(json!({"action": "clearEverything"})),
            RelayRequest::Unknown
        );
        assert_eq!(RelayRequest::from_json(json!({"token": "abc"})), RelayRequest::Unknown);
        assert_eq!(RelayRequest::from_json(json!("storeToken")), RelayRequest::Unknown);
        assert_eq!(RelayRequest::from_json(json!({"action": 7})), RelayRequest::Unknown);
    }

    #[test]
    fn test_request_wire_format() {
        let json = serde_json::to_value(RelayRequest::store_token(AuthToken::new("t"))).unwrap();
        assert_eq!(json, json!({"action": "storeToken", "token": "t"}));

        let json = serde_json::to_value(RelayRequest::GetUserToken).unwrap();
        assert_eq!(json, json!({"action": "getUserToken"}));
    }

    #[test]
    fn test_response_wire_format() {
        assert_eq!(
            serde_json::to_value(RelayResponse::success()).unwrap(),
            json!({"status": "success"})
        );
        assert_eq!(
            serde_json::to_value(RelayResponse::with_token(AuthToken::new("t"))).unwrap(),
            json!({"status": "success", "token": "t"})
        );
        assert_eq!(
            serde_json::to_value(RelayResponse::error(MSG_NO_TOKEN)).unwrap(),
            json!({"status": "error", "message": "No token found"})
        );
    }
}
