/// Error types for the extension runtime

use thiserror::Error;

/// Read/write failure on the extension-scoped token store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
}

/// No response, or an unusable one, from the background relay
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessageError {
    #[error("relay unreachable: {0}")]
    Unreachable(String),

    #[error("relay returned no response")]
    NoResponse,

    #[error("invalid relay response: {0}")]
    InvalidResponse(String),
}

/// Token that cannot be decoded into claims
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("token is not a three-part JWT")]
    Malformed,

    #[error("invalid base64 in token payload: {0}")]
    Base64(String),

    #[error("invalid JSON in token payload: {0}")]
    Json(String),
}

impl From<base64::DecodeError> for DecodeError {
    fn from(e: base64::DecodeError) -> Self {
        DecodeError::Base64(e.to_string())
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e.to_string())
    }
}

/// Any failed call to an external HTTP service
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("{endpoint} responded with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("{endpoint} rejected the request: {message}")]
    Rejected { endpoint: String, message: String },

    #[error("unexpected response from {endpoint}: {reason}")]
    Body { endpoint: String, reason: String },

    #[error("invalid service URL: {0}")]
    Url(String),
}

impl NetworkError {
    pub fn transport(endpoint: &str, err: impl std::fmt::Display) -> Self {
        NetworkError::Transport {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn body(endpoint: &str, err: impl std::fmt::Display) -> Self {
        NetworkError::Body {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn rejected(endpoint: &str, message: Option<String>) -> Self {
        NetworkError::Rejected {
            endpoint: endpoint.to_string(),
            message: message.unwrap_or_else(|| "no message".to_string()),
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(e: url::ParseError) -> Self {
        NetworkError::Url(e.to_string())
    }
}

/// Interactive sign-in and registration failures shown inline on the auth forms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Account exists with a different credential. Please log in with that credential.")]
    DifferentCredential,

    #[error("Error with email authentication: {0}")]
    Provider(String),

    #[error("Error with email authentication: {0}")]
    Network(#[from] NetworkError),
}
