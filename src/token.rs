/// Auth token handling: unverified claim decoding for UI routing
///
/// Claims are read without checking the signature. The result is only a hint
/// for which view to show; every backend call still validates the token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Opaque signed token issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> AuthToken {
        AuthToken(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Short prefix safe to write to the console
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(12).collect();
        format!("{}…", prefix)
    }

    pub fn claims(&self) -> Result<TokenClaims, DecodeError> {
        decode_claims(&self.0)
    }

    /// Subject email, if the token decodes and carries a non-empty one
    pub fn subject_email(&self) -> Result<Option<String>, DecodeError> {
        Ok(self.claims()?.email.filter(|email| !email.is_empty()))
    }
}

/// Claims read from the token payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<u64>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

/// Decode the payload segment of a JWT into claims.
pub fn decode_claims(token: &str) -> Result<TokenClaims, DecodeError> {
    let mut parts = token.trim().split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(DecodeError::Malformed),
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    if !value.is_object() {
        return Err(DecodeError::Json("payload is not an object".to_string()));
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &serde_json::Value) -> AuthToken {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    AuthToken::new(format!("{}.{}.signature", header, body))
}
