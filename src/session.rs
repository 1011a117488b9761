/// Session bootstrap for the popup: stored token -> which view to show
///
/// The decoded email only decides routing. It is not an authorization check;
/// the backend validates the token on every call.

use log::{error, info, warn};

use crate::protocol::{MessageClient, RelayRequest};
use crate::token::AuthToken;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Resolving,
    Unauthenticated,
    Authenticated { email: String, token: AuthToken },
}

impl SessionState {
    /// Evaluate a token as if it had just come back from the relay.
    pub fn from_token(token: &AuthToken) -> SessionState {
        match token.subject_email() {
            Ok(Some(email)) => {
                info!("User email from token: {}", email);
                SessionState::Authenticated {
                    email,
                    token: token.clone(),
                }
            }
            Ok(None) => {
                error!("Email not found in token");
                SessionState::Unauthenticated
            }
            Err(e) => {
                error!("Failed to decode token: {}", e);
                SessionState::Unauthenticated
            }
        }
    }

    /// Interactive sign-in started; the result re-enters resolution.
    pub fn begin_sign_in(&self) -> SessionState {
        match self {
            SessionState::Unauthenticated => SessionState::Resolving,
            other => other.clone(),
        }
    }

    /// Leave the authenticated view. The stored token stays where it is.
    pub fn sign_out(&self) -> SessionState {
        SessionState::Unauthenticated
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { email, .. } => Some(email),
            _ => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self, SessionState::Resolving)
    }
}

pub struct SessionBootstrap<M> {
    messenger: M,
}

impl<M: MessageClient> SessionBootstrap<M> {
    pub fn new(messenger: M) -> Self {
        SessionBootstrap { messenger }
    }

    /// Send one `getUserToken` and settle the state. Every failure path
    /// ends in `Unauthenticated`.
    pub async fn resolve(&self) -> SessionState {
        match self.messenger.send(RelayRequest::GetUserToken).await {
            Ok(response) if response.is_success() => match response.token {
                Some(token) => SessionState::from_token(&token),
                None => {
                    warn!("Relay reported success without a token");
                    SessionState::Unauthenticated
                }
            },
            Ok(response) => {
                info!(
                    "No stored session: {}",
                    response.message.as_deref().unwrap_or("no message")
                );
                SessionState::Unauthenticated
            }
            Err(e) => {
                error!("Could not reach background relay: {}", e);
                SessionState::Unauthenticated
            }
        }
    }

    /// Persist a freshly issued token through the relay, then resolve again.
    pub async fn adopt(&self, token: AuthToken) -> SessionState {
        match self.messenger.send(RelayRequest::store_token(token.clone())).await {
            Ok(response) if response.is_success() => self.resolve().await,
            Ok(response) => {
                // Not persisted, but the token itself is still usable for this popup
                warn!(
                    "Relay did not store new token: {}",
                    response.message.as_deref().unwrap_or("no message")
                );
                SessionState::from_token(&token)
            }
            Err(e) => {
                warn!("Relay unreachable while storing new token: {}", e);
                SessionState::from_token(&token)
            }
        }
    }
}
