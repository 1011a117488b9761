/// Background relay: the one entry point other contexts use to reach the token store

use log::{error, info, warn};

use crate::protocol::{
    MSG_MISSING_TOKEN, MSG_NO_TOKEN, MSG_RETRIEVE_FAILED, MSG_SAVE_FAILED, MSG_UNKNOWN_ACTION,
    RelayRequest, RelayResponse,
};
use crate::storage::{StorageClient, TokenStore};

pub struct BackgroundRelay<S> {
    store: TokenStore<S>,
}

impl<S: StorageClient> BackgroundRelay<S> {
    pub fn new(storage: S) -> Self {
        BackgroundRelay {
            store: TokenStore::new(storage),
        }
    }

    /// Answer one request. Always produces a response, including for
    /// actions the relay does not know.
    pub async fn handle(&self, request: RelayRequest) -> RelayResponse {
        match request {
            RelayRequest::StoreToken { token: Some(token) } if !token.as_str().is_empty() => {
                match self.store.put(&token).await {
                    Ok(()) => {
                        info!("Token saved to extension storage: {}", token.redacted());
                        RelayResponse::success()
                    }
                    Err(e) => {
                        error!("Failed to save token: {}", e);
                        RelayResponse::error(MSG_SAVE_FAILED)
                    }
                }
            }
            RelayRequest::StoreToken { .. } => {
                warn!("storeToken request without a token");
                RelayResponse::error(MSG_MISSING_TOKEN)
            }
            RelayRequest::GetUserToken => match self.store.get().await {
                Ok(Some(token)) => {
                    info!("Token retrieved from extension storage: {}", token.redacted());
                    RelayResponse::with_token(token)
                }
                Ok(None) => {
                    info!("No token found in extension storage");
                    RelayResponse::error(MSG_NO_TOKEN)
                }
                Err(e) => {
                    error!("Error retrieving token: {}", e);
                    RelayResponse::error(MSG_RETRIEVE_FAILED)
                }
            },
            RelayRequest::Unknown => {
                warn!("Ignoring relay message with unknown action");
                RelayResponse::error(MSG_UNKNOWN_ACTION)
            }
        }
    }

    /// Entry point for raw JSON messages from the runtime channel.
    pub async fn handle_json(&self, message: serde_json::Value) -> RelayResponse {
        self.handle(RelayRequest::from_json(message)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RelayStatus;
    use crate::test_support::MemoryStorage;
    use crate::token::{AuthToken, encode_test_token};
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_store_then_get_round_trip() {
        let relay = BackgroundRelay::new(MemoryStorage::new());
        let token = encode_test_token(&json!({"email": "ada@example.com"}));

        let stored = block_on(relay.handle(RelayRequest::store_token(token.clone())));
        let fetched = block_on(relay.handle(RelayRequest::GetUserToken));

        assert_eq!(stored, RelayResponse::success());
        assert_eq!(fetched, RelayResponse::with_token(token));
    }

    #[test]
    fn test_get_with_empty_storage() {
        let relay = BackgroundRelay::new(MemoryStorage::new());

        let response = block_on(relay.handle_json(json!({"action": "getUserToken"})));

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "error", "message": "No token found"})
        );
    }

    #[test]
    fn test_store_with_unavailable_storage() {
        let relay = BackgroundRelay::new(MemoryStorage::failing());

        let response = block_on(relay.handle(RelayRequest::store_token(AuthToken::new("t"))));

        assert_eq!(response.status, RelayStatus::Error);
        assert_eq!(response.message.as_deref(), Some(MSG_SAVE_FAILED));
    }

    #[test]
    fn test_get_with_unavailable_storage() {
        let relay = BackgroundRelay::new(MemoryStorage::failing());

        let response = block_on(relay.handle(RelayRequest::GetUserToken));

        assert_eq!(response, RelayResponse::error(MSG_RETRIEVE_FAILED));
    }

    #[test]
    fn test_store_without_token() {
        let storage = MemoryStorage::new();
        let relay = BackgroundRelay::new(storage.clone());

        let missing = block_on(relay.handle_json(json!({"action": "storeToken"})));
        let empty = block_on(relay.handle_json(json!({"action": "storeToken", "token": ""})));

        assert_eq!(missing, RelayResponse::error(MSG_MISSING_TOKEN));
        assert_eq!(empty, RelayResponse::error(MSG_MISSING_TOKEN));
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn test_store_with_non_string_token() {
        let storage = MemoryStorage::new();
        let relay = BackgroundRelay::new(storage.clone());

        let number = block_on(relay.handle_json(json!({"action": "storeToken", "token": 42})));
        let object = block_on(relay.handle_json(json!({"action": "storeToken", "token": {"t": 1}})));

        assert_eq!(number, RelayResponse::error(MSG_MISSING_TOKEN));
        assert_eq!(object, RelayResponse::error(MSG_MISSING_TOKEN));
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn test_unknown_action_gets_explicit_error() {
        let relay = BackgroundRelay::new(MemoryStorage::new());

        let response = block_on(relay.handle_json(json!({"action": "deleteEverything"})));

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "error", "message": "unknown action"})
        );
    }

    #[test]
    fn test_new_store_overwrites_old_token() {
        let relay = BackgroundRelay::new(MemoryStorage::new());

        block_on(relay.handle(RelayRequest::store_token(AuthToken::new("old"))));
        block_on(relay.handle(RelayRequest::store_token(AuthToken::new("new"))));
        let fetched = block_on(relay.handle(RelayRequest::GetUserToken));

        assert_eq!(fetched.token, Some(AuthToken::new("new")));
    }
}
