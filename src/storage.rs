/// Token persistence in chrome.storage.local

use crate::error::StorageError;
use crate::token::AuthToken;
use serde::{Deserialize, Serialize};

/// Key shared by page localStorage and extension storage (disjoint areas)
pub const USER_TOKEN_KEY: &str = "userToken";

/// Async, durable, extension-private key-value area.
///
/// Each call is atomic on its own; callers add no locking on top.
#[allow(async_fn_in_trait)]
pub trait StorageClient {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Root storage structure, `{ userToken: ... }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTokenRecord {
    #[serde(rename = "userToken", default, skip_serializing_if = "Option::is_none")]
    pub user_token: Option<AuthToken>,
}

impl StoredTokenRecord {
    pub fn new(token: AuthToken) -> Self {
        StoredTokenRecord {
            user_token: Some(token),
        }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.user_token.as_ref()
    }
}

/// Single-slot token store. A put overwrites whatever was there.
pub struct TokenStore<S> {
    storage: S,
}

impl<S: StorageClient> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        TokenStore { storage }
    }

    pub async fn put(&self, token: &AuthToken) -> Result<(), StorageError> {
        self.storage.set(USER_TOKEN_KEY, token.as_str()).await
    }

    /// Snapshot of the stored entry; an empty stored value counts as no token.
    pub async fn record(&self) -> Result<StoredTokenRecord, StorageError> {
        let user_token = self
            .storage
            .get(USER_TOKEN_KEY)
            .await?
            .filter(|raw| !raw.is_empty())
            .map(AuthToken::new);
        Ok(StoredTokenRecord { user_token })
    }

    pub async fn get(&self) -> Result<Option<AuthToken>, StorageError> {
        Ok(self.record().await?.user_token)
    }
}
