/// Browser-backed implementations of the storage and messaging capabilities

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::bridge::PageStorage;
use crate::error::{MessageError, StorageError};
use crate::protocol::{MessageClient, RelayRequest, RelayResponse};
use crate::storage::StorageClient;

// Import JS bridge functions
#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn storageGet(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageSet(key: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn runtimeSendMessage(message: JsValue) -> Result<JsValue, JsValue>;
}

/// `chrome.storage.local`
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionStorage;

impl StorageClient for ExtensionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = storageGet(key).await.map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })?;
        Ok(value.as_string())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        storageSet(key, value).await.map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}

/// `chrome.runtime.sendMessage` to the background relay
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeMessenger;

impl MessageClient for RuntimeMessenger {
    async fn send(&self, request: RelayRequest) -> Result<RelayResponse, MessageError> {
        let message = request
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| MessageError::InvalidResponse(format!("cannot encode request: {}", e)))?;

        let reply = runtimeSendMessage(message)
            .await
            .map_err(|e| MessageError::Unreachable(format!("{:?}", e)))?;

        if reply.is_undefined() || reply.is_null() {
            return Err(MessageError::NoResponse);
        }

        serde_wasm_bindgen::from_value(reply)
            .map_err(|e| MessageError::InvalidResponse(e.to_string()))
    }
}

/// The web page's own `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowLocalStorage;

impl PageStorage for WindowLocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(key).ok()?
    }
}

/// Convert a JS message into JSON for the relay; anything unreadable becomes `null`,
/// which the relay answers as an unknown action.
pub fn message_to_json(message: JsValue) -> serde_json::Value {
    serde_wasm_bindgen::from_value(message).unwrap_or(serde_json::Value::Null)
}

pub fn response_to_js(response: &RelayResponse) -> Result<JsValue, JsValue> {
    response
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
