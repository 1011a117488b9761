/// LeetPath - Chrome extension for LeetCode problem recommendations
/// Built with Rust + WASM + Yew

pub mod api;
pub mod auth;
pub mod bridge;
pub mod catalog;
pub mod chrome;
pub mod config;
pub mod error;
pub mod profile;
pub mod protocol;
pub mod recommendations;
pub mod relay;
pub mod session;
pub mod storage;
pub mod token;
pub mod ui;

#[cfg(test)]
mod test_support;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::bridge::ContentBridge;
use crate::chrome::{ExtensionStorage, RuntimeMessenger, WindowLocalStorage};
use crate::relay::BackgroundRelay;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// One-shot token copy from the web app page into extension storage
#[wasm_bindgen]
pub fn run_content_bridge() {
    spawn_local(async {
        ContentBridge::new(WindowLocalStorage, RuntimeMessenger).run().await;
    });
}

// Background message listener body; resolves to the reply for sendResponse
#[wasm_bindgen]
pub fn handle_relay_message(message: JsValue) -> js_sys::Promise {
    let request = chrome::message_to_json(message);
    future_to_promise(async move {
        let response = BackgroundRelay::new(ExtensionStorage)
            .handle_json(request)
            .await;
        chrome::response_to_js(&response)
    })
}
