/// Content bridge: copies the web app's token into extension storage once per page load

use log::{error, info};

use crate::error::MessageError;
use crate::protocol::{MessageClient, RelayRequest};
use crate::storage::USER_TOKEN_KEY;
use crate::token::AuthToken;

/// Synchronous page-local storage (the web app's `localStorage`)
pub trait PageStorage {
    fn get_item(&self, key: &str) -> Option<String>;
}

/// What a single bridge run did
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeOutcome {
    /// Token sent and the relay saved it
    Forwarded,
    /// Token sent but the relay answered with an error
    Rejected(String),
    /// Nothing in page storage; no message sent
    NoToken,
    /// Token sent but no usable reply came back
    RelayUnreachable(MessageError),
}

pub struct ContentBridge<P, M> {
    page: P,
    messenger: M,
}

impl<P: PageStorage, M: MessageClient> ContentBridge<P, M> {
    pub fn new(page: P, messenger: M) -> Self {
        ContentBridge { page, messenger }
    }

    /// Load-time snapshot: read the page token once and forward it at most once.
    /// Tokens the page writes later are not picked up, and nothing is retried.
    pub async fn run(&self) -> BridgeOutcome {
        let Some(token) = self
            .page
            .get_item(USER_TOKEN_KEY)
            .filter(|raw| !raw.is_empty())
            .map(AuthToken::new)
        else {
            error!("No token found in webpage localStorage");
            return BridgeOutcome::NoToken;
        };

        info!("Token from webpage localStorage: {}", token.redacted());

        match self.messenger.send(RelayRequest::store_token(token)).await {
            Ok(response) if response.is_success() => {
                info!("Token successfully saved to extension storage");
                BridgeOutcome::Forwarded
            }
            Ok(response) => {
                let message = response.message.unwrap_or_default();
                error!("Failed to save token to extension storage: {}", message);
                BridgeOutcome::Rejected(message)
            }
            Err(e) => {
                error!("Failed to save token to extension storage: {}", e);
                BridgeOutcome::RelayUnreachable(e)
            }
        }
    }
}
