//! Command dispatcher
//!
//! Resolves the player address through the configuration cache and issues
//! `GET http://{server}:{port}/{room}/{path}`. Failures are returned to the
//! caller and logged; the dispatcher never retries.

use crate::commands::PlayerCmd;
use crate::config_cache::ConfigCache;
use crate::error::{PlayerError, Result};
use crate::sonos_api::{PlayerConfig, PlayerState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("skc-player/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the configuration cache and the dispatcher
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Issues relative command paths against the configured player
pub struct CommandDispatcher {
    http: reqwest::Client,
    config: Arc<ConfigCache>,
}

impl CommandDispatcher {
    pub fn new(http: reqwest::Client, config: Arc<ConfigCache>) -> Self {
        Self { http, config }
    }

    pub async fn get_config(&self) -> Result<Arc<PlayerConfig>> {
        self.config.get_config().await
    }

    /// Send `path` to the player and return the decoded response payload
    ///
    /// An empty response body yields `Value::Null`.
    pub async fn send_request(&self, path: &str) -> Result<Value> {
        let result = self.try_send(path).await;
        if let Err(e) = &result {
            warn!(path = %path, "Player command failed: {}", e);
        }
        result
    }

    async fn try_send(&self, path: &str) -> Result<Value> {
        let config = self.config.get_config().await?;
        let url = format!("{}{}", config.base_url()?, path);

        debug!(url = %url, "Sending player command");

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlayerError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body)
            .map_err(|e| PlayerError::Decode(format!("response from {}: {}", url, e)))
    }

    /// Send a transport command, discarding its payload
    pub async fn send_cmd(&self, cmd: PlayerCmd) -> Result<()> {
        self.send_request(cmd.path()).await.map(|_| ())
    }

    /// Query the current playback state
    pub async fn get_state(&self) -> Result<PlayerState> {
        let payload = self.send_request("state").await?;
        serde_json::from_value(payload).map_err(|e| PlayerError::Decode(format!("player state: {}", e)))
    }
}
