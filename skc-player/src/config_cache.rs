//! Player configuration cache
//!
//! The player configuration is fetched at most once per process. The first
//! caller creates a shared future for the fetch; every caller, concurrent or
//! later, awaits a clone of that same future and observes the same outcome.
//! A failed fetch is cached as well: the client has no fallback and never
//! retries, so a changed player address requires a restart.

use crate::error::{PlayerError, Result};
use crate::sonos_api::PlayerConfig;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

type ConfigFuture = Shared<BoxFuture<'static, std::result::Result<Arc<PlayerConfig>, String>>>;

/// Compute-once cell for the player configuration
pub struct ConfigCache {
    source: ConfigSource,
    pending: Mutex<Option<ConfigFuture>>,
}

enum ConfigSource {
    Remote { http: reqwest::Client, url: String },
    Fixed,
}

impl ConfigCache {
    /// Cache backed by `GET {api_base}/sonos`
    pub fn remote(http: reqwest::Client, api_base: &str) -> Self {
        let url = format!("{}/sonos", api_base.trim_end_matches('/'));
        Self {
            source: ConfigSource::Remote { http, url },
            pending: Mutex::new(None),
        }
    }

    /// Cache that is resolved from the start
    pub fn fixed(config: PlayerConfig) -> Self {
        let ready: ConfigFuture = futures::future::ready(Ok(Arc::new(config)))
            .boxed()
            .shared();
        Self {
            source: ConfigSource::Fixed,
            pending: Mutex::new(Some(ready)),
        }
    }

    /// Configuration endpoint, `None` for a fixed configuration
    pub fn url(&self) -> Option<&str> {
        match &self.source {
            ConfigSource::Remote { url, .. } => Some(url),
            ConfigSource::Fixed => None,
        }
    }

    /// Resolve the player configuration, fetching it on first use
    pub async fn get_config(&self) -> Result<Arc<PlayerConfig>> {
        let shared = {
            let mut pending = self
                .pending
                .lock()
                .map_err(|_| PlayerError::ConfigUnavailable("cache lock poisoned".to_string()))?;
            pending.get_or_insert_with(|| self.start_fetch()).clone()
        };

        shared.await.map_err(PlayerError::ConfigUnavailable)
    }

    fn start_fetch(&self) -> ConfigFuture {
        let (http, url) = match &self.source {
            ConfigSource::Remote { http, url } => (http.clone(), url.clone()),
            // A fixed cache is created resolved and never reaches here
            ConfigSource::Fixed => {
                return futures::future::ready(Err("no configuration source".to_string()))
                    .boxed()
                    .shared()
            }
        };

        debug!(url = %url, "Starting player configuration fetch");

        async move {
            match fetch_config(&http, &url).await {
                Ok(config) => {
                    info!(
                        server = %config.server,
                        port = config.port,
                        rooms = ?config.rooms,
                        "Player configuration loaded"
                    );
                    Ok(Arc::new(config))
                }
                Err(e) => {
                    warn!(url = %url, "Player configuration fetch failed: {}", e);
                    Err(e.to_string())
                }
            }
        }
        .boxed()
        .shared()
    }
}

async fn fetch_config(http: &reqwest::Client, url: &str) -> Result<PlayerConfig> {
    let response = http.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(PlayerError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .json::<PlayerConfig>()
        .await
        .map_err(|e| PlayerError::Decode(e.to_string()))
}
