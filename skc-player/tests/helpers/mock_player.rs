//! Mock player HTTP API
//!
//! Serves `GET /api/sonos` (the player configuration, pointing back at this
//! server) and answers every other request as a player command addressed to
//! `/{ROOM}/{command}`. Commands are recorded in arrival order.

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use skc_common::MemoryStore;
use skc_player::{BookmarkStore, CommandDispatcher, ConfigCache, PlayerService};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ROOM: &str = "Kinderzimmer";

struct Inner {
    requests: Vec<String>,
    state: Value,
    tts: Option<Value>,
    failing: Vec<String>,
    config_delay: Duration,
    config_status: StatusCode,
}

#[derive(Clone)]
struct MockState {
    inner: Arc<Mutex<Inner>>,
    config_hits: Arc<AtomicUsize>,
    port: u16,
}

pub struct MockPlayer {
    addr: SocketAddr,
    state: MockState,
}

impl MockPlayer {
    /// Bind to an ephemeral port and start serving
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock player");
        let addr = listener.local_addr().expect("mock player address");

        let state = MockState {
            inner: Arc::new(Mutex::new(Inner {
                requests: Vec::new(),
                state: json!({
                    "trackNo": 1,
                    "elapsedTime": 0,
                    "currentTrack": { "duration": 0 },
                    "nextTrack": { "duration": 0 }
                }),
                tts: None,
                failing: Vec::new(),
                config_delay: Duration::ZERO,
                config_status: StatusCode::OK,
            })),
            config_hits: Arc::new(AtomicUsize::new(0)),
            port: addr.port(),
        };

        let app = Router::new()
            .route("/api/sonos", get(config_handler))
            .fallback(command_handler)
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock player server");
        });

        Self { addr, state }
    }

    pub fn api_base(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// State returned by the `state` command
    pub fn set_state(&self, state: Value) {
        self.state.inner.lock().unwrap().state = state;
    }

    /// `tts` section of the served configuration
    pub fn set_tts(&self, tts: Value) {
        self.state.inner.lock().unwrap().tts = Some(tts);
    }

    /// Answer commands starting with `prefix` with HTTP 500
    pub fn fail(&self, prefix: &str) {
        self.state.inner.lock().unwrap().failing.push(prefix.to_string());
    }

    pub fn set_config_delay(&self, delay: Duration) {
        self.state.inner.lock().unwrap().config_delay = delay;
    }

    pub fn set_config_status(&self, status: StatusCode) {
        self.state.inner.lock().unwrap().config_status = status;
    }

    /// Commands received so far, without the room prefix
    pub fn requests(&self) -> Vec<String> {
        self.state.inner.lock().unwrap().requests.clone()
    }

    pub fn config_hits(&self) -> usize {
        self.state.config_hits.load(Ordering::SeqCst)
    }

    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("http client")
    }

    pub fn config_cache(&self) -> Arc<ConfigCache> {
        Arc::new(ConfigCache::remote(self.http_client(), &self.api_base()))
    }

    pub fn dispatcher(&self) -> CommandDispatcher {
        CommandDispatcher::new(self.http_client(), self.config_cache())
    }

    /// Service with an in-memory bookmark store
    pub fn service(&self) -> PlayerService {
        PlayerService::new(
            self.dispatcher(),
            BookmarkStore::new(Arc::new(MemoryStore::new())),
        )
    }
}

async fn config_handler(State(state): State<MockState>) -> Response {
    state.config_hits.fetch_add(1, Ordering::SeqCst);

    let (delay, status, tts) = {
        let inner = state.inner.lock().unwrap();
        (inner.config_delay, inner.config_status, inner.tts.clone())
    };

    tokio::time::sleep(delay).await;

    if status != StatusCode::OK {
        return status.into_response();
    }

    let mut config = json!({
        "server": "127.0.0.1",
        "port": state.port.to_string(),
        "rooms": [ROOM]
    });
    if let Some(tts) = tts {
        config["tts"] = tts;
    }

    Json(config).into_response()
}

async fn command_handler(State(state): State<MockState>, uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let command = path
        .strip_prefix(ROOM)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
        .to_string();

    let mut inner = state.inner.lock().unwrap();
    inner.requests.push(command.clone());

    if inner.failing.iter().any(|prefix| command.starts_with(prefix.as_str())) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    if command == "state" {
        return Json(inner.state.clone()).into_response();
    }

    Json(json!({ "status": "success" })).into_response()
}
