//! Configuration cache integration tests
//!
//! The player configuration must be fetched exactly once per cache, no matter
//! how many callers ask for it or when, and a failed fetch stays failed.

mod helpers;

use axum::http::StatusCode;
use futures::future::join_all;
use helpers::{MockPlayer, ROOM};
use skc_player::PlayerError;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_fetches_config_from_api_base() {
    let mock = MockPlayer::start().await;
    let cache = mock.config_cache();

    let config = cache.get_config().await.unwrap();
    assert_eq!(config.server, "127.0.0.1");
    assert_eq!(config.port, mock.port());
    assert_eq!(config.rooms, vec![ROOM.to_string()]);
    assert_eq!(mock.config_hits(), 1);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_fetch() {
    let mock = MockPlayer::start().await;
    mock.set_config_delay(Duration::from_millis(100));
    let cache = mock.config_cache();

    let results = join_all((0..10).map(|_| cache.get_config())).await;

    assert_eq!(mock.config_hits(), 1);
    let first = results[0].as_ref().unwrap();
    for result in &results {
        assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
    }
}

#[tokio::test]
async fn test_concurrent_callers_on_spawned_tasks_share_one_fetch() {
    let mock = MockPlayer::start().await;
    mock.set_config_delay(Duration::from_millis(100));
    let cache = mock.config_cache();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_config().await.map(|c| c.port) })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), mock.port());
    }
    assert_eq!(mock.config_hits(), 1);
}

#[tokio::test]
async fn test_later_callers_reuse_cached_config() {
    let mock = MockPlayer::start().await;
    let cache = mock.config_cache();

    cache.get_config().await.unwrap();
    cache.get_config().await.unwrap();
    cache.get_config().await.unwrap();

    assert_eq!(mock.config_hits(), 1);
}

#[tokio::test]
async fn test_failed_fetch_is_not_retried() {
    let mock = MockPlayer::start().await;
    mock.set_config_status(StatusCode::SERVICE_UNAVAILABLE);
    let cache = mock.config_cache();

    let first = cache.get_config().await;
    assert!(matches!(first, Err(PlayerError::ConfigUnavailable(_))));

    // The endpoint recovers, the cache does not
    mock.set_config_status(StatusCode::OK);
    let second = cache.get_config().await;
    assert!(matches!(second, Err(PlayerError::ConfigUnavailable(_))));

    assert_eq!(mock.config_hits(), 1);
}

#[tokio::test]
async fn test_commands_fail_when_config_unavailable() {
    let mock = MockPlayer::start().await;
    mock.set_config_status(StatusCode::NOT_FOUND);
    let dispatcher = mock.dispatcher();

    let result = dispatcher.send_request("play").await;
    assert!(matches!(result, Err(PlayerError::ConfigUnavailable(_))));
    assert!(mock.requests().is_empty());
}
