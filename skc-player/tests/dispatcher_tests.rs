//! Command dispatcher integration tests

mod helpers;

use helpers::MockPlayer;
use serde_json::json;
use skc_player::{PlayerCmd, PlayerError};

#[tokio::test]
async fn test_request_is_addressed_to_first_room() {
    let mock = MockPlayer::start().await;
    let dispatcher = mock.dispatcher();

    let payload = dispatcher.send_request("trackseek/3").await.unwrap();

    assert_eq!(payload, json!({ "status": "success" }));
    assert_eq!(mock.requests(), vec!["trackseek/3"]);
}

#[tokio::test]
async fn test_transport_commands() {
    let mock = MockPlayer::start().await;
    let dispatcher = mock.dispatcher();

    for cmd in [
        PlayerCmd::Play,
        PlayerCmd::Pause,
        PlayerCmd::PlayPause,
        PlayerCmd::Previous,
        PlayerCmd::Next,
        PlayerCmd::VolumeUp,
        PlayerCmd::VolumeDown,
        PlayerCmd::ClearQueue,
    ] {
        dispatcher.send_cmd(cmd).await.unwrap();
    }

    assert_eq!(
        mock.requests(),
        vec![
            "play",
            "pause",
            "playpause",
            "previous",
            "next",
            "volume/+5",
            "volume/-5",
            "clearqueue"
        ]
    );
    assert_eq!(mock.config_hits(), 1);
}

#[tokio::test]
async fn test_http_error_is_surfaced() {
    let mock = MockPlayer::start().await;
    mock.fail("next");
    let dispatcher = mock.dispatcher();

    let result = dispatcher.send_cmd(PlayerCmd::Next).await;
    assert!(matches!(result, Err(PlayerError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_get_state_decodes_player_state() {
    let mock = MockPlayer::start().await;
    mock.set_state(json!({
        "playbackState": "PLAYING",
        "trackNo": 7,
        "elapsedTime": 93,
        "currentTrack": { "duration": 1200, "artist": "Bibi Blocksberg" },
        "nextTrack": { "duration": 1100 }
    }));
    let dispatcher = mock.dispatcher();

    let state = dispatcher.get_state().await.unwrap();
    assert_eq!(state.track_no, 7);
    assert_eq!(state.elapsed_time, 93);
    assert_eq!(state.current_track.duration, 1200);
    assert_eq!(state.next_track.duration, 1100);
}

#[tokio::test]
async fn test_undecodable_state_is_error() {
    let mock = MockPlayer::start().await;
    mock.set_state(json!({ "trackNo": "first" }));
    let dispatcher = mock.dispatcher();

    assert!(matches!(
        dispatcher.get_state().await,
        Err(PlayerError::Decode(_))
    ));
}

#[tokio::test]
async fn test_unreachable_player_is_error() {
    let mock = MockPlayer::start().await;
    let closed_port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = skc_player::PlayerConfig {
        server: "127.0.0.1".to_string(),
        port: closed_port,
        rooms: vec!["Bad".to_string()],
        tts: None,
    };
    let dispatcher = skc_player::CommandDispatcher::new(
        mock.http_client(),
        std::sync::Arc::new(skc_player::ConfigCache::fixed(config)),
    );

    assert!(matches!(
        dispatcher.send_cmd(PlayerCmd::Play).await,
        Err(PlayerError::Http(_))
    ));
}
