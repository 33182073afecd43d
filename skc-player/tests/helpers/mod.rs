//! Test helper modules for skc-player integration tests
//!
//! - MockPlayer: throwaway HTTP server standing in for the player API and
//!   its `/api/sonos` configuration endpoint

#![allow(dead_code)]

pub mod mock_player;

pub use mock_player::{MockPlayer, ROOM};
