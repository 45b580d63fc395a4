//! Internal modules for the heads-up poker client.
//!
//! This library provides configuration, command parsing, the matchmaking
//! API client, the session event loop, and console rendering used by the
//! hu_client binary.

pub mod api_client;
pub mod commands;
pub mod config;
pub mod display;
pub mod logging;
pub mod session;
pub mod websocket_client;
