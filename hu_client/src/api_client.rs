//! HTTP matchmaking client.

use anyhow::{Context, Result};
use hu_poker::PlayerId;
use serde::{Deserialize, Serialize};

/// API client for the matchmaking endpoints
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CreateGameResponse {
    game_id: String,
}

#[derive(Debug, Serialize)]
struct JoinGameRequest<'a> {
    game_id: &'a str,
}

/// Where to connect once matched.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct JoinGameResponse {
    /// The id the server will put in `from` for our actions.
    pub client_id: PlayerId,
    /// Websocket URL for this client.
    pub url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Ask the server for a new game and return its id
    pub async fn create_game(&self) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/create", self.base_url))
            .send()
            .await
            .context("Failed to send create request")?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            anyhow::bail!("Create game failed: {error_text}");
        }

        let created: CreateGameResponse = response
            .json()
            .await
            .context("Failed to parse create response")?;
        tracing::info!(game_id = %created.game_id, "Created game");

        Ok(created.game_id)
    }

    /// Join a game and get back our client id and websocket URL
    pub async fn join_game(&self, game_id: &str) -> Result<JoinGameResponse> {
        let response = self
            .client
            .post(format!("{}/join", self.base_url))
            .json(&JoinGameRequest { game_id })
            .send()
            .await
            .context("Failed to send join request")?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            anyhow::bail!("Join game failed: {error_text}");
        }

        let joined: JoinGameResponse = response
            .json()
            .await
            .context("Failed to parse join response")?;
        tracing::info!(client_id = %joined.client_id, "Joined game");

        Ok(joined)
    }

    /// Websocket URL for a client id, for servers that don't hand one out
    pub fn websocket_url(&self, client_id: &PlayerId) -> String {
        let ws_url = self
            .base_url
            .replacen("http://", "ws://", 1)
            .replacen("https://", "wss://", 1);
        format!("{ws_url}/ws/{client_id}")
    }
}
