//! WebSocket client for the real-time game connection.

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use hu_poker::{OutboundMessage, PlayerId, Table};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::{
    config::ClientConfig,
    display::Presenter,
    session::{Session, SessionInput},
};

/// WebSocket game client
pub struct WebSocketClient {
    ws_url: String,
    client_id: PlayerId,
    config: ClientConfig,
}

impl WebSocketClient {
    /// Create a new WebSocket client
    pub fn new(ws_url: String, client_id: PlayerId, config: ClientConfig) -> Self {
        Self {
            ws_url,
            client_id,
            config,
        }
    }

    /// Connect to the WebSocket and run the game session until the server
    /// hangs up or the user quits.
    pub async fn connect_and_play<P: Presenter>(self, presenter: P) -> Result<()> {
        tracing::info!(url = %self.ws_url, "Connecting");

        let (ws_stream, _) = connect_async(&self.ws_url)
            .await
            .context("Failed to connect to WebSocket")?;

        let (mut write, mut read) = ws_stream.split();

        // Everything the session reacts to goes through this one queue
        let (tx_input, rx_input) = mpsc::unbounded_channel::<SessionInput>();
        // Validated actions to send
        let (tx_outbound, mut rx_outbound) = mpsc::unbounded_channel::<OutboundMessage>();

        // Spawn task to handle outgoing messages
        let write_handle = tokio::spawn(async move {
            while let Some(message) = rx_outbound.recv().await {
                let json = match message.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize {message}: {e}");
                        continue;
                    }
                };
                if write.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            let _ = write.close().await;
        });

        // Spawn task to handle incoming messages
        let tx_server = tx_input.clone();
        let read_handle = tokio::spawn(async move {
            let _ = tx_server.send(SessionInput::Opened);
            let reason = loop {
                match read.next().await {
                    Some(Ok(Message::Text(text))) => {
                        if tx_server
                            .send(SessionInput::Server(text.as_str().to_owned()))
                            .is_err()
                        {
                            return;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        break frame.map(|f| format!("Server closed connection: {}", f.reason.as_str()));
                    }
                    Some(Err(e)) => break Some(format!("WebSocket error: {e}")),
                    None => break None,
                    Some(Ok(_)) => {}
                }
            };
            let _ = tx_server.send(SessionInput::Closed(reason));
        });

        // Spawn task to handle user input
        let tx_user = tx_input.clone();
        let input_handle = tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx_user.send(SessionInput::User(line)).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        let _ = tx_user.send(SessionInput::Closed(Some("Input closed".to_string())));
                        break;
                    }
                    Err(e) => {
                        let _ = tx_user.send(SessionInput::Closed(Some(format!(
                            "Error reading input: {e}"
                        ))));
                        break;
                    }
                }
            }
        });

        let table = Table::new(self.client_id, self.config.turn_ticks);
        let session = Session::new(
            table,
            presenter,
            tx_outbound,
            tx_input,
            self.config.tick_interval,
        );
        // The session owns the outbound sender, so the writer drains and
        // closes once it returns
        session.run(rx_input).await;

        // Clean up
        input_handle.abort();
        read_handle.abort();
        let _ = write_handle.await;

        Ok(())
    }
}
