//! Loopback HTTP client for the game client's telemetry API.
//!
//! The API is a plain HTTP/1.x server on localhost that closes the connection
//! after each response, so a single `GET` over a fresh `TcpStream` is enough.

use async_trait::async_trait;
use lorbot_core::{ActiveDeck, CardPositions, ClientSettings, Error, MatchResult, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::trace;

use crate::telemetry::TelemetryFeed;

/// Path of the card positions document.
pub const POSITIONS_PATH: &str = "/positional-rectangles";
/// Path of the active deck document.
pub const DECK_PATH: &str = "/static-decklist";
/// Path of the match result document.
pub const RESULT_PATH: &str = "/game-result";

const MAX_RESPONSE_BYTES: u64 = 4 * 1024 * 1024;

/// Telemetry client talking to `http://<host>:<port>/`.
#[derive(Debug, Clone)]
pub struct LoopbackTelemetry {
    host: String,
    port: u16,
    timeout: Duration,
}

impl LoopbackTelemetry {
    /// Create a client for `host:port` with a per-request timeout.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Create a client from the `client` config section.
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(
            settings.telemetry_host.clone(),
            settings.telemetry_port,
            Duration::from_millis(settings.request_timeout_ms),
        )
    }

    /// Fetch and decode one JSON document.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = tokio::time::timeout(self.timeout, self.get(path))
            .await
            .map_err(|_| Error::Telemetry(format!("GET {path} timed out")))??;

        serde_json::from_slice(&body)
            .map_err(|e| Error::Telemetry(format!("GET {path}: invalid JSON: {e}")))
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| Error::Telemetry(format!("connect {}:{}: {e}", self.host, self.port)))?;

        let request = format!(
            "GET {path} HTTP/1.0\r\nHost: {}:{}\r\nAccept: application/json\r\nConnection: close\r\n\r\n",
            self.host, self.port
        );
        stream
            .write_all(request.as_bytes())
            .await
            .map_err(|e| Error::Telemetry(format!("GET {path}: {e}")))?;

        let mut response = Vec::new();
        (&mut stream)
            .take(MAX_RESPONSE_BYTES)
            .read_to_end(&mut response)
            .await
            .map_err(|e| Error::Telemetry(format!("GET {path}: {e}")))?;

        trace!(path, bytes = response.len(), "Telemetry response");
        parse_response(path, &response)
    }
}

/// Split an HTTP response into status and body, rejecting non-200 answers.
fn parse_response(path: &str, response: &[u8]) -> Result<Vec<u8>> {
    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| Error::Telemetry(format!("GET {path}: malformed response")))?;

    let head = String::from_utf8_lossy(&response[..split]);
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| Error::Telemetry(format!("GET {path}: missing status line")))?;

    if status != 200 {
        return Err(Error::Telemetry(format!("GET {path}: HTTP {status}")));
    }

    Ok(response[split + 4..].to_vec())
}

#[async_trait]
impl TelemetryFeed for LoopbackTelemetry {
    async fn card_positions(&self) -> Result<CardPositions> {
        self.get_json(POSITIONS_PATH).await
    }

    async fn active_deck(&self) -> Result<ActiveDeck> {
        self.get_json(DECK_PATH).await
    }

    async fn match_result(&self) -> Result<MatchResult> {
        self.get_json(RESULT_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn serve_once(response: &'static str) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        port
    }

    #[test]
    fn test_parse_response_ok() {
        let body = parse_response("/x", b"HTTP/1.1 200 OK\r\nContent-Type: json\r\n\r\n{}").unwrap();
        assert_eq!(body, b"{}");
    }

    #[test]
    fn test_parse_response_rejects_errors() {
        let err = parse_response("/x", b"HTTP/1.1 503 Unavailable\r\n\r\n").unwrap_err();
        assert!(err.to_string().contains("HTTP 503"));
        assert!(parse_response("/x", b"garbage").is_err());
    }

    #[tokio::test]
    async fn test_fetch_match_result() {
        let port = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"GameID\":3,\"LocalPlayerWon\":false}",
        )
        .await;
        let client = LoopbackTelemetry::new("127.0.0.1", port, Duration::from_secs(2));

        let result = client.match_result().await.unwrap();
        assert_eq!(result.game_id, 3);
        assert!(!result.local_player_won);
    }

    #[tokio::test]
    async fn test_invalid_json_is_telemetry_error() {
        let port = serve_once("HTTP/1.1 200 OK\r\n\r\nnot json").await;
        let client = LoopbackTelemetry::new("127.0.0.1", port, Duration::from_secs(2));

        let err = client.active_deck().await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transient() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = LoopbackTelemetry::new("127.0.0.1", port, Duration::from_secs(2));
        let err = client.card_positions().await.unwrap_err();
        assert!(matches!(err, Error::Telemetry(_)));
    }
}
