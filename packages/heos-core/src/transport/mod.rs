//! Inbound event stream.
//!
//! The bridge pushes every HEOS message as a server-sent event. This module
//! turns the HTTP response body into text messages and keeps the connection
//! alive across drops.

mod sse;

pub use sse::SseDecoder;

use futures::{Stream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::Client;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::retry::reconnect_delay;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that end one event stream connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connecting or reading the body failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP error {0}")]
    HttpStatus(u16),

    /// Server closed the stream.
    #[error("Event stream closed by server")]
    Closed,
}

/// Convenient Result alias for event stream operations.
pub type TransportResult<T> = Result<T, TransportError>;

// ─────────────────────────────────────────────────────────────────────────────
// Stream
// ─────────────────────────────────────────────────────────────────────────────

/// Opens the event stream and yields each message's data.
///
/// The stream ends with exactly one error: the reason the connection ended
/// ([`TransportError::Closed`] for a clean end of body).
pub fn event_stream(client: Client, url: String) -> impl Stream<Item = TransportResult<String>> {
    async_stream::try_stream! {
        let response = client
            .get(&url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            Err::<(), _>(TransportError::HttpStatus(status.as_u16()))?;
        }
        log::info!("[EventStream] Connected to {}", url);

        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for message in decoder.push(&chunk) {
                yield message;
            }
        }
        Err::<(), _>(TransportError::Closed)?;
    }
}

/// Keeps an event stream connected and forwards its messages.
pub struct EventStreamReader {
    client: Client,
    url: String,
}

impl EventStreamReader {
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Forwards messages into `tx` until cancelled or the receiver is gone.
    ///
    /// Reconnects after every failure, backing off while no message has been
    /// received on the new connection.
    pub async fn run(self, tx: mpsc::Sender<String>, cancel: CancellationToken) {
        let mut attempt = 0;
        loop {
            let mut stream = Box::pin(event_stream(self.client.clone(), self.url.clone()));
            let error = loop {
                let item = tokio::select! {
                    _ = cancel.cancelled() => {
                        log::info!("[EventStream] Reader stopped");
                        return;
                    }
                    item = stream.next() => item,
                };
                match item {
                    Some(Ok(message)) => {
                        attempt = 0;
                        if tx.send(message).await.is_err() {
                            log::info!("[EventStream] Receiver dropped, stopping reader");
                            return;
                        }
                    }
                    Some(Err(e)) => break e,
                    None => break TransportError::Closed,
                }
            };

            let delay = reconnect_delay(attempt);
            attempt += 1;
            log::warn!(
                "[EventStream] Disconnected: {}. Reconnecting in {:?}",
                error,
                delay
            );
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
