//! Messages pushed over the event stream and the error payload codec.
//!
//! Three frames exist on the wire:
//!
//! ```text
//! data: refresh\n\n
//! data: <base64 of the bundler's stderr>\n\n
//! : heartbeat\n\n
//! ```
//!
//! The browser client reloads on `refresh`, runs `atob` on any other data
//! line and logs the result, and ignores comments.

use axum::response::sse::Event;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::fmt;

/// Payload of the refresh message.
pub const REFRESH: &str = "refresh";

/// Text of the heartbeat comment.
pub const HEARTBEAT: &str = "heartbeat";

/// Bundler error text, base64-encoded so it fits on one `data:` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedError(String);

impl EncodedError {
    /// Encode raw error text.
    pub fn encode(text: &str) -> Self {
        Self(STANDARD.encode(text.as_bytes()))
    }

    /// Wrap an already encoded payload (e.g. one read back from the wire).
    pub fn from_encoded(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    /// Decode back to the original text.
    pub fn decode(&self) -> Result<String, DecodeError> {
        let bytes = STANDARD.decode(self.0.as_bytes()).map_err(DecodeError::Base64)?;
        String::from_utf8(bytes).map_err(DecodeError::Utf8)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure to decode an [`EncodedError`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[source] base64::DecodeError),
    #[error("decoded payload is not UTF-8: {0}")]
    Utf8(#[source] std::string::FromUtf8Error),
}

/// One message for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadMessage {
    /// The last build succeeded; reload the page
    Refresh,
    /// The last build failed with this output
    Error(EncodedError),
    /// Keep-alive comment
    Heartbeat,
}

impl ReloadMessage {
    /// Wire form of the message.
    pub fn frame(&self) -> String {
        match self {
            ReloadMessage::Refresh => format!("data: {}\n\n", REFRESH),
            ReloadMessage::Error(payload) => format!("data: {}\n\n", payload),
            ReloadMessage::Heartbeat => format!(": {}\n\n", HEARTBEAT),
        }
    }

    /// Same message as an axum SSE event.
    pub fn to_event(&self) -> Event {
        match self {
            ReloadMessage::Refresh => Event::default().data(REFRESH),
            ReloadMessage::Error(payload) => Event::default().data(payload.as_str()),
            ReloadMessage::Heartbeat => Event::default().comment(HEARTBEAT),
        }
    }

    pub fn is_heartbeat(&self) -> bool {
        matches!(self, ReloadMessage::Heartbeat)
    }
}
