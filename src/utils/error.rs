//! Error types returned by the broker client.
//!
//! Every failure is handed back to the caller. The only outcome that is not
//! an error is the broker's "nothing to consume" sentinel, which the client
//! turns into an empty result.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrokerError>;

#[derive(Error, Debug)]
pub enum BrokerError {
    /// Dial failure, or the stream closed before an expected line arrived.
    #[error("connection error: {message}")]
    Connection { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No line arrived within the configured read timeout.
    #[error("timed out after {0:?} waiting for the broker")]
    Timeout(Duration),

    #[error("authentication error: {reason}")]
    Authentication { reason: String },

    /// A reply line that is not valid JSON or not the expected shape.
    #[error("failed to decode broker reply `{raw}`: {source}")]
    Decode {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    /// The reply decoded fine but makes no sense, e.g. status 7.
    #[error("protocol error: {message}")]
    Protocol { message: String },

    /// An operation was attempted before a successful connect.
    #[error("not connected: call connect before {operation}")]
    NotConnected { operation: &'static str },

    /// Publish acknowledged with status 0. Displays the broker's reason as is.
    #[error("{reason}")]
    Rejected { reason: String },

    #[error("failed to subscribe to topic {topic}: {reason}")]
    SubscribeRejected { topic: String, reason: String },
}

impl BrokerError {
    pub(crate) fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// True for failures of the stream itself. After one of these the
    /// connection can no longer be trusted to be in sync.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::Io(_) | Self::Timeout(_)
        )
    }
}
