//! Wire messages exchanged with the broker.
//!
//! Every message is a single JSON value on its own line. Outbound we send
//! either the credential message (once, during the handshake) or a
//! `Command`; inbound we get bare JSON strings during the handshake,
//! `Acknowledgment` objects for publish/subscribe, and arbitrary values for
//! consume.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::{BrokerError, Result};

/// Readiness signal the broker sends right after accepting the stream.
pub const READY_SIGNAL: &str = "ok";

/// Credential reply meaning the handshake succeeded.
pub const AUTH_ACCEPTED: &str = "ACCEPTED";

/// Consume reply meaning no message is currently available.
pub const EMPTY_SENTINEL: &str = "EMPTY_BROKER_ERROR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Command {
    Publish {
        topic: String,
        payload: Value,
    },
    Subscribe {
        topic: String,
        #[serde(rename = "subId")]
        sub_id: String,
    },
    Consume {
        topic: String,
        #[serde(rename = "subId")]
        sub_id: String,
    },
}

impl Command {
    pub fn topic(&self) -> &str {
        match self {
            Command::Publish { topic, .. }
            | Command::Subscribe { topic, .. }
            | Command::Consume { topic, .. } => topic,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Command::Publish { .. } => "publish",
            Command::Subscribe { .. } => "subscribe",
            Command::Consume { .. } => "consume",
        }
    }
}

/// Credentials sent once per connection, right after the readiness signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthMessage {
    pub username: String,
    pub password: String,
    #[serde(rename = "IsAuth")]
    pub is_auth: bool,
    #[serde(rename = "EnableStorage")]
    pub enable_storage: bool,
}

impl AuthMessage {
    pub fn new(username: &str, password: &str, enable_storage: bool) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            is_auth: true,
            enable_storage,
        }
    }
}

/// Reply to publish and subscribe. `status` is 1 on success, 0 on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub status: i64,
    #[serde(default)]
    pub reason: String,
}

impl Acknowledgment {
    /// `Ok(true)` for status 1, `Ok(false)` for status 0, protocol error otherwise.
    pub fn is_success(&self) -> Result<bool> {
        match self.status {
            1 => Ok(true),
            0 => Ok(false),
            other => Err(BrokerError::Protocol {
                message: format!("acknowledgment status {other} is neither 0 nor 1"),
            }),
        }
    }
}

pub fn encode_command(command: &Command) -> Result<String> {
    serde_json::to_string(command).map_err(BrokerError::Encode)
}

pub fn encode_auth(auth: &AuthMessage) -> Result<String> {
    serde_json::to_string(auth).map_err(BrokerError::Encode)
}

pub fn decode_value(line: &str) -> Result<Value> {
    serde_json::from_str(line).map_err(|source| BrokerError::Decode {
        raw: line.to_string(),
        source,
    })
}

pub fn decode_ack(line: &str) -> Result<Acknowledgment> {
    serde_json::from_str(line).map_err(|source| BrokerError::Decode {
        raw: line.to_string(),
        source,
    })
}

/// Handshake lines are bare JSON strings. Anything else yields `None`.
pub fn decode_handshake(line: &str) -> Option<String> {
    serde_json::from_str::<String>(line).ok()
}

/// Maps the consume sentinel to `None` and passes every other value through.
pub fn into_consume_result(value: Value) -> Option<Value> {
    match value {
        Value::String(ref s) if s == EMPTY_SENTINEL => None,
        other => Some(other),
    }
}
