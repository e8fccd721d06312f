//! Broker client
//!
//! `BrokerClient` composes the wire codec, the line-framed connection and the
//! subscription registry into the four calls applications use:
//! `connect`, `publish`, `subscribe` and `consume`.
//!
//! Concurrency and usage notes:
//! - Each call performs one write-then-read-one-line round trip. The
//!   connection sits behind an async mutex held for the whole round trip, so
//!   at most one request is in flight and replies cannot interleave.
//! - Calls made before `connect` succeeds fail with `NotConnected` without
//!   touching the network.
//! - A transport failure (closed stream, I/O error, timeout) drops the
//!   connection, and so does cancelling a call before its reply arrives;
//!   a fresh `connect` is required afterwards. Decode and protocol errors
//!   leave it in place since the reply line was consumed.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::identity::ClientIdentity;
use crate::client::registry::{SubscriberId, SubscriptionRegistry};
use crate::config::BrokerSettings;
use crate::transport::Connection;
use crate::transport::message::{
    AuthMessage, Command, decode_ack, decode_value, encode_command, into_consume_result,
};
use crate::utils::{BrokerError, Result};

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct BrokerClient {
    identity: ClientIdentity,
    read_timeout: Duration,
    connection: Mutex<Option<Connection>>,
    subscriptions: SubscriptionRegistry,
}

impl BrokerClient {
    pub fn new(identity: ClientIdentity) -> Self {
        Self {
            identity,
            read_timeout: DEFAULT_READ_TIMEOUT,
            connection: Mutex::new(None),
            subscriptions: SubscriptionRegistry::new(),
        }
    }

    pub fn from_settings(settings: &BrokerSettings) -> Self {
        Self::new(settings.identity()).with_read_timeout(settings.read_timeout())
    }

    /// Bound on every read from the broker, and on the initial dial.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn client_id(&self) -> &str {
        self.identity.client_id()
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Token from the most recent subscribe to `topic`, if any.
    pub fn subscription(&self, topic: &str) -> Option<SubscriberId> {
        Some(self.subscriptions.get(topic)).filter(|id| !id.is_empty())
    }

    /// Dial the broker and run the handshake. Replaces any existing connection.
    pub async fn connect(&self) -> Result<()> {
        let mut slot = self.connection.lock().await;

        let auth = AuthMessage::new(
            self.identity.username(),
            self.identity.password(),
            self.identity.enable_storage(),
        );
        let conn = Connection::open(&self.identity.endpoint(), &auth, self.read_timeout).await?;

        if slot.replace(conn).is_some() {
            info!("Client {} replaced its broker connection", self.client_id());
        }
        Ok(())
    }

    /// Drop the connection. Subscriptions recorded so far are kept.
    pub async fn disconnect(&self) {
        if self.connection.lock().await.take().is_some() {
            info!("Client {} disconnected", self.client_id());
        }
    }

    /// Publish `payload` to `topic`. Fails with the broker's reason verbatim
    /// when the acknowledgment status is 0.
    pub async fn publish<P: Serialize>(&self, topic: &str, payload: P) -> Result<()> {
        let mut slot = self.ready("publish").await?;

        let payload = serde_json::to_value(payload).map_err(BrokerError::Encode)?;
        let command = Command::Publish {
            topic: topic.to_string(),
            payload,
        };

        let reply = self.exchange(&mut slot, &command).await?;
        let ack = decode_ack(&reply)?;

        if ack.is_success()? {
            debug!("Published to {topic}");
            Ok(())
        } else {
            Err(BrokerError::Rejected { reason: ack.reason })
        }
    }

    /// Subscribe to `topic` under a fresh token. The token is recorded before
    /// the request is sent, replacing any earlier token for the topic.
    pub async fn subscribe(&self, topic: &str) -> Result<()> {
        let mut slot = self.ready("subscribe").await?;

        let sub_id = Uuid::new_v4().to_string();
        self.subscriptions.put(topic, sub_id.clone());

        let command = Command::Subscribe {
            topic: topic.to_string(),
            sub_id,
        };

        let reply = self.exchange(&mut slot, &command).await?;
        let ack = decode_ack(&reply)?;

        if ack.is_success()? {
            debug!("Subscribed to {topic}");
            Ok(())
        } else {
            Err(BrokerError::SubscribeRejected {
                topic: topic.to_string(),
                reason: ack.reason,
            })
        }
    }

    /// Fetch the next message for `topic`. `Ok(None)` means the broker had
    /// nothing available; any other reply value is returned unchanged.
    pub async fn consume(&self, topic: &str) -> Result<Option<Value>> {
        let mut slot = self.ready("consume").await?;

        let sub_id = self.subscriptions.get(topic);
        if sub_id.is_empty() {
            warn!("Consuming from {topic} without a subscription; sending an empty subscriber id");
        }

        let command = Command::Consume {
            topic: topic.to_string(),
            sub_id,
        };

        let reply = self.exchange(&mut slot, &command).await?;
        Ok(into_consume_result(decode_value(&reply)?))
    }

    /// Lock the connection slot, failing if there is no connection.
    async fn ready(&self, operation: &'static str) -> Result<MutexGuard<'_, Option<Connection>>> {
        let slot = self.connection.lock().await;
        if slot.is_none() {
            return Err(BrokerError::NotConnected { operation });
        }
        Ok(slot)
    }

    /// The connection is out of `slot` while the round trip runs, so a call
    /// dropped mid-exchange leaves the client Disconnected instead of with an
    /// unread reply queued on the stream.
    async fn exchange(&self, slot: &mut Option<Connection>, command: &Command) -> Result<String> {
        let line = encode_command(command)?;
        let mut conn = slot.take().ok_or(BrokerError::NotConnected {
            operation: command.kind(),
        })?;

        match conn.exchange(&line).await {
            Ok(reply) => {
                *slot = Some(conn);
                Ok(reply)
            }
            Err(e) if e.is_transport() => {
                warn!(
                    "Dropping connection for client {} after failed {}: {e}",
                    self.client_id(),
                    command.kind()
                );
                Err(e)
            }
            Err(e) => {
                *slot = Some(conn);
                Err(e)
            }
        }
    }
}
