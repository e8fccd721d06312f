//! Line-framed TCP connection to the broker.
//!
//! A `Connection` owns exactly one `Framed` reader/writer for the lifetime
//! of the stream, so bytes buffered past one reply line are kept for the
//! next call instead of being thrown away. Opening a connection drives the
//! handshake:
//!
//! 1. dial `host:port`
//! 2. skip lines until the broker sends the `"ok"` readiness signal
//! 3. send the credential message
//! 4. expect `"ACCEPTED"` back
//!
//! Every read is bounded by the configured read timeout.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

use crate::transport::message::{AUTH_ACCEPTED, AuthMessage, READY_SIGNAL, decode_handshake, encode_auth};
use crate::utils::{BrokerError, Result};

/// Longest line accepted from the broker (1 MiB).
pub const MAX_LINE_LENGTH: usize = 1_048_576;

#[derive(Debug)]
pub struct Connection {
    framed: Framed<TcpStream, LinesCodec>,
    endpoint: String,
    read_timeout: Duration,
}

impl Connection {
    /// Dial `endpoint` and complete the readiness + credential handshake.
    pub async fn open(endpoint: &str, auth: &AuthMessage, read_timeout: Duration) -> Result<Self> {
        info!("Dialing broker at {endpoint}");

        let stream = timeout(read_timeout, TcpStream::connect(endpoint))
            .await
            .map_err(|_| BrokerError::Timeout(read_timeout))?
            .map_err(|e| BrokerError::connection(format!("failed to dial {endpoint}: {e}")))?;

        let mut conn = Self {
            framed: Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)),
            endpoint: endpoint.to_string(),
            read_timeout,
        };

        conn.await_ready().await?;
        conn.authenticate(auth).await?;

        info!("Connected to broker at {endpoint} as {}", auth.username);
        Ok(conn)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn await_ready(&mut self) -> Result<()> {
        loop {
            let line = self
                .recv()
                .await?
                .ok_or_else(|| BrokerError::connection("closed before ready signal"))?;

            match decode_handshake(&line) {
                Some(signal) if signal == READY_SIGNAL => return Ok(()),
                _ => debug!("Discarding line before ready signal: {line}"),
            }
        }
    }

    async fn authenticate(&mut self, auth: &AuthMessage) -> Result<()> {
        self.send(&encode_auth(auth)?).await?;

        let line = self
            .recv()
            .await?
            .ok_or_else(|| BrokerError::connection("closed before credential reply"))?;

        match decode_handshake(&line) {
            Some(reply) if reply == AUTH_ACCEPTED => Ok(()),
            _ => {
                warn!("Broker rejected credentials for {}: {line}", auth.username);
                Err(BrokerError::Authentication {
                    reason: "invalid credentials".to_string(),
                })
            }
        }
    }

    /// Write one line. The codec appends the newline.
    pub async fn send(&mut self, line: &str) -> Result<()> {
        debug!("-> {line}");
        self.framed.send(line).await.map_err(codec_error)
    }

    /// Read the next line, `None` once the broker has closed the stream.
    pub async fn recv(&mut self) -> Result<Option<String>> {
        match timeout(self.read_timeout, self.framed.next()).await {
            Err(_) => Err(BrokerError::Timeout(self.read_timeout)),
            Ok(None) => Ok(None),
            Ok(Some(Ok(line))) => {
                debug!("<- {line}");
                Ok(Some(line))
            }
            Ok(Some(Err(e))) => Err(codec_error(e)),
        }
    }

    /// One request/response round trip: write `line`, read exactly one reply.
    pub async fn exchange(&mut self, line: &str) -> Result<String> {
        self.send(line).await?;
        self.recv()
            .await?
            .ok_or_else(|| BrokerError::connection("closed before reply"))
    }
}

fn codec_error(err: LinesCodecError) -> BrokerError {
    match err {
        LinesCodecError::Io(e) => BrokerError::Io(e),
        LinesCodecError::MaxLineLengthExceeded => {
            BrokerError::connection(format!("line exceeds {MAX_LINE_LENGTH} bytes"))
        }
    }
}
