//! # Brokerline
//!
//! `brokerline` is a small client for a publish/subscribe broker that speaks
//! newline-delimited JSON over TCP. A client connects, proves its
//! credentials, and then publishes to topics, subscribes to them and pulls
//! the next available message one request at a time.
//!
//! ## Core Modules
//!
//! - `client`: `BrokerClient`, the identity it connects as, and its subscriber tokens.
//! - `config`: Loads client settings from files and the environment.
//! - `transport`: Wire messages and the line-framed connection with its handshake.
//! - `utils`: Shared error type and logging setup.

pub mod client;
pub mod config;
pub mod transport;
pub mod utils;

pub use client::{BrokerClient, ClientIdentity};
pub use utils::{BrokerError, Result};

#[cfg(test)]
mod test_support;
