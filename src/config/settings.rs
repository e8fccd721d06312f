use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;

use crate::client::ClientIdentity;
use crate::client::identity::{DEFAULT_HOST, DEFAULT_PORT};

/// Top-level configuration settings for the client.
///
/// Includes where and how to reach the broker, and how much to log.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub logging: LoggingSettings,
}

/// Connection settings for the broker.
///
/// An empty `client_id` is replaced with a time-based id when the identity is built.
#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub enable_storage: bool,
    pub read_timeout_ms: u64,
}

impl BrokerSettings {
    pub fn identity(&self) -> ClientIdentity {
        ClientIdentity::new(
            &self.host,
            self.port,
            &self.client_id,
            &self.username,
            &self.password,
            self.enable_storage,
        )
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub broker: Option<PartialBrokerSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub client_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub enable_storage: Option<bool>,
    pub read_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Settings {
    /// Reject values the client cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.read_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "broker.read_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Fill every field missing from `partial` with the default.
    pub fn merge(partial: PartialSettings) -> Self {
        let default = Settings::default();
        let broker = partial.broker;
        let logging = partial.logging;

        Settings {
            broker: BrokerSettings {
                host: broker
                    .as_ref()
                    .and_then(|b| b.host.clone())
                    .unwrap_or(default.broker.host),
                port: broker
                    .as_ref()
                    .and_then(|b| b.port)
                    .unwrap_or(default.broker.port),
                client_id: broker
                    .as_ref()
                    .and_then(|b| b.client_id.clone())
                    .unwrap_or(default.broker.client_id),
                username: broker
                    .as_ref()
                    .and_then(|b| b.username.clone())
                    .unwrap_or(default.broker.username),
                password: broker
                    .as_ref()
                    .and_then(|b| b.password.clone())
                    .unwrap_or(default.broker.password),
                enable_storage: broker
                    .as_ref()
                    .and_then(|b| b.enable_storage)
                    .unwrap_or(default.broker.enable_storage),
                read_timeout_ms: broker
                    .as_ref()
                    .and_then(|b| b.read_timeout_ms)
                    .unwrap_or(default.broker.read_timeout_ms),
            },
            logging: LoggingSettings {
                level: logging
                    .as_ref()
                    .and_then(|l| l.level.clone())
                    .unwrap_or(default.logging.level),
            },
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            broker: BrokerSettings {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                client_id: String::new(),
                username: String::new(),
                password: String::new(),
                enable_storage: false,
                read_timeout_ms: 30_000,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
