//! Who the client is and where it connects to.

use chrono::Utc;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

/// Connection identity. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    client_id: String,
    host: String,
    port: u16,
    username: String,
    password: String,
    enable_storage: bool,
}

impl ClientIdentity {
    /// Empty `host` becomes `localhost`, port `0` becomes `8080` and an empty
    /// `client_id` becomes `broker_<unix seconds>`.
    pub fn new(
        host: &str,
        port: u16,
        client_id: &str,
        username: &str,
        password: &str,
        enable_storage: bool,
    ) -> Self {
        let client_id = if client_id.is_empty() {
            format!("broker_{}", Utc::now().timestamp())
        } else {
            client_id.to_string()
        };

        Self {
            client_id,
            host: if host.is_empty() { DEFAULT_HOST } else { host }.to_string(),
            port: if port == 0 { DEFAULT_PORT } else { port },
            username: username.to_string(),
            password: password.to_string(),
            enable_storage,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn enable_storage(&self) -> bool {
        self.enable_storage
    }

    /// `host:port` dial target.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
