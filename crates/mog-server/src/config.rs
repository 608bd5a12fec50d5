use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use mog_types::HandlerId;

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Host advertised in HTTP endpoint URLs.
    pub public_host: String,
    /// Port advertised in HTTP endpoint URLs.
    pub public_port: u16,
    pub http_path_prefix: String,
    /// Per-subscriber buffer of the handler event router.
    pub event_channel_capacity: usize,
    /// Handler addresses registered at startup.
    pub handlers: Vec<HandlerSeed>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 9090)),
            public_host: "localhost".into(),
            public_port: 9091,
            http_path_prefix: "/media".into(),
            event_channel_capacity: mog_handlers::DEFAULT_CHANNEL_CAPACITY,
            handlers: Vec::new(),
        }
    }
}

/// A handler address to register before serving, e.g.
/// `{ id = 0, address = "localhost:2323" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSeed {
    pub id: HandlerId,
    pub address: String,
}

impl ServerConfig {
    /// Base URL of HTTP endpoints; the object id is appended to it.
    pub fn http_base_url(&self) -> String {
        let prefix = self.http_path_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("http://{}:{}", self.public_host, self.public_port)
        } else {
            format!("http://{}:{}/{}", self.public_host, self.public_port, prefix)
        }
    }

    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.public_host.trim().is_empty() {
            return Err(ServerError::Config("public_host must not be empty".into()));
        }
        if self.event_channel_capacity == 0 {
            return Err(ServerError::Config("event_channel_capacity must be positive".into()));
        }
        for seed in &self.handlers {
            seed.address.parse::<mog_types::HandlerAddress>()?;
        }
        Ok(())
    }
}
