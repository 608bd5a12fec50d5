use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Small integer naming an external event handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerId(i32);

impl HandlerId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

impl From<i32> for HandlerId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler:{}", self.0)
    }
}

impl FromStr for HandlerId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| TypeError::InvalidHandlerId(s.to_string()))
    }
}

/// Network address at which a handler receives events.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerAddress {
    pub host: String,
    pub port: u16,
}

impl HandlerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for HandlerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parses `host:port`. The split is on the last colon so bracketed IPv6
/// hosts (`[::1]:2323`) keep their inner colons.
impl FromStr for HandlerAddress {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| TypeError::InvalidAddress(s.to_string()))?;
        if host.is_empty() {
            return Err(TypeError::InvalidAddress(s.to_string()));
        }
        let port = port.parse::<u16>().map_err(|e| TypeError::InvalidPort {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(host, port))
    }
}
