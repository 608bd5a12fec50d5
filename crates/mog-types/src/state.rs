use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport state of a URI endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// A transport control request against a URI endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportCommand {
    Start,
    Pause,
    Stop,
}

impl TransportCommand {
    /// The state an endpoint is in after this command succeeds.
    pub fn target_state(&self) -> TransportState {
        match self {
            Self::Start => TransportState::Playing,
            Self::Pause => TransportState::Paused,
            Self::Stop => TransportState::Stopped,
        }
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for TransportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Stop => "stop",
        };
        write!(f, "{s}")
    }
}
