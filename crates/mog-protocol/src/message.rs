use std::fmt;

use serde::{Deserialize, Serialize};

use mog_types::{
    FilterType, HandlerId, MediaObjectId, MixerType, ObjectId, SdpEndPointType, UriEndPointType,
};

/// Version reported by `getVersion`.
pub const PROTOCOL_VERSION: i32 = 1;
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// Every operation a client can invoke.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    GetVersion,
    CreateMediaPipeline { handler_id: HandlerId },
    AddHandlerAddress { handler_id: HandlerId, host: String, port: u16 },
    CreateSdpEndPoint { parent: ObjectId, kind: SdpEndPointType },
    CreateUriEndPoint { parent: ObjectId, kind: UriEndPointType, uri: String },
    CreateHttpEndPoint { parent: ObjectId },
    CreateMixer { parent: ObjectId, kind: MixerType },
    CreateFilter { parent: ObjectId, kind: FilterType },
    GetParent { id: ObjectId },
    GetMediaPipeline { id: ObjectId },
    GetUri { id: ObjectId },
    GetUrl { id: ObjectId },
    Start { id: ObjectId },
    Pause { id: ObjectId },
    Stop { id: ObjectId },
    Release { id: ObjectId },
}

/// Successful results and faults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Response {
    Version(i32),
    Object(MediaObjectId),
    Text(String),
    Done,
    Fault(Fault),
}

/// Typed failures surfaced to clients. Names follow the exceptions of the
/// media server interface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Fault {
    HandlerNotFound { handler_id: HandlerId },
    MediaObjectNotFound { id: ObjectId },
    NoParent { id: ObjectId },
    /// Anything outside the three interface exceptions: type mismatch,
    /// invalid parent, engine refusal, internal faults.
    MediaServer { message: String },
}

impl Request {
    pub fn type_tag(&self) -> u8 {
        match self {
            Self::GetVersion => 1,
            Self::CreateMediaPipeline { .. } => 2,
            Self::AddHandlerAddress { .. } => 3,
            Self::CreateSdpEndPoint { .. } => 4,
            Self::CreateUriEndPoint { .. } => 5,
            Self::CreateHttpEndPoint { .. } => 6,
            Self::CreateMixer { .. } => 7,
            Self::CreateFilter { .. } => 8,
            Self::GetParent { .. } => 9,
            Self::GetMediaPipeline { .. } => 10,
            Self::GetUri { .. } => 11,
            Self::GetUrl { .. } => 12,
            Self::Start { .. } => 13,
            Self::Pause { .. } => 14,
            Self::Stop { .. } => 15,
            Self::Release { .. } => 16,
        }
    }

    /// RPC verb name as seen by clients.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetVersion => "getVersion",
            Self::CreateMediaPipeline { .. } => "createMediaPipeline",
            Self::AddHandlerAddress { .. } => "addHandlerAddress",
            Self::CreateSdpEndPoint { .. } => "createSdpEndPoint",
            Self::CreateUriEndPoint { .. } => "createUriEndPoint",
            Self::CreateHttpEndPoint { .. } => "createHttpEndPoint",
            Self::CreateMixer { .. } => "createMixer",
            Self::CreateFilter { .. } => "createFilter",
            Self::GetParent { .. } => "getParent",
            Self::GetMediaPipeline { .. } => "getMediaPipeline",
            Self::GetUri { .. } => "getUri",
            Self::GetUrl { .. } => "getUrl",
            Self::Start { .. } => "start",
            Self::Pause { .. } => "pause",
            Self::Stop { .. } => "stop",
            Self::Release { .. } => "release",
        }
    }
}

impl Response {
    pub fn type_tag(&self) -> u8 {
        match self {
            Self::Version(_) => 128,
            Self::Object(_) => 129,
            Self::Text(_) => 130,
            Self::Done => 131,
            Self::Fault(_) => 255,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }
}

impl Fault {
    /// Exception name of this fault in the media server interface.
    pub fn exception_name(&self) -> &'static str {
        match self {
            Self::HandlerNotFound { .. } => "HandlerNotFoundException",
            Self::MediaObjectNotFound { .. } => "MediaObjectNotFoundException",
            Self::NoParent { .. } => "NoParentException",
            Self::MediaServer { .. } => "MediaServerException",
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HandlerNotFound { handler_id } => {
                write!(f, "{}: {handler_id}", self.exception_name())
            }
            Self::MediaObjectNotFound { id } | Self::NoParent { id } => {
                write!(f, "{}: object {id}", self.exception_name())
            }
            Self::MediaServer { message } => write!(f, "{}: {message}", self.exception_name()),
        }
    }
}
