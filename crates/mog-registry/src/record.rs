use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mog_types::{
    EndPointType, FilterType, HandlerId, MediaObjectId, MixerType, ObjectId, ObjectKind,
    SdpEndPointType, TransportState, UriEndPointType,
};

/// Variant-specific state kept alongside a media object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attributes {
    None,
    /// URI endpoints echo the URI they were created with.
    Uri { uri: String, state: TransportState },
    /// HTTP endpoints expose a server-generated URL.
    Http { url: String },
}

/// A live object as stored in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub object: MediaObjectId,
    /// `None` only for pipelines.
    pub parent: Option<ObjectId>,
    /// Root pipeline; equals `object.id` for pipelines.
    pub pipeline: ObjectId,
    /// Handler governing the root pipeline, copied at creation.
    pub handler: HandlerId,
    pub created_at: DateTime<Utc>,
    pub attributes: Attributes,
}

impl ObjectRecord {
    pub fn id(&self) -> ObjectId {
        self.object.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.object.kind
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Parameters for creating a child of a pipeline.
///
/// Pipelines are deliberately absent: they are only created as roots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildSpec {
    SdpEndPoint(SdpEndPointType),
    UriEndPoint { kind: UriEndPointType, uri: String },
    HttpEndPoint,
    Mixer(MixerType),
    Filter(FilterType),
}

impl ChildSpec {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::SdpEndPoint(t) => ObjectKind::SdpEndPoint(*t),
            Self::UriEndPoint { kind, .. } => ObjectKind::UriEndPoint(*kind),
            Self::HttpEndPoint => ObjectKind::EndPoint(EndPointType::HttpEndPoint),
            Self::Mixer(t) => ObjectKind::Mixer(*t),
            Self::Filter(t) => ObjectKind::Filter(*t),
        }
    }
}
