use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mog_types::{HandlerId, MediaObjectId, ObjectId, TransportState};

/// What happened to a media object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "state")]
pub enum MediaEventKind {
    ObjectCreated,
    ObjectReleased,
    TransportChanged(TransportState),
}

impl fmt::Display for MediaEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectCreated => write!(f, "ObjectCreated"),
            Self::ObjectReleased => write!(f, "ObjectReleased"),
            Self::TransportChanged(state) => write!(f, "TransportChanged({state})"),
        }
    }
}

/// A lifecycle event addressed to the handler governing a pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEvent {
    pub kind: MediaEventKind,
    pub object: MediaObjectId,
    /// Root pipeline of `object` (equal to `object.id` for pipelines).
    pub pipeline: ObjectId,
    pub handler: HandlerId,
    pub timestamp: DateTime<Utc>,
}

impl MediaEvent {
    pub fn new(
        kind: MediaEventKind,
        object: MediaObjectId,
        pipeline: ObjectId,
        handler: HandlerId,
    ) -> Self {
        Self {
            kind,
            object,
            pipeline,
            handler,
            timestamp: Utc::now(),
        }
    }
}
