use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::ObjectKind;
use crate::token::Token;

/// Process-unique identifier of a media object.
///
/// Identifiers are allocated monotonically and never handed out twice, even
/// after the object they named has been released.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Full client-facing reference to a media object.
///
/// This is what every `create*` operation returns and what every other
/// operation takes as its target. Only `id` is used for lookup; `token` and
/// `kind` are informational copies of what the registry holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaObjectId {
    pub id: ObjectId,
    pub token: Token,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
}

impl MediaObjectId {
    pub fn new(id: ObjectId, token: Token, kind: ObjectKind) -> Self {
        Self { id, token, kind }
    }
}

impl fmt::Display for MediaObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}
