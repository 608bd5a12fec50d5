//! Error types for registry and lifecycle operations.

use mog_handlers::HandlerError;
use mog_types::{Discriminant, HandlerId, ObjectId, ObjectKind};

/// Errors that can occur while creating, querying or releasing objects.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No address is registered for the handler a pipeline asked for.
    #[error("handler not found: {0}")]
    HandlerNotFound(HandlerId),

    /// The object is unknown or has been released.
    #[error("media object not found: {0}")]
    MediaObjectNotFound(ObjectId),

    /// The object is a root pipeline.
    #[error("media object {0} has no parent")]
    NoParent(ObjectId),

    /// The operation does not apply to this kind of object.
    #[error("type mismatch on object {id}: expected {expected}, found {actual}")]
    TypeMismatch {
        id: ObjectId,
        expected: Discriminant,
        actual: ObjectKind,
    },

    /// The parent exists but cannot hold children of any kind.
    #[error("object {parent} of type {kind} cannot have children")]
    InvalidParent { parent: ObjectId, kind: ObjectKind },

    /// The media engine refused the operation.
    #[error("media engine error: {0}")]
    Engine(String),

    #[error("handler directory error: {0}")]
    Handler(#[from] HandlerError),

    /// Broken internal invariant (duplicate id, token collision, poisoned lock).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias for registry results.
pub type Result<T> = std::result::Result<T, RegistryError>;
