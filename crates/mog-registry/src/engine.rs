//! Boundary to the media engine that does the actual audio/video work.
//!
//! The graph manager never touches media itself. It tells the engine when
//! objects appear and disappear and forwards transport commands for URI
//! endpoints. [`NullEngine`] accepts everything and is what the server uses
//! when no engine is attached.

use tracing::trace;

use mog_types::{MediaObjectId, TransportCommand};

use crate::error::Result;
use crate::record::ObjectRecord;

pub trait MediaEngine: Send + Sync {
    /// Called before an object is registered. An error aborts the creation.
    fn on_created(&self, record: &ObjectRecord) -> Result<()>;

    /// Called after an object has been removed from the registry.
    fn on_released(&self, object: &MediaObjectId);

    /// Apply a transport command to a URI endpoint.
    fn transport(&self, object: &MediaObjectId, command: TransportCommand) -> Result<()>;
}

/// Engine that accepts every request and does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEngine;

impl MediaEngine for NullEngine {
    fn on_created(&self, record: &ObjectRecord) -> Result<()> {
        trace!(object = %record.object, "null engine: created");
        Ok(())
    }

    fn on_released(&self, object: &MediaObjectId) {
        trace!(%object, "null engine: released");
    }

    fn transport(&self, object: &MediaObjectId, command: TransportCommand) -> Result<()> {
        trace!(%object, %command, "null engine: transport");
        Ok(())
    }
}
