//! Handler directory for the media object graph.
//!
//! External handlers register one or more network addresses under a small
//! integer [`HandlerId`](mog_types::HandlerId). A handler id with at least
//! one address may govern media pipelines; lifecycle events for objects in
//! those pipelines are routed to the handler's subscribers.
//!
//! # Modules
//!
//! - [`error`] — Error types for directory operations
//! - [`directory`] — The [`HandlerDirectory`] trait
//! - [`memory`] — In-memory [`InMemoryHandlerDirectory`]
//! - [`event`] — [`MediaEvent`] and its kinds
//! - [`router`] — [`EventRouter`] fan-out to per-handler subscribers

pub mod directory;
pub mod error;
pub mod event;
pub mod memory;
pub mod router;

pub use directory::HandlerDirectory;
pub use error::{HandlerError, Result};
pub use event::{MediaEvent, MediaEventKind};
pub use memory::InMemoryHandlerDirectory;
pub use router::{EventRouter, EventStream, DEFAULT_CHANNEL_CAPACITY};
