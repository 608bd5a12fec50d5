//! Object registry and lifecycle controller for the media object graph.
//!
//! The registry owns every live media object. Pipelines are roots; endpoints,
//! mixers and filters hang off a pipeline and inherit its session token.
//! Releasing an object releases its whole subtree in one atomic step, after
//! which none of the released identifiers resolve again.
//!
//! # Invariants
//!
//! - Every object has exactly one [`ObjectKind`](mog_types::ObjectKind).
//! - Every child's token equals its pipeline's token.
//! - Object identifiers and tokens are never reused.
//! - A rejected operation leaves the registry unchanged.

pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod record;
pub mod registry;
pub mod token;

pub use engine::{MediaEngine, NullEngine};
pub use error::{RegistryError, Result};
pub use lifecycle::{LifecycleController, DEFAULT_HTTP_BASE_URL};
pub use record::{Attributes, ChildSpec, ObjectRecord};
pub use registry::ObjectRegistry;
pub use token::TokenStore;
