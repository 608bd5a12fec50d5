//! Media object graph server.
//!
//! Hosts the RPC dispatcher over HTTP: JSON requests on `/v1/rpc`, framed
//! binary requests on `/v1/rpc/bin`, plus health and info endpoints.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{HandlerSeed, ServerConfig};
pub use dispatcher::Dispatcher;
pub use error::{ServerError, ServerResult};
pub use server::MogServer;
