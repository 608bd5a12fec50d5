//! RPC protocol for the media object graph.
//!
//! Defines the request, response and fault messages exchanged with the
//! media server, plus a length-prefixed binary framing for them.

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod message;

pub use codec::{RpcCodec, RpcMessage};
pub use endpoint::{endpoints, HealthResponse};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{Fault, Request, Response, MAX_MESSAGE_SIZE, PROTOCOL_VERSION};
