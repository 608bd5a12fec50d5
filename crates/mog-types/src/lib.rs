//! Foundation types for the media object graph (MOG).
//!
//! This crate provides the identity, typing, and session types shared by
//! every other MOG crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Process-unique numeric identifier of a media object
//! - [`MediaObjectId`] — Identifier + session [`Token`] + [`ObjectKind`]
//! - [`ObjectKind`] — Closed sum type over every media object variant
//! - [`Token`] — Opaque session token shared by a pipeline and its children
//! - [`HandlerId`] / [`HandlerAddress`] — External event handler registration
//! - [`TransportState`] — Playback/recording state of a URI endpoint

pub mod error;
pub mod handler;
pub mod kind;
pub mod object;
pub mod state;
pub mod token;

pub use error::TypeError;
pub use handler::{HandlerAddress, HandlerId};
pub use kind::{
    Discriminant, EndPointType, FilterType, MediaObjectType, MixerType, ObjectKind,
    SdpEndPointType, UriEndPointType,
};
pub use object::{MediaObjectId, ObjectId};
pub use state::{TransportCommand, TransportState};
pub use token::Token;
