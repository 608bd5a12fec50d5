//! RPC façade over the lifecycle controller.
//!
//! [`Dispatcher`] exposes one typed method per RPC verb and a
//! [`handle`](Dispatcher::handle) entry point that turns a decoded
//! [`Request`] into a [`Response`], mapping failures onto [`Fault`]s.

use std::sync::Arc;

use tracing::{debug, info, warn};

use mog_handlers::{EventRouter, HandlerDirectory, InMemoryHandlerDirectory};
use mog_protocol::{Fault, Request, Response, PROTOCOL_VERSION};
use mog_registry::{ChildSpec, LifecycleController};
use mog_types::{
    FilterType, HandlerAddress, HandlerId, MediaObjectId, MixerType, ObjectId, SdpEndPointType,
    UriEndPointType,
};

use crate::config::ServerConfig;
use crate::error::ServerResult;

pub struct Dispatcher {
    lifecycle: LifecycleController,
}

impl Dispatcher {
    pub fn new(lifecycle: LifecycleController) -> Self {
        Self { lifecycle }
    }

    /// Build a dispatcher with fresh in-memory state and the configured
    /// handler addresses pre-registered.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let directory = InMemoryHandlerDirectory::new();
        for seed in &config.handlers {
            let address: HandlerAddress = seed.address.parse()?;
            info!(handler = %seed.id, %address, "pre-registering handler address");
            directory.add_handler_address(seed.id, address)?;
        }
        let events = Arc::new(EventRouter::with_capacity(config.event_channel_capacity));
        let lifecycle = LifecycleController::new(Arc::new(directory), events)
            .with_http_base_url(config.http_base_url());
        Ok(Self::new(lifecycle))
    }

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    pub fn get_version(&self) -> i32 {
        PROTOCOL_VERSION
    }

    pub fn add_handler_address(&self, handler_id: HandlerId, host: &str, port: u16) -> ServerResult<()> {
        self.lifecycle
            .handlers()
            .add_handler_address(handler_id, HandlerAddress::new(host, port))?;
        Ok(())
    }

    pub fn create_media_pipeline(&self, handler_id: HandlerId) -> ServerResult<MediaObjectId> {
        Ok(self.lifecycle.create_media_pipeline(handler_id)?)
    }

    pub fn create_sdp_end_point(&self, parent: ObjectId, kind: SdpEndPointType) -> ServerResult<MediaObjectId> {
        self.create_child(parent, ChildSpec::SdpEndPoint(kind))
    }

    pub fn create_uri_end_point(
        &self,
        parent: ObjectId,
        kind: UriEndPointType,
        uri: impl Into<String>,
    ) -> ServerResult<MediaObjectId> {
        self.create_child(parent, ChildSpec::UriEndPoint { kind, uri: uri.into() })
    }

    pub fn create_http_end_point(&self, parent: ObjectId) -> ServerResult<MediaObjectId> {
        self.create_child(parent, ChildSpec::HttpEndPoint)
    }

    pub fn create_mixer(&self, parent: ObjectId, kind: MixerType) -> ServerResult<MediaObjectId> {
        self.create_child(parent, ChildSpec::Mixer(kind))
    }

    pub fn create_filter(&self, parent: ObjectId, kind: FilterType) -> ServerResult<MediaObjectId> {
        self.create_child(parent, ChildSpec::Filter(kind))
    }

    fn create_child(&self, parent: ObjectId, spec: ChildSpec) -> ServerResult<MediaObjectId> {
        Ok(self.lifecycle.create_child(parent, spec)?)
    }

    pub fn get_parent(&self, id: ObjectId) -> ServerResult<MediaObjectId> {
        Ok(self.lifecycle.registry().get_parent(id)?)
    }

    pub fn get_media_pipeline(&self, id: ObjectId) -> ServerResult<MediaObjectId> {
        Ok(self.lifecycle.registry().get_media_pipeline(id)?)
    }

    pub fn get_uri(&self, id: ObjectId) -> ServerResult<String> {
        Ok(self.lifecycle.registry().uri_of(id)?)
    }

    pub fn get_url(&self, id: ObjectId) -> ServerResult<String> {
        Ok(self.lifecycle.registry().url_of(id)?)
    }

    pub fn start(&self, id: ObjectId) -> ServerResult<()> {
        self.lifecycle.start(id)?;
        Ok(())
    }

    pub fn pause(&self, id: ObjectId) -> ServerResult<()> {
        self.lifecycle.pause(id)?;
        Ok(())
    }

    pub fn stop(&self, id: ObjectId) -> ServerResult<()> {
        self.lifecycle.stop(id)?;
        Ok(())
    }

    pub fn release(&self, id: ObjectId) -> ServerResult<()> {
        self.lifecycle.release(id)?;
        Ok(())
    }

    /// Execute one decoded request.
    pub fn handle(&self, request: Request) -> Response {
        let name = request.name();
        debug!(request = name, "dispatching");
        match self.execute(request) {
            Ok(response) => response,
            Err(e) => {
                let fault = e.to_fault();
                warn!(request = name, fault = %fault, "request failed");
                Response::Fault(fault)
            }
        }
    }

    fn execute(&self, request: Request) -> ServerResult<Response> {
        Ok(match request {
            Request::GetVersion => Response::Version(self.get_version()),
            Request::CreateMediaPipeline { handler_id } => Response::Object(self.create_media_pipeline(handler_id)?),
            Request::AddHandlerAddress { handler_id, host, port } => {
                self.add_handler_address(handler_id, &host, port)?;
                Response::Done
            }
            Request::CreateSdpEndPoint { parent, kind } => Response::Object(self.create_sdp_end_point(parent, kind)?),
            Request::CreateUriEndPoint { parent, kind, uri } => {
                Response::Object(self.create_uri_end_point(parent, kind, uri)?)
            }
            Request::CreateHttpEndPoint { parent } => Response::Object(self.create_http_end_point(parent)?),
            Request::CreateMixer { parent, kind } => Response::Object(self.create_mixer(parent, kind)?),
            Request::CreateFilter { parent, kind } => Response::Object(self.create_filter(parent, kind)?),
            Request::GetParent { id } => Response::Object(self.get_parent(id)?),
            Request::GetMediaPipeline { id } => Response::Object(self.get_media_pipeline(id)?),
            Request::GetUri { id } => Response::Text(self.get_uri(id)?),
            Request::GetUrl { id } => Response::Text(self.get_url(id)?),
            Request::Start { id } => {
                self.start(id)?;
                Response::Done
            }
            Request::Pause { id } => {
                self.pause(id)?;
                Response::Done
            }
            Request::Stop { id } => {
                self.stop(id)?;
                Response::Done
            }
            Request::Release { id } => {
                self.release(id)?;
                Response::Done
            }
        })
    }
}
