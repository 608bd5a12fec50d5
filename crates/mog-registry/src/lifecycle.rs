//! Create/release semantics on top of the [`ObjectRegistry`].
//!
//! [`LifecycleController`] is the only writer of the registry. It checks the
//! handler precondition for pipelines, mints and copies session tokens,
//! consults the [`MediaEngine`], and publishes [`MediaEvent`]s.
//!
//! Events are routed from the registry's commit hooks, while the write lock
//! is still held, so every subscriber sees them in commit order. Engine
//! calls never run under the registry lock.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use mog_handlers::{EventRouter, HandlerDirectory, MediaEvent, MediaEventKind};
use mog_types::{
    Discriminant, HandlerId, MediaObjectId, ObjectId, ObjectKind, TransportCommand, TransportState,
};

use crate::engine::{MediaEngine, NullEngine};
use crate::error::{RegistryError, Result};
use crate::record::{Attributes, ChildSpec, ObjectRecord};
use crate::registry::ObjectRegistry;
use crate::token::TokenStore;

/// Base URL used for HTTP endpoints when none is configured.
pub const DEFAULT_HTTP_BASE_URL: &str = "http://localhost:9091/media";

pub struct LifecycleController {
    registry: ObjectRegistry,
    tokens: TokenStore,
    handlers: Arc<dyn HandlerDirectory>,
    events: Arc<EventRouter>,
    engine: Arc<dyn MediaEngine>,
    http_base_url: String,
}

impl LifecycleController {
    pub fn new(handlers: Arc<dyn HandlerDirectory>, events: Arc<EventRouter>) -> Self {
        Self {
            registry: ObjectRegistry::new(),
            tokens: TokenStore::new(),
            handlers,
            events,
            engine: Arc::new(NullEngine),
            http_base_url: DEFAULT_HTTP_BASE_URL.to_string(),
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn MediaEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Prefix for the URLs handed out by HTTP endpoints.
    pub fn with_http_base_url(mut self, url: impl Into<String>) -> Self {
        self.http_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn handlers(&self) -> &Arc<dyn HandlerDirectory> {
        &self.handlers
    }

    pub fn events(&self) -> &Arc<EventRouter> {
        &self.events
    }

    // ---------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------

    /// Create a root pipeline governed by `handler`.
    ///
    /// Fails with [`RegistryError::HandlerNotFound`] before anything is
    /// allocated if the handler has no registered address.
    pub fn create_media_pipeline(&self, handler: HandlerId) -> Result<MediaObjectId> {
        if !self.handlers.has_handler(handler)? {
            warn!(%handler, "pipeline requested for unregistered handler");
            return Err(RegistryError::HandlerNotFound(handler));
        }

        let id = self.registry.allocate_id();
        let token = self.tokens.issue_token()?;
        let record = ObjectRecord {
            object: MediaObjectId::new(id, token.clone(), ObjectKind::media_pipeline()),
            parent: None,
            pipeline: id,
            handler,
            created_at: Utc::now(),
            attributes: Attributes::None,
        };

        let object = match self.commit_new(record) {
            Ok(object) => object,
            Err(e) => {
                self.tokens.withdraw(&token);
                return Err(e);
            }
        };
        info!(pipeline = %id, token = object.token.short(), %handler, "created media pipeline");
        Ok(object)
    }

    /// Create a child of the pipeline `parent`.
    ///
    /// The child inherits the pipeline's token and governing handler. The
    /// handler precondition is not re-checked here.
    pub fn create_child(&self, parent: ObjectId, spec: ChildSpec) -> Result<MediaObjectId> {
        let parent_record = self.registry.get(parent)?;
        if !parent_record.kind().can_parent() {
            return Err(RegistryError::InvalidParent {
                parent,
                kind: parent_record.kind(),
            });
        }

        let id = self.registry.allocate_id();
        let kind = spec.kind();
        let attributes = match spec {
            ChildSpec::UriEndPoint { uri, .. } => Attributes::Uri {
                uri,
                state: TransportState::Stopped,
            },
            ChildSpec::HttpEndPoint => Attributes::Http {
                url: format!("{}/{}", self.http_base_url, id),
            },
            ChildSpec::SdpEndPoint(_) | ChildSpec::Mixer(_) | ChildSpec::Filter(_) => Attributes::None,
        };
        let record = ObjectRecord {
            object: MediaObjectId::new(id, parent_record.object.token.clone(), kind),
            parent: Some(parent),
            pipeline: parent_record.pipeline,
            handler: parent_record.handler,
            created_at: Utc::now(),
            attributes,
        };

        let object = self.commit_new(record)?;
        debug!(object = %object, %parent, "created child object");
        Ok(object)
    }

    fn commit_new(&self, record: ObjectRecord) -> Result<MediaObjectId> {
        self.engine.on_created(&record)?;
        let object = record.object.clone();
        let committed = self
            .registry
            .put_with(record, |r| self.publish(MediaEventKind::ObjectCreated, r));
        if let Err(e) = committed {
            self.engine.on_released(&object);
            return Err(e);
        }
        Ok(object)
    }

    // ---------------------------------------------------------------
    // Release
    // ---------------------------------------------------------------

    /// Release `id` and every descendant.
    ///
    /// Returns the released objects, `id` first. Releasing an object twice
    /// fails with [`RegistryError::MediaObjectNotFound`].
    pub fn release(&self, id: ObjectId) -> Result<Vec<MediaObjectId>> {
        let removed = self.registry.remove_subtree_with(id, |removed| {
            for record in removed {
                self.publish(MediaEventKind::ObjectReleased, record);
            }
        })?;
        for record in &removed {
            self.engine.on_released(&record.object);
        }
        info!(object = %id, cascaded = removed.len().saturating_sub(1), "released media object");
        Ok(removed.into_iter().map(|r| r.object).collect())
    }

    // ---------------------------------------------------------------
    // Transport
    // ---------------------------------------------------------------

    /// Apply a transport command to a URI endpoint and return its new state.
    ///
    /// The engine is driven outside the registry lock. The new state is
    /// committed afterwards, and only if the endpoint is still alive.
    pub fn transport(&self, id: ObjectId, command: TransportCommand) -> Result<TransportState> {
        let mut current = self.registry.get(id)?;
        uri_state(&mut current)?;
        self.engine.transport(&current.object, command)?;

        let new_state = command.target_state();
        self.registry.update(id, |record| {
            *uri_state(record)? = new_state;
            self.publish(MediaEventKind::TransportChanged(new_state), record);
            Ok(())
        })?;
        debug!(object = %current.object, %command, state = %new_state, "transport changed");
        Ok(new_state)
    }

    pub fn start(&self, id: ObjectId) -> Result<TransportState> {
        self.transport(id, TransportCommand::Start)
    }

    pub fn pause(&self, id: ObjectId) -> Result<TransportState> {
        self.transport(id, TransportCommand::Pause)
    }

    pub fn stop(&self, id: ObjectId) -> Result<TransportState> {
        self.transport(id, TransportCommand::Stop)
    }

    fn publish(&self, kind: MediaEventKind, record: &ObjectRecord) {
        let event = MediaEvent::new(kind, record.object.clone(), record.pipeline, record.handler);
        if let Err(e) = self.events.route(&event) {
            warn!(error = %e, %kind, object = %record.object, "failed to route media event");
        }
    }
}

fn uri_state(record: &mut ObjectRecord) -> Result<&mut TransportState> {
    let (id, kind) = (record.id(), record.kind());
    match &mut record.attributes {
        Attributes::Uri { state, .. } => Ok(state),
        _ => Err(RegistryError::TypeMismatch {
            id,
            expected: Discriminant::UriEndPoint,
            actual: kind,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mog_handlers::InMemoryHandlerDirectory;
    use mog_types::{FilterType, HandlerAddress, MixerType, SdpEndPointType, UriEndPointType};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    fn controller() -> LifecycleController {
        let dir = InMemoryHandlerDirectory::new();
        dir.add_handler_address(HandlerId::new(0), HandlerAddress::new("localhost", 2323))
            .unwrap();
        LifecycleController::new(Arc::new(dir), Arc::new(EventRouter::new()))
    }

    fn player(uri: &str) -> ChildSpec {
        ChildSpec::UriEndPoint {
            kind: UriEndPointType::PlayerEndPoint,
            uri: uri.into(),
        }
    }

    #[test]
    fn pipeline_requires_handler() {
        let ctl = LifecycleController::new(
            Arc::new(InMemoryHandlerDirectory::new()),
            Arc::new(EventRouter::new()),
        );
        let err = ctl.create_media_pipeline(HandlerId::new(0)).unwrap_err();
        assert!(matches!(err, RegistryError::HandlerNotFound(h) if h == HandlerId::new(0)));
        assert!(ctl.registry().is_empty());
        assert_eq!(ctl.tokens().issued_count(), 0);
    }

    #[test]
    fn pipeline_has_pipeline_kind_only() {
        let ctl = controller();
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        assert_eq!(p.kind, ObjectKind::media_pipeline());
        assert_eq!(p.kind.discriminant(), Discriminant::MediaObject);
    }

    #[test]
    fn children_share_pipeline_token() {
        let ctl = controller();
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        let specs = [
            ChildSpec::Mixer(MixerType::MainMixer),
            ChildSpec::SdpEndPoint(SdpEndPointType::RtpEndPoint),
            ChildSpec::SdpEndPoint(SdpEndPointType::WebRtcEndPoint),
            ChildSpec::HttpEndPoint,
            ChildSpec::Filter(FilterType::ZBarFilter),
            player("/a"),
        ];
        for spec in specs {
            let kind = spec.kind();
            let child = ctl.create_child(p.id, spec).unwrap();
            assert_eq!(child.token, p.token);
            assert_eq!(child.kind, kind);
        }
    }

    #[test]
    fn distinct_pipelines_get_distinct_tokens() {
        let ctl = controller();
        let a = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        let b = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        assert_ne!(a.token, b.token);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn child_of_released_pipeline_not_found() {
        let ctl = controller();
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        ctl.release(p.id).unwrap();
        let err = ctl.create_child(p.id, ChildSpec::Mixer(MixerType::MainMixer)).unwrap_err();
        assert!(matches!(err, RegistryError::MediaObjectNotFound(_)));
    }

    #[test]
    fn child_of_child_is_invalid_parent() {
        let ctl = controller();
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        let m = ctl.create_child(p.id, ChildSpec::Mixer(MixerType::MainMixer)).unwrap();
        let err = ctl.create_child(m.id, ChildSpec::HttpEndPoint).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidParent { .. }));
    }

    #[test]
    fn release_cascades_and_is_not_repeatable() {
        let ctl = controller();
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        let rtp = ctl.create_child(p.id, ChildSpec::SdpEndPoint(SdpEndPointType::RtpEndPoint)).unwrap();
        let webrtc = ctl.create_child(p.id, ChildSpec::SdpEndPoint(SdpEndPointType::WebRtcEndPoint)).unwrap();

        let released = ctl.release(p.id).unwrap();
        assert_eq!(released.len(), 3);
        for id in [p.id, rtp.id, webrtc.id] {
            assert!(!ctl.registry().is_alive(id));
        }
        assert!(matches!(ctl.release(p.id), Err(RegistryError::MediaObjectNotFound(_))));
        assert!(matches!(ctl.release(rtp.id), Err(RegistryError::MediaObjectNotFound(_))));
    }

    #[test]
    fn ids_not_reused_after_release() {
        let ctl = controller();
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        ctl.release(p.id).unwrap();
        let q = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        assert!(q.id > p.id);
        assert_ne!(q.token, p.token);
        assert!(ctl.tokens().was_issued(&p.token));
    }

    #[test]
    fn http_url_uses_base() {
        let ctl = controller().with_http_base_url("http://media.example:8888/ep/");
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        let http = ctl.create_child(p.id, ChildSpec::HttpEndPoint).unwrap();
        let url = ctl.registry().url_of(http.id).unwrap();
        assert_eq!(url, format!("http://media.example:8888/ep/{}", http.id));
    }

    #[test]
    fn transport_on_uri_endpoint() {
        let ctl = controller();
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        let ep = ctl.create_child(p.id, player("/player_end_point/uri")).unwrap();

        assert_eq!(ctl.start(ep.id).unwrap(), TransportState::Playing);
        assert_eq!(ctl.pause(ep.id).unwrap(), TransportState::Paused);
        assert_eq!(ctl.stop(ep.id).unwrap(), TransportState::Stopped);
        assert_eq!(ctl.registry().uri_of(ep.id).unwrap(), "/player_end_point/uri");
    }

    #[test]
    fn transport_rejects_other_kinds() {
        let ctl = controller();
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        let http = ctl.create_child(p.id, ChildSpec::HttpEndPoint).unwrap();
        for id in [p.id, http.id] {
            let err = ctl.start(id).unwrap_err();
            assert!(matches!(err, RegistryError::TypeMismatch { expected: Discriminant::UriEndPoint, .. }));
        }
    }

    #[test]
    fn transport_on_released_not_found() {
        let ctl = controller();
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        let ep = ctl.create_child(p.id, player("")).unwrap();
        ctl.release(p.id).unwrap();
        assert!(matches!(ctl.stop(ep.id), Err(RegistryError::MediaObjectNotFound(_))));
    }

    struct RefusingEngine {
        releases: AtomicUsize,
    }

    impl MediaEngine for RefusingEngine {
        fn on_created(&self, record: &ObjectRecord) -> Result<()> {
            if record.kind().is_http_end_point() {
                return Err(RegistryError::Engine("no http support".into()));
            }
            Ok(())
        }

        fn on_released(&self, _object: &MediaObjectId) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }

        fn transport(&self, _object: &MediaObjectId, command: TransportCommand) -> Result<()> {
            match command {
                TransportCommand::Pause => Err(RegistryError::Engine("cannot pause".into())),
                _ => Ok(()),
            }
        }
    }

    #[test]
    fn engine_refusal_leaves_no_object() {
        let engine = Arc::new(RefusingEngine { releases: AtomicUsize::new(0) });
        let ctl = controller().with_engine(engine.clone());
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();

        let err = ctl.create_child(p.id, ChildSpec::HttpEndPoint).unwrap_err();
        assert!(matches!(err, RegistryError::Engine(_)));
        assert!(ctl.registry().children_of(p.id).unwrap().is_empty());

        let ep = ctl.create_child(p.id, player("/x")).unwrap();
        ctl.start(ep.id).unwrap();
        assert!(matches!(ctl.pause(ep.id), Err(RegistryError::Engine(_))));
        let record = ctl.registry().get(ep.id).unwrap();
        assert!(matches!(record.attributes, Attributes::Uri { state: TransportState::Playing, .. }));

        ctl.release(p.id).unwrap();
        assert_eq!(engine.releases.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn events_reach_governing_handler() {
        let ctl = controller();
        let mut rx = ctl.events().subscribe(HandlerId::new(0)).unwrap();

        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        let ep = ctl.create_child(p.id, player("/y")).unwrap();
        ctl.start(ep.id).unwrap();
        ctl.release(p.id).unwrap();

        let kinds: Vec<_> = (0..5).map(|_| rx.try_recv().unwrap().kind).collect();
        assert_eq!(
            kinds,
            vec![
                MediaEventKind::ObjectCreated,
                MediaEventKind::ObjectCreated,
                MediaEventKind::TransportChanged(TransportState::Playing),
                MediaEventKind::ObjectReleased,
                MediaEventKind::ObjectReleased,
            ]
        );
    }

    #[test]
    fn concurrent_release_is_all_or_nothing() {
        for _ in 0..20 {
            let ctl = Arc::new(controller());
            let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();

            let creators: Vec<_> = (0..4)
                .map(|_| {
                    let ctl = Arc::clone(&ctl);
                    std::thread::spawn(move || {
                        let mut made = Vec::new();
                        for _ in 0..25 {
                            match ctl.create_child(p.id, ChildSpec::Mixer(MixerType::MainMixer)) {
                                Ok(m) => made.push(m.id),
                                Err(RegistryError::MediaObjectNotFound(_)) => break,
                                Err(e) => panic!("unexpected error: {e}"),
                            }
                        }
                        made
                    })
                })
                .collect();

            let releaser = {
                let ctl = Arc::clone(&ctl);
                std::thread::spawn(move || ctl.release(p.id).unwrap())
            };

            let released = releaser.join().unwrap();
            let created: Vec<ObjectId> = creators.into_iter().flat_map(|t| t.join().unwrap()).collect();

            // Nothing created under the pipeline may outlive it.
            for id in &created {
                assert!(!ctl.registry().is_alive(*id));
            }
            assert_eq!(released.len(), created.len() + 1);
            assert!(ctl.registry().is_empty());
        }
    }

    struct PanickingEngine;

    impl MediaEngine for PanickingEngine {
        fn on_created(&self, _record: &ObjectRecord) -> Result<()> {
            Ok(())
        }

        fn on_released(&self, _object: &MediaObjectId) {}

        fn transport(&self, _object: &MediaObjectId, command: TransportCommand) -> Result<()> {
            if command == TransportCommand::Pause {
                panic!("engine crashed while pausing");
            }
            Ok(())
        }
    }

    #[test]
    fn engine_panic_leaves_other_requests_working() {
        let ctl = Arc::new(controller().with_engine(Arc::new(PanickingEngine)));
        let p = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        let ep = ctl.create_child(p.id, player("/crash")).unwrap();
        ctl.start(ep.id).unwrap();
        let other = ctl.create_media_pipeline(HandlerId::new(0)).unwrap();

        let worker = {
            let ctl = Arc::clone(&ctl);
            let id = ep.id;
            thread::spawn(move || {
                let _ = ctl.pause(id);
            })
        };
        assert!(worker.join().is_err());

        assert_eq!(ctl.registry().get(other.id).unwrap().object, other);
        ctl.create_media_pipeline(HandlerId::new(0)).unwrap();
        ctl.create_child(other.id, ChildSpec::HttpEndPoint).unwrap();

        let record = ctl.registry().get(ep.id).unwrap();
        assert!(matches!(record.attributes, Attributes::Uri { state: TransportState::Playing, .. }));
        assert_eq!(ctl.stop(ep.id).unwrap(), TransportState::Stopped);
        assert_eq!(ctl.release(p.id).unwrap().len(), 2);
    }

    struct NoPipelines;

    impl MediaEngine for NoPipelines {
        fn on_created(&self, record: &ObjectRecord) -> Result<()> {
            if record.kind().is_pipeline() {
                return Err(RegistryError::Engine("pipelines unavailable".into()));
            }
            Ok(())
        }

        fn on_released(&self, _object: &MediaObjectId) {}

        fn transport(&self, _object: &MediaObjectId, _command: TransportCommand) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn refused_pipeline_keeps_no_token() {
        let ctl = controller().with_engine(Arc::new(NoPipelines));
        let err = ctl.create_media_pipeline(HandlerId::new(0)).unwrap_err();
        assert!(matches!(err, RegistryError::Engine(_)));
        assert!(ctl.registry().is_empty());
        assert_eq!(ctl.tokens().issued_count(), 0);
    }

    #[test]
    fn created_event_never_follows_released_event() {
        for _ in 0..50 {
            let ctl = Arc::new(controller());
            let mut rx = ctl.events().subscribe(HandlerId::new(0)).unwrap();
            let pid = ctl.create_media_pipeline(HandlerId::new(0)).unwrap().id;

            let creator = {
                let ctl = Arc::clone(&ctl);
                thread::spawn(move || {
                    for _ in 0..50 {
                        match ctl.create_child(pid, ChildSpec::Mixer(MixerType::MainMixer)) {
                            Ok(_) => {}
                            Err(RegistryError::MediaObjectNotFound(_)) => break,
                            Err(e) => panic!("unexpected error: {e}"),
                        }
                    }
                })
            };
            let releaser = {
                let ctl = Arc::clone(&ctl);
                thread::spawn(move || ctl.release(pid).unwrap())
            };
            creator.join().unwrap();
            releaser.join().unwrap();

            let mut created = HashSet::new();
            let mut released = HashSet::new();
            while let Ok(event) = rx.try_recv() {
                let id = event.object.id;
                match event.kind {
                    MediaEventKind::ObjectCreated => {
                        assert!(!released.contains(&id), "{id} created after its release");
                        created.insert(id);
                    }
                    MediaEventKind::ObjectReleased => {
                        assert!(created.contains(&id), "{id} released before its creation");
                        released.insert(id);
                    }
                    MediaEventKind::TransportChanged(_) => {}
                }
            }
            assert_eq!(created, released);
        }
    }

    #[test]
    fn readers_never_see_a_partial_release() {
        for _ in 0..20 {
            let ctl = Arc::new(controller());
            let pid = ctl.create_media_pipeline(HandlerId::new(0)).unwrap().id;
            let kids: Vec<ObjectId> = (0..16)
                .map(|_| ctl.create_child(pid, ChildSpec::Mixer(MixerType::MainMixer)).unwrap().id)
                .collect();
            let done = Arc::new(AtomicBool::new(false));

            let readers: Vec<_> = (0..3)
                .map(|_| {
                    let ctl = Arc::clone(&ctl);
                    let kids = kids.clone();
                    let done = Arc::clone(&done);
                    thread::spawn(move || {
                        let reg = ctl.registry();
                        let mut rounds = 0usize;
                        loop {
                            let last = done.load(Ordering::SeqCst);

                            match reg.descendants(pid) {
                                Ok(found) => assert_eq!(found, kids),
                                Err(e) => assert!(matches!(e, RegistryError::MediaObjectNotFound(id) if id == pid)),
                            }

                            for kid in &kids {
                                match reg.get_parent(*kid) {
                                    Ok(parent) => assert_eq!(parent.id, pid),
                                    Err(e) => assert!(matches!(e, RegistryError::MediaObjectNotFound(id) if id == *kid)),
                                }
                            }

                            // Release only goes alive -> dead, so children read
                            // before the pipeline must never show dead then alive,
                            // and a live pipeline implies every child was live.
                            let alive: Vec<bool> = kids.iter().map(|k| reg.is_alive(*k)).collect();
                            let pipeline_alive = reg.is_alive(pid);
                            assert!(!alive.windows(2).any(|w| !w[0] && w[1]));
                            if pipeline_alive {
                                assert!(alive.iter().all(|a| *a));
                            }

                            rounds += 1;
                            if last {
                                break;
                            }
                        }
                        rounds
                    })
                })
                .collect();

            ctl.release(pid).unwrap();
            done.store(true, Ordering::SeqCst);
            for reader in readers {
                assert!(reader.join().unwrap() > 0);
            }
            assert!(ctl.registry().is_empty());
        }
    }
}
