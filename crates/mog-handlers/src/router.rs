//! Fan-out of [`MediaEvent`]s to per-handler subscribers.

use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::trace;

use mog_types::HandlerId;

use crate::error::{HandlerError, Result};
use crate::event::MediaEvent;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// A broadcast channel receiver for media events.
pub type EventStream = broadcast::Receiver<MediaEvent>;

struct Subscriber {
    /// `None` receives every handler's events.
    handler: Option<HandlerId>,
    sender: broadcast::Sender<MediaEvent>,
}

impl Subscriber {
    fn wants(&self, event: &MediaEvent) -> bool {
        self.handler.map_or(true, |h| h == event.handler)
    }
}

/// Routes events to the subscribers of the handler that governs them.
///
/// The transport layer that talks to the registered `host:port` addresses
/// subscribes here; the graph manager only publishes.
pub struct EventRouter {
    subscribers: RwLock<Vec<Subscriber>>,
    capacity: usize,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to events governed by `handler`.
    pub fn subscribe(&self, handler: HandlerId) -> Result<EventStream> {
        self.add_subscriber(Some(handler))
    }

    /// Subscribe to every event regardless of handler.
    pub fn subscribe_all(&self) -> Result<EventStream> {
        self.add_subscriber(None)
    }

    fn add_subscriber(&self, handler: Option<HandlerId>) -> Result<EventStream> {
        let (sender, rx) = broadcast::channel(self.capacity);
        self.subscribers
            .write()
            .map_err(|e| HandlerError::LockPoisoned(e.to_string()))?
            .push(Subscriber { handler, sender });
        Ok(rx)
    }

    /// Deliver `event` to all matching subscribers.
    ///
    /// Subscribers whose receivers have all been dropped are pruned.
    /// Returns the number of subscribers the event was delivered to.
    pub fn route(&self, event: &MediaEvent) -> Result<usize> {
        let mut subs = self
            .subscribers
            .write()
            .map_err(|e| HandlerError::LockPoisoned(e.to_string()))?;
        let mut delivered = 0;
        subs.retain(|sub| {
            if sub.wants(event) {
                let ok = sub.sender.send(event.clone()).is_ok();
                if ok {
                    delivered += 1;
                }
                ok
            } else {
                sub.sender.receiver_count() > 0
            }
        });
        trace!(kind = %event.kind, object = %event.object, delivered, "routed media event");
        Ok(delivered)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().map(|s| s.len()).unwrap_or(0)
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}
