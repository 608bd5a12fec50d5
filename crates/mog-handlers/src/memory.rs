//! In-memory handler directory.
//!
//! [`InMemoryHandlerDirectory`] keeps every handler's address list in a
//! `HashMap` behind a `RwLock`. Contents live as long as the server process.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use mog_types::{HandlerAddress, HandlerId};

use crate::directory::HandlerDirectory;
use crate::error::{HandlerError, Result};

/// An in-memory implementation of [`HandlerDirectory`].
#[derive(Debug, Default)]
pub struct InMemoryHandlerDirectory {
    handlers: RwLock<HashMap<HandlerId, Vec<HandlerAddress>>>,
}

impl InMemoryHandlerDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> HandlerError {
    HandlerError::LockPoisoned(e.to_string())
}

impl HandlerDirectory for InMemoryHandlerDirectory {
    fn add_handler_address(&self, handler: HandlerId, address: HandlerAddress) -> Result<()> {
        let mut handlers = self.handlers.write().map_err(poisoned)?;
        debug!(%handler, %address, "registered handler address");
        handlers.entry(handler).or_default().push(address);
        Ok(())
    }

    fn remove_handler_address(&self, handler: HandlerId, address: &HandlerAddress) -> Result<bool> {
        let mut handlers = self.handlers.write().map_err(poisoned)?;
        let Some(list) = handlers.get_mut(&handler) else {
            return Ok(false);
        };
        let Some(pos) = list.iter().position(|a| a == address) else {
            return Ok(false);
        };
        list.remove(pos);
        if list.is_empty() {
            handlers.remove(&handler);
        }
        debug!(%handler, %address, "removed handler address");
        Ok(true)
    }

    fn addresses(&self, handler: HandlerId) -> Result<Vec<HandlerAddress>> {
        let handlers = self.handlers.read().map_err(poisoned)?;
        Ok(handlers.get(&handler).cloned().unwrap_or_default())
    }

    fn handler_ids(&self) -> Result<Vec<HandlerId>> {
        let handlers = self.handlers.read().map_err(poisoned)?;
        let mut ids: Vec<HandlerId> = handlers
            .iter()
            .filter(|(_, addrs)| !addrs.is_empty())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        Ok(ids)
    }
}
