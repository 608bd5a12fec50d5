//! The [`HandlerDirectory`] trait.

use mog_types::{HandlerAddress, HandlerId};

use crate::error::Result;

/// Storage backend for registered handler addresses.
///
/// Implementations must be thread-safe. Addresses accumulate per handler id:
/// registering the same handler twice yields two addresses, which together
/// form the handler's failover set.
pub trait HandlerDirectory: Send + Sync {
    /// Append an address to the set registered for `handler`.
    fn add_handler_address(&self, handler: HandlerId, address: HandlerAddress) -> Result<()>;

    /// Remove one occurrence of `address` from `handler`'s set.
    ///
    /// Returns `Ok(true)` if an address was removed.
    fn remove_handler_address(&self, handler: HandlerId, address: &HandlerAddress) -> Result<bool>;

    /// All addresses registered for `handler`, in registration order.
    fn addresses(&self, handler: HandlerId) -> Result<Vec<HandlerAddress>>;

    /// All handler ids with at least one address, sorted.
    fn handler_ids(&self) -> Result<Vec<HandlerId>>;

    /// `true` iff at least one address is registered for `handler`.
    fn has_handler(&self, handler: HandlerId) -> Result<bool> {
        Ok(!self.addresses(handler)?.is_empty())
    }
}
