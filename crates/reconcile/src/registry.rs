//! Kind-to-handler registry
//!
//! Built once during provider configuration and never mutated afterward, so
//! concurrent lookups from parallel reconciliation workers need no locking.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::handler::SharedHandler;

/// Immutable mapping from kind name to handler.
pub struct HandlerRegistry {
    handlers: HashMap<String, SharedHandler>,
}

impl HandlerRegistry {
    /// Build a registry from the configured handlers.
    ///
    /// Later handlers win on duplicate kind names.
    #[must_use]
    pub fn new(handlers: Vec<SharedHandler>) -> Self {
        let handlers = handlers
            .into_iter()
            .map(|h| (h.kind().to_string(), h))
            .collect();
        Self { handlers }
    }

    /// Look up the handler for a kind.
    pub fn get(&self, kind: &str) -> Result<SharedHandler> {
        self.handlers
            .get(kind)
            .cloned()
            .ok_or_else(|| Error::UnknownKind(kind.to_string()))
    }

    /// All registered kind names, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// All handlers, in sorted kind order (deterministic iteration for
    /// discovery and display).
    #[must_use]
    pub fn handlers(&self) -> Vec<SharedHandler> {
        let mut handlers: Vec<_> = self.handlers.values().cloned().collect();
        handlers.sort_by_key(|h| h.kind());
        handlers
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
