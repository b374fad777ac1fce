//! Embed handler dispatch
//!
//! Embeds are opaque single-unit values (images, nested deltas, …) that
//! [`crate::delta::Delta::compose`], [`crate::delta::Delta::invert`] and
//! [`crate::delta::Delta::transform`] recurse into via a registered
//! [`EmbedHandler`]. The registry is an ordinary value rather than process
//! state: callers that don't use embeds never construct one, and callers
//! that do keep it alongside whatever else scopes their session.

use crate::error::DeltaError;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Per-embed-type algebra, mirroring the three recursive operations of the
/// document algebra itself.
pub trait EmbedHandler {
    /// Compose embed payload `a` followed by `b`. `keep_null` matches the
    /// meaning it has for [`crate::attributes::AttributeMapOps::compose`]
    /// (true when the second operand is a retain).
    fn compose(&self, a: &JsonValue, b: &JsonValue, keep_null: bool) -> Result<JsonValue, DeltaError>;

    /// Invert embed mutation `delta` given the embed's `base` payload.
    fn invert(&self, delta: &JsonValue, base: &JsonValue) -> Result<JsonValue, DeltaError>;

    /// Rebase embed mutation `b` so it applies after `a`.
    fn transform(&self, a: &JsonValue, b: &JsonValue, priority: bool) -> Result<JsonValue, DeltaError>;
}

/// A dispatch table from embed-type string to its [`EmbedHandler`].
///
/// Unlike the upstream JS/Python implementations, this is not global mutable
/// state: construct one per caller (or share an `Arc<EmbedRegistry>` across
/// threads that agree on a fixed handler set) and pass it explicitly to the
/// algebraic methods that need it.
#[derive(Default)]
pub struct EmbedRegistry {
    handlers: HashMap<String, Box<dyn EmbedHandler>>,
}

impl EmbedRegistry {
    /// An empty registry. Any embed operation against it fails with
    /// [`DeltaError::MissingEmbedHandler`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the handler for `embed_type`.
    pub fn register_embed(&mut self, embed_type: impl Into<String>, handler: Box<dyn EmbedHandler>) {
        let embed_type = embed_type.into();
        tracing::trace!(embed_type = %embed_type, "registering embed handler");
        self.handlers.insert(embed_type, handler);
    }

    /// Removes the handler for `embed_type`, if any.
    pub fn unregister_embed(&mut self, embed_type: &str) {
        tracing::trace!(embed_type, "unregistering embed handler");
        self.handlers.remove(embed_type);
    }

    /// Looks up the handler for `embed_type`.
    pub fn get(&self, embed_type: &str) -> Result<&dyn EmbedHandler, DeltaError> {
        self.handlers
            .get(embed_type)
            .map(|handler| handler.as_ref())
            .ok_or_else(|| DeltaError::MissingEmbedHandler(embed_type.to_string()))
    }
}

impl std::fmt::Debug for EmbedRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedRegistry")
            .field("registered_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoHandler;
    impl EmbedHandler for EchoHandler {
        fn compose(&self, _a: &JsonValue, b: &JsonValue, _keep_null: bool) -> Result<JsonValue, DeltaError> {
            Ok(b.clone())
        }
        fn invert(&self, _delta: &JsonValue, base: &JsonValue) -> Result<JsonValue, DeltaError> {
            Ok(base.clone())
        }
        fn transform(&self, _a: &JsonValue, b: &JsonValue, _priority: bool) -> Result<JsonValue, DeltaError> {
            Ok(b.clone())
        }
    }

    #[test]
    fn missing_handler_errors() {
        let registry = EmbedRegistry::new();
        assert_eq!(
            registry.get("image").unwrap_err(),
            DeltaError::MissingEmbedHandler("image".to_string())
        );
    }

    #[test]
    fn register_then_unregister() {
        let mut registry = EmbedRegistry::new();
        registry.register_embed("image", Box::new(EchoHandler));
        assert!(registry.get("image").is_ok());

        registry.unregister_embed("image");
        assert!(registry.get("image").is_err());
    }
}
