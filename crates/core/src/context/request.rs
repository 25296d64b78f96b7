//! Request Context - One resolution request's worth of state

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::extensions::{ExtensionSlot, FixedExtensions, MapExtensions};

/// Request-scoped context handed to every resolver invocation.
///
/// The loading core treats the context as opaque except for its extension
/// slot, which carries request-local state such as the loader registry. The
/// context, and everything stored through it, is discarded with the request.
pub struct RequestContext {
    request_id: Uuid,
    started_at: DateTime<Utc>,
    extensions: Box<dyn ExtensionSlot>,
}

impl RequestContext {
    /// Create a context backed by mapping-shaped extension storage
    pub fn new() -> Self {
        Self::with_extensions(Box::new(MapExtensions::new()))
    }

    /// Create a context with a fixed, pre-declared slot set
    pub fn with_fixed_slots<I, S>(slot_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_extensions(Box::new(FixedExtensions::new(slot_names)))
    }

    /// Create a context over caller-supplied extension storage
    pub fn with_extensions(extensions: Box<dyn ExtensionSlot>) -> Self {
        let request_id = Uuid::new_v4();
        tracing::debug!("Created request context {}", request_id);
        Self {
            request_id,
            started_at: Utc::now(),
            extensions,
        }
    }

    /// Unique id of this request
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// When this request began
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The context's extension storage
    pub fn extensions(&self) -> &dyn ExtensionSlot {
        self.extensions.as_ref()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_context_ids_are_unique() {
        let a = RequestContext::new();
        let b = RequestContext::new();
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_both_context_shapes_expose_the_same_slot_interface() {
        let map_backed = RequestContext::new();
        let fixed_backed = RequestContext::with_fixed_slots(["relation_loaders"]);

        for ctx in [&map_backed, &fixed_backed] {
            let value = ctx
                .extensions()
                .get_or_init("relation_loaders", &|| Arc::new(7i64))
                .unwrap();
            assert_eq!(value.downcast_ref::<i64>().copied(), Some(7));
        }
    }
}
