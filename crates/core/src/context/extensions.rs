//! Extension Slot - Request-local storage behind a shape-agnostic interface
//!
//! Consumers store request-scoped state (such as the loader registry) under a
//! string key. Two storage shapes are supported: an open mapping where slots
//! appear on first use, and a fixed set of slots declared when the context is
//! built. Callers depend only on the `ExtensionSlot` trait.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::errors::{CoreError, CoreResult};

/// Shared value stored in an extension slot
pub type Extension = Arc<dyn Any + Send + Sync>;

/// Factory invoked when a slot is read for the first time
pub type ExtensionInit<'a> = &'a dyn Fn() -> Extension;

/// Shape-agnostic access to request-local extension storage
pub trait ExtensionSlot: Send + Sync {
    /// Return the value stored under `key`, initializing the slot first if
    /// it has never been read.
    fn get_or_init(&self, key: &str, init: ExtensionInit<'_>) -> CoreResult<Extension>;

    /// Return the value stored under `key` if the slot has been initialized.
    fn get(&self, key: &str) -> Option<Extension>;
}

/// Mapping-shaped extension storage with an open key space.
///
/// Slots are created lazily on first access; any key is valid.
#[derive(Default)]
pub struct MapExtensions {
    slots: Mutex<HashMap<String, Extension>>,
}

impl MapExtensions {
    /// Create empty mapping-shaped storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtensionSlot for MapExtensions {
    fn get_or_init(&self, key: &str, init: ExtensionInit<'_>) -> CoreResult<Extension> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = slots.get(key) {
            return Ok(Arc::clone(existing));
        }
        tracing::debug!("Initializing extension slot '{}'", key);
        let value = init();
        slots.insert(key.to_string(), Arc::clone(&value));
        Ok(value)
    }

    fn get(&self, key: &str) -> Option<Extension> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(key).map(Arc::clone)
    }
}

/// Attribute-shaped extension storage with slots declared up front.
///
/// Reading an undeclared key is an error rather than an implicit insert;
/// declared slots fill exactly once.
pub struct FixedExtensions {
    slots: HashMap<String, OnceLock<Extension>>,
}

impl FixedExtensions {
    /// Declare the slot set this context will carry
    pub fn new<I, S>(slot_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: slot_names
                .into_iter()
                .map(|name| (name.into(), OnceLock::new()))
                .collect(),
        }
    }

    /// Names of the declared slots
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(|s| s.as_str())
    }
}

impl ExtensionSlot for FixedExtensions {
    fn get_or_init(&self, key: &str, init: ExtensionInit<'_>) -> CoreResult<Extension> {
        let slot = self
            .slots
            .get(key)
            .ok_or_else(|| CoreError::unknown_extension_slot(key))?;
        Ok(Arc::clone(slot.get_or_init(init)))
    }

    fn get(&self, key: &str) -> Option<Extension> {
        self.slots.get(key)?.get().map(Arc::clone)
    }
}
