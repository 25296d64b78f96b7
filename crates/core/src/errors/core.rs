use thiserror::Error;

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type for the arbor foundation layer
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unknown extension slot '{slot}': context declares a fixed slot set")]
    UnknownExtensionSlot { slot: String },

    #[error("Extension slot '{slot}' holds a value of an unexpected type")]
    ExtensionTypeMismatch { slot: String },
}

impl CoreError {
    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new unknown extension slot error
    pub fn unknown_extension_slot(slot: impl Into<String>) -> Self {
        Self::UnknownExtensionSlot { slot: slot.into() }
    }

    /// Create a new extension type mismatch error
    pub fn extension_type_mismatch(slot: impl Into<String>) -> Self {
        Self::ExtensionTypeMismatch { slot: slot.into() }
    }
}
