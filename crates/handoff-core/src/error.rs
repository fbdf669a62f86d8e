use thiserror::Error;

/// Top-level error type for the handoff system.
///
/// Payload decode failures are not represented here; see `handoff-action`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HandoffError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Shared store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HandoffError {
    /// Whether the error means the shared store could not be reached at all,
    /// as opposed to a single statement failing.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, HandoffError::StoreUnavailable(_))
    }
}

impl From<toml::de::Error> for HandoffError {
    fn from(err: toml::de::Error) -> Self {
        HandoffError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HandoffError {
    fn from(err: toml::ser::Error) -> Self {
        HandoffError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HandoffError {
    fn from(err: serde_json::Error) -> Self {
        HandoffError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for handoff operations.
pub type Result<T> = std::result::Result<T, HandoffError>;
