//! Error types. One enum per subsystem, `thiserror` only.
//! The analytics functions themselves are infallible.

/// A single backend source could not be read for this cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{source_name} unavailable")]
    Missing { source_name: &'static str },

    #[error("{source_name} failed: {message}")]
    Failed {
        source_name: &'static str,
        message: String,
    },
}

/// A refresh cycle was abandoned; the previous snapshot stays in place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("sync failed: {0}")]
    Source(#[from] FetchError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config at {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}
