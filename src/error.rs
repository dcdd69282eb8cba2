//! Error types for the face-swap orchestration pipeline

use std::path::Path;

/// Convenient `Result` alias used throughout the crate
pub type Result<T> = std::result::Result<T, FaceSwapError>;

/// Error taxonomy surfaced at the orchestrator boundary
///
/// Every failure a request can hit is folded into one of these variants so
/// the transport layer can map them to a structured response instead of
/// propagating raw internal faults.
#[derive(Debug, thiserror::Error)]
pub enum FaceSwapError {
    /// A source or target resolved to a media kind the pipeline does not accept
    #[error("invalid media: {0}")]
    InvalidMedia(String),

    /// Remote peer answered with a non-success HTTP status
    #[error("download of {url} failed with HTTP status {status}")]
    DownloadStatus {
        /// HTTP status code returned by the remote peer
        status: u16,
        /// URL the download was attempted from
        url: String,
    },

    /// Transport-level fault while talking to a remote peer
    #[error("network error: {message}")]
    Network {
        /// Human-readable context for the fault
        message: String,
        /// Underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Local filesystem fault
    #[error("I/O error during {operation} on {path}: {source}")]
    FileIo {
        /// Operation that failed (e.g. "create temp file")
        operation: String,
        /// Path the operation was applied to
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed or inconsistent engine configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The external engine exited with a non-zero completion signal
    #[error("engine exited with status {0}")]
    EngineFailed(i32),

    /// The engine misbehaved in a way not covered by its completion signal
    #[error("engine failure: {0}")]
    Engine(String),

    /// Media metadata probing failed
    #[error("media probe failed: {0}")]
    Probe(String),

    /// Anything uncategorized; reported to callers as an opaque failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl FaceSwapError {
    /// Create an invalid-media error (client fault)
    pub fn invalid_media(message: impl Into<String>) -> Self {
        Self::InvalidMedia(message.into())
    }

    /// Create a network error with an underlying transport fault
    pub fn network_error(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Create a file I/O error with operation and path context
    pub fn file_io_error(operation: &str, path: &Path, source: std::io::Error) -> Self {
        Self::FileIo {
            operation: operation.to_string(),
            path: path.display().to_string(),
            source,
        }
    }

    /// Create an invalid-configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create an engine error for misbehavior outside the completion signal
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine(message.into())
    }

    /// Create a media probe error
    pub fn probe(message: impl Into<String>) -> Self {
        Self::Probe(message.into())
    }

    /// Create an internal error for uncategorized faults
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this failure was caused by the caller's input
    ///
    /// Drives the HTTP status split: client faults map to 400, everything
    /// else to 500. Only media validation failures count as client faults;
    /// network errors are treated as upstream faults because the caller
    /// cannot diagnose them.
    #[must_use]
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::InvalidMedia(_))
    }
}
