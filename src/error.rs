//! Error types and result alias for the clawome crate.

use thiserror::Error;

/// All errors surfaced by the library.
#[derive(Debug, Error)]
pub enum ClawomeError {
    /// Browser process could not be started
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Could not attach to an already-running browser
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Navigation did not complete
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Tab-level CDP operation failed
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// The in-page capture script failed or returned malformed data
    #[error("Snapshot capture failed: {0}")]
    SnapshotFailed(String),

    /// A selector did not resolve to a live element
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A hierarchical identifier is not present in the current node map
    #[error("Node '{0}' not found in node map; extract the page first")]
    NodeNotFound(String),

    /// Unexpected failure inside a pipeline stage; the extraction as a whole
    /// is abandoned and no partial result is published
    #[error("Pipeline stage '{stage}' failed: {reason}")]
    PipelineFailed { stage: &'static str, reason: String },
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClawomeError>;
