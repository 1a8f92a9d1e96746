//! Checkpoint error types.

use thiserror::Error;

/// Why a checkpoint could not be written, read, or resumed.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Encoding to JSON or bincode failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding from JSON or bincode failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The checkpoint is inconsistent, or the graph offered for resuming
    /// does not match the recorded snapshot
    #[error("Checkpoint validation failed: {0}")]
    ValidationFailed(String),
}
