//! Error types for the synchronization engine.

use thiserror::Error;

/// Result type for all fallible sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while synchronizing game state.
///
/// Validation failures are returned before any mutation occurs. Unknown
/// action kinds are deliberately *not* an error (they execute as no-ops),
/// and conflict resolution never fails: every submitted action reaches some
/// executable form.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Game state failed structural validation.
    #[error("invalid game state: {0}")]
    InvalidState(String),

    /// Action failed structural validation.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Delta failed structural validation, or a patch operation could not
    /// be applied to the document.
    #[error("invalid delta: {0}")]
    InvalidDelta(String),

    /// A delta was applied against a state whose version does not match
    /// the delta's base version. There is no rebasing path.
    #[error("delta base version {expected} does not match state version {actual}")]
    VersionMismatch {
        /// The delta's base version.
        expected: u64,
        /// The state's actual version.
        actual: u64,
    },

    /// Two adjacent deltas in a merge do not chain.
    #[error("deltas are not sequential: target {previous_target} followed by base {next_base}")]
    NonSequentialDeltas {
        /// Target version of the earlier delta.
        previous_target: u64,
        /// Base version of the later delta.
        next_base: u64,
    },

    /// Gzip compression failed.
    #[error("compression failed: {0}")]
    Compression(String),

    /// Base64 decoding or gzip decompression failed. Always fatal - a
    /// corrupt payload is never substituted with a default state.
    #[error("decompression failed: {0}")]
    Decompression(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A sync message was requested with both (or neither) of a full state
    /// and a delta.
    #[error("exactly one of full state or delta must be provided")]
    AmbiguousSyncPayload,

    /// The broadcaster collaborator failed to deliver a message.
    #[error("broadcast failed: {0}")]
    Broadcast(String),

    /// The persistence hook failed to snapshot a state.
    #[error("persistence failed: {0}")]
    Persistence(String),
}
