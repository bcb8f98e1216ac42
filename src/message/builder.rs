//! Wire message assembly.
//!
//! A sync message carries either a full state or a delta, never both. A
//! full state large enough to compress travels in `compressed_payload`
//! instead of `full_state`; a delta compresses internally via the
//! envelope, so `delta` stays populated either way.

use serde::{Deserialize, Serialize};

use crate::compress::{compress_data, compress_delta_if_needed, should_compress};
use crate::delta::GameStateDelta;
use crate::error::{SyncError, SyncResult};
use crate::state::GameState;
use crate::sync::now_ms;

/// The wire message type tag.
pub const GAME_STATE_SYNC: &str = "game_state_sync";

/// Whether a message carries a full state or a delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncType {
    Full,
    Delta,
}

/// The outbound `game_state_sync` message handed to the transport layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMessage {
    /// Always [`GAME_STATE_SYNC`].
    #[serde(rename = "type")]
    pub message_type: String,

    /// The game session this message belongs to.
    pub session_id: String,

    /// Full or delta sync.
    pub sync_type: SyncType,

    /// The full state, when `sync_type` is `full` and it was small enough
    /// to send uncompressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_state: Option<GameState>,

    /// The delta, when `sync_type` is `delta`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<GameStateDelta>,

    /// When the message was built (Unix millis).
    pub timestamp: i64,

    /// Whether `compressed_payload` carries the state.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub compressed: bool,

    /// Base64 gzip of the full state, when compressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_payload: Option<String>,
}

impl SyncMessage {
    /// An uncompressed full-state message.
    #[must_use]
    pub fn full(session_id: impl Into<String>, state: GameState) -> Self {
        Self {
            message_type: GAME_STATE_SYNC.to_string(),
            session_id: session_id.into(),
            sync_type: SyncType::Full,
            full_state: Some(state),
            delta: None,
            timestamp: now_ms(),
            compressed: false,
            compressed_payload: None,
        }
    }

    /// A delta message.
    #[must_use]
    pub fn delta(session_id: impl Into<String>, delta: GameStateDelta) -> Self {
        Self {
            message_type: GAME_STATE_SYNC.to_string(),
            session_id: session_id.into(),
            sync_type: SyncType::Delta,
            full_state: None,
            delta: Some(delta),
            timestamp: now_ms(),
            compressed: false,
            compressed_payload: None,
        }
    }
}

/// Build a sync message, compressing where it pays.
///
/// Exactly one of `state` and `delta` must be provided. The full-state
/// path compresses the whole state past the size gate; the delta path
/// folds large operation lists into the delta envelope.
pub fn create_compressed_sync_message(
    session_id: &str,
    state: Option<&GameState>,
    delta: Option<&GameStateDelta>,
) -> SyncResult<SyncMessage> {
    match (state, delta) {
        (Some(state), None) => {
            if should_compress(state)? {
                let payload = compress_data(state)?;
                Ok(SyncMessage {
                    full_state: None,
                    compressed: true,
                    compressed_payload: Some(payload),
                    ..SyncMessage::full(session_id, state.clone())
                })
            } else {
                Ok(SyncMessage::full(session_id, state.clone()))
            }
        }
        (None, Some(delta)) => {
            let delta = compress_delta_if_needed(delta.clone())?;
            Ok(SyncMessage::delta(session_id, delta))
        }
        _ => Err(SyncError::AmbiguousSyncPayload),
    }
}
