//! Delta operations, merging, and transport-size decisions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SyncError, SyncResult};

/// A delta is preferred over a full state only when its serialized size is
/// at most this fraction of the full state's.
pub const DELTA_SIZE_RATIO: f64 = 0.3;

/// One JSON-Patch-style operation, addressed by a slash-delimited path.
///
/// The diff algorithm emits only `add`/`remove`/`replace`; `move`, `copy`,
/// and `test` are accepted on the apply side for hand-authored deltas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl PatchOp {
    /// The target path of this operation.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            PatchOp::Add { path, .. }
            | PatchOp::Remove { path }
            | PatchOp::Replace { path, .. }
            | PatchOp::Move { path, .. }
            | PatchOp::Copy { path, .. }
            | PatchOp::Test { path, .. } => path,
        }
    }
}

/// An ordered set of operations carrying state version N to version N+1
/// (or further, once merged).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateDelta {
    /// The version this delta applies to.
    pub base_version: u64,

    /// The version this delta produces.
    pub target_version: u64,

    /// Operations, applied in order.
    pub operations: Vec<PatchOp>,

    /// When the delta was computed (Unix millis).
    pub timestamp: i64,

    /// Optional payload checksum, assigned by the transport layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    /// Whether `operations` has been folded into a compressed envelope.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub compressed: bool,
}

/// Merge a run of sequential deltas into one.
///
/// Requires strict chaining: each delta's target version must equal the
/// next delta's base version. Returns `None` for an empty slice and a
/// clone of the single element for a singleton.
pub fn merge_deltas(deltas: &[GameStateDelta]) -> SyncResult<Option<GameStateDelta>> {
    let (first, rest) = match deltas {
        [] => return Ok(None),
        [only] => return Ok(Some(only.clone())),
        [first, rest @ ..] => (first, rest),
    };

    let mut operations = first.operations.clone();
    let mut previous_target = first.target_version;
    let mut timestamp = first.timestamp;
    for delta in rest {
        if delta.base_version != previous_target {
            return Err(SyncError::NonSequentialDeltas {
                previous_target,
                next_base: delta.base_version,
            });
        }
        operations.extend(delta.operations.iter().cloned());
        previous_target = delta.target_version;
        timestamp = delta.timestamp;
    }

    Ok(Some(GameStateDelta {
        base_version: first.base_version,
        target_version: previous_target,
        operations,
        timestamp,
        checksum: None,
        compressed: false,
    }))
}

/// Decide whether to transmit a delta instead of the full state.
///
/// The delta wins only when its serialized size is at most
/// `threshold` times the serialized full state.
pub fn should_use_delta<S: Serialize>(
    full_state: &S,
    delta: &GameStateDelta,
    threshold: f64,
) -> SyncResult<bool> {
    let full_size = serde_json::to_vec(full_state)?.len();
    let delta_size = serde_json::to_vec(delta)?.len();
    Ok((delta_size as f64) <= threshold * (full_size as f64))
}
