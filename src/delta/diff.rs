//! Recursive structural diffing between two states.
//!
//! The diff walks the serialized JSON trees of both versions by path.
//! Identical subtrees emit nothing; mismatched primitives emit `replace`;
//! object diffs are key-set based; array diffs are length-aware (see
//! `diff_arrays`). Only `add`/`remove`/`replace` are ever emitted.

use serde_json::Value;
use tracing::trace;

use crate::error::SyncResult;
use crate::state::GameState;
use crate::sync::now_ms;

use super::op::{GameStateDelta, PatchOp};

/// Compute the delta carrying `old` to `new`.
///
/// Base and target versions are taken from the two states; the caller is
/// responsible for handing in adjacent versions when the delta is meant
/// for the wire.
pub fn create_delta(old: &GameState, new: &GameState) -> SyncResult<GameStateDelta> {
    let old_value = serde_json::to_value(old)?;
    let new_value = serde_json::to_value(new)?;

    let mut operations = Vec::new();
    diff_values(&mut String::new(), &old_value, &new_value, &mut operations);
    trace!(
        base = old.version,
        target = new.version,
        ops = operations.len(),
        "computed structural delta"
    );

    Ok(GameStateDelta {
        base_version: old.version,
        target_version: new.version,
        operations,
        timestamp: now_ms(),
        checksum: None,
        compressed: false,
    })
}

/// Escape a path token per RFC 6901 (`~` → `~0`, `/` → `~1`).
fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Recursive diff of two JSON values rooted at `path`.
pub(crate) fn diff_values(path: &mut String, old: &Value, new: &Value, out: &mut Vec<PatchOp>) {
    if old == new {
        return;
    }

    match (old, new) {
        (Value::Object(old_map), Value::Object(new_map)) => {
            for (key, old_child) in old_map {
                let len = path.len();
                path.push('/');
                path.push_str(&escape(key));
                match new_map.get(key) {
                    Some(new_child) => diff_values(path, old_child, new_child, out),
                    None => out.push(PatchOp::Remove { path: path.clone() }),
                }
                path.truncate(len);
            }
            for (key, new_child) in new_map {
                if !old_map.contains_key(key) {
                    out.push(PatchOp::Add {
                        path: format!("{path}/{}", escape(key)),
                        value: new_child.clone(),
                    });
                }
            }
        }
        (Value::Array(old_arr), Value::Array(new_arr)) => {
            diff_arrays(path, old_arr, new_arr, out);
        }
        // Primitive mismatch, or a type change.
        _ => out.push(PatchOp::Replace {
            path: path.clone(),
            value: new.clone(),
        }),
    }
}

/// Length-aware array diff.
///
/// When the length delta exceeds 50% of the larger array the whole array
/// is replaced wholesale. Otherwise shared indices recurse, new trailing
/// indices become `add`s, and removed trailing indices are emitted
/// high-index-first so earlier removals never shift later targets.
fn diff_arrays(path: &mut String, old: &[Value], new: &[Value], out: &mut Vec<PatchOp>) {
    let larger = old.len().max(new.len());
    let length_delta = old.len().abs_diff(new.len());
    if larger > 0 && 2 * length_delta > larger {
        out.push(PatchOp::Replace {
            path: path.clone(),
            value: Value::Array(new.to_vec()),
        });
        return;
    }

    let shared = old.len().min(new.len());
    for index in 0..shared {
        let len = path.len();
        path.push('/');
        path.push_str(&index.to_string());
        diff_values(path, &old[index], &new[index], out);
        path.truncate(len);
    }
    for (index, value) in new.iter().enumerate().skip(shared) {
        out.push(PatchOp::Add {
            path: format!("{path}/{index}"),
            value: value.clone(),
        });
    }
    for index in (shared..old.len()).rev() {
        out.push(PatchOp::Remove {
            path: format!("{path}/{index}"),
        });
    }
}
