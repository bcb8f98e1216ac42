//! Strict delta application.
//!
//! `apply_delta` requires an exact base-version match (there is no
//! rebasing) and applies operations in order through generic path
//! primitives. The primitives accept the full six-op set even though the
//! diff only emits three of them.

use serde_json::Value;

use crate::error::{SyncError, SyncResult};
use crate::state::{validate_delta, GameState};

use super::op::{GameStateDelta, PatchOp};

/// Apply a delta to a state, producing the target-version state.
///
/// Fails closed: a base-version mismatch, a still-compressed delta, or an
/// unresolvable path all return an error and leave the input untouched.
/// The result's version and timestamp come from the delta.
pub fn apply_delta(state: &GameState, delta: &GameStateDelta) -> SyncResult<GameState> {
    if delta.compressed {
        return Err(SyncError::InvalidDelta(
            "compressed delta must be decompressed before application".to_string(),
        ));
    }
    if state.version != delta.base_version {
        return Err(SyncError::VersionMismatch {
            expected: delta.base_version,
            actual: state.version,
        });
    }
    validate_delta(delta)?;

    let mut doc = serde_json::to_value(state)?;
    for op in &delta.operations {
        apply_op(&mut doc, op)?;
    }

    let mut next: GameState = serde_json::from_value(doc)?;
    next.version = delta.target_version;
    next.timestamp = delta.timestamp;
    Ok(next)
}

/// Apply a single operation to a JSON document.
pub(crate) fn apply_op(doc: &mut Value, op: &PatchOp) -> SyncResult<()> {
    match op {
        PatchOp::Add { path, value } => {
            let tokens = parse_pointer(path)?;
            add_at(doc, &tokens, value.clone(), path)
        }
        PatchOp::Replace { path, value } => {
            let tokens = parse_pointer(path)?;
            replace_at(doc, &tokens, value.clone(), path)
        }
        PatchOp::Remove { path } => {
            let tokens = parse_pointer(path)?;
            remove_at(doc, &tokens, path).map(|_| ())
        }
        PatchOp::Move { from, path } => {
            let from_tokens = parse_pointer(from)?;
            let taken = remove_at(doc, &from_tokens, from)?;
            let tokens = parse_pointer(path)?;
            add_at(doc, &tokens, taken, path)
        }
        PatchOp::Copy { from, path } => {
            let from_tokens = parse_pointer(from)?;
            let copied = get_at(doc, &from_tokens, from)?;
            let tokens = parse_pointer(path)?;
            add_at(doc, &tokens, copied, path)
        }
        PatchOp::Test { path, value } => {
            let tokens = parse_pointer(path)?;
            let actual = get_at(doc, &tokens, path)?;
            if actual != *value {
                return Err(SyncError::InvalidDelta(format!(
                    "test failed at {path}"
                )));
            }
            Ok(())
        }
    }
}

/// Split a slash-delimited pointer into unescaped tokens.
///
/// The empty pointer addresses the whole document. `~1` unescapes to `/`
/// and `~0` to `~`, in that order.
fn parse_pointer(path: &str) -> SyncResult<Vec<String>> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    if !path.starts_with('/') {
        return Err(SyncError::InvalidDelta(format!(
            "path {path:?} is not slash-delimited"
        )));
    }
    Ok(path[1..]
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

fn parse_index(token: &str, len: usize, allow_end: bool, path: &str) -> SyncResult<usize> {
    if token == "-" && allow_end {
        return Ok(len);
    }
    let index: usize = token
        .parse()
        .map_err(|_| SyncError::InvalidDelta(format!("bad array index {token:?} in {path}")))?;
    let bound = if allow_end { len + 1 } else { len };
    if index >= bound {
        return Err(SyncError::InvalidDelta(format!(
            "array index {index} out of bounds in {path}"
        )));
    }
    Ok(index)
}

/// Walk to the value addressed by `tokens`.
fn descend<'a>(doc: &'a mut Value, tokens: &[String], path: &str) -> SyncResult<&'a mut Value> {
    let mut current = doc;
    for token in tokens {
        current = match current {
            Value::Object(map) => map.get_mut(token).ok_or_else(|| {
                SyncError::InvalidDelta(format!("no key {token:?} along {path}"))
            })?,
            Value::Array(arr) => {
                let index = parse_index(token, arr.len(), false, path)?;
                &mut arr[index]
            }
            _ => {
                return Err(SyncError::InvalidDelta(format!(
                    "cannot traverse primitive along {path}"
                )))
            }
        };
    }
    Ok(current)
}

fn get_at(doc: &mut Value, tokens: &[String], path: &str) -> SyncResult<Value> {
    descend(doc, tokens, path).map(|v| v.clone())
}

/// `add`: insert into an object (overwriting), insert into an array
/// (shifting, `-` appends), or replace the whole document.
fn add_at(doc: &mut Value, tokens: &[String], value: Value, path: &str) -> SyncResult<()> {
    let Some((last, parents)) = tokens.split_last() else {
        *doc = value;
        return Ok(());
    };
    match descend(doc, parents, path)? {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(arr) => {
            let index = parse_index(last, arr.len(), true, path)?;
            arr.insert(index, value);
            Ok(())
        }
        _ => Err(SyncError::InvalidDelta(format!(
            "cannot add under primitive at {path}"
        ))),
    }
}

/// `replace`: set an existing location. Object keys are set leniently
/// (absent keys are created); array indices must exist.
fn replace_at(doc: &mut Value, tokens: &[String], value: Value, path: &str) -> SyncResult<()> {
    let Some((last, parents)) = tokens.split_last() else {
        *doc = value;
        return Ok(());
    };
    match descend(doc, parents, path)? {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(arr) => {
            let index = parse_index(last, arr.len(), false, path)?;
            arr[index] = value;
            Ok(())
        }
        _ => Err(SyncError::InvalidDelta(format!(
            "cannot replace under primitive at {path}"
        ))),
    }
}

/// `remove`: delete and return the value. Missing targets are an error.
fn remove_at(doc: &mut Value, tokens: &[String], path: &str) -> SyncResult<Value> {
    let Some((last, parents)) = tokens.split_last() else {
        return Err(SyncError::InvalidDelta(
            "cannot remove the whole document".to_string(),
        ));
    };
    match descend(doc, parents, path)? {
        Value::Object(map) => map.remove(last).ok_or_else(|| {
            SyncError::InvalidDelta(format!("no key {last:?} to remove at {path}"))
        }),
        Value::Array(arr) => {
            let index = parse_index(last, arr.len(), false, path)?;
            Ok(arr.remove(index))
        }
        _ => Err(SyncError::InvalidDelta(format!(
            "cannot remove under primitive at {path}"
        ))),
    }
}
