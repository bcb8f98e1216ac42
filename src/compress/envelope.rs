//! The compressed-delta envelope.
//!
//! A compressed delta must still look like a delta to every schema-checking
//! hop between here and the client. The envelope trick: gzip the
//! `operations` array and carry it as the single operation
//! `{op: "replace", path: "/_compressed", value: <base64>}` with
//! `compressed: true`. `/_compressed` is a reserved sentinel path that no
//! real diff can produce (state fields never start with an underscore).

use serde_json::Value;
use tracing::trace;

use crate::delta::{GameStateDelta, PatchOp};
use crate::error::SyncResult;

use super::payload::{compress_data, decompress_data, should_compress};

/// Reserved path carrying the compressed operations payload.
pub const COMPRESSED_SENTINEL_PATH: &str = "/_compressed";

/// Compression must save at least this fraction of the raw size to be
/// worth the envelope.
pub const MIN_COMPRESSION_SAVINGS: f64 = 0.10;

/// Fold a delta's operations into the compressed envelope when it pays.
///
/// Already-compressed deltas and deltas below the size gate pass through
/// unchanged, as do deltas whose operations barely shrink (< 10% saved).
pub fn compress_delta_if_needed(delta: GameStateDelta) -> SyncResult<GameStateDelta> {
    if delta.compressed || !should_compress(&delta.operations)? {
        return Ok(delta);
    }

    let raw_size = serde_json::to_vec(&delta.operations)?.len();
    let encoded = compress_data(&delta.operations)?;
    let saved = 1.0 - (encoded.len() as f64) / (raw_size as f64);
    if saved < MIN_COMPRESSION_SAVINGS {
        trace!(raw = raw_size, encoded = encoded.len(), "compression not worth it");
        return Ok(delta);
    }

    trace!(
        raw = raw_size,
        encoded = encoded.len(),
        ops = delta.operations.len(),
        "folded delta operations into compressed envelope"
    );
    Ok(GameStateDelta {
        operations: vec![PatchOp::Replace {
            path: COMPRESSED_SENTINEL_PATH.to_string(),
            value: Value::String(encoded),
        }],
        compressed: true,
        ..delta
    })
}

/// Unfold the compressed envelope when the sentinel shape is present.
///
/// Deltas without the exact sentinel shape are returned unchanged; a
/// delta that *claims* to be compressed but does not carry a decodable
/// sentinel payload is an error.
pub fn decompress_delta_if_needed(delta: GameStateDelta) -> SyncResult<GameStateDelta> {
    if !delta.compressed {
        return Ok(delta);
    }

    let encoded = match delta.operations.as_slice() {
        [PatchOp::Replace {
            path,
            value: Value::String(encoded),
        }] if path == COMPRESSED_SENTINEL_PATH => encoded,
        _ => return Ok(delta),
    };

    let operations: Vec<PatchOp> = decompress_data(encoded)?;
    Ok(GameStateDelta {
        operations,
        compressed: false,
        ..delta
    })
}
