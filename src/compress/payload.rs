//! Gzip/base64 payload primitives and the size gate.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use crate::error::{SyncError, SyncResult};

/// Payloads below this serialized size are never compressed.
pub const COMPRESSION_THRESHOLD: usize = 1024;

/// Fixed gzip level. Level 6 is the speed/ratio sweet spot for the small
/// JSON payloads this engine moves.
const GZIP_LEVEL: u32 = 6;

/// Whether a value's serialized form is large enough to compress.
pub fn should_compress<T: Serialize>(value: &T) -> SyncResult<bool> {
    let size = serde_json::to_vec(value)?.len();
    Ok(size >= COMPRESSION_THRESHOLD)
}

/// Serialize a value, gzip it at the fixed level, and base64-encode it.
pub fn compress_data<T: Serialize>(value: &T) -> SyncResult<String> {
    let bytes = serde_json::to_vec(value)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(GZIP_LEVEL));
    encoder
        .write_all(&bytes)
        .map_err(|e| SyncError::Compression(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| SyncError::Compression(e.to_string()))?;
    trace!(
        raw = bytes.len(),
        compressed = compressed.len(),
        "gzipped payload"
    );
    Ok(STANDARD.encode(compressed))
}

/// Reverse [`compress_data`].
///
/// Any failure - bad base64, a broken gzip stream, or a payload that no
/// longer parses - is fatal.
pub fn decompress_data<T: DeserializeOwned>(encoded: &str) -> SyncResult<T> {
    let compressed = STANDARD
        .decode(encoded)
        .map_err(|e| SyncError::Decompression(format!("bad base64: {e}")))?;
    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| SyncError::Decompression(format!("bad gzip stream: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SyncError::Decompression(format!("corrupt payload: {e}")))
}
