//! Payload compression for outbound sync traffic.
//!
//! - `payload`: the size gate plus gzip/base64 primitives
//! - `envelope`: the schema-preserving trick that folds a delta's
//!   operations into a single sentinel operation when compression pays
//!
//! Decompression failure is always an error. A corrupt payload must never
//! silently degrade into an empty or default state.

pub mod envelope;
pub mod payload;

pub use envelope::{
    compress_delta_if_needed, decompress_delta_if_needed, COMPRESSED_SENTINEL_PATH,
    MIN_COMPRESSION_SAVINGS,
};
pub use payload::{compress_data, decompress_data, should_compress, COMPRESSION_THRESHOLD};
