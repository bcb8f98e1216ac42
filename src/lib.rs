//! # card-sync
//!
//! A versioned game-state synchronization engine for turn-based card
//! games: an action-execution ledger with monotonic versioning, a
//! simplified operational-transform conflict resolver for out-of-order
//! submissions, and a JSON-Patch-style delta pipeline (diff, merge,
//! selective gzip) for transmitting state changes with minimal bandwidth.
//!
//! ## Design Principles
//!
//! 1. **Single Writer, Lock-Free Submission**: one `VersionLedger` per
//!    session serializes all mutation; the conflict resolver - not
//!    locking - makes out-of-order action submission safe.
//!
//! 2. **Persistent Data Structures**: card zones use `im` collections, so
//!    producing the next state version is a structural snapshot, not a
//!    serialize round-trip.
//!
//! 3. **Typed Actions**: every action kind carries its own payload shape;
//!    unknown kinds execute as deliberate no-ops instead of wedging the
//!    session.
//!
//! 4. **Injected Collaborators**: the transport and persistence layers
//!    arrive as `Broadcaster`/`PersistenceHook` implementations at
//!    construction. No global registries.
//!
//! ## Modules
//!
//! - `state`: the versioned `GameState` aggregate and validation
//! - `actions`: typed action log entries and the pure executor
//! - `sync`: version ledger, conflict resolver, session orchestration
//! - `delta`: structural diff/apply/merge of JSON-Patch-style deltas
//! - `compress`: gzip payloads and the compressed-delta envelope
//! - `message`: the `game_state_sync` wire message and collaborator traits
//! - `error`: `SyncError`/`SyncResult`

pub mod actions;
pub mod compress;
pub mod delta;
pub mod error;
pub mod message;
pub mod state;
pub mod sync;

// Re-export commonly used types
pub use crate::error::{SyncError, SyncResult};

pub use crate::state::{
    validate_action, validate_delta, validate_state, Battlefield, CardReference, CurrentTurn,
    GameState, Library, Permanent, PlayerState, StackItem, TurnPhase,
};

pub use crate::actions::{execute, ActionKind, GameStateAction, ZoneKind};

pub use crate::sync::{transform_action, LedgerConfig, SyncSession, VersionLedger};

pub use crate::delta::{
    apply_delta, create_delta, merge_deltas, should_use_delta, GameStateDelta, PatchOp,
    DELTA_SIZE_RATIO,
};

pub use crate::compress::{
    compress_data, compress_delta_if_needed, decompress_data, decompress_delta_if_needed,
    should_compress, COMPRESSED_SENTINEL_PATH, COMPRESSION_THRESHOLD, MIN_COMPRESSION_SAVINGS,
};

pub use crate::message::{
    create_compressed_sync_message, Broadcaster, PersistenceHook, SyncMessage, SyncType,
    GAME_STATE_SYNC,
};
