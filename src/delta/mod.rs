//! Structural deltas between adjacent state versions.
//!
//! A delta is an ordered list of JSON-Patch-style operations transforming
//! the state at `base_version` into the state at `target_version`.
//!
//! - `op`: the operation set, `GameStateDelta`, merging, and the
//!   delta-vs-full-state size decision
//! - `diff`: recursive structural diffing (emits only add/remove/replace)
//! - `apply`: strict application with generic path primitives (accepts the
//!   full six-op set, so hand-authored deltas using move/copy/test keep
//!   working)
//!
//! The array-diff length heuristic and removal ordering are performance
//! choices, not contract: only the state produced by `apply_delta` is
//! guaranteed, never the exact operation list.

pub mod apply;
pub mod diff;
pub mod op;

pub use apply::apply_delta;
pub use diff::create_delta;
pub use op::{merge_deltas, should_use_delta, GameStateDelta, PatchOp, DELTA_SIZE_RATIO};
