//! Actions: immutable log entries and their execution.
//!
//! - `action`: `GameStateAction` and the closed `ActionKind` set
//! - `executor`: pure `(state, action) -> state'` handlers
//!
//! Every action kind carries its own strongly-typed payload; there is no
//! loose payload bag. Kinds outside the closed set deserialize to
//! `ActionKind::Unknown` and execute as silent no-ops.

pub mod action;
pub mod executor;

pub use action::{ActionKind, GameStateAction, ZoneKind};
pub use executor::execute;
