//! Versioned synchronization: the ledger, the conflict resolver, and the
//! per-session orchestrator.
//!
//! One `VersionLedger` serializes all mutation for one game session
//! (single writer). Out-of-order *submission* is made safe by the conflict
//! resolver, not by locking: a stale action is transformed against the
//! actions that beat it to the ledger, then executed against the current
//! state. Nothing here suspends; every call runs to completion.

pub mod ledger;
pub mod resolver;
pub mod session;

pub use ledger::{LedgerConfig, VersionLedger};
pub use resolver::transform_action;
pub use session::SyncSession;

/// Current time in Unix milliseconds.
pub(crate) fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
