//! Collaborator traits for the out-of-scope layers.
//!
//! The engine never opens a socket or a database. The transport layer
//! implements `Broadcaster`; whatever persists sessions implements
//! `PersistenceHook`. Both are injected at session construction - there is
//! no global registry.

use crate::error::SyncResult;
use crate::state::GameState;

use super::builder::SyncMessage;

/// Fan-out to all clients in a session (the WebSocket/room layer).
pub trait Broadcaster {
    /// Deliver a message to every client of the session.
    fn broadcast(&self, session_id: &str, message: &SyncMessage) -> SyncResult<()>;
}

/// External snapshotting of committed states.
pub trait PersistenceHook {
    /// Snapshot a newly committed state.
    fn snapshot(&self, state: &GameState) -> SyncResult<()>;
}
