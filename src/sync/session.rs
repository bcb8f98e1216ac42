//! Per-session orchestration: action in, sync message out.
//!
//! `SyncSession` wires the whole pipeline together: submit an action, the
//! ledger commits it, the new version is diffed against the previous one,
//! the cheaper of delta and full state is chosen, compressed where it
//! pays, and the resulting message goes to the injected broadcaster (and
//! the state to the persistence hook, when one is attached).

use tracing::debug;

use crate::actions::GameStateAction;
use crate::delta::{create_delta, should_use_delta, DELTA_SIZE_RATIO};
use crate::error::SyncResult;
use crate::message::{create_compressed_sync_message, Broadcaster, PersistenceHook, SyncMessage};
use crate::state::GameState;

use super::ledger::{LedgerConfig, VersionLedger};

/// One synchronized game session.
pub struct SyncSession<B: Broadcaster> {
    session_id: String,
    ledger: VersionLedger,
    broadcaster: B,
    persistence: Option<Box<dyn PersistenceHook>>,
}

impl<B: Broadcaster> SyncSession<B> {
    /// Create a session around a validated initial state.
    pub fn new(
        session_id: impl Into<String>,
        initial_state: GameState,
        config: LedgerConfig,
        broadcaster: B,
    ) -> SyncResult<Self> {
        Ok(Self {
            session_id: session_id.into(),
            ledger: VersionLedger::initialize(initial_state, config)?,
            broadcaster,
            persistence: None,
        })
    }

    /// Attach a persistence hook that snapshots every committed state.
    #[must_use]
    pub fn with_persistence(mut self, hook: Box<dyn PersistenceHook>) -> Self {
        self.persistence = Some(hook);
        self
    }

    /// The session ID.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Read access to the ledger.
    #[must_use]
    pub fn ledger(&self) -> &VersionLedger {
        &self.ledger
    }

    /// Mutable access to the ledger (undo/redo cursor movement).
    pub fn ledger_mut(&mut self) -> &mut VersionLedger {
        &mut self.ledger
    }

    /// Commit an action and broadcast the resulting sync message.
    ///
    /// The message carries a delta when the delta is small relative to
    /// the full state, and the full state otherwise. The message is also
    /// returned for callers that deliver it out of band.
    pub fn submit_action(&mut self, action: GameStateAction) -> SyncResult<SyncMessage> {
        let previous = self.ledger.current().clone();
        let next = self.ledger.apply_action(action)?.clone();

        let delta = create_delta(&previous, &next)?;
        let use_delta = should_use_delta(&next, &delta, DELTA_SIZE_RATIO)?;
        debug!(
            version = next.version,
            ops = delta.operations.len(),
            use_delta,
            "built sync payload"
        );

        let message = if use_delta {
            create_compressed_sync_message(&self.session_id, None, Some(&delta))?
        } else {
            create_compressed_sync_message(&self.session_id, Some(&next), None)?
        };

        if let Some(hook) = &self.persistence {
            hook.snapshot(&next)?;
        }
        self.broadcaster.broadcast(&self.session_id, &message)?;
        Ok(message)
    }

    /// Build and broadcast a full-state message (late joiners, resync).
    pub fn full_sync(&self) -> SyncResult<SyncMessage> {
        let message =
            create_compressed_sync_message(&self.session_id, Some(self.ledger.current()), None)?;
        self.broadcaster.broadcast(&self.session_id, &message)?;
        Ok(message)
    }
}
