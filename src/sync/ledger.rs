//! The version ledger: the single writer for one game session.
//!
//! Owns the authoritative current state, a bounded history of prior
//! versions, and the action log. Every committed action advances the
//! version by exactly 1. Undo and redo are exact lookups in the retained
//! history - an evicted version is gone and is never reconstructed by
//! replaying the log.

use std::collections::BTreeMap;

use tracing::debug;

use crate::actions::{execute, GameStateAction};
use crate::error::SyncResult;
use crate::state::{validate_action, validate_state, GameState};

use super::now_ms;
use super::resolver::transform_action;

/// Ledger tuning.
#[derive(Clone, Copy, Debug)]
pub struct LedgerConfig {
    /// Number of state versions retained for undo and conflict windows.
    pub max_history_size: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_history_size: 50,
        }
    }
}

/// Authoritative versioned state for one session.
pub struct VersionLedger {
    current: GameState,
    history: BTreeMap<u64, GameState>,
    log: Vec<GameStateAction>,
    /// Undo/redo position. Reset to the head on every commit.
    cursor: u64,
    config: LedgerConfig,
}

impl VersionLedger {
    /// Validate a state and seed the ledger with it.
    pub fn initialize(state: GameState, config: LedgerConfig) -> SyncResult<Self> {
        validate_state(&state)?;
        let version = state.version;
        let mut history = BTreeMap::new();
        history.insert(version, state.clone());
        Ok(Self {
            current: state,
            history,
            log: Vec::new(),
            cursor: version,
            config,
        })
    }

    /// The authoritative current state.
    #[must_use]
    pub fn current(&self) -> &GameState {
        &self.current
    }

    /// The current version.
    #[must_use]
    pub fn current_version(&self) -> u64 {
        self.current.version
    }

    /// Number of retained versions.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Commit an action, producing the next version.
    ///
    /// A stale action (one whose `previous_state_version` is behind the
    /// head) is first transformed against the actions that committed in
    /// between, then executed against the current state like any other.
    /// Validation failures return before any mutation.
    pub fn apply_action(&mut self, action: GameStateAction) -> SyncResult<&GameState> {
        validate_action(&action)?;

        let current_version = self.current.version;
        let action = if action.previous_state_version == current_version {
            action
        } else {
            debug!(
                action_id = %action.id,
                submitted_against = action.previous_state_version,
                head = current_version,
                "resolving stale action"
            );
            let concurrent: Vec<GameStateAction> = self
                .actions_since(action.previous_state_version)
                .into_iter()
                .cloned()
                .collect();
            transform_action(action, &concurrent)
        };

        let mut next = execute(&self.current, &action);
        let new_version = current_version + 1;
        next.version = new_version;
        next.timestamp = now_ms();
        next.last_modified_by = action.player_id.clone();

        let mut logged = action;
        logged.resulting_state_version = new_version;

        debug!(
            action_id = %logged.id,
            version = new_version,
            "committed action"
        );
        self.history.insert(new_version, next.clone());
        self.log.push(logged);
        self.current = next;
        self.cursor = new_version;
        self.trim_history();

        Ok(&self.current)
    }

    /// All logged actions built against `version` or later.
    #[must_use]
    pub fn actions_since(&self, version: u64) -> Vec<&GameStateAction> {
        self.log
            .iter()
            .filter(|a| a.previous_state_version >= version)
            .collect()
    }

    /// Step the cursor back `steps` versions and return that state.
    ///
    /// `None` if the target version was evicted or never existed; the
    /// cursor only moves on success. The head state is untouched - undo
    /// is a lookup, not a rollback.
    pub fn undo(&mut self, steps: u64) -> Option<GameState> {
        let target = self.cursor.checked_sub(steps)?;
        let state = self.history.get(&target)?.clone();
        self.cursor = target;
        Some(state)
    }

    /// Step the cursor forward `steps` versions and return that state.
    pub fn redo(&mut self, steps: u64) -> Option<GameState> {
        let target = self.cursor.checked_add(steps)?;
        let state = self.history.get(&target)?.clone();
        self.cursor = target;
        Some(state)
    }

    /// FIFO eviction down to the configured bound, pruning log entries
    /// that produced evicted versions in the same pass.
    fn trim_history(&mut self) {
        if self.history.len() <= self.config.max_history_size {
            return;
        }
        while self.history.len() > self.config.max_history_size {
            if let Some((evicted, _)) = self.history.pop_first() {
                debug!(version = evicted, "evicted state version from history");
            }
        }
        if let Some((&oldest, _)) = self.history.first_key_value() {
            self.log.retain(|a| a.resulting_state_version >= oldest);
            if self.cursor < oldest {
                self.cursor = oldest;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;
    use crate::state::PlayerState;

    fn start_state() -> GameState {
        GameState::new(
            vec![
                PlayerState::new("p1", "Alice", 20, 60),
                PlayerState::new("p2", "Bob", 20, 60),
            ],
            1_000,
        )
    }

    fn ledger() -> VersionLedger {
        VersionLedger::initialize(start_state(), LedgerConfig::default()).unwrap()
    }

    fn draw(id: &str, previous: u64) -> GameStateAction {
        GameStateAction::new(id, "p1", ActionKind::Draw { count: 1 }, 1_000, previous)
    }

    #[test]
    fn test_initialize_validates() {
        let mut bad = start_state();
        bad.players.truncate(1);
        bad.turn_order.truncate(1);

        assert!(VersionLedger::initialize(bad, LedgerConfig::default()).is_err());
        assert!(VersionLedger::initialize(start_state(), LedgerConfig::default()).is_ok());
    }

    #[test]
    fn test_versions_increase_by_one() {
        let mut ledger = ledger();

        for i in 0..3 {
            let committed = ledger.apply_action(draw(&format!("a{i}"), i)).unwrap();
            assert_eq!(committed.version, i + 1);
        }
        assert_eq!(ledger.current_version(), 3);
    }

    #[test]
    fn test_commit_stamps_metadata() {
        let mut ledger = ledger();
        let committed = ledger.apply_action(draw("a1", 0)).unwrap();

        assert_eq!(committed.last_modified_by, "p1");
        assert!(committed.timestamp >= 1_000);
    }

    #[test]
    fn test_invalid_action_rejected_before_mutation() {
        let mut ledger = ledger();
        let mut action = draw("a1", 0);
        action.player_id.clear();

        assert!(ledger.apply_action(action).is_err());
        assert_eq!(ledger.current_version(), 0);
        assert!(ledger.actions_since(0).is_empty());
    }

    #[test]
    fn test_stale_action_resolves_against_log() {
        let mut ledger = ledger();
        let tap = |id: &str, prev: u64| {
            GameStateAction::new(
                id,
                "p1",
                ActionKind::Tap {
                    card_id: "c1".to_string(),
                },
                1_000,
                prev,
            )
        };

        ledger.apply_action(tap("a1", 0)).unwrap();
        // Same tap, also built against version 0: voided to pass_priority
        // but still committed as version 2.
        ledger.apply_action(tap("a2", 0)).unwrap();

        assert_eq!(ledger.current_version(), 2);
        let logged = ledger.actions_since(0);
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[1].kind, ActionKind::PassPriority);
        assert_eq!(logged[1].resulting_state_version, 2);
        // The log keeps the version the client built against.
        assert_eq!(logged[1].previous_state_version, 0);
    }

    #[test]
    fn test_actions_since_filters_by_previous_version() {
        let mut ledger = ledger();
        for i in 0..4 {
            ledger.apply_action(draw(&format!("a{i}"), i)).unwrap();
        }

        assert_eq!(ledger.actions_since(0).len(), 4);
        assert_eq!(ledger.actions_since(2).len(), 2);
        assert_eq!(ledger.actions_since(4).len(), 0);
    }

    #[test]
    fn test_undo_redo() {
        let mut ledger = ledger();
        for i in 0..3 {
            ledger.apply_action(draw(&format!("a{i}"), i)).unwrap();
        }

        // Back to just after the first draw.
        let undone = ledger.undo(2).unwrap();
        assert_eq!(undone.version, 1);
        assert_eq!(undone.player("p1").unwrap().hand.len(), 1);

        // Forward to the third draw.
        let redone = ledger.redo(2).unwrap();
        assert_eq!(redone.version, 3);
        assert_eq!(redone.player("p1").unwrap().hand.len(), 3);

        // The head never moved.
        assert_eq!(ledger.current_version(), 3);
    }

    #[test]
    fn test_undo_past_history_is_none() {
        let mut ledger = ledger();
        ledger.apply_action(draw("a1", 0)).unwrap();

        assert!(ledger.undo(5).is_none());
        assert!(ledger.redo(1).is_none());
        // Failed moves leave the cursor where it was.
        assert_eq!(ledger.undo(1).unwrap().version, 0);
    }

    #[test]
    fn test_history_eviction_fifo() {
        let config = LedgerConfig {
            max_history_size: 3,
        };
        let mut ledger = VersionLedger::initialize(start_state(), config).unwrap();

        for i in 0..5 {
            ledger.apply_action(draw(&format!("a{i}"), i)).unwrap();
        }

        // Versions 3, 4, 5 retained; 0-2 evicted.
        assert_eq!(ledger.history_len(), 3);
        assert!(ledger.undo(3).is_none());
        assert_eq!(ledger.undo(2).unwrap().version, 3);
    }

    #[test]
    fn test_log_pruned_with_history() {
        let config = LedgerConfig {
            max_history_size: 2,
        };
        let mut ledger = VersionLedger::initialize(start_state(), config).unwrap();

        for i in 0..5 {
            ledger.apply_action(draw(&format!("a{i}"), i)).unwrap();
        }

        // Only actions producing the retained versions (4, 5) remain.
        let remaining = ledger.actions_since(0);
        assert_eq!(remaining.len(), 2);
        assert!(remaining
            .iter()
            .all(|a| a.resulting_state_version >= 4));
    }

    #[test]
    fn test_unknown_action_commits_a_version() {
        let mut ledger = ledger();
        let action = GameStateAction::new("a1", "p1", ActionKind::Unknown, 1_000, 0);

        let committed = ledger.apply_action(action).unwrap();
        assert_eq!(committed.version, 1);
        assert_eq!(committed.players, start_state().players);
    }
}
