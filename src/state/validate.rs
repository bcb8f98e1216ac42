//! Structural validation for states, actions, and deltas.
//!
//! Validation runs before any mutation: a ledger rejects an invalid state
//! at initialization, an invalid action before execution, and an invalid
//! delta before application.

use crate::actions::GameStateAction;
use crate::delta::GameStateDelta;
use crate::error::{SyncError, SyncResult};

use super::game::GameState;

/// Minimum number of players in a session.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players in a session.
pub const MAX_PLAYERS: usize = 10;

/// Validate the structural invariants of a game state.
pub fn validate_state(state: &GameState) -> SyncResult<()> {
    let player_count = state.players.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        return Err(SyncError::InvalidState(format!(
            "player count {player_count} outside {MIN_PLAYERS}..={MAX_PLAYERS}"
        )));
    }

    if state.turn_order.len() != player_count {
        return Err(SyncError::InvalidState(format!(
            "turn order has {} entries for {player_count} players",
            state.turn_order.len()
        )));
    }

    for (index, player) in state.players.iter().enumerate() {
        if player.id.is_empty() {
            return Err(SyncError::InvalidState(format!(
                "player at index {index} has an empty id"
            )));
        }
        if state.players[..index].iter().any(|p| p.id == player.id) {
            return Err(SyncError::InvalidState(format!(
                "duplicate player id {}",
                player.id
            )));
        }
    }

    for id in &state.turn_order {
        if state.player(id).is_none() {
            return Err(SyncError::InvalidState(format!(
                "turn order references unknown player {id}"
            )));
        }
    }

    if !state.turn_order.contains(&state.current_turn.player_id) {
        return Err(SyncError::InvalidState(format!(
            "current turn player {} is not in the turn order",
            state.current_turn.player_id
        )));
    }

    Ok(())
}

/// Validate the structural invariants of an incoming action.
pub fn validate_action(action: &GameStateAction) -> SyncResult<()> {
    if action.id.is_empty() {
        return Err(SyncError::InvalidAction("empty action id".to_string()));
    }
    if action.player_id.is_empty() {
        return Err(SyncError::InvalidAction(format!(
            "action {} has an empty player id",
            action.id
        )));
    }
    if action.timestamp <= 0 {
        return Err(SyncError::InvalidAction(format!(
            "action {} has a non-positive timestamp",
            action.id
        )));
    }
    Ok(())
}

/// Validate the structural invariants of a delta.
pub fn validate_delta(delta: &GameStateDelta) -> SyncResult<()> {
    if delta.target_version <= delta.base_version {
        return Err(SyncError::InvalidDelta(format!(
            "target version {} does not advance base version {}",
            delta.target_version, delta.base_version
        )));
    }
    if delta.timestamp <= 0 {
        return Err(SyncError::InvalidDelta(
            "non-positive timestamp".to_string(),
        ));
    }
    for op in &delta.operations {
        let path = op.path();
        if !path.is_empty() && !path.starts_with('/') {
            return Err(SyncError::InvalidDelta(format!(
                "operation path {path:?} is not slash-delimited"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;
    use crate::delta::PatchOp;
    use crate::state::PlayerState;

    fn valid_state() -> GameState {
        GameState::new(
            vec![
                PlayerState::new("p1", "Alice", 20, 60),
                PlayerState::new("p2", "Bob", 20, 60),
            ],
            1_000,
        )
    }

    #[test]
    fn test_valid_state_passes() {
        assert!(validate_state(&valid_state()).is_ok());
    }

    #[test]
    fn test_too_few_players() {
        let mut state = valid_state();
        state.players.truncate(1);
        state.turn_order.truncate(1);

        assert!(matches!(
            validate_state(&state),
            Err(SyncError::InvalidState(_))
        ));
    }

    #[test]
    fn test_too_many_players() {
        let mut state = valid_state();
        for i in 2..11 {
            let id = format!("p{}", i + 1);
            state.players.push(PlayerState::new(&id, "X", 20, 60));
            state.turn_order.push(id);
        }

        assert_eq!(state.players.len(), 11);
        assert!(validate_state(&state).is_err());
    }

    #[test]
    fn test_turn_order_length_mismatch() {
        let mut state = valid_state();
        state.turn_order.push("p3".to_string());

        assert!(validate_state(&state).is_err());
    }

    #[test]
    fn test_duplicate_player_id() {
        let mut state = valid_state();
        state.players[1].id = "p1".to_string();
        state.turn_order[1] = "p1".to_string();

        assert!(validate_state(&state).is_err());
    }

    #[test]
    fn test_current_turn_player_unknown() {
        let mut state = valid_state();
        state.current_turn.player_id = "p9".to_string();

        assert!(validate_state(&state).is_err());
    }

    #[test]
    fn test_action_validation() {
        let mut action = GameStateAction::new("a1", "p1", ActionKind::PassPriority, 1_000, 0);
        assert!(validate_action(&action).is_ok());

        action.id.clear();
        assert!(validate_action(&action).is_err());

        let action = GameStateAction::new("a1", "", ActionKind::PassPriority, 1_000, 0);
        assert!(validate_action(&action).is_err());

        let action = GameStateAction::new("a1", "p1", ActionKind::PassPriority, 0, 0);
        assert!(validate_action(&action).is_err());
    }

    #[test]
    fn test_delta_validation() {
        let mut delta = GameStateDelta {
            base_version: 3,
            target_version: 4,
            operations: vec![PatchOp::Remove {
                path: "/stack/0".to_string(),
            }],
            timestamp: 1_000,
            checksum: None,
            compressed: false,
        };
        assert!(validate_delta(&delta).is_ok());

        delta.target_version = 3;
        assert!(validate_delta(&delta).is_err());

        delta.target_version = 4;
        delta.timestamp = 0;
        assert!(validate_delta(&delta).is_err());

        delta.timestamp = 1_000;
        delta.operations = vec![PatchOp::Remove {
            path: "stack/0".to_string(),
        }];
        assert!(validate_delta(&delta).is_err());
    }
}
