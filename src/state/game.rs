//! The versioned `GameState` aggregate and the turn phase cycle.
//!
//! ## Versioning
//!
//! `version` increases by exactly 1 per committed action and is only ever
//! assigned by the version ledger. A `GameState` is never mutated in place
//! from a caller's perspective: the executor produces a new value, and the
//! `im` zone collections make that a structural snapshot rather than a deep
//! copy.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::{Permanent, StackItem};
use super::player::PlayerState;

/// The twelve turn phases, in cycle order.
///
/// Wrapping past `Cleanup` passes the turn to the next player in turn
/// order and increments the turn number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Untap,
    Upkeep,
    Draw,
    Main1,
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,
    EndCombat,
    Main2,
    End,
    Cleanup,
}

impl TurnPhase {
    /// The full phase sequence for one turn.
    pub const SEQUENCE: [TurnPhase; 12] = [
        TurnPhase::Untap,
        TurnPhase::Upkeep,
        TurnPhase::Draw,
        TurnPhase::Main1,
        TurnPhase::BeginCombat,
        TurnPhase::DeclareAttackers,
        TurnPhase::DeclareBlockers,
        TurnPhase::CombatDamage,
        TurnPhase::EndCombat,
        TurnPhase::Main2,
        TurnPhase::End,
        TurnPhase::Cleanup,
    ];

    /// The phase after this one, or `None` when the turn is over.
    #[must_use]
    pub fn next(self) -> Option<TurnPhase> {
        let index = Self::SEQUENCE.iter().position(|p| *p == self)?;
        Self::SEQUENCE.get(index + 1).copied()
    }
}

/// Whose turn it is and where in the turn we are.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTurn {
    /// The active player. Must be in the turn order.
    pub player_id: String,

    /// Current phase.
    pub phase: TurnPhase,

    /// Turn number (starts at 1).
    pub turn_number: u32,
}

/// The shared battlefield.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battlefield {
    /// Permanents in play, in entry order.
    #[serde(default)]
    pub permanents: Vector<Permanent>,
}

/// The versioned shared state of one game session.
///
/// ## Invariants
///
/// - `2 <= players.len() <= 10`
/// - `turn_order.len() == players.len()`, every entry a player ID
/// - `current_turn.player_id` is in `turn_order`
/// - `version` strictly increases by 1 per committed action
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Monotonic state version.
    pub version: u64,

    /// When this version was committed (Unix millis).
    pub timestamp: i64,

    /// The player whose action produced this version.
    #[serde(default)]
    pub last_modified_by: String,

    /// All players in the game.
    pub players: Vec<PlayerState>,

    /// Turn order as a list of player IDs.
    pub turn_order: Vec<String>,

    /// Whose turn it is.
    pub current_turn: CurrentTurn,

    /// The spell/ability stack. LIFO: the top of the stack is the back.
    #[serde(default)]
    pub stack: Vector<StackItem>,

    /// The shared battlefield.
    #[serde(default)]
    pub battlefield: Battlefield,

    /// The winner, once the game is decided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,

    /// How the game was won.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_condition: Option<String>,
}

impl GameState {
    /// Create a version-0 state for the given players.
    ///
    /// Turn order follows the player list; the first player starts at
    /// `Untap` of turn 1. The result still needs to pass
    /// [`validate_state`](super::validate::validate_state) before a ledger
    /// accepts it.
    #[must_use]
    pub fn new(players: Vec<PlayerState>, timestamp: i64) -> Self {
        let turn_order: Vec<String> = players.iter().map(|p| p.id.clone()).collect();
        let first = turn_order.first().cloned().unwrap_or_default();
        Self {
            version: 0,
            timestamp,
            last_modified_by: String::new(),
            players,
            turn_order,
            current_turn: CurrentTurn {
                player_id: first,
                phase: TurnPhase::Untap,
                turn_number: 1,
            },
            stack: Vector::new(),
            battlefield: Battlefield::default(),
            winner_id: None,
            win_condition: None,
        }
    }

    /// Look up a player by ID.
    #[must_use]
    pub fn player(&self, player_id: &str) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Look up a player by ID, mutably.
    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Look up a battlefield permanent by card ID, mutably.
    pub fn permanent_mut(&mut self, card_id: &str) -> Option<&mut Permanent> {
        self.battlefield
            .permanents
            .iter_mut()
            .find(|p| p.card.id == card_id)
    }

    /// Remove a permanent from the battlefield by card ID.
    pub fn remove_permanent(&mut self, card_id: &str) -> Option<Permanent> {
        let pos = self
            .battlefield
            .permanents
            .iter()
            .position(|p| p.card.id == card_id)?;
        Some(self.battlefield.permanents.remove(pos))
    }

    /// Players still in the game.
    pub fn remaining_players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.iter().filter(|p| !p.has_lost)
    }

    /// Advance to the next phase, wrapping into the next player's turn
    /// after `Cleanup`.
    pub fn advance_phase(&mut self) {
        match self.current_turn.phase.next() {
            Some(phase) => self.current_turn.phase = phase,
            None => {
                let next_player = self
                    .turn_order
                    .iter()
                    .position(|id| *id == self.current_turn.player_id)
                    .map(|i| (i + 1) % self.turn_order.len())
                    .and_then(|i| self.turn_order.get(i))
                    .cloned();
                if let Some(player_id) = next_player {
                    self.current_turn.player_id = player_id;
                }
                self.current_turn.phase = TurnPhase::Untap;
                self.current_turn.turn_number += 1;
            }
        }
    }
}
