//! Action representation: a typed kind plus log metadata.
//!
//! On the wire an action is `{id, type, playerId, timestamp, payload,
//! previousStateVersion, resultingStateVersion}`. The `type`/`payload`
//! pair maps onto the adjacently-tagged [`ActionKind`] enum, so every
//! payload field is checked at deserialization time instead of being
//! fished out of a bag at execution time.

use serde::{Deserialize, Serialize};

use crate::state::StackItem;

/// The zones a card can move between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Battlefield,
    Hand,
    Graveyard,
    Exile,
}

/// The closed set of action kinds, with typed payloads.
///
/// `Unknown` catches any other wire tag; executing it leaves the state
/// unchanged. That leniency is deliberate: a client running a newer rule
/// adapter must not wedge the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ActionKind {
    /// Draw up to `count` cards from the library.
    Draw { count: u32 },

    /// Play a card from hand onto the battlefield.
    Play { card_id: String },

    /// Tap a battlefield permanent.
    Tap { card_id: String },

    /// Untap a battlefield permanent.
    Untap { card_id: String },

    /// Move a card between zones.
    MoveZone {
        card_id: String,
        from: ZoneKind,
        to: ZoneKind,
    },

    /// Add a signed delta to a player's life total.
    ChangeLife { player_id: String, delta: i32 },

    /// Add counters to a battlefield permanent.
    AddCounter {
        card_id: String,
        counter: String,
        count: u32,
    },

    /// Remove counters from a battlefield permanent (floored at 0).
    RemoveCounter {
        card_id: String,
        counter: String,
        count: u32,
    },

    /// Advance to the next turn phase.
    AdvancePhase,

    /// Push an item onto the stack.
    AddToStack { item: StackItem },

    /// Resolve the top item of the stack.
    ResolveStack,

    /// Concede the game.
    Concede,

    /// Explicit no-op. Also the target the conflict resolver voids stale
    /// actions into.
    PassPriority,

    /// Any unrecognized wire tag. Executes as a no-op.
    #[serde(other)]
    Unknown,
}

/// An immutable entry in the action log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateAction {
    /// Unique action ID, assigned by the submitting layer.
    pub id: String,

    /// What the action does. Serializes as `type` + `payload`.
    #[serde(flatten)]
    pub kind: ActionKind,

    /// The acting player.
    pub player_id: String,

    /// Client-side submission time (Unix millis).
    pub timestamp: i64,

    /// The state version the client built this action against.
    pub previous_state_version: u64,

    /// The version this action produced. Assigned by the ledger; 0 until
    /// committed.
    #[serde(default)]
    pub resulting_state_version: u64,
}

impl GameStateAction {
    /// Create an action as submitted by a client (not yet committed).
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        player_id: impl Into<String>,
        kind: ActionKind,
        timestamp: i64,
        previous_state_version: u64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            player_id: player_id.into(),
            timestamp,
            previous_state_version,
            resulting_state_version: 0,
        }
    }

    /// Void this action into a `pass_priority` no-op, keeping its log
    /// metadata. Used by the conflict resolver.
    #[must_use]
    pub fn voided(mut self) -> Self {
        self.kind = ActionKind::PassPriority;
        self
    }
}
