//! Conflict resolution for out-of-order action submission.
//!
//! An action can arrive referencing a `previous_state_version` that is no
//! longer current because other actions committed first. Resolution is a
//! simplified, domain-specific transform, not general OT: the stale action
//! folds through each concurrent action in commit order, under pairwise
//! rules keyed on the two kinds. The result always executes against the
//! *current* state - history is never replayed - and resolution never
//! fails: the worst outcome is a `pass_priority` no-op.

use tracing::debug;

use crate::actions::{ActionKind, GameStateAction};

/// Transform a stale action against the actions that committed before it.
///
/// Pure: the same inputs always produce the same output, and no state is
/// consulted.
#[must_use]
pub fn transform_action(
    stale: GameStateAction,
    concurrent: &[GameStateAction],
) -> GameStateAction {
    concurrent
        .iter()
        .fold(stale, |action, committed| transform_pair(action, committed))
}

/// Apply one pairwise rule. Unlisted pairs pass through unchanged.
fn transform_pair(stale: GameStateAction, concurrent: &GameStateAction) -> GameStateAction {
    match (&stale.kind, &concurrent.kind) {
        // First tap wins; the second becomes a no-op.
        (ActionKind::Tap { card_id }, ActionKind::Tap { card_id: other })
            if card_id == other =>
        {
            debug!(
                action_id = %stale.id,
                card_id = %card_id,
                "voiding stale tap: card already tapped concurrently"
            );
            stale.voided()
        }

        // An untap that committed first leaves the tap valid.
        (ActionKind::Tap { .. }, ActionKind::Untap { .. }) => stale,

        // Draws are independent, even for the same player.
        (ActionKind::Draw { .. }, ActionKind::Draw { .. }) => stale,

        // A card can only be moved once; the second move is voided.
        (
            ActionKind::MoveZone { card_id, .. },
            ActionKind::MoveZone { card_id: other, .. },
        ) if card_id == other => {
            debug!(
                action_id = %stale.id,
                card_id = %card_id,
                "voiding stale move: card already moved concurrently"
            );
            stale.voided()
        }

        // Life deltas accumulate commutatively.
        (
            ActionKind::ChangeLife { player_id, .. },
            ActionKind::ChangeLife { player_id: other, .. },
        ) if player_id == other => stale,

        // Counter additions accumulate commutatively.
        (
            ActionKind::AddCounter { card_id, .. },
            ActionKind::AddCounter { card_id: other, .. },
        ) if card_id == other => stale,

        _ => stale,
    }
}
