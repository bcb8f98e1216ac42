//! Pure action execution.
//!
//! `execute` never mutates its input: it snapshots the state (cheap, the
//! zones are persistent structures) and applies one action's semantics to
//! the copy. Versioning, timestamps, and logging belong to the ledger, not
//! here.
//!
//! Handlers do not second-guess legality. A tap on an already-tapped
//! permanent taps it again; a play of a card not in hand is a no-op. The
//! rule adapter that submitted the action owns validity pre-checks.

use tracing::warn;

use crate::state::{CardReference, GameState, Permanent};

use super::action::{ActionKind, GameStateAction, ZoneKind};

/// Reason recorded when a life total reaches zero.
pub const LOSS_LIFE: &str = "life total reached 0";

/// Reason recorded on concession.
pub const LOSS_CONCEDED: &str = "conceded";

/// Win condition recorded when all opponents have conceded or lost.
pub const WIN_OPPONENTS_CONCEDED: &str = "opponents conceded";

/// Apply one action to a state, producing the next state.
///
/// The caller-visible input is never modified. The result has the same
/// version as the input; the ledger assigns the committed version.
#[must_use]
pub fn execute(state: &GameState, action: &GameStateAction) -> GameState {
    let mut next = state.clone();
    match &action.kind {
        ActionKind::Draw { count } => apply_draw(&mut next, action, *count),
        ActionKind::Play { card_id } => apply_play(&mut next, &action.player_id, card_id),
        ActionKind::Tap { card_id } => apply_tapped(&mut next, card_id, true),
        ActionKind::Untap { card_id } => apply_tapped(&mut next, card_id, false),
        ActionKind::MoveZone { card_id, from, to } => {
            apply_move_zone(&mut next, &action.player_id, card_id, *from, *to);
        }
        ActionKind::ChangeLife { player_id, delta } => {
            apply_change_life(&mut next, player_id, *delta);
        }
        ActionKind::AddCounter {
            card_id,
            counter,
            count,
        } => apply_add_counter(&mut next, card_id, counter, *count),
        ActionKind::RemoveCounter {
            card_id,
            counter,
            count,
        } => apply_remove_counter(&mut next, card_id, counter, *count),
        ActionKind::AdvancePhase => next.advance_phase(),
        ActionKind::AddToStack { item } => next.stack.push_back(item.clone()),
        ActionKind::ResolveStack => {
            next.stack.pop_back();
        }
        ActionKind::Concede => apply_concede(&mut next, &action.player_id),
        ActionKind::PassPriority => {}
        ActionKind::Unknown => {
            warn!(action_id = %action.id, "ignoring action of unknown kind");
        }
    }
    next
}

/// Move up to `count` cards from the library to the hand.
///
/// The library is count-only, so drawn cards surface as opaque
/// placeholders; the rule adapter reveals their identity out of band.
fn apply_draw(state: &mut GameState, action: &GameStateAction, count: u32) {
    let Some(player) = state.player_mut(&action.player_id) else {
        return;
    };
    let drawn = count.min(player.library.count);
    for n in 0..drawn {
        player
            .hand
            .push_back(CardReference::new(format!("{}-{n}", action.id), ""));
    }
    player.library.count -= drawn;
}

/// Move a card from hand onto the battlefield, untapped, with
/// `controller == owner == actor`.
fn apply_play(state: &mut GameState, player_id: &str, card_id: &str) {
    let Some(card) = state
        .player_mut(player_id)
        .and_then(|p| p.take_from_hand(card_id))
    else {
        return;
    };
    state
        .battlefield
        .permanents
        .push_back(Permanent::enter(card, player_id));
}

fn apply_tapped(state: &mut GameState, card_id: &str, tapped: bool) {
    if let Some(permanent) = state.permanent_mut(card_id) {
        permanent.card.is_tapped = tapped;
    }
}

/// Relocate a card among battlefield, hand, graveyard, and exile.
///
/// Battlefield cards can be taken regardless of controller; the private
/// zones searched are the actor's own.
fn apply_move_zone(
    state: &mut GameState,
    player_id: &str,
    card_id: &str,
    from: ZoneKind,
    to: ZoneKind,
) {
    let card = match from {
        ZoneKind::Battlefield => state.remove_permanent(card_id).map(|p| p.card),
        ZoneKind::Hand => state
            .player_mut(player_id)
            .and_then(|p| p.take_from_hand(card_id)),
        ZoneKind::Graveyard => state.player_mut(player_id).and_then(|p| {
            let pos = p.graveyard.iter().position(|c| c.id == card_id)?;
            Some(p.graveyard.remove(pos))
        }),
        ZoneKind::Exile => state.player_mut(player_id).and_then(|p| {
            let pos = p.exile.iter().position(|c| c.id == card_id)?;
            Some(p.exile.remove(pos))
        }),
    };
    let Some(card) = card else {
        return;
    };

    match to {
        ZoneKind::Battlefield => state
            .battlefield
            .permanents
            .push_back(Permanent::enter(card, player_id)),
        ZoneKind::Hand => {
            if let Some(p) = state.player_mut(player_id) {
                p.hand.push_back(card);
            }
        }
        ZoneKind::Graveyard => {
            if let Some(p) = state.player_mut(player_id) {
                p.graveyard.push_back(card);
            }
        }
        ZoneKind::Exile => {
            if let Some(p) = state.player_mut(player_id) {
                p.exile.push_back(card);
            }
        }
    }
}

/// Add a signed delta to a player's life total, evaluating loss at `<= 0`.
fn apply_change_life(state: &mut GameState, player_id: &str, delta: i32) {
    let Some(player) = state.player_mut(player_id) else {
        return;
    };
    player.life_total += delta;
    if player.life_total <= 0 && !player.has_lost {
        player.lose(LOSS_LIFE);
    }
}

fn apply_add_counter(state: &mut GameState, card_id: &str, counter: &str, count: u32) {
    if let Some(permanent) = state.permanent_mut(card_id) {
        *permanent.card.counters.entry(counter.to_string()).or_insert(0) += count;
    }
}

/// Remove counters, floored at 0. A counter type that reaches 0 is dropped
/// from the map.
fn apply_remove_counter(state: &mut GameState, card_id: &str, counter: &str, count: u32) {
    let Some(permanent) = state.permanent_mut(card_id) else {
        return;
    };
    if let Some(current) = permanent.card.counters.get_mut(counter) {
        *current = current.saturating_sub(count);
        if *current == 0 {
            permanent.card.counters.remove(counter);
        }
    }
}

/// Concede: the actor loses, and if exactly one player remains standing,
/// they win.
fn apply_concede(state: &mut GameState, player_id: &str) {
    if let Some(player) = state.player_mut(player_id) {
        if !player.has_lost {
            player.lose(LOSS_CONCEDED);
        }
    }

    let mut remaining = state.remaining_players();
    let sole_survivor = match (remaining.next(), remaining.next()) {
        (Some(winner), None) => Some(winner.id.clone()),
        _ => None,
    };
    drop(remaining);
    if let Some(winner_id) = sole_survivor {
        state.winner_id = Some(winner_id);
        state.win_condition = Some(WIN_OPPONENTS_CONCEDED.to_string());
    }
}
