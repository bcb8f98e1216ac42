//! Cross-module delta pipeline scenarios: diff state pairs produced by the
//! real executor, chain deltas, compress them, and carry them in sync
//! messages.

use card_sync::{
    apply_delta, compress_delta_if_needed, create_compressed_sync_message, create_delta,
    decompress_delta_if_needed, execute, merge_deltas, should_use_delta, ActionKind,
    CardReference, GameState, GameStateAction, PatchOp, Permanent, PlayerState, SyncError,
    SyncType, COMPRESSED_SENTINEL_PATH, DELTA_SIZE_RATIO,
};

fn two_player_state() -> GameState {
    GameState::new(
        vec![
            PlayerState::new("p1", "Alice", 20, 60),
            PlayerState::new("p2", "Bob", 20, 60),
        ],
        1_000,
    )
}

fn commit(state: &GameState, id: &str, kind: ActionKind) -> GameState {
    let action = GameStateAction::new(id, "p1", kind, 1_000, state.version);
    let mut next = execute(state, &action);
    next.version = state.version + 1;
    next.timestamp = state.timestamp + 1;
    next.last_modified_by = "p1".to_string();
    next
}

/// Diffing two executor-produced states and applying the delta lands on
/// the exact target state.
#[test]
fn test_diff_apply_over_executed_action() {
    let old = two_player_state();
    let new = commit(
        &old,
        "a1",
        ActionKind::ChangeLife {
            player_id: "p2".to_string(),
            delta: -3,
        },
    );

    let delta = create_delta(&old, &new).unwrap();
    assert_eq!(delta.base_version, 0);
    assert_eq!(delta.target_version, 1);

    // The applied state's timestamp comes from the delta itself.
    let mut patched = apply_delta(&old, &delta).unwrap();
    patched.timestamp = new.timestamp;
    assert_eq!(patched, new);
}

/// A chain of per-action deltas merges into one delta equivalent to
/// applying each in sequence.
#[test]
fn test_merge_chain_equals_sequential_apply() {
    let s0 = two_player_state();
    let s1 = commit(&s0, "a1", ActionKind::Draw { count: 2 });
    let s2 = commit(
        &s1,
        "a2",
        ActionKind::ChangeLife {
            player_id: "p2".to_string(),
            delta: -4,
        },
    );
    let s3 = commit(&s2, "a3", ActionKind::AdvancePhase);

    let deltas = vec![
        create_delta(&s0, &s1).unwrap(),
        create_delta(&s1, &s2).unwrap(),
        create_delta(&s2, &s3).unwrap(),
    ];

    let merged = merge_deltas(&deltas).unwrap().unwrap();
    assert_eq!(merged.base_version, 0);
    assert_eq!(merged.target_version, 3);

    let mut patched = apply_delta(&s0, &merged).unwrap();
    patched.timestamp = s3.timestamp;
    assert_eq!(patched, s3);
}

/// Non-sequential delta chains are rejected with both versions named.
#[test]
fn test_merge_rejects_gap() {
    let s0 = two_player_state();
    let s1 = commit(&s0, "a1", ActionKind::Draw { count: 1 });
    let s2 = commit(&s1, "a2", ActionKind::Draw { count: 1 });
    let s3 = commit(&s2, "a3", ActionKind::Draw { count: 1 });

    let d01 = create_delta(&s0, &s1).unwrap();
    let d23 = create_delta(&s2, &s3).unwrap();

    match merge_deltas(&[d01, d23]) {
        Err(SyncError::NonSequentialDeltas {
            previous_target,
            next_base,
        }) => {
            assert_eq!(previous_target, 1);
            assert_eq!(next_base, 2);
        }
        other => panic!("expected NonSequentialDeltas, got {other:?}"),
    }
}

/// A small change travels as a delta; applying to the wrong base version
/// is rejected.
#[test]
fn test_apply_rejects_wrong_base() {
    let s0 = two_player_state();
    let s1 = commit(&s0, "a1", ActionKind::Draw { count: 1 });
    let s2 = commit(&s1, "a2", ActionKind::Draw { count: 1 });

    let d12 = create_delta(&s1, &s2).unwrap();

    match apply_delta(&s0, &d12) {
        Err(SyncError::VersionMismatch { expected, actual }) => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 0);
        }
        other => panic!("expected VersionMismatch, got {other:?}"),
    }
}

/// A large delta compresses into the single-sentinel envelope and
/// decompresses back to the original operation list.
#[test]
fn test_large_delta_envelope_roundtrip() {
    let mut old = two_player_state();
    for i in 0..500 {
        old.battlefield.permanents.push_back(Permanent::enter(
            CardReference::new(format!("c{i}"), format!("Token Creature {i}")),
            "p1",
        ));
    }
    let mut new = old.clone();
    new.version = 1;
    for permanent in new.battlefield.permanents.iter_mut() {
        permanent.card.is_tapped = true;
    }

    // One isTapped replacement per permanent.
    let delta = create_delta(&old, &new).unwrap();
    assert!(delta.operations.len() >= 500);

    let compressed = compress_delta_if_needed(delta.clone()).unwrap();
    assert!(compressed.compressed);
    assert_eq!(compressed.operations.len(), 1);
    match &compressed.operations[0] {
        PatchOp::Replace { path, .. } => assert_eq!(path, COMPRESSED_SENTINEL_PATH),
        other => panic!("expected sentinel replace, got {other:?}"),
    }

    let restored = decompress_delta_if_needed(compressed).unwrap();
    assert!(!restored.compressed);
    assert_eq!(restored.operations, delta.operations);

    // And the restored delta still applies.
    let patched = apply_delta(&old, &restored).unwrap();
    assert!(patched
        .battlefield
        .permanents
        .iter()
        .all(|p| p.card.is_tapped));
}

/// Small deltas skip the envelope entirely.
#[test]
fn test_small_delta_stays_uncompressed() {
    let old = two_player_state();
    let new = commit(
        &old,
        "a1",
        ActionKind::ChangeLife {
            player_id: "p1".to_string(),
            delta: 1,
        },
    );

    let delta = create_delta(&old, &new).unwrap();
    let maybe = compress_delta_if_needed(delta.clone()).unwrap();
    assert!(!maybe.compressed);
    assert_eq!(maybe.operations, delta.operations);
}

/// The delta-vs-full heuristic prefers a one-op delta and a full state
/// when almost everything changed.
#[test]
fn test_delta_size_heuristic() {
    let mut board = two_player_state();
    for i in 0..20 {
        board.battlefield.permanents.push_back(Permanent::enter(
            CardReference::new(format!("c{i}"), format!("Creature {i}")),
            "p1",
        ));
    }
    let small = commit(
        &board,
        "a1",
        ActionKind::ChangeLife {
            player_id: "p1".to_string(),
            delta: -1,
        },
    );
    let small_delta = create_delta(&board, &small).unwrap();
    assert!(should_use_delta(&small, &small_delta, DELTA_SIZE_RATIO).unwrap());

    let old = two_player_state();
    let mut big = old.clone();
    big.version = 1;
    for player in &mut big.players {
        player.name = format!("renamed-{}", player.id);
        player.life_total = 1;
        player.library.count = 1;
    }
    big.turn_order.reverse();
    big.current_turn.player_id = "p2".to_string();
    let big_delta = create_delta(&old, &big).unwrap();
    // A delta touching most of a tiny state is not worth it at a strict
    // ratio.
    assert!(!should_use_delta(&big, &big_delta, 0.05).unwrap());
}

/// Delta messages round-trip through serde with the compact wire shape:
/// camelCase keys, type tag, and no `fullState` for delta syncs.
#[test]
fn test_sync_message_wire_shape() {
    let old = two_player_state();
    let new = commit(&old, "a1", ActionKind::Draw { count: 1 });
    let delta = create_delta(&old, &new).unwrap();

    let message = create_compressed_sync_message("s1", None, Some(&delta)).unwrap();
    assert_eq!(message.sync_type, SyncType::Delta);

    let wire = serde_json::to_value(&message).unwrap();
    assert_eq!(wire["type"], "game_state_sync");
    assert_eq!(wire["sessionId"], "s1");
    assert_eq!(wire["syncType"], "delta");
    assert!(wire.get("fullState").is_none() || wire["fullState"].is_null());
    assert_eq!(wire["delta"]["baseVersion"], 0);
    assert_eq!(wire["delta"]["targetVersion"], 1);

    let parsed: card_sync::SyncMessage = serde_json::from_value(wire).unwrap();
    assert_eq!(parsed, message);
}

/// Both payloads at once is ambiguous and refused.
#[test]
fn test_message_refuses_both_payloads() {
    let old = two_player_state();
    let new = commit(&old, "a1", ActionKind::Draw { count: 1 });
    let delta = create_delta(&old, &new).unwrap();

    assert!(matches!(
        create_compressed_sync_message("s1", Some(&new), Some(&delta)),
        Err(SyncError::AmbiguousSyncPayload)
    ));
    assert!(matches!(
        create_compressed_sync_message("s1", None, None),
        Err(SyncError::AmbiguousSyncPayload)
    ));
}

/// A big full-state message compresses its payload; the receiver side
/// recovers the exact state.
#[test]
fn test_full_state_message_compression_roundtrip() {
    let mut state = two_player_state();
    for i in 0..200 {
        state.battlefield.permanents.push_back(Permanent::enter(
            CardReference::new(format!("c{i}"), format!("Token Creature {i}")),
            "p1",
        ));
    }

    let message = create_compressed_sync_message("s1", Some(&state), None).unwrap();
    assert!(message.compressed);
    assert!(message.full_state.is_none());

    let payload = message.compressed_payload.as_deref().unwrap();
    let restored: GameState = card_sync::decompress_data(payload).unwrap();
    assert_eq!(restored, state);
}
