//! Card references, battlefield permanents, and stack items.
//!
//! A `CardReference` identifies a card in a public zone (hand, graveyard,
//! exile). A `Permanent` is a card in shared play on the battlefield and
//! additionally tracks who owns it and who controls it. A `StackItem` is a
//! pending spell or ability waiting to resolve.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A card in a public zone.
///
/// Counters are kept as a name → count map; a counter type that drops to
/// zero is removed from the map entirely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReference {
    /// Unique card instance ID.
    pub id: String,

    /// Card name (may be empty for face-down or unrevealed cards).
    #[serde(default)]
    pub name: String,

    /// Whether the card is tapped.
    #[serde(default)]
    pub is_tapped: bool,

    /// Counters on this card, by counter type.
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub counters: FxHashMap<String, u32>,

    /// IDs of cards attached to this one (auras, equipment).
    /// Most cards have 0-2 attachments.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub attachments: SmallVec<[String; 2]>,

    /// Game-specific metadata, opaque to the engine.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl CardReference {
    /// Create a card reference with the given ID and name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_tapped: false,
            counters: FxHashMap::default(),
            attachments: SmallVec::new(),
            metadata: serde_json::Map::new(),
        }
    }
}

/// A card in shared play on the battlefield.
///
/// Ownership is fixed for the life of the permanent; control can change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permanent {
    /// The underlying card.
    #[serde(flatten)]
    pub card: CardReference,

    /// The player who owns the card.
    pub owner_id: String,

    /// The player who currently controls the permanent.
    pub controller_id: String,
}

impl Permanent {
    /// Put a card onto the battlefield under the given player's control.
    ///
    /// The card enters untapped with `owner == controller`.
    #[must_use]
    pub fn enter(mut card: CardReference, player_id: impl Into<String>) -> Self {
        let player_id = player_id.into();
        card.is_tapped = false;
        Self {
            card,
            owner_id: player_id.clone(),
            controller_id: player_id,
        }
    }
}

/// A pending spell or ability on the stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackItem {
    /// Unique stack entry ID.
    pub id: String,

    /// Display name of the spell or ability.
    #[serde(default)]
    pub name: String,

    /// The player who put this item on the stack.
    pub controller_id: String,

    /// The card this item came from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_card_id: Option<String>,
}
