//! Per-player state and card zones.
//!
//! The hand, graveyard, and exile zones are ordered card lists. The library
//! is count-only: the engine never learns card identity inside it, so a
//! drawn card surfaces as an opaque placeholder until the rule adapter
//! reveals it.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::CardReference;

/// A player's library, tracked by count only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    /// Number of cards remaining.
    pub count: u32,
}

impl Library {
    /// Create a library with the given card count.
    #[must_use]
    pub const fn new(count: u32) -> Self {
        Self { count }
    }
}

/// State for a single player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Unique player ID.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Life total. May go negative before loss is evaluated.
    pub life_total: i32,

    /// Poison counters.
    #[serde(default)]
    pub poison_counters: u32,

    /// Cards in hand (ordered).
    #[serde(default)]
    pub hand: Vector<CardReference>,

    /// Graveyard (ordered, public).
    #[serde(default)]
    pub graveyard: Vector<CardReference>,

    /// Exile (ordered, public).
    #[serde(default)]
    pub exile: Vector<CardReference>,

    /// Library, count only.
    pub library: Library,

    /// Whether this player has lost the game.
    #[serde(default)]
    pub has_lost: bool,

    /// Why the player lost, if they did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_reason: Option<String>,
}

impl PlayerState {
    /// Create a player with the given starting life and library size.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        life_total: i32,
        library_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            life_total,
            poison_counters: 0,
            hand: Vector::new(),
            graveyard: Vector::new(),
            exile: Vector::new(),
            library: Library::new(library_count),
            has_lost: false,
            loss_reason: None,
        }
    }

    /// Mark this player as having lost.
    pub fn lose(&mut self, reason: impl Into<String>) {
        self.has_lost = true;
        self.loss_reason = Some(reason.into());
    }

    /// Remove a card from the hand by ID.
    ///
    /// Returns the card if it was present.
    pub fn take_from_hand(&mut self, card_id: &str) -> Option<CardReference> {
        let pos = self.hand.iter().position(|c| c.id == card_id)?;
        Some(self.hand.remove(pos))
    }
}
