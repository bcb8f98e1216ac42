//! Shared game state: the versioned aggregate and its parts.
//!
//! - `card`: card references, battlefield permanents, stack items
//! - `player`: per-player state and card zones
//! - `game`: the versioned `GameState` aggregate and the turn phase cycle
//! - `validate`: structural validation for states, actions, and deltas
//!
//! Card zones use `im::Vector` so that producing the next version of a
//! state is a structural snapshot, not a serialize round-trip.

pub mod card;
pub mod game;
pub mod player;
pub mod validate;

pub use card::{CardReference, Permanent, StackItem};
pub use game::{Battlefield, CurrentTurn, GameState, TurnPhase};
pub use player::{Library, PlayerState};
pub use validate::{validate_action, validate_delta, validate_state};
