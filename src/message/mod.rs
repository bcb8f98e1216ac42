//! Outbound sync messages and the collaborator seams.
//!
//! - `builder`: the `game_state_sync` wire message and its construction
//! - `hooks`: `Broadcaster` and `PersistenceHook`, the two black-box
//!   collaborators this engine talks to

pub mod builder;
pub mod hooks;

pub use builder::{create_compressed_sync_message, SyncMessage, SyncType, GAME_STATE_SYNC};
pub use hooks::{Broadcaster, PersistenceHook};
