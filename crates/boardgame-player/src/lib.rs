//! Players for board game sessions.
//!
//! This crate handles who is playing:
//!
//! 1. **Identity**: a [`Player`] is its id; name and metadata ride along.
//! 2. **Connectivity**: a flag flipped from outside the game (by the
//!    [`PlayerRegistry`] or whatever tracks sockets), visible to every
//!    holder of the shared `Arc<Player>`.
//! 3. **Rosters**: an ordered, id-keyed [`Roster`] that games use for
//!    turn order.
//!
//! # How it fits in the stack
//!
//! ```text
//! Game / Room (above)  ← hold Arc<Player> values in rosters
//!     ↕
//! Player layer (this crate)  ← identity, connectivity, membership
//!     ↕
//! Protocol layer (below)  ← PlayerId, Metadata
//! ```

mod error;
mod player;
mod registry;
mod roster;

pub use error::PlayerError;
pub use player::{Player, PlayerSnapshot};
pub use registry::PlayerRegistry;
pub use roster::Roster;
