//! # Rosterforge
//!
//! Concurrent in-memory domain layer for a roster-trading soccer game.
//!
//! Users sign up, each receives a generated team of players, lists players
//! on a shared market, and buys players from other users' teams. Every
//! change is written through to a pluggable [`Store`](rosterforge_store::Store).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use rosterforge::prelude::*;
//!
//! # fn main() -> Result<(), RosterError> {
//! let directory = Directory::builder().build(Arc::new(MemoryStore::new()))?;
//! directory.restore()?;
//!
//! let token = directory.sign_up(&Credential::new("ada@soccer.com", "a2TT&d3mn"))?;
//! let team = directory.get_team(&token, None)?;
//! assert_eq!(team.players.len(), 20);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! ```text
//! rosterforge            Directory, User, config, telemetry (this crate)
//!   ├─ rosterforge-session   token → user registry, expiry sweeper
//!   ├─ rosterforge-team      Team, Player, transfer protocol
//!   ├─ rosterforge-store     Store trait, records, MemoryStore
//!   └─ rosterforge-protocol  ids, credentials, snapshots, outcomes
//! ```

pub mod config;
mod directory;
mod error;
pub mod telemetry;
mod user;

pub use config::RosterConfig;
pub use directory::{Directory, DirectoryBuilder};
pub use error::{Failure, RosterError};
pub use user::User;

pub mod prelude {
    pub use rosterforge_protocol::{
        Credential, Market, PlayerId, PlayerSnapshot, PlayerType,
        PlayerUpdate, SessionToken, TeamId, TeamSnapshot, TeamUpdate,
        TransferOutcome, TransferRequest, UpdatePlayerOutcome,
        UpdateTeamOutcome, UserId,
    };
    pub use rosterforge_session::SessionConfig;
    #[cfg(feature = "memory")]
    pub use rosterforge_store::MemoryStore;
    pub use rosterforge_store::Store;
    pub use rosterforge_team::TeamComposition;

    pub use crate::{Directory, Failure, RosterConfig, RosterError};
}
