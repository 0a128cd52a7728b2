//! Team and player state for Rosterforge.
//!
//! Each [`Team`] owns its roster of [`Player`]s behind a single mutex.
//! Every read and every mutation of a team goes through that lock, so two
//! operations on the same team never interleave. Operations on different
//! teams run fully in parallel.
//!
//! The one operation that touches two teams is
//! [`Team::transfer_player`]. It holds both locks for its whole duration
//! and always takes them in ascending [`TeamId`](rosterforge_protocol::TeamId)
//! order, whichever side is buying.
//!
//! # Key types
//!
//! - [`Team`]: roster, balance, and the transfer protocol
//! - [`Player`]: one player's attributes and market eligibility
//! - [`TeamComposition`]: how starter teams are generated
//! - [`NameSequence`]: numbering for generated team and player names
//! - [`TeamError`]: protocol-level failures of team operations

mod config;
mod error;
mod player;
mod team;
mod transfer;

pub use config::TeamComposition;
pub use error::TeamError;
pub use player::Player;
pub use team::{NameSequence, Team};
