//! Error types for the team layer.

use rosterforge_protocol::{PlayerId, TeamId};
use rosterforge_store::StoreError;

/// Failures of team operations that abort the call.
///
/// Business rejections (player not listed, not enough balance, ...) are
/// not errors: they come back as outcome values with an error message.
#[derive(Debug, thiserror::Error)]
pub enum TeamError {
    /// The caller addressed a team id that is not this team.
    #[error("team {requested} does not match team {actual}")]
    TeamMismatch { requested: TeamId, actual: TeamId },

    /// Transfer values must be zero (not listed) or positive (listed).
    #[error("transfer value {0} is not valid")]
    InvalidTransferValue(i64),

    /// A roster was built with the same player twice.
    #[error("player {0} appears twice in the roster")]
    DuplicatePlayer(PlayerId),

    /// The store rejected a write or a load.
    #[error(transparent)]
    Store(#[from] StoreError),
}
