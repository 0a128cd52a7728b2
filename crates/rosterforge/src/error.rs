//! Unified error type for Rosterforge.

use rosterforge_protocol::{ProtocolError, UserId};
use rosterforge_session::SessionError;
use rosterforge_store::StoreError;
use rosterforge_team::TeamError;
use serde::{Deserialize, Serialize};

/// Top-level error that wraps all crate-specific errors.
///
/// Every variant aborts the call. Failed business operations (a transfer
/// the buyer cannot afford, a player that is not listed) are not errors:
/// they come back as `Ok` outcomes carrying a message.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// Malformed user id or weak password.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Team(#[from] TeamError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Sign-up with an id that is already registered.
    #[error("user {0} already exists")]
    DuplicateUser(UserId),

    /// Unknown user id or wrong password, without saying which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The id in the request path disagrees with the id in the payload.
    #[error("path id {path} does not match payload id {payload}")]
    IdMismatch { path: String, payload: String },

    /// The user has no team to read.
    #[error("team for user {0} is not defined")]
    NoTeam(UserId),

    /// A second team was offered to a user that already has one.
    #[error("user {0} already has a team")]
    TeamAlreadyAssigned(UserId),

    /// The starter team could not be stored during sign-up.
    #[error("team creation failed: {0}")]
    TeamCreation(String),

    /// Persisted data does not form a consistent directory.
    #[error("inconsistent stored data: {0}")]
    Integrity(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

/// The protocol-level category of a failed call, as a transport layer
/// would report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Failure {
    BadRequest,
    Forbidden,
    NotFound,
    Timeout,
    InternalFailure,
    NotAvailable,
}

impl RosterError {
    /// Maps this error to the category a caller should see.
    pub fn failure(&self) -> Failure {
        match self {
            Self::Protocol(_)
            | Self::DuplicateUser(_)
            | Self::IdMismatch { .. } => Failure::BadRequest,
            Self::InvalidCredentials => Failure::Forbidden,
            Self::Session(SessionError::NotFound(_)) => Failure::Forbidden,
            Self::Session(SessionError::TokenCollision(_)) => {
                Failure::InternalFailure
            }
            Self::Team(TeamError::TeamMismatch { .. })
            | Self::Team(TeamError::InvalidTransferValue(_)) => {
                Failure::BadRequest
            }
            Self::Store(StoreError::NotRunning)
            | Self::Team(TeamError::Store(StoreError::NotRunning)) => {
                Failure::NotAvailable
            }
            Self::NoTeam(_) => Failure::NotFound,
            Self::Store(_)
            | Self::Team(_)
            | Self::TeamAlreadyAssigned(_)
            | Self::TeamCreation(_)
            | Self::Integrity(_)
            | Self::Config(_) => Failure::InternalFailure,
        }
    }
}
