//! Error types for the session layer.

use rosterforge_protocol::SessionToken;

/// Errors from the session registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No live session for this token: it was never issued, it was swept,
    /// or it idled past the timeout.
    #[error("session {0} not found or expired")]
    NotFound(SessionToken),

    /// A freshly generated token is already registered. With 128 random
    /// bits this means the random source is broken.
    #[error("session token {0} already in use")]
    TokenCollision(SessionToken),
}
