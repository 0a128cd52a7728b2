//! Error types for the protocol layer.
//!
//! Each crate in Rosterforge defines its own error enum. A `ProtocolError`
//! always means the input itself was malformed, so callers map every
//! variant to a bad request.

/// Errors raised while parsing identifiers and credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The user id is not shaped like an email address.
    #[error("invalid user id: {0}")]
    InvalidUserId(String),

    /// The password misses one of the required character classes
    /// or is shorter than the minimum length.
    #[error("password does not meet the strength rules")]
    WeakPassword,

    /// A team or player identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}
