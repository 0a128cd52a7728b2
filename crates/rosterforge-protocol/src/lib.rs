//! Shared vocabulary for Rosterforge.
//!
//! This crate defines the values every other layer passes around:
//!
//! - **Identity types** ([`UserId`], [`SessionToken`], [`TeamId`],
//!   [`PlayerId`], [`Credential`]): immutable keys into the registries.
//! - **Snapshots** ([`PlayerSnapshot`], [`TeamSnapshot`], [`Market`]):
//!   detached copies of team state handed to callers.
//! - **Requests** ([`TeamUpdate`], [`PlayerUpdate`], [`TransferRequest`]):
//!   the payloads a routing layer decodes and passes in.
//! - **Business outcomes** ([`TransferOutcome`] and friends): successful
//!   results that may still carry an error message.
//! - **Errors** ([`ProtocolError`]): malformed identifiers and credentials.
//!
//! # Architecture
//!
//! ```text
//! Directory (above)  ← composes users, sessions, and teams
//!     ↕
//! Team / Session / Store layers  ← speak in these types
//!     ↕
//! Protocol (this crate)  ← plain data, no locks, no I/O
//! ```

mod error;
mod outcome;
mod payload;
mod types;

pub use error::ProtocolError;
pub use outcome::{
    CreateTeamOutcome, TransferOutcome, UpdatePlayerOutcome, UpdateTeamOutcome,
};
pub use payload::{
    Market, PlayerSnapshot, PlayerUpdate, TeamSnapshot, TeamUpdate,
    TransferRequest,
};
pub use types::{Credential, PlayerId, PlayerType, SessionToken, TeamId, UserId};
