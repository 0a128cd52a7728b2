//! Session management for Rosterforge.
//!
//! A session binds a random token to a user handle. Every authenticated
//! request presents its token; the registry resolves it back to the user
//! and refreshes the session's clock. Sessions idle longer than the
//! configured timeout are gone.
//!
//! # How it fits in the stack
//!
//! ```text
//! Directory (above)  ← resolves tokens to users on every request
//!     ↕
//! Session Layer (this crate)  ← token → user, refresh, expiry, sweeping
//!     ↕
//! Protocol Layer (below)  ← provides SessionToken
//! ```
//!
//! The registry is generic over the user handle `U` so it does not need
//! to know what a user is. The directory stores `Arc<User>` in it.

mod error;
mod registry;
mod session;
mod sweep;

pub use error::SessionError;
pub use registry::SessionRegistry;
pub use session::SessionConfig;
pub use sweep::{SweeperHandle, spawn_sweeper};
