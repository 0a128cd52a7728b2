//! The session registry: tracks every live session token.
//!
//! # Concurrency note
//!
//! Unlike a single-owner map, this registry is shared by every request
//! worker. It is a `DashMap`, so lookups on different tokens do not
//! contend. Refreshing a session is a single atomic store into the entry
//! and never takes a write lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use rand::Rng;
use rosterforge_protocol::SessionToken;
use tokio::time::Instant;

use crate::{SessionConfig, SessionError};

/// One live session.
struct Entry<U> {
    user: U,
    /// Nanoseconds since the registry epoch at the last refresh.
    refreshed_at: AtomicU64,
}

/// Maps session tokens to user handles.
///
/// `U` is whatever the caller wants back from a lookup; it is cloned on
/// every successful lookup, so it should be cheap to clone (an `Arc`).
pub struct SessionRegistry<U> {
    entries: DashMap<SessionToken, Entry<U>>,
    config: SessionConfig,
    /// Reference point for the per-entry timestamps. Uses tokio's clock
    /// so a paused test runtime controls expiry.
    epoch: Instant,
}

impl<U: Clone> SessionRegistry<U> {
    /// Creates an empty registry.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            epoch: Instant::now(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Starts a session for `user` under a freshly generated token.
    ///
    /// # Errors
    /// [`SessionError::TokenCollision`] if the generated token is taken.
    pub fn create(&self, user: U) -> Result<SessionToken, SessionError> {
        let token = SessionToken::new(generate_token());
        self.insert(token.clone(), user)?;
        Ok(token)
    }

    /// Registers `user` under `token` if the token is not in use.
    ///
    /// # Errors
    /// [`SessionError::TokenCollision`] if the token is already
    /// registered. The existing session is left untouched.
    pub fn insert(&self, token: SessionToken, user: U) -> Result<(), SessionError> {
        let now = self.now_nanos();
        match self.entries.entry(token) {
            MapEntry::Occupied(occupied) => {
                tracing::error!(token = %occupied.key(), "session token collision");
                Err(SessionError::TokenCollision(occupied.key().clone()))
            }
            MapEntry::Vacant(vacant) => {
                tracing::debug!(token = %vacant.key(), "session created");
                vacant.insert(Entry {
                    user,
                    refreshed_at: AtomicU64::new(now),
                });
                Ok(())
            }
        }
    }

    /// Resolves `token` to its user and restarts the session's clock.
    ///
    /// An expired session found here is removed on the spot.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if the token is unknown or expired.
    pub fn lookup(&self, token: &SessionToken) -> Result<U, SessionError> {
        let now = self.now_nanos();
        let timeout = self.timeout_nanos();
        {
            let Some(entry) = self.entries.get(token) else {
                return Err(SessionError::NotFound(token.clone()));
            };
            if !is_expired(&entry, now, timeout) {
                entry.refreshed_at.fetch_max(now, Ordering::Relaxed);
                return Ok(entry.user.clone());
            }
            // `entry` is a read guard on the shard; it must drop before
            // the removal below locks the same shard for writing.
        }

        // Another lookup may have refreshed it in between.
        let removed = self
            .entries
            .remove_if(token, |_, e| is_expired(e, self.now_nanos(), timeout));
        if removed.is_some() {
            tracing::debug!(%token, "expired session evicted on lookup");
        }
        Err(SessionError::NotFound(token.clone()))
    }

    /// Removes every session idle longer than the timeout and returns how
    /// many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.now_nanos();
        let timeout = self.timeout_nanos();
        let mut removed = 0;
        self.entries.retain(|_, e| {
            let keep = !is_expired(e, now, timeout);
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            tracing::info!(removed, remaining = self.entries.len(), "sessions swept");
        }
        removed
    }

    /// Whether `token` is registered. Does not check expiry or refresh.
    pub fn contains(&self, token: &SessionToken) -> bool {
        self.entries.contains_key(token)
    }

    /// Number of registered sessions, expired ones not yet swept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn now_nanos(&self) -> u64 {
        duration_nanos(Instant::now().saturating_duration_since(self.epoch))
    }

    fn timeout_nanos(&self) -> u64 {
        duration_nanos(self.config.timeout())
    }
}

fn is_expired<U>(entry: &Entry<U>, now: u64, timeout: u64) -> bool {
    let refreshed = entry.refreshed_at.load(Ordering::Relaxed);
    now.saturating_sub(refreshed) > timeout
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Generates a random 32-character hex string (128 bits of entropy).
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================
