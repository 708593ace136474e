//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`SessionId`] allocation.
static SESSION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a playback session.
///
/// Allocated from a monotonic atomic counter via [`SessionId::next`], so
/// two sessions created in the same process never share an ID, even after
/// one of them has been torn down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocate a fresh, unique session ID. Thread-safe.
    pub fn next() -> Self {
        Self(SESSION_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Opaque reference to a live actor in the host world.
///
/// Handles are minted by [`ActorHost::spawn`](crate::ActorHost::spawn).
/// While live, a handle is owned exclusively by the player that spawned it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(pub u64);

impl fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

impl From<u64> for ActorHandle {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Host-side entity type a timeline is bound to (e.g. `"minecraft:zombie"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKind(pub String);

impl EntityKind {
    /// Borrow the kind as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKind {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for EntityKind {
    fn from(v: String) -> Self {
        Self(v)
    }
}
