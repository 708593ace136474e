//! Collection of concurrently playing sessions.
//!
//! The registry is driven once per server tick by the simulation thread.
//! Sessions that end during a tick are dropped from the registry and
//! their ids returned so callers can release per-session resources.

use indexmap::IndexMap;
use reel_core::{ActorHost, SessionId};
use tracing::debug;

use crate::session::PlaybackSession;

/// Ordered map of live sessions, ticked in insertion order.
#[derive(Debug, Default)]
pub struct PlaybackRegistry {
    sessions: IndexMap<SessionId, PlaybackSession>,
}

impl PlaybackRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `session`, returning its id.
    pub fn insert(&mut self, session: PlaybackSession) -> SessionId {
        let id = session.id();
        self.sessions.insert(id, session);
        id
    }

    /// Look up a session.
    pub fn get(&self, id: SessionId) -> Option<&PlaybackSession> {
        self.sessions.get(&id)
    }

    /// Look up a session mutably.
    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut PlaybackSession> {
        self.sessions.get_mut(&id)
    }

    /// Stop tracking a session without stopping it.
    pub fn remove(&mut self, id: SessionId) -> Option<PlaybackSession> {
        self.sessions.shift_remove(&id)
    }

    /// Number of tracked sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// `true` if no sessions are tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Iterate over tracked sessions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PlaybackSession> {
        self.sessions.values()
    }

    /// Tick every playing session, then drop those that have ended.
    ///
    /// Returns the ids of the dropped sessions.
    pub fn tick_all(&mut self, host: &mut dyn ActorHost) -> Vec<SessionId> {
        for session in self.sessions.values_mut() {
            session.tick(host);
        }
        let ended: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|(_, s)| s.has_ended())
            .map(|(id, _)| *id)
            .collect();
        for id in &ended {
            self.sessions.shift_remove(id);
            debug!(session = %id, "session removed from registry");
        }
        ended
    }

    /// Stop every session, despawning their actors, and clear the registry.
    pub fn stop_all(&mut self, host: &mut dyn ActorHost) {
        for (_, mut session) in self.sessions.drain(..) {
            session.stop(host, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaybackConfig;
    use reel_core::Animation;
    use reel_test_utils::{walk_timeline, MockHost};

    fn started(host: &mut MockHost, len: usize) -> PlaybackSession {
        let anim = Animation::new("walk", walk_timeline("a", len).shared());
        let mut s = PlaybackSession::new(&anim, PlaybackConfig::default()).unwrap();
        s.start(host, None);
        s
    }

    #[test]
    fn ended_sessions_are_removed() {
        let mut host = MockHost::new();
        let mut registry = PlaybackRegistry::new();
        let short = registry.insert(started(&mut host, 2));
        let long = registry.insert(started(&mut host, 10));

        assert!(registry.tick_all(&mut host).is_empty());
        assert_eq!(registry.tick_all(&mut host), vec![short]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(long).is_some());
        assert_eq!(host.live_count(), 1);
    }

    #[test]
    fn stop_all_despawns_everything() {
        let mut host = MockHost::new();
        let mut registry = PlaybackRegistry::new();
        registry.insert(started(&mut host, 5));
        registry.insert(started(&mut host, 5));
        assert_eq!(host.live_count(), 2);

        registry.stop_all(&mut host);
        assert!(registry.is_empty());
        assert_eq!(host.live_count(), 0);
    }

    #[test]
    fn paused_sessions_stay_registered() {
        let mut host = MockHost::new();
        let mut registry = PlaybackRegistry::new();
        let id = registry.insert(started(&mut host, 2));
        registry.get_mut(id).unwrap().pause();
        for _ in 0..5 {
            registry.tick_all(&mut host);
        }
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(id).unwrap().get_tick(), 0);
    }
}
