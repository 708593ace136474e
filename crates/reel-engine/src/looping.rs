//! End-of-cycle decisions and the rewind-to-start reset.
//!
//! [`LoopController`] is used in two places: by the session when every
//! player has run out of frames, and by
//! [`PlaybackSession::restart`](crate::PlaybackSession::restart) to scrub
//! back to tick 0 outside the natural end of a cycle.

use reel_core::ActorHost;

use crate::config::{PlaybackConfig, SessionRole};
use crate::effects::EffectQueue;
use crate::metrics::PlaybackMetrics;
use crate::player::ActorPlayer;
use crate::respawn::RespawnPolicy;

/// What to do once every player has ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDecision {
    /// Rewind to tick 0 and keep playing.
    Loop,
    /// Stop the session.
    Stop {
        /// Whether to despawn every actor.
        kill_actors: bool,
    },
}

/// How one player was brought back to tick 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewindAction {
    /// Teleported silently to frame 0 with its events undone.
    Moved,
    /// Despawned and spawned fresh at frame 0.
    Respawned,
    /// Despawned until its spawn tick comes round again.
    Despawned,
    /// Left alone: unbound, or no live actor could be created.
    Untouched,
}

/// Cycle-reset logic shared by looping and scrub-to-start.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoopController {
    policy: RespawnPolicy,
}

impl LoopController {
    /// A controller using `policy` to spot discontinuous loops.
    pub fn new(policy: RespawnPolicy) -> Self {
        Self { policy }
    }

    /// Decide between looping and stopping.
    ///
    /// Recording sessions stop without touching actors. Unique sessions,
    /// and any session not configured to loop, stop and despawn.
    pub fn decide(config: &PlaybackConfig) -> CycleDecision {
        if config.role == SessionRole::Recording {
            CycleDecision::Stop { kill_actors: false }
        } else if config.unique || !config.looping {
            CycleDecision::Stop { kill_actors: true }
        } else {
            CycleDecision::Loop
        }
    }

    /// Bring every player back to tick 0, given that the session was at
    /// global tick `from_tick`.
    ///
    /// - Players that spawn later than tick 0 are despawned.
    /// - Players whose first and last frames are at least the respawn
    ///   threshold apart are despawned and respawned at frame 0.
    /// - Everyone else is teleported silently to frame 0 after every event
    ///   they have applied is undone.
    ///
    /// The discontinuity test compares first and last frame only, not the
    /// position the actor is actually at.
    pub fn rewind(
        &self,
        players: &mut [ActorPlayer],
        from_tick: u32,
        host: &mut dyn ActorHost,
        effects: &EffectQueue,
        metrics: &mut PlaybackMetrics,
    ) -> Vec<RewindAction> {
        let mut actions = Vec::with_capacity(players.len());
        for player in players.iter_mut() {
            actions.push(self.rewind_one(player, from_tick, host, effects, metrics));
        }
        actions
    }

    fn rewind_one(
        &self,
        player: &mut ActorPlayer,
        from_tick: u32,
        host: &mut dyn ActorHost,
        effects: &EffectQueue,
        metrics: &mut PlaybackMetrics,
    ) -> RewindAction {
        player.reset();
        if !player.is_bound() {
            return RewindAction::Untouched;
        }
        if player.spawn_tick() > 0 {
            player.kill_entity(effects, metrics);
            return RewindAction::Despawned;
        }
        if player.handle().is_none() {
            return if player.spawn(host, metrics) {
                RewindAction::Respawned
            } else {
                RewindAction::Untouched
            };
        }
        let timeline = player.timeline();
        let discontinuous = match (timeline.first_frame(), timeline.last_frame()) {
            (Some(first), Some(last)) => self
                .policy
                .need_to_respawn(&first.position(), &last.position()),
            _ => false,
        };
        if discontinuous {
            if player.respawn(host, effects, metrics) {
                RewindAction::Respawned
            } else {
                RewindAction::Untouched
            }
        } else {
            player.rewind_all(from_tick, host, metrics);
            player.move_silent(host);
            RewindAction::Moved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Placement;
    use reel_core::{EventKind, Frame, Pose, Timeline};
    use reel_test_utils::{walk_timeline, MockHost};

    #[test]
    fn decisions() {
        let mut config = PlaybackConfig::default();
        assert_eq!(
            LoopController::decide(&config),
            CycleDecision::Stop { kill_actors: true }
        );
        config.looping = true;
        assert_eq!(LoopController::decide(&config), CycleDecision::Loop);
        config.unique = true;
        assert_eq!(
            LoopController::decide(&config),
            CycleDecision::Stop { kill_actors: true }
        );
        config.role = SessionRole::Recording;
        assert_eq!(
            LoopController::decide(&config),
            CycleDecision::Stop { kill_actors: false }
        );
    }

    fn run_to_end(player: &mut ActorPlayer, host: &mut MockHost, metrics: &mut PlaybackMetrics) {
        player.spawn(host, metrics);
        let mut global = 0;
        while !player.has_ended() {
            global += 1;
            player.tick(global, host, Placement::Animated, metrics);
            player.dispatch_tick(global, host, metrics);
        }
    }

    #[test]
    fn discontinuous_player_is_respawned() {
        let mut host = MockHost::new();
        let effects = EffectQueue::new();
        let mut metrics = PlaybackMetrics::default();
        let mut players = vec![ActorPlayer::new(walk_timeline("a", 4).shared())];
        run_to_end(&mut players[0], &mut host, &mut metrics);
        let old = players[0].handle().unwrap();

        let actions = LoopController::default().rewind(&mut players, 4, &mut host, &effects, &mut metrics);
        effects.drain(&mut host);

        assert_eq!(actions, vec![RewindAction::Respawned]);
        let new = players[0].handle().unwrap();
        assert_ne!(old, new);
        assert!(!host.is_live(old));
        assert_eq!(host.actor(new).unwrap().frame, Frame::at(0.0, 0.0, 0.0));
        assert_eq!(players[0].local_tick(), 0);
    }

    #[test]
    fn continuous_player_is_moved_and_rewound() {
        let mut host = MockHost::new();
        let effects = EffectQueue::new();
        let mut metrics = PlaybackMetrics::default();
        let frames = vec![
            Frame::at(0.0, 0.0, 0.0),
            Frame::at(0.3, 0.0, 0.0),
            Frame::at(0.1, 0.0, 0.0),
        ];
        let timeline = Timeline::new("a", frames).with_event(1, EventKind::Pose(Pose::Crouching));
        let mut players = vec![ActorPlayer::new(timeline.shared())];
        run_to_end(&mut players[0], &mut host, &mut metrics);
        let handle = players[0].handle().unwrap();
        assert_eq!(host.actor(handle).unwrap().pose, Pose::Crouching);

        let actions = LoopController::default().rewind(&mut players, 3, &mut host, &effects, &mut metrics);

        assert_eq!(actions, vec![RewindAction::Moved]);
        assert_eq!(players[0].handle(), Some(handle));
        let actor = host.actor(handle).unwrap();
        assert_eq!(actor.frame, Frame::at(0.0, 0.0, 0.0));
        assert_eq!(actor.motion, None);
        assert_eq!(actor.pose, Pose::Standing);
    }

    #[test]
    fn late_spawning_player_is_despawned() {
        let mut host = MockHost::new();
        let effects = EffectQueue::new();
        let mut metrics = PlaybackMetrics::default();
        let mut players = vec![ActorPlayer::new(
            walk_timeline("a", 2).with_spawn_tick(3).shared(),
        )];
        players[0].tick(3, &mut host, Placement::Animated, &mut metrics);
        assert!(players[0].handle().is_some());

        let actions = LoopController::default().rewind(&mut players, 5, &mut host, &effects, &mut metrics);
        effects.drain(&mut host);

        assert_eq!(actions, vec![RewindAction::Despawned]);
        assert!(players[0].handle().is_none());
        assert_eq!(host.live_count(), 0);
    }
}
