//! Playback session: one shared clock driving many actor players.
//!
//! [`PlaybackSession`] owns the global tick, the players (master first),
//! and the deferred-despawn queue. All operations take the host by
//! `&mut dyn ActorHost` and run to completion on the caller's thread; the
//! session is a single-writer object and is never shared.
//!
//! # Tick ordering
//!
//! Within one tick every actor is placed before any event is dispatched,
//! and events dispatch player by player in registration order. Rewinding
//! undoes events newest-first, mirroring that order.

use std::fmt;

use reel_core::{ActorHandle, ActorHost, Animation, SessionId};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, PlaybackConfig};
use crate::effects::{EffectQueue, HostCommand};
use crate::looping::{CycleDecision, LoopController};
use crate::metrics::PlaybackMetrics;
use crate::player::{ActorPlayer, Placement, SeekOutcome};
use crate::respawn::RespawnPolicy;

// Compile-time assertion: a session can be handed to the simulation thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<PlaybackSession>();
    }
};

// ── PlaybackState ───────────────────────────────────────────────

/// Lifecycle of a session.
///
/// `Idle → Playing ⇄ Paused → Ended`. `Ended → Playing` only happens
/// through [`PlaybackSession::restart`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Created, not yet started.
    Idle,
    /// Advancing on every `tick()`.
    Playing,
    /// Started but frozen; `tick()` does nothing.
    Paused,
    /// Stopped. Terminal unless restarted.
    Ended,
}

/// Observer invoked once when a session stops.
pub type StopCallback = Box<dyn FnMut(SessionId) + Send>;

// ── PlaybackSession ─────────────────────────────────────────────

/// Orchestrator for one playing animation or cutscene.
pub struct PlaybackSession {
    id: SessionId,
    name: String,
    config: PlaybackConfig,
    state: PlaybackState,
    global_tick: u32,
    players: Vec<ActorPlayer>,
    effects: EffectQueue,
    loop_controller: LoopController,
    metrics: PlaybackMetrics,
    on_stop: Option<StopCallback>,
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("global_tick", &self.global_tick)
            .field("players", &self.players.len())
            .finish()
    }
}

impl PlaybackSession {
    /// Bind `animation` to a new idle session.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the config is invalid or any timeline fails
    /// [`Timeline::validate`](reel_core::Timeline::validate). A timeline
    /// with no actor kind is accepted; its actor simply never appears.
    pub fn new(animation: &Animation, config: PlaybackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        for (index, timeline) in animation.timelines().enumerate() {
            timeline
                .validate()
                .map_err(|source| ConfigError::Timeline { index, source })?;
        }
        let players = animation
            .timelines()
            .map(|t| ActorPlayer::new(t.clone()))
            .collect();
        let policy = RespawnPolicy::new(config.respawn_threshold);
        Ok(Self {
            id: SessionId::next(),
            name: animation.name.clone(),
            config,
            state: PlaybackState::Idle,
            global_tick: 0,
            players,
            effects: EffectQueue::new(),
            loop_controller: LoopController::new(policy),
            metrics: PlaybackMetrics::default(),
            on_stop: None,
        })
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Name of the animation being played.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// `true` while ticks advance the clock.
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// `true` once the session has stopped.
    pub fn has_ended(&self) -> bool {
        self.state == PlaybackState::Ended
    }

    /// Whether the session restarts at the end of a cycle.
    pub fn is_looping(&self) -> bool {
        self.config.looping
    }

    /// Whether the session plays exactly once.
    pub fn is_unique(&self) -> bool {
        self.config.unique
    }

    /// Enable or disable looping for subsequent cycle ends.
    pub fn set_looping(&mut self, looping: bool) {
        self.config.looping = looping;
    }

    /// Register the observer called once when the session stops.
    pub fn set_on_stop(&mut self, callback: impl FnMut(SessionId) + Send + 'static) {
        self.on_stop = Some(Box::new(callback));
    }

    /// Current global tick.
    pub fn get_tick(&self) -> u32 {
        self.global_tick
    }

    /// Last global tick any player has a frame for; the seek upper bound.
    pub fn get_max_tick(&self) -> u32 {
        self.players
            .iter()
            .map(|p| p.timeline().end_tick().saturating_sub(1))
            .max()
            .unwrap_or(0)
    }

    /// All players, master first.
    pub fn players(&self) -> &[ActorPlayer] {
        &self.players
    }

    /// The master player.
    pub fn master(&self) -> &ActorPlayer {
        &self.players[0]
    }

    /// Counters accumulated so far.
    pub fn metrics(&self) -> &PlaybackMetrics {
        &self.metrics
    }

    /// Sender for despawn requests originating off the simulation thread.
    /// Requests are applied at the end of the next session operation.
    pub fn despawn_sender(&self) -> crossbeam_channel::Sender<HostCommand> {
        self.effects.sender()
    }

    /// Hand the master's live actor to the caller without despawning it,
    /// typically to pass into the next session's [`start`](Self::start).
    pub fn take_master_handle(&mut self) -> Option<ActorHandle> {
        self.players[0].release()
    }

    /// Begin playback at tick 0.
    ///
    /// Puts the master at `frames[0]`, adopting `reuse` when given so an
    /// actor carried over from a previous session does not visibly
    /// respawn. Secondaries spawning at tick 0 appear, later ones are
    /// absent. Tick-0 events are then dispatched for every actor.
    ///
    /// If the master timeline has no actor kind this logs and does nothing.
    pub fn start(&mut self, host: &mut dyn ActorHost, reuse: Option<ActorHandle>) {
        if !self.players[0].is_bound() {
            warn!(session = %self.id, name = %self.name, "master timeline has no actor kind; not starting");
            return;
        }
        self.global_tick = 0;
        for player in &mut self.players {
            player.reset();
        }

        let (master, secondaries) = self.players.split_at_mut(1);
        let master = &mut master[0];
        if let Some(handle) = reuse {
            if master.handle().is_none() {
                master.adopt(handle);
            }
        }
        if master.handle().is_some() {
            master.move_silent(host);
        } else {
            master.spawn(host, &mut self.metrics);
        }
        for player in secondaries {
            if player.spawn_tick() == 0 {
                if player.handle().is_some() {
                    player.move_silent(host);
                } else {
                    player.spawn(host, &mut self.metrics);
                }
            } else {
                player.kill_entity(&self.effects, &mut self.metrics);
            }
        }

        self.state = PlaybackState::Playing;
        self.dispatch(0, host);
        self.flush(host);
        info!(session = %self.id, name = %self.name, actors = self.players.len(), "playback started");
    }

    /// Freeze playback. Only affects a playing session.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Unfreeze a paused session.
    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    /// Advance one tick with motion applied.
    pub fn tick(&mut self, host: &mut dyn ActorHost) {
        self.advance(host, Placement::Animated);
    }

    /// Advance one tick placing actors without motion.
    pub fn tick_silent(&mut self, host: &mut dyn ActorHost) {
        self.advance(host, Placement::Silent);
    }

    fn advance(&mut self, host: &mut dyn ActorHost, placement: Placement) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let next = self.global_tick.saturating_add(1);
        for player in &mut self.players {
            player.tick(next, host, placement, &mut self.metrics);
        }
        self.global_tick = next;
        self.metrics.ticks += 1;

        if self.players.iter().all(ActorPlayer::has_ended) {
            self.finalize_playback_cycle(host);
        }
        if self.state == PlaybackState::Playing {
            self.dispatch(self.global_tick, host);
        }
        self.flush(host);
    }

    /// Handle every player having ended: loop or stop, per
    /// [`LoopController::decide`].
    fn finalize_playback_cycle(&mut self, host: &mut dyn ActorHost) {
        match LoopController::decide(&self.config) {
            CycleDecision::Stop { kill_actors } => self.stop(host, kill_actors),
            CycleDecision::Loop => {
                let from = self.global_tick;
                let actions = self.loop_controller.rewind(
                    &mut self.players,
                    from,
                    host,
                    &self.effects,
                    &mut self.metrics,
                );
                self.global_tick = 0;
                self.metrics.loops += 1;
                info!(session = %self.id, from, ?actions, "playback looped");
            }
        }
    }

    /// Scrub back to tick 0 through the loop reset path and play.
    ///
    /// Discontinuous actors are respawned, the rest are moved back with
    /// their events undone, then tick-0 events are dispatched.
    pub fn restart(&mut self, host: &mut dyn ActorHost) {
        if !self.players[0].is_bound() {
            warn!(session = %self.id, "master timeline has no actor kind; not restarting");
            return;
        }
        let from = self.global_tick;
        self.loop_controller.rewind(
            &mut self.players,
            from,
            host,
            &self.effects,
            &mut self.metrics,
        );
        self.global_tick = 0;
        if self.state != PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
        self.dispatch(0, host);
        self.flush(host);
        debug!(session = %self.id, from, "playback restarted");
    }

    /// Seek to global tick `target`, clamped to `[0, max_tick]`.
    ///
    /// Each player repositions itself: seamlessly (silent teleport) when
    /// `seamless` and its actor is live, otherwise by despawn+respawn.
    /// Event state is then reconciled: a freshly spawned actor replays
    /// its whole history up to `target`; an actor that was only moved
    /// replays the difference, forward `(tick, target]` or reverse
    /// `(target, tick]` newest-first.
    ///
    /// Only a started session (playing or paused) can seek. On an idle or
    /// ended session this does nothing, so a stopped session never
    /// re-acquires actors it no longer owns; use [`restart`](Self::restart)
    /// to bring an ended session back.
    pub fn change_location_by_tick(
        &mut self,
        target: u32,
        seamless: bool,
        host: &mut dyn ActorHost,
    ) {
        if matches!(self.state, PlaybackState::Idle | PlaybackState::Ended) {
            debug!(session = %self.id, state = ?self.state, target, "seek ignored");
            return;
        }
        let target = target.min(self.get_max_tick());
        let previous = self.global_tick;
        self.metrics.seeks += 1;

        let mut outcomes: SmallVec<[SeekOutcome; 8]> = SmallVec::new();
        for player in &mut self.players {
            outcomes.push(player.change_location_by_tick(
                target,
                seamless,
                host,
                &self.effects,
                &mut self.metrics,
            ));
        }

        for (player, outcome) in self.players.iter().zip(&outcomes) {
            match outcome {
                SeekOutcome::Respawned => player.catch_up(target, host, &mut self.metrics),
                SeekOutcome::Moved if target > previous => {
                    player.replay_forward(previous, target, host, &mut self.metrics)
                }
                SeekOutcome::Moved if target < previous => {
                    player.replay_reverse(target, previous, host, &mut self.metrics)
                }
                SeekOutcome::Moved | SeekOutcome::Absent => {}
            }
        }

        self.global_tick = target;
        self.flush(host);
        debug!(session = %self.id, previous, target, seamless, "seek");
    }

    /// Stop playback.
    ///
    /// With `kill_actors`, every player is rewound and its actor
    /// despawned. Idempotent: stopping a stopped session only repeats the
    /// (null-guarded) despawns, and the `on_stop` observer fires once.
    pub fn stop(&mut self, host: &mut dyn ActorHost, kill_actors: bool) {
        let was_running = self.state != PlaybackState::Ended;
        self.state = PlaybackState::Ended;
        if kill_actors {
            for player in &mut self.players {
                player.reset();
                player.kill_entity(&self.effects, &mut self.metrics);
            }
        }
        self.flush(host);
        if was_running {
            info!(session = %self.id, tick = self.global_tick, kill_actors, "playback stopped");
            if let Some(callback) = self.on_stop.as_mut() {
                callback(self.id);
            }
        }
    }

    fn flush(&mut self, host: &mut dyn ActorHost) {
        let applied = self.effects.drain(host);
        if applied > 0 {
            debug!(session = %self.id, applied, "deferred host commands applied");
        }
    }

    fn dispatch(&mut self, tick: u32, host: &mut dyn ActorHost) {
        for player in &self.players {
            player.dispatch_tick(tick, host, &mut self.metrics);
        }
    }
}
