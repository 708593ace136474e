//! Per-actor playback cursor.
//!
//! An [`ActorPlayer`] applies one [`Timeline`] to at most one live actor.
//! Its only externally visible side effects are creating and destroying
//! that actor and mutating its pose and event state through the
//! [`ActorHost`].
//!
//! # Tick alignment
//!
//! `tick(global)` is called with the global tick being entered. For a live
//! actor the cursor always satisfies `local_tick == global - spawn_tick`
//! (capped at the timeline length): entering the spawn tick spawns the
//! actor at `frames[0]` and leaves the cursor at 0; every later tick places
//! `frames[local_tick]` and advances the cursor by one.

use std::ops::Range;
use std::sync::Arc;

use reel_core::{ActorHandle, ActorHost, Frame, Timeline};
use tracing::{debug, warn};

use crate::effects::{EffectQueue, HostCommand};
use crate::metrics::PlaybackMetrics;

/// How a tick places the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Place and apply the motion toward the next frame, so
    /// velocity-driven host effects fire.
    Animated,
    /// Place with no motion.
    Silent,
}

/// What a seek did to a player's actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekOutcome {
    /// The existing actor was moved; its event state is intact.
    Moved,
    /// A fresh actor was spawned; its event state starts from defaults.
    Respawned,
    /// No actor exists at the target tick.
    Absent,
}

/// Runtime cursor applying one timeline to one live actor.
pub struct ActorPlayer {
    timeline: Arc<Timeline>,
    handle: Option<ActorHandle>,
    local_tick: u32,
}

impl ActorPlayer {
    /// A player for `timeline` with no actor and the cursor at 0.
    pub fn new(timeline: Arc<Timeline>) -> Self {
        Self {
            timeline,
            handle: None,
            local_tick: 0,
        }
    }

    /// The timeline being played.
    pub fn timeline(&self) -> &Arc<Timeline> {
        &self.timeline
    }

    /// The live actor, if any.
    pub fn handle(&self) -> Option<ActorHandle> {
        self.handle
    }

    /// Cursor into `frames`.
    pub fn local_tick(&self) -> u32 {
        self.local_tick
    }

    /// Global tick at which this actor appears.
    pub fn spawn_tick(&self) -> u32 {
        self.timeline.spawn_tick()
    }

    /// Whether the timeline names an actor kind.
    pub fn is_bound(&self) -> bool {
        self.timeline.actor_kind().is_some()
    }

    /// `true` once every frame has been consumed. An unbound player, whose
    /// actor can never appear, counts as ended from the start.
    pub fn has_ended(&self) -> bool {
        !self.is_bound() || self.local_tick >= self.timeline.len()
    }

    /// Frame under the cursor, clamped to the last frame.
    pub fn current_frame(&self) -> Option<&Frame> {
        self.timeline.frame_clamped(self.local_tick)
    }

    /// Take ownership of an already-live actor (e.g. one handed over from
    /// a previous session) instead of spawning a new one.
    pub fn adopt(&mut self, handle: ActorHandle) {
        self.handle = Some(handle);
    }

    /// Give up ownership of the live actor without despawning it.
    pub fn release(&mut self) -> Option<ActorHandle> {
        self.handle.take()
    }

    /// Rewind the cursor to the first frame.
    pub fn reset(&mut self) {
        self.local_tick = 0;
    }

    /// Spawn the actor at the current frame if it is not already live.
    ///
    /// Returns whether an actor is live afterwards. Host failures are
    /// logged and leave the player without an actor; the next tick retries.
    pub fn spawn(&mut self, host: &mut dyn ActorHost, metrics: &mut PlaybackMetrics) -> bool {
        if self.handle.is_some() {
            return true;
        }
        let Some(kind) = self.timeline.actor_kind() else {
            return false;
        };
        let Some(frame) = self.timeline.frame_clamped(self.local_tick) else {
            return false;
        };
        match host.spawn(kind, frame, self.timeline.actor_state()) {
            Ok(handle) => {
                debug!(%kind, %handle, local_tick = self.local_tick, "actor spawned");
                self.handle = Some(handle);
                metrics.spawns += 1;
                true
            }
            Err(error) => {
                warn!(%kind, %error, "actor spawn abandoned");
                metrics.spawn_failures += 1;
                false
            }
        }
    }

    /// Schedule the live actor for despawn and forget its handle.
    ///
    /// The despawn itself runs when the session drains `effects`. Without
    /// a live actor this does nothing, so repeated kills are harmless.
    pub fn kill_entity(&mut self, effects: &EffectQueue, metrics: &mut PlaybackMetrics) {
        if let Some(handle) = self.handle.take() {
            debug!(%handle, "actor despawn scheduled");
            effects.push(HostCommand::Despawn(handle));
            metrics.despawns += 1;
        }
    }

    /// Despawn the current actor (if any) and spawn a fresh one at the
    /// current frame.
    pub fn respawn(
        &mut self,
        host: &mut dyn ActorHost,
        effects: &EffectQueue,
        metrics: &mut PlaybackMetrics,
    ) -> bool {
        self.kill_entity(effects, metrics);
        self.spawn(host, metrics)
    }

    /// Teleport the live actor to the current frame without motion.
    pub fn move_silent(&self, host: &mut dyn ActorHost) {
        if let (Some(handle), Some(frame)) = (self.handle, self.current_frame()) {
            host.place_at(handle, frame, None);
        }
    }

    /// Enter global tick `global`.
    ///
    /// Before the spawn tick this does nothing. Entering the spawn tick
    /// spawns the actor at `frames[0]`. Afterwards each call places
    /// `frames[local_tick]` (with the motion toward the next frame unless
    /// `placement` is [`Placement::Silent`]) and advances the cursor. If
    /// the actor could not be spawned the cursor still advances, so a
    /// broken actor never holds back the end of the cycle; a retry that
    /// succeeds later replays the state-bearing events it missed.
    pub fn tick(
        &mut self,
        global: u32,
        host: &mut dyn ActorHost,
        placement: Placement,
        metrics: &mut PlaybackMetrics,
    ) {
        if global < self.spawn_tick() || !self.is_bound() {
            return;
        }
        if self.handle.is_none() {
            let spawned = self.spawn(host, metrics);
            if global == self.spawn_tick() {
                return;
            }
            if spawned {
                // Late spawn after a failure: the events it missed, up to
                // the previous tick, are replayed before it is placed.
                self.catch_up(global - 1, host, metrics);
            }
        }
        if self.has_ended() {
            return;
        }
        if let Some(handle) = self.handle {
            let frames = self.timeline.frames();
            let current = &frames[self.local_tick as usize];
            let motion = match placement {
                Placement::Animated => {
                    let next = self
                        .timeline
                        .frame_clamped(self.local_tick + 1)
                        .unwrap_or(current);
                    Some(current.motion_to(next))
                }
                Placement::Silent => None,
            };
            host.place_at(handle, current, motion);
        }
        self.local_tick += 1;
    }

    /// Jump to global tick `target`.
    ///
    /// Before the spawn tick the actor is despawned and the cursor reset.
    /// Otherwise the cursor moves to `target - spawn_tick` (capped at the
    /// timeline length) and the actor is either teleported silently
    /// (`seamless` with a live actor) or despawned and respawned there.
    pub fn change_location_by_tick(
        &mut self,
        target: u32,
        seamless: bool,
        host: &mut dyn ActorHost,
        effects: &EffectQueue,
        metrics: &mut PlaybackMetrics,
    ) -> SeekOutcome {
        if !self.is_bound() {
            return SeekOutcome::Absent;
        }
        if target < self.spawn_tick() {
            self.kill_entity(effects, metrics);
            self.local_tick = 0;
            return SeekOutcome::Absent;
        }
        self.local_tick = (target - self.spawn_tick()).min(self.timeline.len());
        if seamless && self.handle.is_some() {
            self.move_silent(host);
            return SeekOutcome::Moved;
        }
        if self.respawn(host, effects, metrics) {
            SeekOutcome::Respawned
        } else {
            SeekOutcome::Absent
        }
    }

    /// Apply, in registration order, every event firing at global `tick`.
    pub fn dispatch_tick(&self, tick: u32, host: &mut dyn ActorHost, metrics: &mut PlaybackMetrics) {
        self.apply_forward(self.timeline.event_span(tick, tick), false, host, metrics);
    }

    /// Re-apply events with `after < tick <= until`, oldest first.
    pub fn replay_forward(
        &self,
        after: u32,
        until: u32,
        host: &mut dyn ActorHost,
        metrics: &mut PlaybackMetrics,
    ) {
        let span = self.timeline.event_span(after.saturating_add(1), until);
        self.apply_forward(span, false, host, metrics);
    }

    /// Undo events with `after < tick <= until`, newest first.
    pub fn replay_reverse(
        &self,
        after: u32,
        until: u32,
        host: &mut dyn ActorHost,
        metrics: &mut PlaybackMetrics,
    ) {
        let span = self.timeline.event_span(after.saturating_add(1), until);
        self.apply_reverse(span, host, metrics);
    }

    /// Undo every event with `tick <= until`, newest first, returning the
    /// actor to its spawn-time event state.
    pub fn rewind_all(&self, until: u32, host: &mut dyn ActorHost, metrics: &mut PlaybackMetrics) {
        let span = self.timeline.event_span(0, until);
        self.apply_reverse(span, host, metrics);
    }

    /// Rebuild a freshly spawned actor's event state by applying every
    /// event with `tick <= until` in order. Transient events (sounds)
    /// belong to the past and are not replayed.
    pub fn catch_up(&self, until: u32, host: &mut dyn ActorHost, metrics: &mut PlaybackMetrics) {
        let span = self.timeline.event_span(0, until);
        self.apply_forward(span, true, host, metrics);
    }

    fn apply_forward(
        &self,
        span: Range<usize>,
        history: bool,
        host: &mut dyn ActorHost,
        metrics: &mut PlaybackMetrics,
    ) {
        let Some(handle) = self.handle else {
            return;
        };
        for event in &self.timeline.events()[span] {
            if history && event.kind.is_transient() {
                continue;
            }
            let category = event.kind.category();
            if !host.is_event_kind_supported(category) {
                metrics.events_skipped += 1;
                continue;
            }
            match host.apply(handle, &event.kind.forward_effect()) {
                Ok(()) => metrics.events_applied += 1,
                Err(error) => {
                    warn!(%handle, tick = event.tick, %category, %error, "event apply failed");
                    metrics.event_failures += 1;
                }
            }
        }
    }

    fn apply_reverse(
        &self,
        span: Range<usize>,
        host: &mut dyn ActorHost,
        metrics: &mut PlaybackMetrics,
    ) {
        let Some(handle) = self.handle else {
            return;
        };
        let events = self.timeline.events();
        for index in span.rev() {
            let Some(effect) = self.timeline.reverse_effect(index) else {
                continue;
            };
            let event = &events[index];
            let category = event.kind.category();
            if !host.is_event_kind_supported(category) {
                metrics.events_skipped += 1;
                continue;
            }
            match host.apply(handle, &effect) {
                Ok(()) => metrics.events_reversed += 1,
                Err(error) => {
                    warn!(%handle, tick = event.tick, %category, %error, "event reverse failed");
                    metrics.event_failures += 1;
                }
            }
        }
    }
}
