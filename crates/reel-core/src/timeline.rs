//! Recorded actor histories.
//!
//! A [`Timeline`] is dense in frames (one per tick) and sparse in events.
//! Events are kept sorted by tick; among events sharing a tick, list order
//! is registration order, which is the order they are applied forward.
//! Reverse application walks the same list back to front.

use std::ops::Range;
use std::sync::Arc;

use crate::error::TimelineError;
use crate::event::{ActorEffect, DiscreteEvent, EventKind};
use crate::frame::Frame;
use crate::id::EntityKind;

/// One actor's full recorded history.
///
/// Immutable once recorded; shared between sessions behind an [`Arc`].
///
/// # Examples
///
/// ```
/// use reel_core::{EventKind, Frame, Pose, Timeline};
///
/// let timeline = Timeline::new(
///     "minecraft:villager",
///     vec![Frame::at(0.0, 64.0, 0.0), Frame::at(1.0, 64.0, 0.0)],
/// )
/// .with_event(1, EventKind::Pose(Pose::Crouching));
///
/// assert_eq!(timeline.len(), 2);
/// assert_eq!(timeline.events_at(1).len(), 1);
/// assert!(timeline.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    actor_kind: Option<EntityKind>,
    spawn_tick: u32,
    frames: Vec<Frame>,
    events: Vec<DiscreteEvent>,
    actor_state: Vec<u8>,
}

impl Timeline {
    /// A timeline bound to `kind`, spawning at global tick 0.
    pub fn new(kind: impl Into<EntityKind>, frames: Vec<Frame>) -> Self {
        Self {
            actor_kind: Some(kind.into()),
            spawn_tick: 0,
            frames,
            events: Vec::new(),
            actor_state: Vec::new(),
        }
    }

    /// A timeline with no resolvable actor kind. It validates, but its
    /// actor never appears.
    pub fn unbound(frames: Vec<Frame>) -> Self {
        Self {
            actor_kind: None,
            spawn_tick: 0,
            frames,
            events: Vec::new(),
            actor_state: Vec::new(),
        }
    }

    /// Assemble a timeline from loaded parts without checking invariants.
    ///
    /// Call [`validate`](Self::validate) before playing it.
    pub fn from_parts(
        actor_kind: Option<EntityKind>,
        spawn_tick: u32,
        frames: Vec<Frame>,
        events: Vec<DiscreteEvent>,
        actor_state: Vec<u8>,
    ) -> Self {
        Self {
            actor_kind,
            spawn_tick,
            frames,
            events,
            actor_state,
        }
    }

    /// Set the global tick at which the actor first appears.
    pub fn with_spawn_tick(mut self, tick: u32) -> Self {
        self.spawn_tick = tick;
        self
    }

    /// Append an event, keeping the list sorted by tick. An event added at
    /// an already-occupied tick lands after the existing ones.
    pub fn with_event(mut self, tick: u32, kind: EventKind) -> Self {
        let at = self.events.partition_point(|e| e.tick <= tick);
        self.events.insert(at, DiscreteEvent::new(tick, kind));
        self
    }

    /// Attach the serialized actor state handed to the host on spawn.
    pub fn with_actor_state(mut self, state: Vec<u8>) -> Self {
        self.actor_state = state;
        self
    }

    /// Wrap in an [`Arc`] for sharing between players.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Check the structural invariants playback relies on.
    ///
    /// # Errors
    ///
    /// - [`TimelineError::EmptyFrames`] when there are no frames.
    /// - [`TimelineError::EventsOutOfOrder`] when events are not sorted by tick.
    /// - [`TimelineError::EventOutOfRange`] when an event falls outside
    ///   `[spawn_tick, spawn_tick + len)`.
    pub fn validate(&self) -> Result<(), TimelineError> {
        if self.frames.is_empty() {
            return Err(TimelineError::EmptyFrames);
        }
        let start = self.spawn_tick;
        let end = self.end_tick();
        let mut last = 0;
        for (index, event) in self.events.iter().enumerate() {
            if event.tick < last {
                return Err(TimelineError::EventsOutOfOrder { index });
            }
            last = event.tick;
            if event.tick < start || event.tick >= end {
                return Err(TimelineError::EventOutOfRange {
                    index,
                    tick: event.tick,
                    start,
                    end,
                });
            }
        }
        Ok(())
    }

    /// Host entity kind, if the timeline is bound to one.
    pub fn actor_kind(&self) -> Option<&EntityKind> {
        self.actor_kind.as_ref()
    }

    /// Global tick at which the actor appears.
    pub fn spawn_tick(&self) -> u32 {
        self.spawn_tick
    }

    /// All frames, indexed by local tick.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// All events, sorted by tick.
    pub fn events(&self) -> &[DiscreteEvent] {
        &self.events
    }

    /// Opaque serialized actor state.
    pub fn actor_state(&self) -> &[u8] {
        &self.actor_state
    }

    /// Number of frames.
    pub fn len(&self) -> u32 {
        u32::try_from(self.frames.len()).unwrap_or(u32::MAX)
    }

    /// Whether the timeline has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// One past the last global tick covered by a frame.
    pub fn end_tick(&self) -> u32 {
        self.spawn_tick.saturating_add(self.len())
    }

    /// Frame at `local` tick, clamped to the last frame. `None` only when
    /// the timeline is empty.
    pub fn frame_clamped(&self, local: u32) -> Option<&Frame> {
        let last = self.frames.len().checked_sub(1)?;
        self.frames.get((local as usize).min(last))
    }

    /// First recorded frame.
    pub fn first_frame(&self) -> Option<&Frame> {
        self.frames.first()
    }

    /// Last recorded frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Events firing exactly at global `tick`, in registration order.
    pub fn events_at(&self, tick: u32) -> &[DiscreteEvent] {
        &self.events[self.event_span(tick, tick)]
    }

    /// Index range of events with `first <= tick <= last`.
    ///
    /// Empty when `first > last`.
    pub fn event_span(&self, first: u32, last: u32) -> Range<usize> {
        if first > last {
            return 0..0;
        }
        let lo = self.events.partition_point(|e| e.tick < first);
        let hi = self.events.partition_point(|e| e.tick <= last);
        lo..hi.max(lo)
    }

    /// Effect that undoes the event at `index`.
    ///
    /// Scans backward from `index` for the most recent earlier event that
    /// writes the same state and returns its forward effect; with none, the
    /// state's spawn-time default. Transient events (sounds) have nothing
    /// to undo and yield `None`, as does an out-of-range index.
    pub fn reverse_effect(&self, index: usize) -> Option<ActorEffect> {
        let event = self.events.get(index)?;
        if event.kind.is_transient() {
            return None;
        }
        let key = event.kind.state_key();
        match self.events[..index]
            .iter()
            .rev()
            .find(|prev| prev.kind.state_key() == key)
        {
            Some(prev) => Some(prev.kind.forward_effect()),
            None => key.default_effect(),
        }
    }
}

/// A recorded animation: one master timeline plus secondary participants.
///
/// The master is the actor the animation is "about"; secondaries share its
/// clock but may start later and run for a different length. A composite
/// cutscene is an `Animation` whose secondaries come from several
/// recordings.
#[derive(Clone, Debug)]
pub struct Animation {
    /// Display name of the recording.
    pub name: String,
    /// Master timeline.
    pub master: Arc<Timeline>,
    /// Secondary timelines, in registration order.
    pub secondaries: Vec<Arc<Timeline>>,
}

impl Animation {
    /// An animation with only a master actor.
    pub fn new(name: impl Into<String>, master: Arc<Timeline>) -> Self {
        Self {
            name: name.into(),
            master,
            secondaries: Vec::new(),
        }
    }

    /// Register a secondary actor.
    pub fn with_secondary(mut self, timeline: Arc<Timeline>) -> Self {
        self.secondaries.push(timeline);
        self
    }

    /// Master first, then secondaries in registration order.
    pub fn timelines(&self) -> impl Iterator<Item = &Arc<Timeline>> {
        std::iter::once(&self.master).chain(self.secondaries.iter())
    }
}
