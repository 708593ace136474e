//! Error types for the Reel playback framework.
//!
//! Organized by boundary: the host world ([`HostError`]) and recorded
//! timeline data ([`TimelineError`]). Neither is ever fatal to a playback
//! session; the engine downgrades host failures to log-and-continue.

use std::error::Error;
use std::fmt;

use crate::event::EventCategory;
use crate::id::{ActorHandle, EntityKind};

/// Failures reported by an [`ActorHost`](crate::ActorHost).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// The host could not construct an actor of the requested kind.
    SpawnFailed {
        /// The kind that failed to spawn.
        kind: EntityKind,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The persisted actor state blob could not be decoded.
    MalformedActorState {
        /// Description of what was wrong with the blob.
        detail: String,
    },
    /// The handle does not refer to a live actor.
    UnknownHandle {
        /// The stale handle.
        handle: ActorHandle,
    },
    /// The host cannot apply effects of this category.
    Unsupported {
        /// The rejected category.
        category: EventCategory,
    },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpawnFailed { kind, reason } => {
                write!(f, "failed to spawn '{kind}': {reason}")
            }
            Self::MalformedActorState { detail } => {
                write!(f, "malformed actor state: {detail}")
            }
            Self::UnknownHandle { handle } => write!(f, "unknown actor handle {handle}"),
            Self::Unsupported { category } => {
                write!(f, "host does not support {category} effects")
            }
        }
    }
}

impl Error for HostError {}

/// Structural problems in a recorded [`Timeline`](crate::Timeline).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimelineError {
    /// The timeline has no frames and cannot be played.
    EmptyFrames,
    /// An event fires outside the actor's lifetime.
    EventOutOfRange {
        /// Index of the event in the event list.
        index: usize,
        /// The event's tick.
        tick: u32,
        /// First valid tick (the spawn tick).
        start: u32,
        /// One past the last valid tick.
        end: u32,
    },
    /// Events are not sorted by tick.
    EventsOutOfOrder {
        /// Index of the first event whose tick is lower than its predecessor's.
        index: usize,
    },
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFrames => write!(f, "timeline has no frames"),
            Self::EventOutOfRange {
                index,
                tick,
                start,
                end,
            } => write!(
                f,
                "event {index} at tick {tick} lies outside [{start}, {end})"
            ),
            Self::EventsOutOfOrder { index } => {
                write!(f, "event {index} is earlier than the event before it")
            }
        }
    }
}

impl Error for TimelineError {}
