//! The host-world boundary.

use crate::error::HostError;
use crate::event::{ActorEffect, EventCategory};
use crate::frame::{Frame, Motion};
use crate::id::{ActorHandle, EntityKind};

/// The host world/entity system as seen by playback.
///
/// Playback never touches host registries directly: every spawn, despawn,
/// placement, and state change goes through this trait. All calls are
/// made from the single simulation thread that owns the session.
pub trait ActorHost {
    /// Create an actor of `kind` at `frame`, restoring it from the
    /// serialized `state` blob (empty for "no saved state").
    ///
    /// # Errors
    ///
    /// [`HostError::SpawnFailed`] if the kind cannot be constructed,
    /// [`HostError::MalformedActorState`] if `state` does not decode.
    fn spawn(
        &mut self,
        kind: &EntityKind,
        frame: &Frame,
        state: &[u8],
    ) -> Result<ActorHandle, HostError>;

    /// Remove an actor from the world. Unknown handles are ignored.
    fn despawn(&mut self, handle: ActorHandle);

    /// Put an actor at `frame`.
    ///
    /// With `motion` set, the host also applies that per-tick displacement
    /// as velocity so movement-driven effects fire. `None` is a silent
    /// placement: the actor is teleported with no velocity.
    fn place_at(&mut self, handle: ActorHandle, frame: &Frame, motion: Option<Motion>);

    /// Apply one state change to a live actor.
    ///
    /// # Errors
    ///
    /// [`HostError::UnknownHandle`] for a dead handle, or any host-specific
    /// failure. Playback logs these and carries on.
    fn apply(&mut self, handle: ActorHandle, effect: &ActorEffect) -> Result<(), HostError>;

    /// Whether the host can play events of `category`.
    ///
    /// Events of unsupported categories are skipped, not failed.
    fn is_event_kind_supported(&self, category: EventCategory) -> bool {
        let _ = category;
        true
    }
}
