//! Test utilities and mock types for Reel development.
//!
//! Provides [`MockHost`], an in-memory [`ActorHost`] that records every call
//! and tracks per-actor state, plus timeline fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{random_timeline, random_timeline_from, straight_line, walk_timeline};

use std::collections::{BTreeMap, HashSet};

use indexmap::IndexMap;
use reel_core::{
    ActorEffect, ActorHandle, ActorHost, BlockPos, EntityKind, EquipmentSlot, EventCategory,
    Frame, HostError, ItemStack, Motion, Pose,
};

/// One call made against a [`MockHost`], in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    Spawn {
        handle: ActorHandle,
        kind: EntityKind,
        frame: Frame,
    },
    Despawn(ActorHandle),
    Place {
        handle: ActorHandle,
        frame: Frame,
        motion: Option<Motion>,
    },
    Apply {
        handle: ActorHandle,
        effect: ActorEffect,
    },
}

/// Observable state of one mock actor.
///
/// Fields start at the values a freshly spawned host actor would have.
#[derive(Clone, Debug, PartialEq)]
pub struct MockActor {
    pub kind: EntityKind,
    pub frame: Frame,
    pub motion: Option<Motion>,
    pub pose: Pose,
    pub items: BTreeMap<EquipmentSlot, ItemStack>,
    pub sleeping: Option<BlockPos>,
    pub alive: bool,
    pub cracks: BTreeMap<BlockPos, i8>,
    pub emote: Option<String>,
    pub sounds: Vec<String>,
}

impl MockActor {
    fn new(kind: EntityKind, frame: Frame) -> Self {
        Self {
            kind,
            frame,
            motion: None,
            pose: Pose::Standing,
            items: BTreeMap::new(),
            sleeping: None,
            alive: true,
            cracks: BTreeMap::new(),
            emote: None,
            sounds: Vec::new(),
        }
    }

    /// Everything except position, motion, and the sound log: the part of
    /// the actor that discrete events write.
    pub fn event_state(&self) -> EventState {
        EventState {
            pose: self.pose,
            items: self.items.clone(),
            sleeping: self.sleeping,
            alive: self.alive,
            cracks: self.cracks.clone(),
            emote: self.emote.clone(),
        }
    }
}

/// Event-written actor state, comparable across hosts.
#[derive(Clone, Debug, PartialEq)]
pub struct EventState {
    pub pose: Pose,
    pub items: BTreeMap<EquipmentSlot, ItemStack>,
    pub sleeping: Option<BlockPos>,
    pub alive: bool,
    pub cracks: BTreeMap<BlockPos, i8>,
    pub emote: Option<String>,
}

/// In-memory [`ActorHost`] for tests.
///
/// Handles are allocated sequentially from 1. Spawning fails for kinds
/// registered with [`reject_kind`](MockHost::reject_kind) and for
/// non-UTF-8 state blobs. Despawning a handle that is not live is counted
/// in [`stray_despawns`](MockHost::stray_despawns) instead of failing.
#[derive(Default)]
pub struct MockHost {
    next_handle: u64,
    actors: IndexMap<ActorHandle, MockActor>,
    calls: Vec<HostCall>,
    rejected_kinds: HashSet<EntityKind>,
    failing_spawns: usize,
    unsupported: HashSet<EventCategory>,
    stray_despawns: usize,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every spawn of `kind` fail with [`HostError::SpawnFailed`].
    pub fn reject_kind(&mut self, kind: impl Into<EntityKind>) {
        self.rejected_kinds.insert(kind.into());
    }

    /// Make the next `count` spawns fail with [`HostError::SpawnFailed`],
    /// whatever their kind.
    pub fn fail_next_spawns(&mut self, count: usize) {
        self.failing_spawns = count;
    }

    /// Report `category` as unsupported by the capability predicate.
    pub fn disable(&mut self, category: EventCategory) {
        self.unsupported.insert(category);
    }

    pub fn actor(&self, handle: ActorHandle) -> Option<&MockActor> {
        self.actors.get(&handle)
    }

    pub fn is_live(&self, handle: ActorHandle) -> bool {
        self.actors.contains_key(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.actors.len()
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Frames passed to `place_at` for `handle`, in order.
    pub fn placements(&self, handle: ActorHandle) -> Vec<Frame> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Place { handle: h, frame, .. } if *h == handle => Some(*frame),
                _ => None,
            })
            .collect()
    }

    pub fn spawn_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::Spawn { .. }))
            .count()
    }

    pub fn despawn_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::Despawn(_)))
            .count()
    }

    pub fn stray_despawns(&self) -> usize {
        self.stray_despawns
    }
}

impl ActorHost for MockHost {
    fn spawn(
        &mut self,
        kind: &EntityKind,
        frame: &Frame,
        state: &[u8],
    ) -> Result<ActorHandle, HostError> {
        if self.rejected_kinds.contains(kind) {
            return Err(HostError::SpawnFailed {
                kind: kind.clone(),
                reason: "kind rejected by mock host".into(),
            });
        }
        if self.failing_spawns > 0 {
            self.failing_spawns -= 1;
            return Err(HostError::SpawnFailed {
                kind: kind.clone(),
                reason: "transient failure injected by mock host".into(),
            });
        }
        if std::str::from_utf8(state).is_err() {
            return Err(HostError::MalformedActorState {
                detail: format!("{} bytes of non-UTF-8 state", state.len()),
            });
        }
        self.next_handle += 1;
        let handle = ActorHandle(self.next_handle);
        self.actors
            .insert(handle, MockActor::new(kind.clone(), *frame));
        self.calls.push(HostCall::Spawn {
            handle,
            kind: kind.clone(),
            frame: *frame,
        });
        Ok(handle)
    }

    fn despawn(&mut self, handle: ActorHandle) {
        if self.actors.shift_remove(&handle).is_none() {
            self.stray_despawns += 1;
        }
        self.calls.push(HostCall::Despawn(handle));
    }

    fn place_at(&mut self, handle: ActorHandle, frame: &Frame, motion: Option<Motion>) {
        if let Some(actor) = self.actors.get_mut(&handle) {
            actor.frame = *frame;
            actor.motion = motion;
        }
        self.calls.push(HostCall::Place {
            handle,
            frame: *frame,
            motion,
        });
    }

    fn apply(&mut self, handle: ActorHandle, effect: &ActorEffect) -> Result<(), HostError> {
        let actor = self
            .actors
            .get_mut(&handle)
            .ok_or(HostError::UnknownHandle { handle })?;
        match effect {
            ActorEffect::SetPose(pose) => actor.pose = *pose,
            ActorEffect::SetItem { slot, item } => match item {
                Some(stack) => {
                    actor.items.insert(*slot, stack.clone());
                }
                None => {
                    actor.items.remove(slot);
                }
            },
            ActorEffect::SetSleeping(bed) => actor.sleeping = *bed,
            ActorEffect::SetAlive(alive) => actor.alive = *alive,
            ActorEffect::SetBreakProgress { pos, progress } => {
                if *progress < 0 {
                    actor.cracks.remove(pos);
                } else {
                    actor.cracks.insert(*pos, *progress);
                }
            }
            ActorEffect::SetEmote(name) => actor.emote = name.clone(),
            ActorEffect::PlaySound { sound, .. } => actor.sounds.push(sound.clone()),
        }
        self.calls.push(HostCall::Apply {
            handle,
            effect: effect.clone(),
        });
        Ok(())
    }

    fn is_event_kind_supported(&self, category: EventCategory) -> bool {
        !self.unsupported.contains(&category)
    }
}
