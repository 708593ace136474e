//! Discrete, timestamped actor events and the effects they apply.
//!
//! Events are a closed enum. Applying one forward yields a single
//! [`ActorEffect`]; undoing one is answered by the owning
//! [`Timeline`](crate::Timeline), which scans backward for the most recent
//! earlier event writing the same [`StateKey`].

use std::fmt;

/// Body pose of an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Pose {
    /// Upright. The pose every freshly spawned actor starts in.
    #[default]
    Standing,
    /// Sneaking.
    Crouching,
    /// Swimming or crawling.
    Swimming,
    /// Elytra gliding.
    FallFlying,
    /// Riptide spin attack.
    SpinAttack,
    /// Lying in a bed.
    Sleeping,
    /// Death animation.
    Dying,
}

/// Equipment slot an item change targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EquipmentSlot {
    /// Primary hand.
    MainHand,
    /// Secondary hand.
    OffHand,
    /// Helmet slot.
    Head,
    /// Chestplate slot.
    Chest,
    /// Leggings slot.
    Legs,
    /// Boots slot.
    Feet,
}

/// A stack of items held in an equipment slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemStack {
    /// Host item identifier (e.g. `"minecraft:iron_sword"`).
    pub id: String,
    /// Stack size.
    pub count: u32,
}

impl ItemStack {
    /// A stack of `count` items with the given identifier.
    pub fn new(id: impl Into<String>, count: u32) -> Self {
        Self {
            id: id.into(),
            count,
        }
    }
}

/// Integer block coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    /// Block x.
    pub x: i32,
    /// Block y.
    pub y: i32,
    /// Block z.
    pub z: i32,
}

impl BlockPos {
    /// Construct a block position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Coarse event class used by the host capability predicate.
///
/// A host lacking an optional feature (say, an emote system) reports the
/// matching category as unsupported and playback skips those events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Pose changes.
    Pose,
    /// Equipment changes.
    Equipment,
    /// Sleep and wake.
    Sleep,
    /// Death and respawn.
    Life,
    /// Block breaking progress.
    BreakBlock,
    /// Emotes.
    Emote,
    /// Sounds.
    Sound,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pose => "pose",
            Self::Equipment => "equipment",
            Self::Sleep => "sleep",
            Self::Life => "life",
            Self::BreakBlock => "break_block",
            Self::Emote => "emote",
            Self::Sound => "sound",
        };
        f.write_str(name)
    }
}

/// The piece of actor state an event writes.
///
/// Two events are "related" for rewind purposes when they share a key:
/// undoing one restores whatever the previous event with the same key set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// Body pose.
    Pose,
    /// One equipment slot.
    Slot(EquipmentSlot),
    /// Sleeping flag and bed position.
    Sleep,
    /// Alive/dead flag.
    Life,
    /// Break progress at one block.
    Block(BlockPos),
    /// Currently playing emote.
    Emote,
    /// Fire-and-forget output with no persistent state.
    Transient,
}

impl StateKey {
    /// Effect that restores this key to its spawn-time value, or `None`
    /// for transient keys.
    pub fn default_effect(self) -> Option<ActorEffect> {
        match self {
            Self::Pose => Some(ActorEffect::SetPose(Pose::Standing)),
            Self::Slot(slot) => Some(ActorEffect::SetItem { slot, item: None }),
            Self::Sleep => Some(ActorEffect::SetSleeping(None)),
            Self::Life => Some(ActorEffect::SetAlive(true)),
            Self::Block(pos) => Some(ActorEffect::SetBreakProgress { pos, progress: -1 }),
            Self::Emote => Some(ActorEffect::SetEmote(None)),
            Self::Transient => None,
        }
    }
}

/// What happened at a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    /// Pose change.
    Pose(Pose),
    /// Equipment slot change; `None` empties the slot.
    Equip {
        /// Slot that changed.
        slot: EquipmentSlot,
        /// New contents.
        item: Option<ItemStack>,
    },
    /// The actor lay down in a bed.
    Sleep {
        /// Bed block.
        bed: BlockPos,
    },
    /// The actor woke up.
    Wake,
    /// The actor died.
    Death,
    /// The actor came back to life.
    Respawn,
    /// Block breaking progress; `-1` clears the crack overlay.
    BreakBlock {
        /// Block being broken.
        pos: BlockPos,
        /// Crack stage in `-1..=9`.
        progress: i8,
    },
    /// Emote started (`Some`) or stopped (`None`).
    Emote {
        /// Emote identifier.
        name: Option<String>,
    },
    /// A sound played at the actor.
    Sound {
        /// Sound identifier.
        sound: String,
        /// Volume multiplier.
        volume: f32,
        /// Pitch multiplier.
        pitch: f32,
    },
}

impl EventKind {
    /// Capability category of this event.
    pub fn category(&self) -> EventCategory {
        match self {
            Self::Pose(_) => EventCategory::Pose,
            Self::Equip { .. } => EventCategory::Equipment,
            Self::Sleep { .. } | Self::Wake => EventCategory::Sleep,
            Self::Death | Self::Respawn => EventCategory::Life,
            Self::BreakBlock { .. } => EventCategory::BreakBlock,
            Self::Emote { .. } => EventCategory::Emote,
            Self::Sound { .. } => EventCategory::Sound,
        }
    }

    /// Actor state written by this event.
    pub fn state_key(&self) -> StateKey {
        match self {
            Self::Pose(_) => StateKey::Pose,
            Self::Equip { slot, .. } => StateKey::Slot(*slot),
            Self::Sleep { .. } | Self::Wake => StateKey::Sleep,
            Self::Death | Self::Respawn => StateKey::Life,
            Self::BreakBlock { pos, .. } => StateKey::Block(*pos),
            Self::Emote { .. } => StateKey::Emote,
            Self::Sound { .. } => StateKey::Transient,
        }
    }

    /// Whether the event leaves no state behind (replayed history skips it).
    pub fn is_transient(&self) -> bool {
        self.state_key() == StateKey::Transient
    }

    /// Effect that moves a live actor to this event's target state.
    pub fn forward_effect(&self) -> ActorEffect {
        match self {
            Self::Pose(pose) => ActorEffect::SetPose(*pose),
            Self::Equip { slot, item } => ActorEffect::SetItem {
                slot: *slot,
                item: item.clone(),
            },
            Self::Sleep { bed } => ActorEffect::SetSleeping(Some(*bed)),
            Self::Wake => ActorEffect::SetSleeping(None),
            Self::Death => ActorEffect::SetAlive(false),
            Self::Respawn => ActorEffect::SetAlive(true),
            Self::BreakBlock { pos, progress } => ActorEffect::SetBreakProgress {
                pos: *pos,
                progress: *progress,
            },
            Self::Emote { name } => ActorEffect::SetEmote(name.clone()),
            Self::Sound {
                sound,
                volume,
                pitch,
            } => ActorEffect::PlaySound {
                sound: sound.clone(),
                volume: *volume,
                pitch: *pitch,
            },
        }
    }
}

/// A tagged, timestamped action in an actor's history.
///
/// `tick` is a global tick: it lies in
/// `[timeline.spawn_tick, timeline.spawn_tick + frames.len())`.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteEvent {
    /// Global tick at which the event fires.
    pub tick: u32,
    /// What happens.
    pub kind: EventKind,
}

impl DiscreteEvent {
    /// An event of `kind` firing at `tick`.
    pub fn new(tick: u32, kind: EventKind) -> Self {
        Self { tick, kind }
    }
}

/// A single state mutation requested from the host.
#[derive(Clone, Debug, PartialEq)]
pub enum ActorEffect {
    /// Set the body pose.
    SetPose(Pose),
    /// Replace the contents of an equipment slot.
    SetItem {
        /// Slot to write.
        slot: EquipmentSlot,
        /// New contents.
        item: Option<ItemStack>,
    },
    /// Put to sleep in a bed (`Some`) or wake up (`None`).
    SetSleeping(Option<BlockPos>),
    /// Kill (`false`) or revive (`true`).
    SetAlive(bool),
    /// Set crack progress on a block.
    SetBreakProgress {
        /// Block to crack.
        pos: BlockPos,
        /// Crack stage; `-1` clears.
        progress: i8,
    },
    /// Start (`Some`) or stop (`None`) an emote.
    SetEmote(Option<String>),
    /// Play a sound at the actor.
    PlaySound {
        /// Sound identifier.
        sound: String,
        /// Volume multiplier.
        volume: f32,
        /// Pitch multiplier.
        pitch: f32,
    },
}
