//! Core types and traits for the Reel playback framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! recorded data model (frames, discrete events, timelines), the strongly
//! typed identifiers, the error enums, and the [`ActorHost`] boundary trait
//! through which playback touches the host world.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod event;
pub mod frame;
pub mod id;
pub mod timeline;
pub mod traits;

pub use error::{HostError, TimelineError};
pub use event::{
    ActorEffect, BlockPos, DiscreteEvent, EquipmentSlot, EventCategory, EventKind, ItemStack,
    Pose, StateKey,
};
pub use frame::{Frame, Motion, Position};
pub use id::{ActorHandle, EntityKind, SessionId};
pub use timeline::{Animation, Timeline};
pub use traits::ActorHost;
