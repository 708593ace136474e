//! Reel: timeline playback for recorded actors.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Reel sub-crates. Adding `reel` as a single dependency is enough for
//! a host integration.
//!
//! # Quick start
//!
//! ```rust
//! use reel::prelude::*;
//! use reel_test_utils::{walk_timeline, MockHost};
//!
//! let animation = Animation::new(
//!     "wave",
//!     walk_timeline("minecraft:villager", 3)
//!         .with_event(1, EventKind::Pose(Pose::Crouching))
//!         .shared(),
//! );
//! let mut host = MockHost::new();
//! let mut session = PlaybackSession::new(&animation, PlaybackConfig::default()).unwrap();
//! session.start(&mut host, None);
//!
//! while session.is_playing() {
//!     session.tick(&mut host);
//! }
//! assert!(session.has_ended());
//! assert_eq!(host.live_count(), 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `reel-core` | Frames, events, timelines, the `ActorHost` trait |
//! | [`engine`] | `reel-engine` | Players, sessions, looping, the registry |
//! | [`replay`] | `reel-replay` | Trace hashing and determinism checks |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the host boundary (`reel-core`).
///
/// Implement [`types::ActorHost`] to connect playback to a game.
pub use reel_core as types;

/// Playback engine (`reel-engine`).
///
/// [`engine::PlaybackSession`] plays one animation;
/// [`engine::PlaybackRegistry`] ticks many.
pub use reel_engine as engine;

/// Determinism verification (`reel-replay`).
pub use reel_replay as replay;

/// Common imports for typical Reel usage.
///
/// ```rust
/// use reel::prelude::*;
/// let config = PlaybackConfig::looping();
/// assert!(config.validate().is_ok());
/// ```
pub mod prelude {
    // Core
    pub use reel_core::{
        ActorEffect, ActorHandle, ActorHost, Animation, DiscreteEvent, EntityKind, EventCategory,
        EventKind, Frame, HostError, Motion, Pose, SessionId, Timeline, TimelineError,
    };

    // Engine
    pub use reel_engine::{
        ConfigError, PlaybackConfig, PlaybackMetrics, PlaybackRegistry, PlaybackSession,
        PlaybackState, SessionRole,
    };
}
