//! Multi-actor timeline playback.
//!
//! A [`PlaybackSession`] drives one or more [`ActorPlayer`]s against an
//! [`ActorHost`](reel_core::ActorHost) on a shared global clock: ticking,
//! random-access seeking, looping, and actor lifecycle. A
//! [`PlaybackRegistry`] holds every session playing on the server.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod effects;
pub mod looping;
pub mod metrics;
pub mod player;
pub mod registry;
pub mod respawn;
pub mod session;

pub use config::{ConfigError, PlaybackConfig, SessionRole};
pub use effects::{EffectQueue, HostCommand};
pub use looping::{CycleDecision, LoopController, RewindAction};
pub use metrics::PlaybackMetrics;
pub use player::{ActorPlayer, Placement, SeekOutcome};
pub use registry::PlaybackRegistry;
pub use respawn::{need_to_respawn, RespawnPolicy, RESPAWN_THRESHOLD};
pub use session::{PlaybackSession, PlaybackState, StopCallback};
