//! Determinism checks for timeline playback.
//!
//! A played-back actor must be placed at exactly the recorded frames, in
//! order. This crate hashes frame sequences and compares what a host
//! actually received against what a [`Timeline`](reel_core::Timeline)
//! recorded.
//!
//! - [`trace_hash`] and [`timeline_hash`] fingerprint recordings
//! - [`compare_trace`] checks a finished trace, hash first
//! - [`replay_and_compare`] drives playback step by step and stops at
//!   the first divergence

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compare;
pub mod hash;

pub use compare::{compare_trace, replay_and_compare, DivergenceReport, PlacementDivergence};
pub use hash::{frame_hash, timeline_hash, trace_hash};
