//! Placement comparison and step-wise replay verification.
//!
//! Hash-first comparison (fast path) with a per-frame bit-exact fallback
//! on mismatch, plus a streaming driver that stops at the first divergent
//! placement.

use reel_core::{Frame, Timeline};

use crate::hash::{frame_hash, trace_hash};

/// One placement that differs between recording and replay.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementDivergence {
    /// Frame index within the timeline.
    pub local_tick: u32,
    /// The recorded frame, `None` if the replay placed extra frames.
    pub recorded: Option<Frame>,
    /// The replayed frame, `None` if the replay stopped early.
    pub replayed: Option<Frame>,
}

/// All divergences found for one actor.
#[derive(Clone, Debug)]
pub struct DivergenceReport {
    /// First frame index at which the replay diverged.
    pub first_divergent_tick: u32,
    /// Every divergent placement, in frame order.
    pub divergences: Vec<PlacementDivergence>,
}

/// Compare the frames a host received against the recording.
///
/// Returns `None` when `placed` matches `timeline.frames()` bit for bit.
/// Otherwise every differing index is reported, including a length
/// mismatch as divergences with one side `None`.
pub fn compare_trace(timeline: &Timeline, placed: &[Frame]) -> Option<DivergenceReport> {
    let recorded = timeline.frames();
    if recorded.len() == placed.len() && trace_hash(recorded) == trace_hash(placed) {
        return None;
    }

    let longest = recorded.len().max(placed.len());
    let mut divergences = Vec::new();
    for i in 0..longest {
        let rec = recorded.get(i);
        let rep = placed.get(i);
        let same = match (rec, rep) {
            (Some(a), Some(b)) => a.bit_eq(b),
            _ => false,
        };
        if !same {
            divergences.push(PlacementDivergence {
                local_tick: i as u32,
                recorded: rec.copied(),
                replayed: rep.copied(),
            });
        }
    }

    // Distinct traces can collide on the hash; the per-frame pass is
    // authoritative.
    let first = divergences.first()?.local_tick;
    Some(DivergenceReport {
        first_divergent_tick: first,
        divergences,
    })
}

/// Replay a timeline through a caller-provided step function and compare
/// each placement as it happens.
///
/// `step_fn` receives the frame index to play, advances playback by one
/// tick, and returns the frame the host was given (`None` if nothing was
/// placed). Returns at the first mismatch with a single-entry report.
pub fn replay_and_compare(
    timeline: &Timeline,
    step_fn: &mut dyn FnMut(u32) -> Option<Frame>,
) -> Option<DivergenceReport> {
    for (local_tick, recorded) in (0u32..).zip(timeline.frames()) {
        let replayed = step_fn(local_tick);
        let matches = replayed
            .as_ref()
            .is_some_and(|frame| frame_hash(frame) == frame_hash(recorded) && frame.bit_eq(recorded));
        if !matches {
            return Some(DivergenceReport {
                first_divergent_tick: local_tick,
                divergences: vec![PlacementDivergence {
                    local_tick,
                    recorded: Some(*recorded),
                    replayed,
                }],
            });
        }
    }
    None
}
