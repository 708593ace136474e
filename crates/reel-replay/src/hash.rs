//! FNV-1a fingerprints of frames and timelines.
//!
//! Not cryptographic; used for fast equality checks before a per-frame
//! comparison. Floats are hashed by bit pattern so `0.0` and `-0.0`
//! differ.

use reel_core::{Frame, Timeline};

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fold_frame(mut hash: u64, frame: &Frame) -> u64 {
    hash = fnv1a_bytes(hash, &frame.x.to_bits().to_le_bytes());
    hash = fnv1a_bytes(hash, &frame.y.to_bits().to_le_bytes());
    hash = fnv1a_bytes(hash, &frame.z.to_bits().to_le_bytes());
    hash = fnv1a_bytes(hash, &frame.pitch.to_bits().to_le_bytes());
    hash = fnv1a_bytes(hash, &frame.yaw.to_bits().to_le_bytes());
    fnv1a_byte(hash, frame.grounded as u8)
}

/// Hash of a single frame.
pub fn frame_hash(frame: &Frame) -> u64 {
    fold_frame(FNV_OFFSET, frame)
}

/// Hash of a frame sequence. Order and length both matter.
///
/// Returns `FNV_OFFSET` for an empty slice.
pub fn trace_hash(frames: &[Frame]) -> u64 {
    frames.iter().fold(FNV_OFFSET, fold_frame)
}

/// Hash of everything that determines a timeline's playback: spawn tick,
/// frames, event ticks and categories, and the opaque actor state.
pub fn timeline_hash(timeline: &Timeline) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_bytes(hash, &timeline.spawn_tick().to_le_bytes());
    if let Some(kind) = timeline.actor_kind() {
        hash = fnv1a_bytes(hash, kind.as_str().as_bytes());
    }
    hash = fnv1a_bytes(hash, &timeline.len().to_le_bytes());
    hash = timeline.frames().iter().fold(hash, fold_frame);
    for event in timeline.events() {
        hash = fnv1a_bytes(hash, &event.tick.to_le_bytes());
        hash = fnv1a_byte(hash, event.kind.category() as u8);
    }
    fnv1a_bytes(hash, timeline.actor_state())
}
