//! Benchmark profiles for Reel playback.
//!
//! - [`crowd_animation`]: one master plus many staggered secondaries,
//!   each with seeded random events

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use reel_core::Animation;
use reel_test_utils::{random_timeline, random_timeline_from};

/// Build an animation of `actors` timelines with `frames` frames each.
///
/// Secondaries spawn at staggered ticks so spawns keep happening during
/// playback. Every timeline carries `frames / 4` random events.
pub fn crowd_animation(actors: usize, frames: usize, seed: u64) -> Animation {
    let events = frames / 4;
    let master = random_timeline(seed, "minecraft:player", frames, events);
    let mut animation = Animation::new("crowd", master.shared());
    for i in 1..actors {
        let timeline = random_timeline_from(
            seed.wrapping_add(i as u64),
            "minecraft:zombie",
            (i % 20) as u32,
            frames,
            events,
        );
        animation = animation.with_secondary(timeline.shared());
    }
    animation
}
