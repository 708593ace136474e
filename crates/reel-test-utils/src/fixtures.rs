//! Reusable timeline fixtures.
//!
//! - [`straight_line`]: frames one step apart along +x.
//! - [`walk_timeline`]: a bound timeline over a straight line.
//! - [`random_timeline`], [`random_timeline_from`]: seeded random events
//!   over a straight line.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reel_core::{BlockPos, EquipmentSlot, EventKind, Frame, ItemStack, Pose, Timeline};

/// `len` grounded frames starting at the origin, `step` apart along +x.
pub fn straight_line(len: usize, step: f64) -> Vec<Frame> {
    (0..len).map(|i| Frame::at(i as f64 * step, 0.0, 0.0)).collect()
}

/// A `len`-frame timeline of `kind` walking one block per tick.
pub fn walk_timeline(kind: &str, len: usize) -> Timeline {
    Timeline::new(kind, straight_line(len, 1.0))
}

const POSES: [Pose; 4] = [
    Pose::Standing,
    Pose::Crouching,
    Pose::Swimming,
    Pose::FallFlying,
];

const SLOTS: [EquipmentSlot; 3] = [
    EquipmentSlot::MainHand,
    EquipmentSlot::OffHand,
    EquipmentSlot::Head,
];

fn random_kind(rng: &mut ChaCha8Rng) -> EventKind {
    match rng.random_range(0..8u32) {
        0 => EventKind::Pose(POSES[rng.random_range(0..POSES.len())]),
        1 => EventKind::Equip {
            slot: SLOTS[rng.random_range(0..SLOTS.len())],
            item: if rng.random_bool(0.7) {
                Some(ItemStack::new("minecraft:stick", rng.random_range(1..=64)))
            } else {
                None
            },
        },
        2 => EventKind::Sleep {
            bed: BlockPos::new(rng.random_range(-4..4), 64, rng.random_range(-4..4)),
        },
        3 => EventKind::Wake,
        4 => {
            if rng.random_bool(0.5) {
                EventKind::Death
            } else {
                EventKind::Respawn
            }
        }
        5 => EventKind::BreakBlock {
            pos: BlockPos::new(rng.random_range(0..2), 63, 0),
            progress: rng.random_range(-1..=9),
        },
        6 => EventKind::Emote {
            name: if rng.random_bool(0.5) {
                Some("wave".into())
            } else {
                None
            },
        },
        _ => EventKind::Sound {
            sound: "entity.player.burp".into(),
            volume: 1.0,
            pitch: 1.0,
        },
    }
}

/// A `len`-frame timeline of `kind` carrying `event_count` random events.
///
/// Deterministic for a given `seed`. Event ticks are drawn from the
/// timeline's lifetime, so the result always validates.
pub fn random_timeline(seed: u64, kind: &str, len: usize, event_count: usize) -> Timeline {
    random_timeline_from(seed, kind, 0, len, event_count)
}

/// Like [`random_timeline`], for an actor that first appears at global
/// tick `spawn_tick`. Event ticks lie in `[spawn_tick, spawn_tick + len)`.
pub fn random_timeline_from(
    seed: u64,
    kind: &str,
    spawn_tick: u32,
    len: usize,
    event_count: usize,
) -> Timeline {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut timeline = walk_timeline(kind, len.max(1)).with_spawn_tick(spawn_tick);
    let range = timeline.spawn_tick()..timeline.end_tick();
    for _ in 0..event_count {
        let tick = rng.random_range(range.clone());
        let kind = random_kind(&mut rng);
        timeline = timeline.with_event(tick, kind);
    }
    timeline
}
