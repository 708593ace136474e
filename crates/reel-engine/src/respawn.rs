//! Respawn-distance heuristic.
//!
//! A small positional discontinuity can be hidden by a silent teleport.
//! A large one would read as the actor sliding across the world, so it is
//! turned into a despawn+respawn, which is instant and never seen as
//! motion.

use reel_core::Position;

/// Default distance (world units) at which a jump requires a respawn.
pub const RESPAWN_THRESHOLD: f64 = 0.8;

/// Decides between silent teleport and despawn+respawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RespawnPolicy {
    threshold: f64,
}

impl Default for RespawnPolicy {
    fn default() -> Self {
        Self::new(RESPAWN_THRESHOLD)
    }
}

impl RespawnPolicy {
    /// A policy with the given threshold distance.
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The threshold distance.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// `true` when `a` and `b` are at least `threshold` apart.
    pub fn need_to_respawn(&self, a: &Position, b: &Position) -> bool {
        a.distance_squared(b) >= self.threshold * self.threshold
    }
}

/// [`RespawnPolicy::need_to_respawn`] with the default threshold.
pub fn need_to_respawn(a: &Position, b: &Position) -> bool {
    RespawnPolicy::default().need_to_respawn(a, b)
}
