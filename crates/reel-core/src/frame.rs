//! Per-tick pose snapshots.

/// A point in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
}

impl Position {
    /// Construct a position from its three coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared euclidean distance to `other`.
    ///
    /// Threshold checks compare squared distances so that a threshold of
    /// exactly `d` is hit by a displacement of exactly `d` without a
    /// square-root rounding step in between.
    pub fn distance_squared(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Position) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Per-tick displacement handed to the host alongside a placement.
///
/// Hosts use it to drive velocity-dependent behavior (footstep particles,
/// limb swing) that a bare teleport would not trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Motion {
    /// Displacement along x.
    pub dx: f64,
    /// Displacement along y.
    pub dy: f64,
    /// Displacement along z.
    pub dz: f64,
}

impl Motion {
    /// The zero displacement.
    pub const ZERO: Motion = Motion {
        dx: 0.0,
        dy: 0.0,
        dz: 0.0,
    };
}

/// Immutable snapshot of an actor's pose at one tick.
///
/// Recorded densely: a timeline holds exactly one `Frame` per tick of the
/// actor's lifetime, indexed by local tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
    /// Head pitch in degrees.
    pub pitch: f32,
    /// Body yaw in degrees.
    pub yaw: f32,
    /// Whether the actor stood on solid ground.
    pub grounded: bool,
}

impl Frame {
    /// A grounded frame at `(x, y, z)` with zero rotation.
    pub const fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            pitch: 0.0,
            yaw: 0.0,
            grounded: true,
        }
    }

    /// Return a copy with the given rotation.
    pub const fn with_rotation(mut self, pitch: f32, yaw: f32) -> Self {
        self.pitch = pitch;
        self.yaw = yaw;
        self
    }

    /// The frame's position.
    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }

    /// Displacement from this frame to `next`.
    pub fn motion_to(&self, next: &Frame) -> Motion {
        Motion {
            dx: next.x - self.x,
            dy: next.y - self.y,
            dz: next.z - self.z,
        }
    }

    /// Bit-exact equality, used by determinism checks.
    ///
    /// Unlike `==`, treats two NaNs with the same payload as equal and
    /// `0.0`/`-0.0` as different.
    pub fn bit_eq(&self, other: &Frame) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
            && self.pitch.to_bits() == other.pitch.to_bits()
            && self.yaw.to_bits() == other.yaw.to_bits()
            && self.grounded == other.grounded
    }
}
