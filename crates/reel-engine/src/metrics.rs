//! Cumulative playback counters.
//!
//! [`PlaybackMetrics`] is updated in place by the session and its players.
//! Every downgraded failure bumps a counter here in addition to being
//! logged, so tests and telemetry can observe degraded playback without
//! scraping logs.

/// Counters accumulated over a session's lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaybackMetrics {
    /// Ticks advanced (animated or silent).
    pub ticks: u64,
    /// Successful actor spawns.
    pub spawns: u64,
    /// Despawns scheduled.
    pub despawns: u64,
    /// Spawns abandoned after a host error.
    pub spawn_failures: u64,
    /// Events applied forward.
    pub events_applied: u64,
    /// Events undone during rewind.
    pub events_reversed: u64,
    /// Events skipped because the host lacks the capability.
    pub events_skipped: u64,
    /// Forward or reverse applications the host rejected.
    pub event_failures: u64,
    /// End-of-cycle loop resets.
    pub loops: u64,
    /// Calls to `change_location_by_tick`.
    pub seeks: u64,
}
