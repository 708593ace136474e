//! Session configuration, validation, and error types.
//!
//! [`PlaybackConfig`] carries the per-session knobs. Validation happens
//! once, when [`PlaybackSession::new`](crate::PlaybackSession::new) binds a
//! config to an [`Animation`](reel_core::Animation); nothing is re-checked
//! on the tick path.

use std::error::Error;
use std::fmt;

use reel_core::TimelineError;

use crate::respawn::RESPAWN_THRESHOLD;

// ── SessionRole ────────────────────────────────────────────────────

/// What a session is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionRole {
    /// Replaying recorded actors.
    #[default]
    Playback,
    /// Accompanying a live recording: the clock runs, but the end of the
    /// recorded timelines stops the session without touching actors.
    Recording,
}

// ── PlaybackConfig ─────────────────────────────────────────────────

/// Configuration for one [`PlaybackSession`](crate::PlaybackSession).
#[derive(Clone, Debug)]
pub struct PlaybackConfig {
    /// Restart from tick 0 when every actor has ended. Default: false.
    pub looping: bool,
    /// Play exactly once, even if `looping` is set. Default: false.
    pub unique: bool,
    /// Session role. Default: [`SessionRole::Playback`].
    pub role: SessionRole,
    /// Distance at or above which a jump is a despawn+respawn instead of a
    /// silent teleport. Default: [`RESPAWN_THRESHOLD`] (0.8).
    pub respawn_threshold: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            looping: false,
            unique: false,
            role: SessionRole::Playback,
            respawn_threshold: RESPAWN_THRESHOLD,
        }
    }
}

impl PlaybackConfig {
    /// A looping playback config.
    pub fn looping() -> Self {
        Self {
            looping: true,
            ..Self::default()
        }
    }

    /// Check config invariants.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidRespawnThreshold`] if the threshold is NaN,
    /// infinite, zero, or negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.respawn_threshold.is_finite() || self.respawn_threshold <= 0.0 {
            return Err(ConfigError::InvalidRespawnThreshold {
                value: self.respawn_threshold,
            });
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building a session.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `respawn_threshold` is NaN, infinite, zero, or negative.
    InvalidRespawnThreshold {
        /// The invalid value.
        value: f64,
    },
    /// A timeline failed validation.
    Timeline {
        /// Position of the timeline (0 = master).
        index: usize,
        /// What was wrong with it.
        source: TimelineError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRespawnThreshold { value } => {
                write!(f, "respawn_threshold must be finite and > 0, got {value}")
            }
            Self::Timeline { index, source } => write!(f, "timeline {index}: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Timeline { source, .. } => Some(source),
            _ => None,
        }
    }
}
