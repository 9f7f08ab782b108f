//! Error taxonomy for match setup and the round loop
//!
//! - `ConfigError`: bad settings, rejected before the first tick
//! - `PickupError`: illegal pickup state transitions
//! - `InvariantViolation`: collaborator contract breaches; the match blocks
//! - `HostError`: a collaborator could not honour a request; logged and skipped
//! - `InvalidPlayer`: a player number that cannot name a seat

use thiserror::Error;

use crate::audio::Cue;
use crate::sim::{PickupKind, PlayerId};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read settings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("goals_to_win must be positive")]
    InvalidGoalsToWin,

    #[error("{name} must be a finite, non-negative number of seconds (got {value})")]
    InvalidDelay { name: &'static str, value: f32 },

    #[error("tick_hz must be positive")]
    InvalidTickRate,

    #[error("effect_duration_ticks must be positive")]
    InvalidEffectDuration,

    #[error("{name} must be finite (got {value})")]
    NonFinite { name: &'static str, value: f32 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupError {
    #[error("already holding a {held:?} pickup")]
    Occupied { held: PickupKind },

    #[error("no pickup held to activate")]
    NotHeld,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("round resolved without a recorded scorer")]
    NoScorer,

    #[error("goal credited to player {0}, who is not in this match")]
    UnknownScorer(PlayerId),

    #[error("pickup state breach for player {player}: {source}")]
    Pickup {
        player: PlayerId,
        #[source]
        source: PickupError,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("player numbers start at 1 (got {0})")]
pub struct InvalidPlayer(pub u8);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("audio cue {0:?} is not available")]
    MissingCue(Cue),

    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}
