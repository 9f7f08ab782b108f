//! Audio cues requested by the match core
//!
//! The core never mixes or plays audio itself. It names a cue and the host
//! decides how (or whether) to play it.

use serde::{Deserialize, Serialize};

/// Sound cue identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Looping background music, running while a round is live
    Music,
    /// A goal was scored
    Goal,
    /// A car hit the ball
    BallHit,
    /// Explosion pickup detonated on the opponent
    Explosion,
    /// Car picked up a pickup from a pad
    PickupCollect,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Music => "music",
            Cue::Goal => "goal",
            Cue::BallHit => "ball_hit",
            Cue::Explosion => "explosion",
            Cue::PickupCollect => "pickup_collect",
        }
    }

    /// Looping cues must be stopped explicitly
    pub fn is_looping(&self) -> bool {
        matches!(self, Cue::Music)
    }
}
