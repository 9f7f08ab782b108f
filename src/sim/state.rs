//! Match state and core simulation types
//!
//! Per-player state that persists across rounds lives here, along with the
//! round phase enum the coordinator drives.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidPlayer;
use crate::settings::CarBaseline;

/// Throttle magnitude below which the car counts as idle
pub const THROTTLE_DEADZONE: f32 = 0.1;

/// Stable player identity (1-based, unique per match)
///
/// Zero never constructs, deserialized input included, so `index` cannot
/// underflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    pub const ONE: PlayerId = PlayerId(1);
    pub const TWO: PlayerId = PlayerId(2);

    /// Identity from a player number; zero is not a valid player
    pub fn new(number: u8) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based slot for per-player arrays
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = InvalidPlayer;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number).ok_or(InvalidPlayer(number))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current phase of the round loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Entities reset, control disabled, waiting out the start delay
    Starting,
    /// Control enabled, polling for a goal each tick
    Playing,
    /// Goal resolved, waiting out the end delay
    Ending,
}

/// What the caller should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Keep ticking
    Running,
    /// A player reached the goal threshold; restart from a clean slate to play again
    Finished { winner: PlayerId },
}

/// Signed change to a car's mutable performance fields
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatDelta {
    pub top_speed: f32,
    pub speed_increment: f32,
    pub engine_pitch: f32,
}

impl StatDelta {
    pub fn inverse(self) -> Self {
        Self {
            top_speed: -self.top_speed,
            speed_increment: -self.speed_increment,
            engine_pitch: -self.engine_pitch,
        }
    }
}

/// Mutable car performance, modified in place by pickup effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarStats {
    pub top_speed: f32,
    pub speed_increment: f32,
    pub engine_pitch: f32,
    /// Speed the host should move the car at this tick
    pub current_speed: f32,
}

impl CarStats {
    pub fn from_baseline(baseline: &CarBaseline) -> Self {
        Self {
            top_speed: baseline.top_speed,
            speed_increment: baseline.speed_increment,
            engine_pitch: baseline.engine_pitch,
            current_speed: 0.0,
        }
    }

    pub fn apply(&mut self, delta: StatDelta) {
        self.top_speed += delta.top_speed;
        self.speed_increment += delta.speed_increment;
        self.engine_pitch += delta.engine_pitch;
    }

    /// Ramp toward top speed while throttled, drop to rest otherwise
    pub fn drive(&mut self, throttle: f32) {
        if throttle.abs() > THROTTLE_DEADZONE {
            if self.current_speed < self.top_speed {
                self.current_speed += self.speed_increment;
            }
        } else if self.current_speed > 0.0 {
            self.current_speed = 0.0;
        }
    }

    /// Pull current speed down to a (possibly reduced) top speed
    pub fn clamp_to_top_speed(&mut self) {
        self.current_speed = self.current_speed.min(self.top_speed);
    }
}

/// Per-player state that lives for the whole match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAgent {
    id: PlayerId,
    /// Relation only; resolved through the roster
    opponent: PlayerId,
    /// Goals this game
    score: u32,
    control_enabled: bool,
    pub car: CarStats,
}

impl PlayerAgent {
    pub fn new(id: PlayerId, opponent: PlayerId, baseline: &CarBaseline) -> Self {
        Self {
            id,
            opponent,
            score: 0,
            control_enabled: false,
            car: CarStats::from_baseline(baseline),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn opponent(&self) -> PlayerId {
        self.opponent
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn control_enabled(&self) -> bool {
        self.control_enabled
    }

    pub(crate) fn set_control_enabled(&mut self, enabled: bool) {
        self.control_enabled = enabled;
    }

    /// Credit one goal
    pub(crate) fn add_goal(&mut self) -> u32 {
        self.score += 1;
        self.score
    }
}

/// The two agents of a match, keyed by identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    agents: [PlayerAgent; 2],
}

impl Roster {
    /// Wire players 1 and 2 as each other's opponent
    pub fn new(baseline: &CarBaseline) -> Self {
        Self {
            agents: [
                PlayerAgent::new(PlayerId::ONE, PlayerId::TWO, baseline),
                PlayerAgent::new(PlayerId::TWO, PlayerId::ONE, baseline),
            ],
        }
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerAgent> {
        self.agents.get(id.index())
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut PlayerAgent> {
        self.agents.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerAgent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlayerAgent> {
        self.agents.iter_mut()
    }

    pub fn ids(&self) -> [PlayerId; 2] {
        [self.agents[0].id, self.agents[1].id]
    }

    /// Scores in player order
    pub fn scores(&self) -> [u32; 2] {
        [self.agents[0].score, self.agents[1].score]
    }

    /// First player whose score has reached the threshold
    pub fn leader_at(&self, goals_to_win: u32) -> Option<PlayerId> {
        self.agents
            .iter()
            .find(|a| a.score == goals_to_win)
            .map(|a| a.id)
    }
}
