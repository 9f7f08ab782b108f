//! Goal detection for the ball
//!
//! Collisions come in from the host's physics; the round loop polls once per
//! tick. The goal flag is edge-triggered: one collision, one scoring event.

use serde::{Deserialize, Serialize};

use super::state::PlayerId;

/// What the ball touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactTag {
    /// Goal sensor that credits the given player
    Goal(PlayerId),
    /// A player's car
    Car(PlayerId),
    /// Walls, floor, anything else
    Boundary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BallState {
    goal_scored: bool,
    scoring_player: Option<PlayerId>,
    /// Last car to touch the ball this round
    last_touch: Option<PlayerId>,
}

impl BallState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a contact; returns true when it was a goal
    ///
    /// An unconsumed goal is overwritten, last write wins.
    pub fn report_collision(&mut self, tag: ContactTag) -> bool {
        match tag {
            ContactTag::Goal(player) => {
                self.goal_scored = true;
                self.scoring_player = Some(player);
                true
            }
            ContactTag::Car(player) => {
                self.last_touch = Some(player);
                false
            }
            ContactTag::Boundary => false,
        }
    }

    /// Read and clear the goal flag, yielding the scorer if a goal was pending
    pub fn take_goal(&mut self) -> Option<PlayerId> {
        if std::mem::take(&mut self.goal_scored) {
            self.scoring_player
        } else {
            None
        }
    }

    /// Whether a goal is waiting to be taken
    pub fn goal_pending(&self) -> bool {
        self.goal_scored
    }

    /// Scorer of the most recent goal, consumed or not
    pub fn scoring_player(&self) -> Option<PlayerId> {
        self.scoring_player
    }

    pub fn last_touch(&self) -> Option<PlayerId> {
        self.last_touch
    }

    /// Back to kickoff: no pending goal, no touches
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
