//! Per-player pickup state machine
//!
//! `Idle -> Held -> Active -> Idle`. Effects are additive deltas on the
//! target car's stats, so a controller must never apply twice or revert
//! twice. Each `Active` state carries the exact delta it applied and the
//! player it applied it to, and the revert replays that record inverted.

use serde::{Deserialize, Serialize};

use super::state::{PlayerId, Roster, StatDelta};
use crate::error::PickupError;
use crate::tuning::{EffectTarget, PickupTuning};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Boosts the collector's top speed and acceleration
    Speed,
    /// Slows the opponent
    Explosion,
}

impl PickupKind {
    pub const ALL: [PickupKind; 2] = [PickupKind::Speed, PickupKind::Explosion];

    pub fn as_str(&self) -> &'static str {
        match self {
            PickupKind::Speed => "Speed",
            PickupKind::Explosion => "Explosion",
        }
    }
}

/// A delta that has been applied and must be undone exactly once
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedEffect {
    pub kind: PickupKind,
    pub target: PlayerId,
    pub delta: StatDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PickupState {
    #[default]
    Idle,
    Held(PickupKind),
    Active {
        effect: AppliedEffect,
        remaining_ticks: u32,
    },
}

/// Pickup state for one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupController {
    owner: PlayerId,
    opponent: PlayerId,
    state: PickupState,
}

impl PickupController {
    pub fn new(owner: PlayerId, opponent: PlayerId) -> Self {
        Self {
            owner,
            opponent,
            state: PickupState::Idle,
        }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn state(&self) -> PickupState {
        self.state
    }

    /// Kind held or in use, for the pickup indicator
    pub fn held(&self) -> Option<PickupKind> {
        match self.state {
            PickupState::Idle => None,
            PickupState::Held(kind) => Some(kind),
            PickupState::Active { effect, .. } => Some(effect.kind),
        }
    }

    pub fn is_held(&self) -> bool {
        matches!(self.state, PickupState::Held(_))
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PickupState::Active { .. })
    }

    /// Take a pickup; a player holds at most one at a time
    pub fn collect(&mut self, kind: PickupKind) -> Result<(), PickupError> {
        match self.state {
            PickupState::Idle => {
                self.state = PickupState::Held(kind);
                Ok(())
            }
            _ => Err(PickupError::Occupied {
                held: self.held().unwrap_or(kind),
            }),
        }
    }

    /// Fire the held pickup, applying its effect once
    pub fn activate(
        &mut self,
        tuning: &PickupTuning,
        roster: &mut Roster,
    ) -> Result<AppliedEffect, PickupError> {
        let PickupState::Held(kind) = self.state else {
            return Err(PickupError::NotHeld);
        };

        let target = match tuning.target(kind) {
            EffectTarget::Own => self.owner,
            EffectTarget::Opponent => self.opponent,
        };
        let effect = AppliedEffect {
            kind,
            target,
            delta: tuning.delta(kind),
        };

        if let Some(agent) = roster.get_mut(target) {
            agent.car.apply(effect.delta);
            if kind == PickupKind::Explosion {
                // Knocked down to the reduced cap immediately
                agent.car.current_speed = agent.car.top_speed;
            }
        }

        log::debug!(
            "Player {} activated {} on player {}",
            self.owner,
            kind.as_str(),
            target
        );
        self.state = PickupState::Active {
            effect,
            remaining_ticks: tuning.effect_duration_ticks,
        };
        Ok(effect)
    }

    /// Count down an active effect; returns the effect if it expired this tick
    pub fn tick(&mut self, roster: &mut Roster) -> Option<AppliedEffect> {
        let PickupState::Active {
            effect,
            ref mut remaining_ticks,
        } = self.state
        else {
            return None;
        };

        *remaining_ticks = remaining_ticks.saturating_sub(1);
        if *remaining_ticks > 0 {
            return None;
        }

        revert(effect, roster);
        log::debug!("Player {} {} effect expired", self.owner, effect.kind.as_str());
        self.state = PickupState::Idle;
        Some(effect)
    }

    /// Drop whatever is held, undoing an active effect first
    pub fn force_clear(&mut self, roster: &mut Roster) {
        if let PickupState::Active { effect, .. } = self.state {
            revert(effect, roster);
        }
        self.state = PickupState::Idle;
    }
}

/// Subtract the recorded delta from the car it was applied to
///
/// An expiring Speed effect also pulls current speed down to the restored
/// top speed. It is clamped rather than set to top speed, so a car at rest
/// when the boost ends stays at rest.
fn revert(effect: AppliedEffect, roster: &mut Roster) {
    if let Some(agent) = roster.get_mut(effect.target) {
        agent.car.apply(effect.delta.inverse());
        if effect.kind == PickupKind::Speed {
            agent.car.clamp_to_top_speed();
        }
    }
}
