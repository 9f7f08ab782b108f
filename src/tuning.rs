//! Data-driven pickup balance
//!
//! Effect magnitudes per pickup kind. Built once from settings and passed by
//! reference into every `PickupController`; nothing mutates it during a match.

use serde::{Deserialize, Serialize};

use crate::sim::{PickupKind, StatDelta};

/// Magnitudes for both pickup kinds plus the shared effect duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    /// Top speed and acceleration added to the collector (Speed)
    pub speed_gain: f32,
    /// Engine pitch added to the collector (Speed)
    pub pitch_gain: f32,
    /// Top speed removed from the opponent (Explosion)
    pub speed_loss: f32,
    /// Engine pitch removed from the opponent (Explosion)
    pub pitch_loss: f32,
    /// Controller ticks an activated effect stays applied
    pub effect_duration_ticks: u32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            speed_gain: 100.0,
            pitch_gain: 0.8,
            speed_loss: 90.0,
            pitch_loss: 0.8,
            effect_duration_ticks: 40,
        }
    }
}

/// Which car an effect lands on, relative to the player who fired it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    Own,
    Opponent,
}

impl PickupTuning {
    /// Target side for a pickup kind
    pub fn target(&self, kind: PickupKind) -> EffectTarget {
        match kind {
            PickupKind::Speed => EffectTarget::Own,
            PickupKind::Explosion => EffectTarget::Opponent,
        }
    }

    /// Stat delta applied on activation (revert applies the negation)
    pub fn delta(&self, kind: PickupKind) -> StatDelta {
        match kind {
            PickupKind::Speed => StatDelta {
                top_speed: self.speed_gain,
                speed_increment: self.speed_gain,
                engine_pitch: self.pitch_gain,
            },
            PickupKind::Explosion => StatDelta {
                top_speed: -self.speed_loss,
                speed_increment: 0.0,
                engine_pitch: -self.pitch_loss,
            },
        }
    }

    /// Magnitudes as (name, value) pairs, for validation
    pub(crate) fn magnitudes(&self) -> [(&'static str, f32); 4] {
        [
            ("speed_gain", self.speed_gain),
            ("pitch_gain", self.pitch_gain),
            ("speed_loss", self.speed_loss),
            ("pitch_loss", self.pitch_loss),
        ]
    }
}
