//! Pickup pads on the field
//!
//! Each pad carries a randomly rolled kind. Collecting hides the pad for the
//! respawn time, after which it comes back with a fresh roll.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pickup::PickupKind;

/// A single pad
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupPad {
    pub id: u32,
    /// Kind on offer; `None` while hidden
    pub kind: Option<PickupKind>,
    /// Ticks until a hidden pad reappears
    pub respawn_ticks: u64,
}

impl PickupPad {
    pub fn is_live(&self) -> bool {
        self.kind.is_some()
    }
}

/// Pad visibility change the host should mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadRespawn {
    pub pad: u32,
    pub kind: PickupKind,
}

/// All pads plus the RNG that rolls their kinds
#[derive(Debug, Clone)]
pub struct PadField {
    pads: Vec<PickupPad>,
    respawn_ticks: u64,
    rng: Pcg32,
}

impl PadField {
    pub fn new(count: u32, respawn_ticks: u64, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let pads = (0..count)
            .map(|id| PickupPad {
                id,
                kind: Some(roll_kind(&mut rng)),
                respawn_ticks: 0,
            })
            .collect();
        Self {
            pads,
            respawn_ticks,
            rng,
        }
    }

    pub fn pads(&self) -> &[PickupPad] {
        &self.pads
    }

    pub fn get(&self, id: u32) -> Option<&PickupPad> {
        self.pads.iter().find(|p| p.id == id)
    }

    /// Kind a pad currently offers, if it is live
    pub fn offer(&self, id: u32) -> Option<PickupKind> {
        self.get(id).and_then(|p| p.kind)
    }

    /// Hide a pad after its pickup was taken
    pub fn consume(&mut self, id: u32) -> Option<PickupKind> {
        let respawn = self.respawn_ticks;
        let pad = self.pads.iter_mut().find(|p| p.id == id)?;
        let kind = pad.kind.take()?;
        pad.respawn_ticks = respawn;
        Some(kind)
    }

    /// Advance respawn timers, returning pads that came back this tick
    pub fn tick(&mut self) -> Vec<PadRespawn> {
        let mut respawned = Vec::new();
        for pad in self.pads.iter_mut().filter(|p| p.kind.is_none()) {
            pad.respawn_ticks = pad.respawn_ticks.saturating_sub(1);
            if pad.respawn_ticks == 0 {
                let kind = roll_kind(&mut self.rng);
                pad.kind = Some(kind);
                log::debug!("Pad {} respawned with {}", pad.id, kind.as_str());
                respawned.push(PadRespawn { pad: pad.id, kind });
            }
        }
        respawned
    }
}

fn roll_kind(rng: &mut Pcg32) -> PickupKind {
    PickupKind::ALL[rng.random_range(0..PickupKind::ALL.len())]
}
