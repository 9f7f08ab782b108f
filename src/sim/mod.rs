//! Deterministic match simulation
//!
//! All round and pickup logic lives here. This module must stay pure:
//! - Fixed tick only, no wall-clock time
//! - Seeded RNG only
//! - Engine work (physics, rendering, audio) goes through `MatchHost`

pub mod ball;
pub mod pads;
pub mod pickup;
pub mod round;
pub mod state;
pub mod tick;

pub use ball::{BallState, ContactTag};
pub use pads::{PadField, PadRespawn, PickupPad};
pub use pickup::{AppliedEffect, PickupController, PickupKind, PickupState};
pub use round::{RoundCoordinator, Standings, setup_match};
pub use state::{
    CarStats, MatchStatus, PlayerAgent, PlayerId, Roster, RoundPhase, StatDelta,
    THROTTLE_DEADZONE,
};
pub use tick::{PlayerInput, TickInput};
