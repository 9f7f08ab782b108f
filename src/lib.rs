//! Road To Goal - two-player car soccer round engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (round phases, scoring, pickups)
//! - `host`: Interface to the engine that renders, plays audio and runs physics
//! - `settings`: Match configuration
//! - `tuning`: Data-driven pickup balance

pub mod audio;
pub mod error;
pub mod host;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::{ConfigError, HostError, InvalidPlayer, InvariantViolation, PickupError};
pub use host::MatchHost;
pub use settings::{MatchSettings, SpawnPoint};
pub use sim::{RoundCoordinator, setup_match};
pub use tuning::PickupTuning;

/// Game configuration constants
pub mod consts {
    /// Default simulation rate (one tick per rendered frame)
    pub const DEFAULT_TICK_HZ: u32 = 60;
    /// Upper bound on ticks the demo runs before giving up on a match
    pub const MAX_MATCH_TICKS: u64 = 60 * 60 * 30;
}
