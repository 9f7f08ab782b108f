//! Match settings
//!
//! Static configuration for one match, loaded from JSON. Missing fields fall
//! back to defaults so a settings file only needs the values it overrides.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_TICK_HZ;
use crate::error::ConfigError;
use crate::tuning::PickupTuning;

/// Spawn pose on the field plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: Vec2,
    /// Heading in radians
    pub heading: f32,
}

impl SpawnPoint {
    pub const fn new(x: f32, y: f32, heading: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            heading,
        }
    }
}

/// Car performance before any pickup is applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarBaseline {
    pub top_speed: f32,
    /// Speed gained per tick while the throttle is held
    pub speed_increment: f32,
    /// Engine audio pitch multiplier
    pub engine_pitch: f32,
}

impl Default for CarBaseline {
    fn default() -> Self {
        Self {
            top_speed: 100.0,
            speed_increment: 1.5,
            engine_pitch: 1.0,
        }
    }
}

/// Pickup pad layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadSettings {
    /// Number of pads on the field
    pub count: u32,
    /// Time a pad stays hidden after being collected
    pub respawn_seconds: f32,
}

impl Default for PadSettings {
    fn default() -> Self {
        Self {
            count: 2,
            respawn_seconds: 10.0,
        }
    }
}

/// Match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// Goals a player needs to win the game
    pub goals_to_win: u32,
    /// Pause between round reset and kickoff
    pub start_delay_seconds: f32,
    /// Pause between a goal and the next round
    pub end_delay_seconds: f32,
    /// Simulation ticks per second
    pub tick_hz: u32,

    // === Balance ===
    pub pickups: PickupTuning,
    pub car: CarBaseline,
    pub pads: PadSettings,
    /// Seed for pickup kind rolls
    pub seed: u64,

    // === Field layout ===
    pub player_spawns: [SpawnPoint; 2],
    pub ball_spawn: SpawnPoint,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            goals_to_win: 3,
            start_delay_seconds: 3.0,
            end_delay_seconds: 3.0,
            tick_hz: DEFAULT_TICK_HZ,

            pickups: PickupTuning::default(),
            car: CarBaseline::default(),
            pads: PadSettings::default(),
            seed: 0,

            // Cars face each other across the centre spot
            player_spawns: [
                SpawnPoint::new(-40.0, 0.0, 0.0),
                SpawnPoint::new(40.0, 0.0, std::f32::consts::PI),
            ],
            ball_spawn: SpawnPoint::new(0.0, 0.0, 0.0),
        }
    }
}

impl MatchSettings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded match settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings the round loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goals_to_win == 0 {
            return Err(ConfigError::InvalidGoalsToWin);
        }
        check_seconds("start_delay_seconds", self.start_delay_seconds)?;
        check_seconds("end_delay_seconds", self.end_delay_seconds)?;
        check_seconds("pads.respawn_seconds", self.pads.respawn_seconds)?;
        if self.tick_hz == 0 {
            return Err(ConfigError::InvalidTickRate);
        }
        if self.pickups.effect_duration_ticks == 0 {
            return Err(ConfigError::InvalidEffectDuration);
        }

        let car = [
            ("car.top_speed", self.car.top_speed),
            ("car.speed_increment", self.car.speed_increment),
            ("car.engine_pitch", self.car.engine_pitch),
        ];
        for (name, value) in self.pickups.magnitudes().into_iter().chain(car) {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        Ok(())
    }

    /// Convert a duration to whole ticks, rounding up
    pub fn seconds_to_ticks(&self, seconds: f32) -> u64 {
        (seconds * self.tick_hz as f32).ceil() as u64
    }

    pub fn start_delay_ticks(&self) -> u64 {
        self.seconds_to_ticks(self.start_delay_seconds)
    }

    pub fn end_delay_ticks(&self) -> u64 {
        self.seconds_to_ticks(self.end_delay_seconds)
    }
}

fn check_seconds(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDelay { name, value })
    }
}
