//! Collaborator interface
//!
//! Everything the match core asks of the engine hosting it: entity resets,
//! input gating, audio, UI text and ball physics. Calls are fire-and-forget;
//! only audio reports failure, and the core logs and moves on when it does.

use crate::audio::Cue;
use crate::error::HostError;
use crate::settings::SpawnPoint;
use crate::sim::{PickupKind, PlayerId};

pub trait MatchHost {
    /// Move a car to its spawn pose at rest
    fn reset_entity(&mut self, player: PlayerId, spawn: &SpawnPoint);
    /// Move the ball to its spawn pose at rest
    fn reset_ball(&mut self, spawn: &SpawnPoint);
    /// Gate input processing for a player
    fn set_control_enabled(&mut self, player: PlayerId, enabled: bool);

    fn play_cue(&mut self, cue: Cue) -> Result<(), HostError>;
    fn stop_cue(&mut self, cue: Cue) -> Result<(), HostError>;

    fn display_message(&mut self, text: &str);
    fn display_scoreboard(&mut self, text: &str);
    fn display_pickup_indicator(&mut self, player: PlayerId, kind: Option<PickupKind>);

    fn freeze_ball(&mut self);
    fn unfreeze_ball(&mut self);

    /// Snap camera framing to the freshly reset field
    fn frame_camera(&mut self) {}
    /// Explosion visual on a player's car
    fn spawn_explosion(&mut self, _player: PlayerId) {}
    /// Show or hide a pickup pad
    fn set_pad_visible(&mut self, _pad: u32, _visible: bool) {}
}
