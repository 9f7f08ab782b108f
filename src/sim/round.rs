//! Round coordinator
//!
//! Owns every piece of match state and sequences rounds:
//! `Starting -> Playing -> Ending -> Starting ...` until a player reaches
//! `goals_to_win`. Phase waits are resume-at tick stamps; entering a phase
//! overwrites the stamp, so a forced reset never resumes a stale wait.

use serde::Serialize;

use super::ball::{BallState, ContactTag};
use super::pads::PadField;
use super::pickup::{PickupController, PickupKind};
use super::state::{CarStats, MatchStatus, PlayerId, Roster, RoundPhase};
use crate::audio::Cue;
use crate::error::{ConfigError, InvariantViolation};
use crate::host::MatchHost;
use crate::settings::MatchSettings;
use crate::ui;

/// Build and wire a match from validated settings
pub fn setup_match(settings: MatchSettings) -> Result<RoundCoordinator, ConfigError> {
    settings.validate()?;
    Ok(RoundCoordinator::from_settings(settings))
}

/// Serializable summary of where the match stands
#[derive(Debug, Clone, Serialize)]
pub struct Standings {
    pub phase: RoundPhase,
    pub round: u32,
    pub scores: [u32; 2],
    pub round_winner: Option<PlayerId>,
    pub game_winner: Option<PlayerId>,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct RoundCoordinator {
    pub(super) settings: MatchSettings,
    pub(super) roster: Roster,
    /// Indexed by `PlayerId::index`
    pub(super) pickups: [PickupController; 2],
    pub(super) ball: BallState,
    pub(super) pads: PadField,
    pub(super) phase: RoundPhase,
    /// Tick at which the current phase wait ends
    pub(super) resume_at: Option<u64>,
    pub(super) time_ticks: u64,
    pub(super) round: u32,
    pub(super) started: bool,
    pub(super) finished: bool,
    /// Scorer taken from the ball when play stopped
    pub(super) last_scorer: Option<PlayerId>,
    pub(super) round_winner: Option<PlayerId>,
    pub(super) game_winner: Option<PlayerId>,
    /// First invariant breach; the match refuses to advance past it
    pub(super) fault: Option<InvariantViolation>,
}

impl RoundCoordinator {
    fn from_settings(settings: MatchSettings) -> Self {
        let roster = Roster::new(&settings.car);
        let [p1, p2] = roster.ids();
        let pads = PadField::new(
            settings.pads.count,
            settings.seconds_to_ticks(settings.pads.respawn_seconds),
            settings.seed,
        );
        Self {
            pickups: [
                PickupController::new(p1, p2),
                PickupController::new(p2, p1),
            ],
            roster,
            ball: BallState::new(),
            pads,
            phase: RoundPhase::Starting,
            resume_at: None,
            time_ticks: 0,
            round: 0,
            started: false,
            finished: false,
            last_scorer: None,
            round_winner: None,
            game_winner: None,
            fault: None,
            settings,
        }
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ball(&self) -> &BallState {
        &self.ball
    }

    pub fn pads(&self) -> &PadField {
        &self.pads
    }

    pub fn pickup(&self, player: PlayerId) -> Option<&PickupController> {
        self.pickups.get(player.index())
    }

    /// 1-based number of the round in progress (0 before the first tick)
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn round_winner(&self) -> Option<PlayerId> {
        self.round_winner
    }

    pub fn game_winner(&self) -> Option<PlayerId> {
        self.game_winner
    }

    pub fn fault(&self) -> Option<&InvariantViolation> {
        self.fault.as_ref()
    }

    pub fn standings(&self) -> Standings {
        Standings {
            phase: self.phase,
            round: self.round,
            scores: self.roster.scores(),
            round_winner: self.round_winner,
            game_winner: self.game_winner,
            finished: self.finished,
        }
    }

    pub fn status(&self) -> MatchStatus {
        match (self.finished, self.game_winner) {
            (true, Some(winner)) => MatchStatus::Finished { winner },
            _ => MatchStatus::Running,
        }
    }

    /// Inbound physics contact for the ball
    ///
    /// Goal contacts only count while a round is live. Returns true when a
    /// goal was recorded.
    pub fn notify_collision<H: MatchHost>(&mut self, tag: ContactTag, host: &mut H) -> bool {
        match tag {
            ContactTag::Car(_) => play(host, Cue::BallHit),
            ContactTag::Goal(player) if self.phase != RoundPhase::Playing => {
                log::debug!("Ignoring goal for player {} outside play", player);
                return false;
            }
            _ => {}
        }
        self.ball.report_collision(tag)
    }

    /// A car drove over a pickup pad; returns the kind collected
    ///
    /// A player already holding a pickup leaves the pad untouched.
    pub fn notify_pickup_contact<H: MatchHost>(
        &mut self,
        player: PlayerId,
        pad: u32,
        host: &mut H,
    ) -> Option<PickupKind> {
        if self.finished {
            log::debug!("Ignoring pad {} contact after the match ended", pad);
            return None;
        }
        let kind = self.pads.offer(pad)?;
        let controller = self.pickups.get_mut(player.index())?;
        if let Err(err) = controller.collect(kind) {
            log::debug!("Player {} passed pad {}: {}", player, pad, err);
            return None;
        }
        self.pads.consume(pad);
        host.set_pad_visible(pad, false);
        play(host, Cue::PickupCollect);
        log::debug!("Player {} collected {} from pad {}", player, kind.as_str(), pad);
        Some(kind)
    }

    /// Abandon the current round and start it over, keeping scores
    ///
    /// Ignored once a game winner has been decided, and while an invariant
    /// breach is latched; only `restart_match` clears a fault.
    pub fn restart_round<H: MatchHost>(&mut self, host: &mut H) {
        if self.game_winner.is_some() {
            log::warn!("Round restart ignored: the game is already won");
            return;
        }
        if let Some(fault) = &self.fault {
            log::warn!("Round restart ignored: match halted ({})", fault);
            return;
        }
        self.round_winner = None;
        self.last_scorer = None;
        self.enter_starting(host);
    }

    /// Throw everything away and start a fresh match
    pub fn restart_match<H: MatchHost>(&mut self, host: &mut H) {
        *self = Self::from_settings(self.settings.clone());
        log::info!("Match restarted");
        self.enter_starting(host);
    }

    // === Phase entry ===

    pub(super) fn enter_starting<H: MatchHost>(&mut self, host: &mut H) {
        self.started = true;
        self.phase = RoundPhase::Starting;
        self.round += 1;
        self.resume_at = Some(self.time_ticks + self.settings.start_delay_ticks());

        for controller in self.pickups.iter_mut() {
            controller.force_clear(&mut self.roster);
        }
        for agent in self.roster.iter_mut() {
            // Drop float drift left by add/subtract effect cycles
            agent.car = CarStats::from_baseline(&self.settings.car);
            host.reset_entity(agent.id(), &self.settings.player_spawns[agent.id().index()]);
        }
        self.ball.reset();
        host.reset_ball(&self.settings.ball_spawn);
        host.unfreeze_ball();
        self.set_control(host, false);

        play(host, Cue::Music);
        self.refresh_indicators(host);
        host.frame_camera();
        host.display_message(ui::PREPARE_MESSAGE);
        host.display_scoreboard(&ui::score_line(&self.roster.scores()));

        log::info!("Round {} starting ({})", self.round, ui::score_line(&self.roster.scores()));
    }

    pub(super) fn enter_playing<H: MatchHost>(&mut self, host: &mut H) {
        self.phase = RoundPhase::Playing;
        self.resume_at = None;
        self.set_control(host, true);
        host.display_message("");
        log::info!("Round {} live", self.round);
    }

    pub(super) fn enter_ending<H: MatchHost>(&mut self, host: &mut H) -> Result<(), InvariantViolation> {
        self.phase = RoundPhase::Ending;
        self.resume_at = Some(self.time_ticks + self.settings.end_delay_ticks());

        stop(host, Cue::Music);
        play(host, Cue::Goal);
        self.set_control(host, false);
        host.freeze_ball();

        self.round_winner = None;
        let scorer = match self.last_scorer.take() {
            Some(scorer) => scorer,
            None => return Err(self.halt(InvariantViolation::NoScorer)),
        };
        let Some(agent) = self.roster.get_mut(scorer) else {
            return Err(self.halt(InvariantViolation::UnknownScorer(scorer)));
        };
        let score = agent.add_goal();
        self.round_winner = Some(scorer);
        self.game_winner = self.roster.leader_at(self.settings.goals_to_win);

        host.display_scoreboard(ui::GOAL_BANNER);
        host.display_message(&ui::end_of_round_message(
            self.round_winner,
            self.game_winner,
            &self.roster,
        ));

        log::info!("Round {}: player {} scores ({} goals)", self.round, scorer, score);
        if let Some(winner) = self.game_winner {
            log::info!("Player {} wins the game", winner);
        }
        Ok(())
    }

    // === Helpers ===

    pub(super) fn wait_elapsed(&self) -> bool {
        self.resume_at.is_none_or(|at| self.time_ticks >= at)
    }

    pub(super) fn set_control<H: MatchHost>(&mut self, host: &mut H, enabled: bool) {
        for agent in self.roster.iter_mut() {
            agent.set_control_enabled(enabled);
            host.set_control_enabled(agent.id(), enabled);
        }
    }

    pub(super) fn refresh_indicators<H: MatchHost>(&self, host: &mut H) {
        for controller in &self.pickups {
            host.display_pickup_indicator(controller.owner(), controller.held());
        }
    }

    /// Latch an invariant breach and report it
    pub(super) fn halt(&mut self, violation: InvariantViolation) -> InvariantViolation {
        log::error!("Match halted in round {}: {}", self.round, violation);
        self.fault = Some(violation.clone());
        violation
    }
}

/// Audio failures never stop a round
pub(super) fn play<H: MatchHost>(host: &mut H, cue: Cue) {
    if let Err(err) = host.play_cue(cue) {
        log::warn!("Skipping cue {}: {}", cue.as_str(), err);
    }
}

fn stop<H: MatchHost>(host: &mut H, cue: Cue) {
    if let Err(err) = host.stop_cue(cue) {
        log::warn!("Could not stop cue {}: {}", cue.as_str(), err);
    }
}
