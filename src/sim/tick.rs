//! Fixed timestep round tick
//!
//! One call per simulation frame. Phase waits count down here; while a round
//! is live each tick feeds player input to the cars and pickups, refreshes the
//! pickup indicators, then polls the ball exactly once for a goal.

use super::pickup::PickupKind;
use super::round::{RoundCoordinator, play};
use super::state::{MatchStatus, PlayerId, RoundPhase};
use crate::audio::Cue;
use crate::error::InvariantViolation;
use crate::host::MatchHost;

/// Input for one player on one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Forward/back axis, -1.0..=1.0
    pub throttle: f32,
    /// Action button (fires the held pickup)
    pub action: bool,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub players: [PlayerInput; 2],
}

impl TickInput {
    pub fn player(&self, id: PlayerId) -> PlayerInput {
        self.players.get(id.index()).copied().unwrap_or_default()
    }

    /// Input with only one player's action button down
    pub fn action(id: PlayerId) -> Self {
        let mut input = Self::default();
        if let Some(player) = input.players.get_mut(id.index()) {
            player.action = true;
        }
        input
    }
}

impl RoundCoordinator {
    /// Advance the match by one tick
    ///
    /// Returns `Finished` once the end delay after the winning goal has run
    /// out; further ticks are no-ops until `restart_match`. An invariant
    /// breach is latched and returned from every later tick.
    pub fn tick<H: MatchHost>(
        &mut self,
        host: &mut H,
        input: &TickInput,
    ) -> Result<MatchStatus, InvariantViolation> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if let MatchStatus::Finished { winner } = self.status() {
            return Ok(MatchStatus::Finished { winner });
        }
        if !self.started {
            self.enter_starting(host);
        }

        self.time_ticks += 1;

        for respawn in self.pads.tick() {
            host.set_pad_visible(respawn.pad, true);
        }

        match self.phase {
            RoundPhase::Starting => {
                if self.wait_elapsed() {
                    self.enter_playing(host);
                }
            }
            RoundPhase::Playing => {
                self.drive_players(host, input)?;
                self.refresh_indicators(host);
                if let Some(scorer) = self.ball.take_goal() {
                    self.last_scorer = Some(scorer);
                    self.enter_ending(host)?;
                }
            }
            RoundPhase::Ending => {
                if self.wait_elapsed() {
                    if let Some(winner) = self.game_winner {
                        self.finished = true;
                        log::info!("Match over after {} rounds", self.round);
                        return Ok(MatchStatus::Finished { winner });
                    }
                    self.enter_starting(host);
                }
            }
        }

        Ok(MatchStatus::Running)
    }

    /// Speed ramp plus pickup fire/countdown for every player in control
    fn drive_players<H: MatchHost>(
        &mut self,
        host: &mut H,
        input: &TickInput,
    ) -> Result<(), InvariantViolation> {
        for index in 0..self.pickups.len() {
            let player = self.pickups[index].owner();
            let enabled = self
                .roster
                .get(player)
                .is_some_and(|agent| agent.control_enabled());
            if !enabled {
                continue;
            }

            let pressed = input.player(player);
            if let Some(agent) = self.roster.get_mut(player) {
                agent.car.drive(pressed.throttle);
            }

            let controller = &mut self.pickups[index];
            if pressed.action && controller.is_held() {
                let effect = match controller.activate(&self.settings.pickups, &mut self.roster) {
                    Ok(effect) => effect,
                    Err(source) => {
                        return Err(self.halt(InvariantViolation::Pickup { player, source }));
                    }
                };
                if effect.kind == PickupKind::Explosion {
                    host.spawn_explosion(effect.target);
                    play(host, Cue::Explosion);
                }
            } else if controller.is_active() {
                controller.tick(&mut self.roster);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::recording::{HostCall, RecordingHost};
    use crate::settings::MatchSettings;
    use crate::sim::{ContactTag, setup_match};

    /// Short phase waits: 4 ticks to start, 2 to end
    fn quick_settings() -> MatchSettings {
        MatchSettings {
            goals_to_win: 3,
            start_delay_seconds: 2.0,
            end_delay_seconds: 1.0,
            tick_hz: 2,
            ..Default::default()
        }
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    /// Tick until the coordinator is in the given phase
    fn run_until(
        coordinator: &mut RoundCoordinator,
        host: &mut RecordingHost,
        phase: RoundPhase,
    ) -> MatchStatus {
        for _ in 0..100 {
            let status = coordinator.tick(host, &idle()).unwrap();
            if coordinator.phase() == phase || matches!(status, MatchStatus::Finished { .. }) {
                return status;
            }
        }
        panic!("never reached {:?}", phase);
    }

    fn score_goal(coordinator: &mut RoundCoordinator, host: &mut RecordingHost, player: PlayerId) {
        run_until(coordinator, host, RoundPhase::Playing);
        assert!(coordinator.notify_collision(ContactTag::Goal(player), host));
        coordinator.tick(host, &idle()).unwrap();
        assert_eq!(coordinator.phase(), RoundPhase::Ending);
    }

    #[test]
    fn test_starting_waits_start_delay() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();

        // 2 seconds at 2 Hz = 4 ticks of Starting
        for _ in 0..3 {
            coordinator.tick(&mut host, &idle()).unwrap();
            assert_eq!(coordinator.phase(), RoundPhase::Starting);
        }
        coordinator.tick(&mut host, &idle()).unwrap();
        assert_eq!(coordinator.phase(), RoundPhase::Playing);
        assert_eq!(coordinator.round(), 1);
    }

    #[test]
    fn test_starting_entry_resets_and_disables() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        coordinator.tick(&mut host, &idle()).unwrap();

        assert_eq!(host.count(&HostCall::ResetEntity(PlayerId::ONE)), 1);
        assert_eq!(host.count(&HostCall::ResetEntity(PlayerId::TWO)), 1);
        assert_eq!(host.count(&HostCall::ResetBall), 1);
        assert_eq!(host.count(&HostCall::Control(PlayerId::ONE, false)), 1);
        assert_eq!(host.count(&HostCall::Play(Cue::Music)), 1);
        assert_eq!(host.count(&HostCall::Camera), 1);
        assert_eq!(host.last_message(), Some("PREPARE"));
        assert_eq!(host.last_scoreboard(), Some("0 - 0"));
        assert!(coordinator.roster().iter().all(|a| !a.control_enabled()));
    }

    #[test]
    fn test_playing_enables_control_and_clears_message() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        run_until(&mut coordinator, &mut host, RoundPhase::Playing);

        assert!(coordinator.roster().iter().all(|a| a.control_enabled()));
        assert_eq!(host.count(&HostCall::Control(PlayerId::TWO, true)), 1);
        assert_eq!(host.last_message(), Some(""));
    }

    #[test]
    fn test_playing_refreshes_indicators_each_tick() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        run_until(&mut coordinator, &mut host, RoundPhase::Playing);
        host.clear();

        coordinator.tick(&mut host, &idle()).unwrap();
        coordinator.tick(&mut host, &idle()).unwrap();
        assert_eq!(host.count(&HostCall::Indicator(PlayerId::ONE, None)), 2);
        assert_eq!(host.count(&HostCall::Indicator(PlayerId::TWO, None)), 2);
        assert_eq!(coordinator.phase(), RoundPhase::Playing);
    }

    #[test]
    fn test_goal_ends_round_and_scores_once() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        score_goal(&mut coordinator, &mut host, PlayerId::TWO);

        assert_eq!(coordinator.roster().scores(), [0, 1]);
        assert_eq!(coordinator.round_winner(), Some(PlayerId::TWO));
        assert_eq!(coordinator.game_winner(), None);
        assert_eq!(host.count(&HostCall::Stop(Cue::Music)), 1);
        assert_eq!(host.count(&HostCall::Play(Cue::Goal)), 1);
        assert_eq!(host.count(&HostCall::Freeze), 1);
        assert_eq!(host.last_scoreboard(), Some("GOOOOOAL!"));
        assert_eq!(
            host.last_message(),
            Some("PLAYER 2 SCORES!\n\n\n\nPLAYER 1: 0 GOALS\nPLAYER 2: 1 GOALS\n")
        );
        assert!(coordinator.roster().iter().all(|a| !a.control_enabled()));

        // Ending runs out and the next round keeps the score
        let status = run_until(&mut coordinator, &mut host, RoundPhase::Starting);
        assert_eq!(status, MatchStatus::Running);
        assert_eq!(coordinator.round(), 2);
        assert_eq!(coordinator.roster().scores(), [0, 1]);
        assert_eq!(host.last_scoreboard(), Some("0 - 1"));
    }

    #[test]
    fn test_goal_outside_play_is_ignored() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        coordinator.tick(&mut host, &idle()).unwrap();
        assert!(!coordinator.notify_collision(ContactTag::Goal(PlayerId::ONE), &mut host));
        run_until(&mut coordinator, &mut host, RoundPhase::Playing);
        coordinator.tick(&mut host, &idle()).unwrap();
        assert_eq!(coordinator.phase(), RoundPhase::Playing);
        assert_eq!(coordinator.roster().scores(), [0, 0]);
    }

    #[test]
    fn test_game_winner_finishes_without_new_round() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();

        score_goal(&mut coordinator, &mut host, PlayerId::ONE);
        score_goal(&mut coordinator, &mut host, PlayerId::TWO);
        score_goal(&mut coordinator, &mut host, PlayerId::ONE);
        assert_eq!(coordinator.roster().scores(), [2, 1]);

        score_goal(&mut coordinator, &mut host, PlayerId::ONE);
        assert_eq!(coordinator.roster().scores(), [3, 1]);
        assert_eq!(coordinator.game_winner(), Some(PlayerId::ONE));
        assert_eq!(host.last_message(), Some("PLAYER 1 WINS THE GAME!"));

        let rounds = coordinator.round();
        let status = run_until(&mut coordinator, &mut host, RoundPhase::Starting);
        assert_eq!(
            status,
            MatchStatus::Finished {
                winner: PlayerId::ONE
            }
        );
        assert_eq!(coordinator.phase(), RoundPhase::Ending);
        assert_eq!(coordinator.round(), rounds);

        // Finished is sticky
        host.clear();
        let again = coordinator.tick(&mut host, &idle()).unwrap();
        assert_eq!(again, status);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_restart_match_is_clean_slate() {
        let mut coordinator = setup_match(MatchSettings {
            goals_to_win: 1,
            ..quick_settings()
        })
        .unwrap();
        let mut host = RecordingHost::default();
        score_goal(&mut coordinator, &mut host, PlayerId::TWO);
        run_until(&mut coordinator, &mut host, RoundPhase::Starting);
        assert!(matches!(coordinator.status(), MatchStatus::Finished { .. }));

        coordinator.restart_match(&mut host);
        assert_eq!(coordinator.status(), MatchStatus::Running);
        assert_eq!(coordinator.phase(), RoundPhase::Starting);
        assert_eq!(coordinator.roster().scores(), [0, 0]);
        assert_eq!(coordinator.game_winner(), None);
        assert_eq!(coordinator.round(), 1);
    }

    #[test]
    fn test_restart_round_drops_stale_end_wait() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        score_goal(&mut coordinator, &mut host, PlayerId::ONE);

        coordinator.restart_round(&mut host);
        assert_eq!(coordinator.phase(), RoundPhase::Starting);
        assert_eq!(coordinator.roster().scores(), [1, 0]);
        assert_eq!(coordinator.round_winner(), None);

        // Full start delay again, not the leftover end delay
        for _ in 0..3 {
            coordinator.tick(&mut host, &idle()).unwrap();
            assert_eq!(coordinator.phase(), RoundPhase::Starting);
        }
        coordinator.tick(&mut host, &idle()).unwrap();
        assert_eq!(coordinator.phase(), RoundPhase::Playing);
    }

    #[test]
    fn test_pad_pickup_lifecycle_in_play() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        run_until(&mut coordinator, &mut host, RoundPhase::Playing);

        let pad_kind = coordinator.pads().get(0).and_then(|p| p.kind).unwrap();
        assert_eq!(
            coordinator.notify_pickup_contact(PlayerId::ONE, 0, &mut host),
            Some(pad_kind)
        );
        assert_eq!(host.count(&HostCall::Pad(0, false)), 1);
        assert!(coordinator.pads().get(0).is_some_and(|p| !p.is_live()));

        coordinator.tick(&mut host, &idle()).unwrap();
        assert_eq!(host.count(&HostCall::Indicator(PlayerId::ONE, Some(pad_kind))), 1);

        coordinator
            .tick(&mut host, &TickInput::action(PlayerId::ONE))
            .unwrap();
        let pickup = coordinator.pickup(PlayerId::ONE).unwrap();
        assert!(pickup.is_active());

        let duration = coordinator.settings().pickups.effect_duration_ticks;
        for _ in 0..duration {
            coordinator.tick(&mut host, &idle()).unwrap();
        }
        assert_eq!(coordinator.pickup(PlayerId::ONE).unwrap().held(), None);
        for agent in coordinator.roster().iter() {
            assert_eq!(agent.car.top_speed, 100.0);
        }
    }

    #[test]
    fn test_explosion_fires_cue_on_opponent() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        run_until(&mut coordinator, &mut host, RoundPhase::Playing);

        coordinator.pickups[1].collect(PickupKind::Explosion).unwrap();
        coordinator
            .tick(&mut host, &TickInput::action(PlayerId::TWO))
            .unwrap();

        assert_eq!(host.count(&HostCall::Explosion(PlayerId::ONE)), 1);
        assert_eq!(host.count(&HostCall::Play(Cue::Explosion)), 1);
        assert_eq!(coordinator.roster().get(PlayerId::ONE).unwrap().car.top_speed, 10.0);
        assert_eq!(coordinator.roster().get(PlayerId::TWO).unwrap().car.top_speed, 100.0);
    }

    #[test]
    fn test_active_effect_cleared_on_next_round() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        run_until(&mut coordinator, &mut host, RoundPhase::Playing);

        coordinator.pickups[0].collect(PickupKind::Speed).unwrap();
        coordinator
            .tick(&mut host, &TickInput::action(PlayerId::ONE))
            .unwrap();
        assert_eq!(coordinator.roster().get(PlayerId::ONE).unwrap().car.top_speed, 200.0);

        coordinator.notify_collision(ContactTag::Goal(PlayerId::ONE), &mut host);
        coordinator.tick(&mut host, &idle()).unwrap();
        // Timer frozen while control is off
        assert!(coordinator.pickup(PlayerId::ONE).unwrap().is_active());

        run_until(&mut coordinator, &mut host, RoundPhase::Starting);
        assert_eq!(coordinator.pickup(PlayerId::ONE).unwrap().held(), None);
        assert_eq!(coordinator.roster().get(PlayerId::ONE).unwrap().car.top_speed, 100.0);
    }

    #[test]
    fn test_pickup_contact_rejected_while_holding() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        run_until(&mut coordinator, &mut host, RoundPhase::Playing);

        coordinator.pickups[0].collect(PickupKind::Speed).unwrap();
        assert_eq!(coordinator.notify_pickup_contact(PlayerId::ONE, 0, &mut host), None);
        assert!(coordinator.pads().get(0).is_some_and(|p| p.is_live()));
        assert_eq!(
            coordinator.pickup(PlayerId::ONE).unwrap().held(),
            Some(PickupKind::Speed)
        );
    }

    #[test]
    fn test_drive_only_with_control() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        let mut input = TickInput::default();
        input.players[0].throttle = 1.0;

        coordinator.tick(&mut host, &input).unwrap();
        assert_eq!(coordinator.roster().get(PlayerId::ONE).unwrap().car.current_speed, 0.0);

        run_until(&mut coordinator, &mut host, RoundPhase::Playing);
        coordinator.tick(&mut host, &input).unwrap();
        assert_eq!(coordinator.roster().get(PlayerId::ONE).unwrap().car.current_speed, 1.5);
        assert_eq!(coordinator.roster().get(PlayerId::TWO).unwrap().car.current_speed, 0.0);
    }

    #[test]
    fn test_missing_cue_does_not_abort_round() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost {
            missing: vec![Cue::Goal, Cue::Music],
            ..Default::default()
        };
        score_goal(&mut coordinator, &mut host, PlayerId::ONE);
        assert_eq!(coordinator.roster().scores(), [1, 0]);
        assert_eq!(host.count(&HostCall::Play(Cue::Goal)), 0);
    }

    #[test]
    fn test_missing_scorer_halts_match() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        run_until(&mut coordinator, &mut host, RoundPhase::Playing);

        let err = coordinator.enter_ending(&mut host).unwrap_err();
        assert_eq!(err, InvariantViolation::NoScorer);
        assert_eq!(coordinator.tick(&mut host, &idle()), Err(InvariantViolation::NoScorer));
        assert_eq!(coordinator.fault(), Some(&InvariantViolation::NoScorer));
    }

    #[test]
    fn test_unknown_scorer_halts_match() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        run_until(&mut coordinator, &mut host, RoundPhase::Playing);

        let stranger = PlayerId::new(7).unwrap();
        coordinator.notify_collision(ContactTag::Goal(stranger), &mut host);
        assert_eq!(
            coordinator.tick(&mut host, &idle()),
            Err(InvariantViolation::UnknownScorer(stranger))
        );
        assert_eq!(coordinator.roster().scores(), [0, 0]);
    }

    #[test]
    fn test_restart_round_refused_while_halted() {
        let mut coordinator = setup_match(quick_settings()).unwrap();
        let mut host = RecordingHost::default();
        run_until(&mut coordinator, &mut host, RoundPhase::Playing);
        coordinator.enter_ending(&mut host).unwrap_err();
        let round = coordinator.round();

        host.clear();
        coordinator.restart_round(&mut host);
        assert!(host.calls.is_empty());
        assert_eq!(coordinator.round(), round);
        assert_eq!(coordinator.phase(), RoundPhase::Ending);
        assert_eq!(coordinator.tick(&mut host, &idle()), Err(InvariantViolation::NoScorer));

        coordinator.restart_match(&mut host);
        assert_eq!(coordinator.fault(), None);
        assert_eq!(coordinator.tick(&mut host, &idle()), Ok(MatchStatus::Running));
    }

    #[test]
    fn test_pad_contact_ignored_after_match_ends() {
        let mut coordinator = setup_match(MatchSettings {
            goals_to_win: 1,
            ..quick_settings()
        })
        .unwrap();
        let mut host = RecordingHost::default();
        score_goal(&mut coordinator, &mut host, PlayerId::ONE);
        run_until(&mut coordinator, &mut host, RoundPhase::Starting);
        assert!(matches!(coordinator.status(), MatchStatus::Finished { .. }));

        host.clear();
        assert_eq!(coordinator.notify_pickup_contact(PlayerId::TWO, 0, &mut host), None);
        assert!(host.calls.is_empty());
        assert!(coordinator.pads().get(0).is_some_and(|p| p.is_live()));
        assert_eq!(coordinator.pickup(PlayerId::TWO).unwrap().held(), None);
    }

    #[test]
    fn test_invalid_settings_rejected_at_setup() {
        let result = setup_match(MatchSettings {
            goals_to_win: 0,
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
