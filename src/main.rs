//! Road To Goal headless entry point
//!
//! Plays one scripted match against a host that only logs what it is asked
//! to do. Pass a settings JSON path as the first argument to override the
//! defaults; `RUST_LOG=debug` shows pickup traffic.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use road_to_goal::audio::Cue;
use road_to_goal::consts::MAX_MATCH_TICKS;
use road_to_goal::sim::{ContactTag, MatchStatus, PickupKind, PlayerId, RoundPhase, TickInput};
use road_to_goal::ui;
use road_to_goal::{HostError, MatchHost, MatchSettings, SpawnPoint, setup_match};

/// Host that narrates every request through the logger
#[derive(Default)]
struct ConsoleHost {
    frozen: bool,
}

impl MatchHost for ConsoleHost {
    fn reset_entity(&mut self, player: PlayerId, spawn: &SpawnPoint) {
        log::debug!("reset car {} to {:?}", player, spawn.position);
    }

    fn reset_ball(&mut self, spawn: &SpawnPoint) {
        log::debug!("reset ball to {:?}", spawn.position);
    }

    fn set_control_enabled(&mut self, player: PlayerId, enabled: bool) {
        log::debug!("control {} -> {}", player, enabled);
    }

    fn play_cue(&mut self, cue: Cue) -> Result<(), HostError> {
        log::debug!("play {}", cue.as_str());
        Ok(())
    }

    fn stop_cue(&mut self, cue: Cue) -> Result<(), HostError> {
        if !cue.is_looping() {
            return Err(HostError::Unavailable(format!("{} is not looping", cue.as_str())));
        }
        log::debug!("stop {}", cue.as_str());
        Ok(())
    }

    fn display_message(&mut self, text: &str) {
        if !text.is_empty() {
            log::info!("[message] {}", text.replace('\n', " | "));
        }
    }

    fn display_scoreboard(&mut self, text: &str) {
        log::info!("[scoreboard] {}", text);
    }

    fn display_pickup_indicator(&mut self, player: PlayerId, kind: Option<PickupKind>) {
        log::trace!("pickup {} -> {:?}", player, ui::pickup_caption(kind));
    }

    fn freeze_ball(&mut self) {
        self.frozen = true;
    }

    fn unfreeze_ball(&mut self) {
        self.frozen = false;
    }

    fn spawn_explosion(&mut self, player: PlayerId) {
        log::info!("BOOM on player {}", player);
    }
}

/// Random driving, pickups and the occasional goal
fn scripted_input(rng: &mut Pcg32) -> TickInput {
    let mut input = TickInput::default();
    for player in input.players.iter_mut() {
        player.throttle = rng.random_range(-1.0..=1.0);
        player.action = rng.random_bool(0.05);
    }
    input
}

fn main() {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match MatchSettings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(2);
            }
        },
        None => MatchSettings::default(),
    };

    let mut coordinator = match setup_match(settings) {
        Ok(coordinator) => coordinator,
        Err(err) => {
            log::error!("Invalid settings: {}", err);
            std::process::exit(2);
        }
    };
    let mut host = ConsoleHost::default();
    let mut rng = Pcg32::seed_from_u64(coordinator.settings().seed ^ 0x5eed);
    let pad_count = coordinator.settings().pads.count;
    let players = coordinator.roster().ids();

    log::info!(
        "Road To Goal (headless) - first to {} goals",
        coordinator.settings().goals_to_win
    );

    for _ in 0..MAX_MATCH_TICKS {
        if coordinator.phase() == RoundPhase::Playing && !host.frozen {
            let player = players[rng.random_range(0..players.len())];
            if pad_count > 0 && rng.random_bool(0.02) {
                let pad = rng.random_range(0..pad_count);
                coordinator.notify_pickup_contact(player, pad, &mut host);
            }
            if rng.random_bool(0.01) {
                coordinator.notify_collision(ContactTag::Car(player), &mut host);
            }
            if rng.random_bool(0.003) {
                coordinator.notify_collision(ContactTag::Goal(player), &mut host);
            }
        }

        let input = scripted_input(&mut rng);
        match coordinator.tick(&mut host, &input) {
            Ok(MatchStatus::Running) => {}
            Ok(MatchStatus::Finished { winner }) => {
                log::info!(
                    "{} takes it {}",
                    ui::player_label(winner),
                    ui::score_line(&coordinator.roster().scores())
                );
                break;
            }
            Err(violation) => {
                log::error!("Match aborted: {}", violation);
                std::process::exit(1);
            }
        }
    }

    match serde_json::to_string_pretty(&coordinator.standings()) {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Could not serialize standings: {}", err),
    }
}
