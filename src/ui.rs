//! On-screen text for the scoreboard and round messages

use crate::sim::{PickupKind, PlayerId, Roster};

pub const PREPARE_MESSAGE: &str = "PREPARE";
pub const GOAL_BANNER: &str = "GOOOOOAL!";

pub fn player_label(id: PlayerId) -> String {
    format!("PLAYER {}", id)
}

/// Scoreboard line, e.g. "2 - 1"
pub fn score_line(scores: &[u32]) -> String {
    scores
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Message shown while the end delay runs
///
/// A game winner replaces the round summary entirely.
pub fn end_of_round_message(
    round_winner: Option<PlayerId>,
    game_winner: Option<PlayerId>,
    roster: &Roster,
) -> String {
    if let Some(winner) = game_winner {
        return format!("{} WINS THE GAME!", player_label(winner));
    }

    let mut message = match round_winner {
        Some(winner) => format!("{} SCORES!", player_label(winner)),
        None => "ERROR".to_string(),
    };
    message.push_str("\n\n\n\n");
    for agent in roster.iter() {
        message.push_str(&format!(
            "{}: {} GOALS\n",
            player_label(agent.id()),
            agent.score()
        ));
    }
    message
}

/// Caption under a player's pickup icon
pub fn pickup_caption(kind: Option<PickupKind>) -> &'static str {
    kind.map(|k| k.as_str()).unwrap_or("")
}
