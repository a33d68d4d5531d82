use crate::r#match::{PlayerOfTheGame, PlayerStatLine, Position, TeamRoster};
use std::collections::BTreeMap;

const WINNER_BONUS: f64 = 1.2;

fn impact(line: &PlayerStatLine) -> f64 {
    let passing = line.passing_yards as f64 * 0.04 + line.passing_touchdowns as f64 * 4.0
        - line.interceptions_thrown as f64 * 2.0;
    let rushing = line.rushing_yards as f64 * 0.1 + line.rushing_touchdowns as f64 * 6.0;
    let receiving = line.receiving_yards as f64 * 0.1
        + line.receptions as f64 * 0.5
        + (line.receiving_touchdowns + line.other_touchdowns) as f64 * 6.0;
    let defense = line.tackles as f64
        + line.other_touchdowns as f64 * 6.0
        + line.sacks as f64 * 4.0
        + line.interceptions as f64 * 5.0
        + line.forced_fumbles as f64 * 4.0;
    let kicking = line.field_goals_made as f64 * 3.0 + line.extra_points_made as f64;

    match line.position {
        Position::Qb => passing + rushing,
        Position::Rb | Position::Wr | Position::Te => rushing + receiving,
        Position::Dl | Position::Lb | Position::Cb | Position::S => defense,
        Position::K => kicking,
        Position::P => line.punt_yards as f64 * 0.02,
        Position::Ol => 0.0,
    }
}

fn describe(line: &PlayerStatLine) -> String {
    match line.position {
        Position::Qb => format!(
            "{}/{}, {} yds, {} TD, {} INT",
            line.completions, line.pass_attempts, line.passing_yards, line.passing_touchdowns, line.interceptions_thrown
        ),
        Position::Rb => format!(
            "{} carries, {} yds, {} TD",
            line.carries,
            line.rushing_yards,
            line.touchdowns()
        ),
        Position::Wr | Position::Te => format!(
            "{} rec, {} yds, {} TD",
            line.receptions,
            line.receiving_yards,
            line.touchdowns()
        ),
        Position::K => format!(
            "{}/{} FG, {} XP",
            line.field_goals_made, line.field_goals_attempted, line.extra_points_made
        ),
        Position::P => format!("{} punts, {} yds", line.punts, line.punt_yards),
        _ => format!(
            "{} tackles, {} sacks, {} INT",
            line.tackles, line.sacks, line.interceptions
        ),
    }
}

/// Picks the game's standout. Players are visited home side first in lineup
/// order and only a strictly better score replaces the leader.
pub fn player_of_the_game(
    lines: &BTreeMap<u32, PlayerStatLine>,
    rosters: [&TeamRoster; 2],
    winner: Option<u32>,
) -> Option<PlayerOfTheGame> {
    let mut best: Option<(f64, &PlayerStatLine, &TeamRoster)> = None;

    for roster in rosters {
        for player in roster.game_day_players() {
            let Some(line) = lines.get(&player.id) else {
                continue;
            };

            let mut score = impact(line);
            if winner == Some(line.team_id) {
                score *= WINNER_BONUS;
            }

            if best.is_none_or(|(leader, _, _)| score > leader) {
                best = Some((score, line, roster));
            }
        }
    }

    best.map(|(_, line, roster)| {
        let name = roster
            .player(line.player_id)
            .map(|player| player.name.short())
            .unwrap_or_default();

        PlayerOfTheGame {
            player_id: line.player_id,
            team_id: line.team_id,
            description: format!("{} ({}): {}", name, roster.abbreviation, describe(line)),
        }
    })
}
