//! Fixtures shared by the unit tests.

use crate::league::{Conference, Game, Team};
use crate::r#match::{HeadCoach, PlayerRatings, Position, RosterPlayer, TeamRoster};
use crate::shared::FullName;
use itertools::Itertools;

/// League of `divisions` divisions per conference with `teams_per_division`
/// teams each. Ids run from 1 in conference, division, slot order.
pub fn custom_league(divisions: u8, teams_per_division: u32) -> Vec<Team> {
    let mut teams = Vec::new();
    let mut id = 1;

    for conference in Conference::ALL {
        for division in 0..divisions {
            for slot in 0..teams_per_division {
                teams.push(Team::new(
                    id,
                    format!("{} {} Club {}", conference, division, slot + 1),
                    format!("T{:02}", id),
                    conference,
                    division,
                ));
                id += 1;
            }
        }
    }

    teams
}

/// 32 teams, two conferences of four divisions of four
pub fn standard_teams() -> Vec<Team> {
    custom_league(4, 4)
}

/// Every same-conference pair meets once and the lower id always wins, so
/// records strictly fall with id inside each conference.
pub fn play_round_robin_by_id(teams: &[Team]) -> Vec<Game> {
    teams
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| a.conference == b.conference)
        .map(|(a, b)| {
            let (home, away) = if a.id < b.id { (a.id, b.id) } else { (b.id, a.id) };
            Game::regular(2026, 1, home, away).with_score(24, 10)
        })
        .collect()
}

/// Depth per position for a synthetic 53-man roster
const ROSTER_DEPTH: [(Position, u32); 11] = [
    (Position::Qb, 3),
    (Position::Rb, 4),
    (Position::Wr, 6),
    (Position::Te, 3),
    (Position::Ol, 10),
    (Position::Dl, 9),
    (Position::Lb, 6),
    (Position::Cb, 6),
    (Position::S, 4),
    (Position::K, 1),
    (Position::P, 1),
];

fn uniform_ratings(value: u8) -> PlayerRatings {
    PlayerRatings {
        overall: value,
        speed: value,
        strength: value,
        awareness: value,
        throw_accuracy: value,
        throw_power: value,
        catching: value,
        route_running: value,
        ball_security: value,
        tackle: value,
        pursuit: value,
        pass_rush: value,
        coverage: value,
        kick_power: value,
        kick_accuracy: value,
    }
}

/// Full roster where every rating equals `rating`. Player ids are
/// `team_id * 100 + n`, listed in depth order per position.
pub fn synthetic_roster(team_id: u32, rating: u8) -> TeamRoster {
    let mut roster = TeamRoster::new(
        team_id,
        format!("T{:02}", team_id),
        HeadCoach {
            name: FullName::new("Head".to_string(), format!("Coach{}", team_id)),
            game_management: 50,
            scheme_fit: 50,
        },
    );

    let mut next_id = team_id * 100;
    for (position, count) in ROSTER_DEPTH {
        for depth in 0..count {
            next_id += 1;
            roster.add_player(RosterPlayer::new(
                next_id,
                FullName::new(format!("{}{}", position.code(), depth + 1), format!("Team{}", team_id)),
                position,
                uniform_ratings(rating),
            ));
        }
    }

    roster
}

/// Id of the first player listed at `position`
pub fn first_at(roster: &TeamRoster, position: Position) -> u32 {
    roster.depth_chart.at(position)[0]
}
