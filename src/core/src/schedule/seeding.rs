use crate::league::{
    compare_across_divisions, Conference, Game, LeagueStandings, PlayoffField, PlayoffSeed, StandingRow, Team,
};
use log::{debug, warn};

pub const PLAYOFF_TEAMS_PER_CONFERENCE: usize = 7;

/// Seeds both conferences from completed regular-season games. Division
/// winners take the top seeds, the best remaining teams fill the rest.
pub fn determine_playoff_seeds(teams: &[Team], games: &[Game]) -> PlayoffField {
    let standings = LeagueStandings::from_games(teams, games);

    PlayoffField::new(
        seed_conference(&standings, Conference::Afc),
        seed_conference(&standings, Conference::Nfc),
    )
}

fn seed_conference(standings: &LeagueStandings, conference: Conference) -> Vec<PlayoffSeed> {
    let mut divisions: Vec<u8> = standings
        .rows
        .iter()
        .filter(|row| row.conference == conference)
        .map(|row| row.division)
        .collect();
    divisions.sort_unstable();
    divisions.dedup();

    let mut winners: Vec<&StandingRow> = divisions
        .iter()
        .filter_map(|division| standings.division_table(conference, *division).first().copied())
        .collect();
    winners.sort_by(|a, b| compare_across_divisions(a, b));

    let wildcard_slots = PLAYOFF_TEAMS_PER_CONFERENCE.saturating_sub(winners.len());

    let wildcards: Vec<&StandingRow> = standings
        .conference_table(conference)
        .into_iter()
        .filter(|row| !winners.iter().any(|winner| winner.team_id == row.team_id))
        .take(wildcard_slots)
        .collect();

    let seeds: Vec<PlayoffSeed> = winners
        .iter()
        .map(|row| (row, true))
        .chain(wildcards.iter().map(|row| (row, false)))
        .take(PLAYOFF_TEAMS_PER_CONFERENCE)
        .enumerate()
        .map(|(idx, (row, is_division_winner))| PlayoffSeed {
            team_id: row.team_id,
            conference,
            seed: idx as u8 + 1,
            is_division_winner,
        })
        .collect();

    if seeds.len() < PLAYOFF_TEAMS_PER_CONFERENCE {
        warn!(
            "{} fields only {} playoff teams, expected {}",
            conference,
            seeds.len(),
            PLAYOFF_TEAMS_PER_CONFERENCE
        );
    } else {
        debug!(
            "{} seeds: {:?}",
            conference,
            seeds.iter().map(|seed| seed.team_id).collect::<Vec<_>>()
        );
    }

    seeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{play_round_robin_by_id, standard_teams};

    #[test]
    fn test_seven_seeds_per_conference() {
        let teams = standard_teams();
        let games = play_round_robin_by_id(&teams);

        let field = determine_playoff_seeds(&teams, &games);

        for conference in Conference::ALL {
            let seeds = field.conference(conference);
            assert_eq!(seeds.len(), 7);
            assert_eq!(seeds.iter().map(|s| s.seed).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 7]);
            assert!(seeds[..4].iter().all(|s| s.is_division_winner));
            assert!(seeds[4..].iter().all(|s| !s.is_division_winner));
            assert!(seeds.iter().all(|s| s.conference == conference));
        }
    }

    #[test]
    fn test_division_winners_are_distinct_divisions() {
        let teams = standard_teams();
        let games = play_round_robin_by_id(&teams);

        let field = determine_playoff_seeds(&teams, &games);

        for conference in Conference::ALL {
            let mut divisions: Vec<u8> = field.conference(conference)[..4]
                .iter()
                .map(|seed| teams.iter().find(|t| t.id == seed.team_id).unwrap().division)
                .collect();
            divisions.sort_unstable();
            assert_eq!(divisions, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_seed_order_follows_tiebreaks() {
        let teams = standard_teams();
        let games = play_round_robin_by_id(&teams);
        let standings = LeagueStandings::from_games(&teams, &games);

        let field = determine_playoff_seeds(&teams, &games);

        for conference in Conference::ALL {
            let seeds = field.conference(conference);
            for pair in seeds[..4].windows(2).chain(seeds[4..].windows(2)) {
                let a = standings.row(pair[0].team_id).unwrap();
                let b = standings.row(pair[1].team_id).unwrap();
                assert_ne!(compare_across_divisions(a, b), std::cmp::Ordering::Greater);
            }
        }
    }

    #[test]
    fn test_best_non_winners_take_wildcards() {
        let teams = standard_teams();
        let games = play_round_robin_by_id(&teams);
        let standings = LeagueStandings::from_games(&teams, &games);

        let field = determine_playoff_seeds(&teams, &games);

        for conference in Conference::ALL {
            let seeded: Vec<u32> = field.conference(conference).iter().map(|s| s.team_id).collect();
            let worst_wildcard = standings.row(seeded[6]).unwrap();

            for row in standings.conference_table(conference) {
                if seeded.contains(&row.team_id) {
                    continue;
                }
                assert_eq!(
                    compare_across_divisions(worst_wildcard, row),
                    std::cmp::Ordering::Less
                );
            }
        }
    }

    #[test]
    fn test_no_games_still_seeds_by_team_id() {
        let teams = standard_teams();

        let field = determine_playoff_seeds(&teams, &[]);

        assert_eq!(field.afc.len(), 7);
        assert_eq!(field.nfc.len(), 7);
        assert_eq!(field.afc[0].team_id, 1);
    }
}
