use crate::error::SimulationResult;
use crate::league::{Game, LeagueTopology, PlayoffField, PlayoffRound, PlayoffSeed, Team};
use crate::schedule::diagnostics::ScheduleDiagnostics;
use crate::schedule::matchups::{resolve_division_ranks, MatchupBuilder};
use crate::schedule::weeks::{PlanStrategy, WeekPlanner};
use crate::schedule::{bracket, seeding, ScheduleSettings};
use crate::shared::SimRng;
use crate::utils::Logging;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A season's regular-season games in week order, the bye of every team and
/// whatever rules the layout had to bend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSchedule {
    pub season: u16,
    pub games: Vec<Game>,
    pub bye_weeks: BTreeMap<u32, u8>,
    pub strategy: PlanStrategy,
    pub diagnostics: ScheduleDiagnostics,
}

impl SeasonSchedule {
    pub fn week(&self, week: u8) -> Vec<&Game> {
        self.games.iter().filter(|game| game.week == week).collect()
    }

    pub fn team_games(&self, team_id: u32) -> Vec<&Game> {
        self.games.iter().filter(|game| game.involves(team_id)).collect()
    }

    pub fn bye_week(&self, team_id: u32) -> Option<u8> {
        self.bye_weeks.get(&team_id).copied()
    }

    pub fn last_week(&self) -> u8 {
        self.games.iter().map(|game| game.week).max().unwrap_or(0)
    }
}

pub struct ScheduleGenerator;

impl ScheduleGenerator {
    /// Builds the regular season. `prior_ranks` (division finishing positions
    /// of the previous season) drive the same-standing games; divisions
    /// without a complete ranking draw one from `rng`.
    pub fn generate_regular_season(
        teams: &[Team],
        season: u16,
        rng: &mut SimRng,
        prior_ranks: Option<&HashMap<u32, u8>>,
        settings: &ScheduleSettings,
    ) -> SimulationResult<SeasonSchedule> {
        let topology = LeagueTopology::new(teams)?;

        let schedule = Logging::estimate_result(
            || Self::build(&topology, season, rng, prior_ranks, settings),
            &format!("schedule {} built", season),
        );

        info!(
            "📋 season {}: {} games over {} weeks ({:?} layout, {} issues)",
            season,
            schedule.games.len(),
            schedule.last_week(),
            schedule.strategy,
            schedule.diagnostics.issues.len()
        );

        Ok(schedule)
    }

    fn build(
        topology: &LeagueTopology,
        season: u16,
        rng: &mut SimRng,
        prior_ranks: Option<&HashMap<u32, u8>>,
        settings: &ScheduleSettings,
    ) -> SeasonSchedule {
        let ranks = resolve_division_ranks(topology, prior_ranks, rng);

        let mut builder = MatchupBuilder::new(topology, settings, season);
        builder.add_division_games();
        builder.add_conference_rotation();
        builder.add_inter_conference_rotation();
        builder.add_same_standing_games(&ranks);
        builder.add_seventeenth_game(&ranks);
        let reconciled = builder.reconcile(rng);
        let matchups = builder.into_matchups();

        let plan = WeekPlanner::new(topology, settings).plan(&matchups, season, !reconciled, rng);

        let mut games: Vec<Game> = plan
            .placements
            .iter()
            .map(|(matchup, week)| Game::regular(season, *week, matchup.home, matchup.away))
            .collect();
        games.sort_by(|a, b| a.week.cmp(&b.week).then_with(|| a.id.cmp(&b.id)));

        let diagnostics = ScheduleDiagnostics::inspect(topology, &games, &plan.byes, settings);
        diagnostics.log(season);

        SeasonSchedule {
            season,
            games,
            bye_weeks: plan.byes,
            strategy: plan.strategy,
            diagnostics,
        }
    }

    pub fn determine_playoff_seeds(teams: &[Team], games: &[Game]) -> PlayoffField {
        seeding::determine_playoff_seeds(teams, games)
    }

    pub fn generate_playoff_round(
        afc: &[PlayoffSeed],
        nfc: &[PlayoffSeed],
        round: PlayoffRound,
        season: u16,
        week: u8,
    ) -> Vec<Game> {
        bracket::generate_playoff_round(afc, nfc, round, season, week)
    }

    pub fn filter_to_winners(seeds: &[PlayoffSeed], games: &[Game]) -> Vec<PlayoffSeed> {
        bracket::filter_to_winners(seeds, games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use crate::league::{Conference, LeagueStandings};
    use crate::schedule::ScheduleIssue;
    use crate::test_support::{custom_league, standard_teams};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn generate(seed: u64, season: u16) -> SeasonSchedule {
        let mut rng = SimRng::seed_from(seed);
        ScheduleGenerator::generate_regular_season(
            &standard_teams(),
            season,
            &mut rng,
            None,
            &ScheduleSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_standard_season_shape() {
        let schedule = generate(42, 2026);

        assert_eq!(schedule.games.len(), 272);
        assert_eq!(schedule.last_week(), 18);
        assert_eq!(schedule.bye_weeks.len(), 32);
        assert_eq!(schedule.strategy, PlanStrategy::Rotation);
        assert!(schedule.diagnostics.is_clean(), "{:?}", schedule.diagnostics.issues);

        for team in 1..=32 {
            let mut weeks: Vec<u8> = schedule.team_games(team).iter().map(|g| g.week).collect();
            weeks.push(schedule.bye_week(team).unwrap());
            weeks.sort_unstable();
            assert_eq!(weeks, (1..=18).collect::<Vec<u8>>(), "team {}", team);
        }
    }

    #[test]
    fn test_same_seed_same_schedule() {
        assert_eq!(generate(7, 2026), generate(7, 2026));
        assert_ne!(generate(7, 2026).games, generate(8, 2026).games);
    }

    #[test]
    fn test_game_ids_unique() {
        let schedule = generate(3, 2027);
        let ids: HashSet<&str> = schedule.games.iter().map(|g| g.id.as_str()).collect();

        assert_eq!(ids.len(), schedule.games.len());
    }

    #[test]
    fn test_prior_ranks_from_standings() {
        let teams = standard_teams();
        let first = generate(1, 2026);
        let completed: Vec<Game> = first
            .games
            .iter()
            .map(|g| if g.home_team_id < g.away_team_id { g.with_score(24, 17) } else { g.with_score(13, 20) })
            .collect();
        let ranks = LeagueStandings::from_games(&teams, &completed).division_ranks();

        let mut rng = SimRng::seed_from(2);
        let next = ScheduleGenerator::generate_regular_season(
            &teams,
            2027,
            &mut rng,
            Some(&ranks),
            &ScheduleSettings::default(),
        )
        .unwrap();

        assert_eq!(next.games.len(), 272);
        assert!(next.diagnostics.is_clean());
    }

    #[test]
    fn test_invalid_topology_is_an_error() {
        let mut teams = standard_teams();
        teams.pop();

        let mut rng = SimRng::seed_from(1);
        let result = ScheduleGenerator::generate_regular_season(
            &teams,
            2026,
            &mut rng,
            None,
            &ScheduleSettings::default(),
        );

        assert!(matches!(result, Err(SimulationError::InvalidTopology(_))));
    }

    #[test]
    fn test_other_league_sizes_fill_eighteen_weeks() {
        for divisions in [2u8, 3, 5] {
            let teams = custom_league(divisions, 4);

            for seed in 0..4 {
                let mut rng = SimRng::seed_from(seed * 13 + divisions as u64);
                let schedule = ScheduleGenerator::generate_regular_season(
                    &teams,
                    2026 + seed as u16,
                    &mut rng,
                    None,
                    &ScheduleSettings::default(),
                )
                .unwrap();

                assert_eq!(schedule.strategy, PlanStrategy::Interchange);
                assert_eq!(schedule.games.len(), teams.len() * 17 / 2);
                assert_eq!(schedule.last_week(), 18);
                assert!(schedule.diagnostics.is_clean(), "{} teams: {:?}", teams.len(), schedule.diagnostics.issues);

                for team in &teams {
                    let mut weeks: Vec<u8> = schedule.team_games(team.id).iter().map(|g| g.week).collect();
                    let bye = schedule.bye_week(team.id).unwrap();
                    assert!((5..=14).contains(&bye));
                    weeks.push(bye);
                    weeks.sort_unstable();
                    assert_eq!(weeks, (1..=18).collect::<Vec<u8>>(), "team {}", team.id);
                }
            }
        }
    }

    #[test]
    fn test_tiny_league_degrades_without_failing() {
        // eight teams run out of distinct opponents long before 17 games
        let teams = custom_league(1, 4);
        let mut rng = SimRng::seed_from(12);

        let schedule = ScheduleGenerator::generate_regular_season(
            &teams,
            2026,
            &mut rng,
            None,
            &ScheduleSettings::default(),
        )
        .unwrap();

        assert!(!schedule.games.is_empty());
        assert!(schedule.last_week() <= 18);

        for team in &teams {
            let weeks: Vec<u8> = schedule.team_games(team.id).iter().map(|g| g.week).collect();
            let unique: HashSet<u8> = weeks.iter().copied().collect();
            assert_eq!(unique.len(), weeks.len());
            assert!(weeks.len() < 17);

            assert!(schedule.diagnostics.issues.contains(&ScheduleIssue::GameCount {
                team_id: team.id,
                games: weeks.len() as u8,
                expected: 17,
            }));
        }
    }

    #[test]
    fn test_full_postseason_bracket() {
        let teams = standard_teams();
        let schedule = generate(99, 2026);
        let completed: Vec<Game> = schedule
            .games
            .iter()
            .map(|g| g.with_score(20 + (g.home_team_id % 7) as u16, 10 + (g.away_team_id % 13) as u16))
            .collect();

        let field = ScheduleGenerator::determine_playoff_seeds(&teams, &completed);
        let mut afc = field.afc.clone();
        let mut nfc = field.nfc.clone();

        for round in [
            PlayoffRound::WildCard,
            PlayoffRound::Divisional,
            PlayoffRound::ConferenceChampionship,
        ] {
            let games: Vec<Game> =
                ScheduleGenerator::generate_playoff_round(&afc, &nfc, round, 2026, round.game_week())
                    .iter()
                    .map(|g| g.with_score(27, 24))
                    .collect();
            assert!(!games.is_empty());

            afc = ScheduleGenerator::filter_to_winners(&afc, &games);
            nfc = ScheduleGenerator::filter_to_winners(&nfc, &games);
        }

        assert_eq!(afc.len(), 1);
        assert_eq!(nfc.len(), 1);
        assert_eq!(afc[0].seed, 1);
        assert_eq!(afc[0].conference, Conference::Afc);

        let final_game =
            ScheduleGenerator::generate_playoff_round(&afc, &nfc, PlayoffRound::SuperBowl, 2026, 23);
        assert_eq!(final_game.len(), 1);
        assert_eq!(final_game[0].home_team_id, afc[0].team_id);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_standard_schedule_invariants(seed in any::<u64>(), season in 1990u16..2100) {
            let schedule = generate(seed, season);

            prop_assert_eq!(schedule.games.len(), 272);
            prop_assert!(schedule.diagnostics.is_clean());

            let mut byes_per_week: BTreeMap<u8, usize> = BTreeMap::new();
            for week in schedule.bye_weeks.values() {
                prop_assert!((5..=14).contains(week));
                *byes_per_week.entry(*week).or_default() += 1;
            }
            prop_assert!(byes_per_week.values().all(|count| *count <= 4));

            let mut division_pairs: HashMap<(u32, u32), usize> = HashMap::new();
            let teams = standard_teams();
            for game in &schedule.games {
                let home = &teams[game.home_team_id as usize - 1];
                let away = &teams[game.away_team_id as usize - 1];
                if home.same_division(away) {
                    *division_pairs.entry((game.home_team_id, game.away_team_id)).or_default() += 1;
                }
            }
            prop_assert_eq!(division_pairs.len(), 8 * 12);
            prop_assert!(division_pairs.values().all(|count| *count == 1));
        }
    }
}
