use gridiron_core::league::{Conference, LeagueStandings, division_label};
use gridiron_core::r#match::{InjuryEvent, StandardInjuryResolver};
use gridiron_core::schedule::ScheduleIssue;
use gridiron_core::utils::Logging;
use gridiron_core::{
    Game, GameSimulator, PlayoffField, PlayoffRound, ScheduleGenerator, ScheduleSettings,
    SeasonCalendar, SeasonPhase, SeasonSchedule, SimRng, SimulationResult, SimulationSettings, Team,
    TeamRoster,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Both settings blocks, as read from `SETTINGS_FILE`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    pub schedule: ScheduleSettings,
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: u16,
    pub regular_season_games: usize,
    pub playoff_games: usize,
    pub champion: Option<u32>,
    pub schedule_issues: Vec<ScheduleIssue>,
    pub injuries: usize,
}

/// Drives the calendar week by week: builds the schedule when the regular
/// season opens, plays each week's games, seeds and runs the bracket, and
/// applies every result to team records and player availability.
pub struct SeasonRunner {
    calendar: SeasonCalendar,
    teams: Vec<Team>,
    rosters: HashMap<u32, TeamRoster>,
    settings: RunnerSettings,
    injuries: StandardInjuryResolver,
    rng: SimRng,
    schedule: Option<SeasonSchedule>,
    completed: Vec<Game>,
    playoff_games: Vec<Game>,
    field: PlayoffField,
    prior_ranks: Option<HashMap<u32, u8>>,
    weeks_out: HashMap<u32, u8>,
    injury_count: usize,
    champion: Option<u32>,
}

impl SeasonRunner {
    pub fn new(
        season: u16,
        teams: Vec<Team>,
        rosters: HashMap<u32, TeamRoster>,
        settings: RunnerSettings,
        seed: u64,
    ) -> SimulationResult<Self> {
        // start on the last preseason week so the first tick opens the season
        let preseason_weeks = SeasonPhase::Preseason.duration_weeks();
        let calendar = SeasonCalendar::at(season, SeasonPhase::Preseason, preseason_weeks)?;

        Ok(SeasonRunner {
            calendar,
            teams,
            rosters,
            settings,
            injuries: StandardInjuryResolver::default(),
            rng: SimRng::seed_from(seed),
            schedule: None,
            completed: Vec::new(),
            playoff_games: Vec::new(),
            field: PlayoffField::default(),
            prior_ranks: None,
            weeks_out: HashMap::new(),
            injury_count: 0,
            champion: None,
        })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Plays `count` full seasons, one summary each
    pub fn run(&mut self, count: u16) -> SimulationResult<Vec<SeasonSummary>> {
        let mut summaries = Vec::new();

        while summaries.len() < count as usize {
            let season = self.calendar.year();
            let transition = self.calendar.advance_week();

            if transition.year_changed {
                summaries.push(self.finish_season(season));
            }

            self.play_current_week()?;
        }

        Ok(summaries)
    }

    fn play_current_week(&mut self) -> SimulationResult<()> {
        if !self.calendar.phase().is_game_phase() {
            return Ok(());
        }

        if let Some(week) = self.calendar.regular_season_week() {
            if week == 1 && self.schedule.is_none() {
                self.open_season()?;
            }

            let mut weeks = vec![week];
            // overflow weeks of a degraded schedule are played after the last regular week
            if week == SeasonPhase::RegularSeason.duration_weeks() {
                let last = self.schedule.as_ref().map(|s| s.last_week()).unwrap_or(week);
                weeks.extend(week + 1..=last);
            }

            for week in weeks {
                self.play_regular_week(week)?;
            }
            return Ok(());
        }

        if let Some(round) = self.calendar.playoff_round() {
            self.play_playoff_round(round)?;
        }

        Ok(())
    }

    fn open_season(&mut self) -> SimulationResult<()> {
        let season = self.calendar.year();

        let schedule = ScheduleGenerator::generate_regular_season(
            &self.teams,
            season,
            &mut self.rng,
            self.prior_ranks.as_ref(),
            &self.settings.schedule,
        )?;

        self.schedule = Some(schedule);
        Ok(())
    }

    fn play_regular_week(&mut self, week: u8) -> SimulationResult<()> {
        let games: Vec<Game> = match &self.schedule {
            Some(schedule) => schedule.week(week).into_iter().cloned().collect(),
            None => Vec::new(),
        };

        let results = Logging::estimate_result(
            || self.play_games(&games),
            &format!("week {} simulated ({} games)", week, games.len()),
        )?;

        self.completed.extend(results);
        self.heal_one_week();

        Ok(())
    }

    fn play_playoff_round(&mut self, round: PlayoffRound) -> SimulationResult<()> {
        let season = self.calendar.year();

        if round == PlayoffRound::WildCard {
            self.log_standings();
            self.field = ScheduleGenerator::determine_playoff_seeds(&self.teams, &self.completed);
        }

        let games = ScheduleGenerator::generate_playoff_round(
            &self.field.afc,
            &self.field.nfc,
            round,
            season,
            round.game_week(),
        );

        let results = self.play_games(&games)?;

        for game in &results {
            if let Some(winner) = game.winner() {
                let seed = self.field.seed_of(winner).map(|seed| seed.seed).unwrap_or_default();
                info!("🏆 {} {}: #{} {} advances", season, round, seed, self.team_label(winner));
            }
        }

        if round == PlayoffRound::SuperBowl {
            self.champion = results.first().and_then(|game| game.winner());
        } else {
            self.field = PlayoffField::new(
                ScheduleGenerator::filter_to_winners(&self.field.afc, &results),
                ScheduleGenerator::filter_to_winners(&self.field.nfc, &results),
            );

            for conference in Conference::ALL {
                if let Some(champion) = self.field.champion(conference) {
                    info!("{} {} champion: {}", season, conference, self.team_label(champion.team_id));
                }
            }
        }

        self.playoff_games.extend(results);
        self.heal_one_week();

        Ok(())
    }

    /// Simulates each game in order and applies its result before the next
    fn play_games(&mut self, games: &[Game]) -> SimulationResult<Vec<Game>> {
        let mut completed = Vec::with_capacity(games.len());

        for game in games {
            let result = {
                let simulator = GameSimulator::new(&self.settings.simulation, &self.injuries);
                simulator.simulate_from(game, &self.rosters, &mut self.rng)?
            };

            let finished = result.completed_game(game);
            if !finished.is_playoff {
                self.record(&finished);
            }
            self.apply_injuries(&result.injuries);

            debug!(
                "{}: {}-{} (margin {})",
                game.id,
                result.home_score,
                result.away_score,
                result.margin()
            );
            if let Some(star) = &result.player_of_the_game {
                debug!("{}: player of the game {}", game.id, star.description);
            }

            completed.push(finished);
        }

        Ok(completed)
    }

    fn record(&mut self, game: &Game) {
        for team in self.teams.iter_mut() {
            if let Some((scored, conceded)) = game.score_for(team.id) {
                team.record.add_game(scored, conceded);
            }
        }
    }

    fn apply_injuries(&mut self, events: &[InjuryEvent]) {
        for event in events {
            let Some(player) = self
                .rosters
                .get_mut(&event.team_id)
                .and_then(|roster| roster.players.get_mut(&event.player_id))
            else {
                continue;
            };

            player.injured = true;
            self.weeks_out.insert(event.player_id, event.weeks_out);
            self.injury_count += 1;

            debug!(
                "{} ({}, {:?}) out {} weeks",
                player.name,
                event.injury,
                event.injury.body_part(),
                event.weeks_out
            );
        }
    }

    /// Players whose absence has run out return; everyone else sits one
    /// week fewer.
    fn heal_one_week(&mut self) {
        let mut healed = Vec::new();

        for (player_id, weeks) in self.weeks_out.iter_mut() {
            if *weeks == 0 {
                healed.push(*player_id);
            } else {
                *weeks -= 1;
            }
        }

        for player_id in healed {
            self.return_to_lineup(player_id);
        }
    }

    fn return_to_lineup(&mut self, player_id: u32) {
        self.weeks_out.remove(&player_id);

        for roster in self.rosters.values_mut() {
            if let Some(player) = roster.players.get_mut(&player_id) {
                player.injured = false;
            }
        }
    }

    fn finish_season(&mut self, season: u16) -> SeasonSummary {
        let standings = LeagueStandings::from_games(&self.teams, &self.completed);
        self.prior_ranks = Some(standings.division_ranks());

        let summary = SeasonSummary {
            season,
            regular_season_games: self.completed.len(),
            playoff_games: self.playoff_games.len(),
            champion: self.champion,
            schedule_issues: self
                .schedule
                .as_ref()
                .map(|schedule| schedule.diagnostics.issues.clone())
                .unwrap_or_default(),
            injuries: self.injury_count,
        };

        match summary.champion {
            Some(champion) => info!("🏈 {} champion: {}", season, self.team_label(champion)),
            None => warn!("{} ended without a champion", season),
        }

        for team in self.teams.iter_mut() {
            team.record = Default::default();
        }
        // the offseason heals everyone
        let injured: Vec<u32> = self.weeks_out.keys().copied().collect();
        for player_id in injured {
            self.return_to_lineup(player_id);
        }
        self.schedule = None;
        self.completed.clear();
        self.playoff_games.clear();
        self.field = PlayoffField::default();
        self.injury_count = 0;
        self.champion = None;

        summary
    }

    fn log_standings(&self) {
        let standings = LeagueStandings::from_games(&self.teams, &self.completed);

        for conference in Conference::ALL {
            let mut divisions: Vec<u8> = self
                .teams
                .iter()
                .filter(|team| team.conference == conference)
                .map(|team| team.division)
                .collect();
            divisions.sort_unstable();
            divisions.dedup();

            for division in divisions {
                let table: Vec<String> = standings
                    .division_table(conference, division)
                    .iter()
                    .map(|row| format!("{} {}", self.team_label(row.team_id), row.overall.wins))
                    .collect();

                info!("{}: {}", division_label(conference, division), table.join(", "));
            }
        }
    }

    fn team_label(&self, team_id: u32) -> String {
        self.teams
            .iter()
            .find(|team| team.id == team_id)
            .map(|team| format!("{} ({})", team.name, team.record))
            .unwrap_or_else(|| team_id.to_string())
    }
}
