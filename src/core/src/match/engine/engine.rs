use crate::error::{SimulationError, SimulationResult};
use crate::league::Game;
use crate::r#match::engine::awards::player_of_the_game;
use crate::r#match::engine::narrative::{NarrativeInput, build_narrative};
use crate::r#match::engine::players::{Personnel, StatAllocator, completion_rate};
use crate::r#match::engine::power::TeamPower;
use crate::r#match::engine::quarters::split_quarters;
use crate::r#match::engine::score::ScoreModel;
use crate::r#match::engine::team_stats::{SideOutlook, TeamStatsModel};
use crate::r#match::{
    GameParticipant, GameResult, InjuryResolver, PlayerStatLine, RosterPlayer, SimulationSettings,
    TeamRoster,
};
use crate::shared::SimRng;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Resolves a game from two rosters without simulating plays.
///
/// Random draws happen in a fixed order (power is deterministic, then
/// scores, tie-break, quarters, team stats, possession, player lines,
/// injuries, narrative), so a reseeded stream replays a game exactly.
pub struct GameSimulator<'a> {
    settings: &'a SimulationSettings,
    injuries: &'a dyn InjuryResolver,
}

impl<'a> GameSimulator<'a> {
    pub fn new(settings: &'a SimulationSettings, injuries: &'a dyn InjuryResolver) -> Self {
        GameSimulator { settings, injuries }
    }

    /// Looks both rosters up by team id
    pub fn simulate_from(
        &self,
        game: &Game,
        rosters: &HashMap<u32, TeamRoster>,
        rng: &mut SimRng,
    ) -> SimulationResult<GameResult> {
        let home = Self::roster_for(game, game.home_team_id, rosters.get(&game.home_team_id))?;
        let away = Self::roster_for(game, game.away_team_id, rosters.get(&game.away_team_id))?;

        self.simulate(game, home, away, rng)
    }

    pub fn simulate(
        &self,
        game: &Game,
        home: &TeamRoster,
        away: &TeamRoster,
        rng: &mut SimRng,
    ) -> SimulationResult<GameResult> {
        Self::roster_for(game, game.home_team_id, Some(home))?;
        Self::roster_for(game, game.away_team_id, Some(away))?;

        let settings = self.settings;
        let model = ScoreModel::new(settings);

        let home_power = TeamPower::rate(home);
        let away_power = TeamPower::rate(away);

        let mut home_score = model.draw(home_power + settings.home_field_advantage, rng);
        let mut away_score = model.draw(away_power, rng);

        let home_regulation = home_score.points();
        let away_regulation = away_score.points();

        let overtime = if game.is_playoff && home_regulation == away_regulation {
            Some(model.break_tie(&mut home_score, &mut away_score, rng))
        } else {
            None
        };

        let home_quarters = split_quarters(home_regulation, rng);
        let away_quarters = split_quarters(away_regulation, rng);

        let home_points = home_score.points();
        let away_points = away_score.points();

        let home_personnel = Personnel::new(home);
        let away_personnel = Personnel::new(away);

        let mut home_stats = TeamStatsModel::build(
            &SideOutlook {
                points: home_points,
                opponent_points: away_points,
                power: home_power,
                opponent_power: away_power,
                completion_rate: completion_rate(home_personnel.quarterback),
            },
            rng,
        );
        let mut away_stats = TeamStatsModel::build(
            &SideOutlook {
                points: away_points,
                opponent_points: home_points,
                power: away_power,
                opponent_power: home_power,
                completion_rate: completion_rate(away_personnel.quarterback),
            },
            rng,
        );

        TeamStatsModel::split_possession(&mut home_stats, &mut away_stats, rng);
        TeamStatsModel::restrict_to_personnel(&mut home_stats, home_personnel.can_pass(), home_personnel.can_rush());
        TeamStatsModel::restrict_to_personnel(&mut away_stats, away_personnel.can_pass(), away_personnel.can_rush());

        // every player who took the field gets a line, stats or not
        let mut player_stats: BTreeMap<u32, PlayerStatLine> = BTreeMap::new();
        for roster in [home, away] {
            for player in roster.game_day_players() {
                player_stats.insert(
                    player.id,
                    PlayerStatLine::new(player.id, roster.team_id, player.position),
                );
            }
        }

        StatAllocator::new(home.team_id, &home_personnel).allocate(
            &mut player_stats,
            &home_stats,
            &away_stats,
            &home_score,
            rng,
        );
        StatAllocator::new(away.team_id, &away_personnel).allocate(
            &mut player_stats,
            &away_stats,
            &home_stats,
            &away_score,
            rng,
        );

        let home_players = home.game_day_players();
        let away_players = away.game_day_players();
        let injuries = self.injuries.process_game_injuries(
            &Self::participants(home.team_id, &home_players),
            &Self::participants(away.team_id, &away_players),
            rng,
        );

        let winner = match home_points.cmp(&away_points) {
            std::cmp::Ordering::Greater => Some(home.team_id),
            std::cmp::Ordering::Less => Some(away.team_id),
            std::cmp::Ordering::Equal => None,
        };

        let player_of_the_game = player_of_the_game(&player_stats, [home, away], winner);

        let narrative = build_narrative(
            &NarrativeInput {
                lines: &player_stats,
                rosters: [home, away],
                scores: [home_points, away_points],
                cap: settings.narrative_cap,
                close_margin: settings.close_game_margin,
            },
            rng,
        );

        debug!(
            "game {}: {} {} - {} {} (power {:.1} vs {:.1}, {} injuries)",
            game.id,
            home.abbreviation,
            home_points,
            away_points,
            away.abbreviation,
            home_power,
            away_power,
            injuries.len()
        );

        Ok(GameResult {
            game_id: game.id.clone(),
            home_team_id: home.team_id,
            away_team_id: away.team_id,
            home_score: home_points,
            away_score: away_points,
            home_quarters,
            away_quarters,
            overtime,
            home_power,
            away_power,
            home_stats,
            away_stats,
            player_stats,
            injuries,
            player_of_the_game,
            narrative,
        })
    }

    fn roster_for<'r>(
        game: &Game,
        team_id: u32,
        roster: Option<&'r TeamRoster>,
    ) -> SimulationResult<&'r TeamRoster> {
        roster
            .filter(|roster| roster.team_id == team_id)
            .ok_or_else(|| SimulationError::MissingRoster {
                game_id: game.id.clone(),
                team_id,
            })
    }

    fn participants<'p>(team_id: u32, players: &[&'p RosterPlayer]) -> Vec<GameParticipant<'p>> {
        players
            .iter()
            .map(|&player| GameParticipant { team_id, player })
            .collect()
    }
}
