use crate::league::Game;
use crate::r#match::{InjuryEvent, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub total_yards: u16,
    pub passing_yards: u16,
    pub rushing_yards: u16,
    pub pass_attempts: u16,
    pub completions: u16,
    pub rush_attempts: u16,
    pub first_downs: u16,
    pub third_down_attempts: u16,
    pub third_down_conversions: u16,
    pub turnovers: u8,
    pub interceptions_thrown: u8,
    pub fumbles_lost: u8,
    pub sacks_allowed: u8,
    pub penalties: u8,
    pub penalty_yards: u16,
    /// Seconds; the two sides sum to a full 60 minutes
    pub time_of_possession: u16,
}

impl TeamStats {
    pub fn third_down_rate(&self) -> f64 {
        if self.third_down_attempts == 0 {
            return 0.0;
        }
        self.third_down_conversions as f64 / self.third_down_attempts as f64
    }

    pub fn possession_clock(&self) -> String {
        format!("{}:{:02}", self.time_of_possession / 60, self.time_of_possession % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub player_id: u32,
    pub team_id: u32,
    pub position: Position,
    pub pass_attempts: u16,
    pub completions: u16,
    pub passing_yards: u16,
    pub passing_touchdowns: u8,
    pub interceptions_thrown: u8,
    pub carries: u16,
    pub rushing_yards: u16,
    pub rushing_touchdowns: u8,
    pub targets: u16,
    pub receptions: u16,
    pub receiving_yards: u16,
    pub receiving_touchdowns: u8,
    /// Scores nobody could be credited with as a runner or receiver
    pub other_touchdowns: u8,
    pub tackles: u16,
    pub sacks: u8,
    pub interceptions: u8,
    pub forced_fumbles: u8,
    pub field_goals_made: u8,
    pub field_goals_attempted: u8,
    pub extra_points_made: u8,
    pub punts: u8,
    pub punt_yards: u16,
}

impl PlayerStatLine {
    pub fn new(player_id: u32, team_id: u32, position: Position) -> Self {
        PlayerStatLine {
            player_id,
            team_id,
            position,
            pass_attempts: 0,
            completions: 0,
            passing_yards: 0,
            passing_touchdowns: 0,
            interceptions_thrown: 0,
            carries: 0,
            rushing_yards: 0,
            rushing_touchdowns: 0,
            targets: 0,
            receptions: 0,
            receiving_yards: 0,
            receiving_touchdowns: 0,
            other_touchdowns: 0,
            tackles: 0,
            sacks: 0,
            interceptions: 0,
            forced_fumbles: 0,
            field_goals_made: 0,
            field_goals_attempted: 0,
            extra_points_made: 0,
            punts: 0,
            punt_yards: 0,
        }
    }

    pub fn touchdowns(&self) -> u8 {
        self.rushing_touchdowns + self.receiving_touchdowns + self.other_touchdowns
    }
}

/// Points scored after regulation. Only playoff ties produce them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePoints {
    pub home: u16,
    pub away: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOfTheGame {
    pub player_id: u32,
    pub team_id: u32,
    pub description: String,
}

/// Box score of one simulated game. Quarter totals plus overtime equal the
/// final score on each side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: String,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub home_score: u16,
    pub away_score: u16,
    pub home_quarters: [u16; 4],
    pub away_quarters: [u16; 4],
    pub overtime: Option<OvertimePoints>,
    pub home_power: f64,
    pub away_power: f64,
    pub home_stats: TeamStats,
    pub away_stats: TeamStats,
    pub player_stats: BTreeMap<u32, PlayerStatLine>,
    pub injuries: Vec<InjuryEvent>,
    pub player_of_the_game: Option<PlayerOfTheGame>,
    pub narrative: Vec<String>,
}

impl GameResult {
    pub fn winner(&self) -> Option<u32> {
        if self.home_score > self.away_score {
            Some(self.home_team_id)
        } else if self.away_score > self.home_score {
            Some(self.away_team_id)
        } else {
            None
        }
    }

    pub fn margin(&self) -> u16 {
        self.home_score.abs_diff(self.away_score)
    }

    pub fn is_tie(&self) -> bool {
        self.home_score == self.away_score
    }

    pub fn team_stats(&self, team_id: u32) -> Option<&TeamStats> {
        if team_id == self.home_team_id {
            Some(&self.home_stats)
        } else if team_id == self.away_team_id {
            Some(&self.away_stats)
        } else {
            None
        }
    }

    pub fn team_lines(&self, team_id: u32) -> impl Iterator<Item = &PlayerStatLine> {
        self.player_stats
            .values()
            .filter(move |line| line.team_id == team_id)
    }

    /// The scheduled game with this result's score applied
    pub fn completed_game(&self, game: &Game) -> Game {
        game.with_score(self.home_score, self.away_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(home_score: u16, away_score: u16) -> GameResult {
        GameResult {
            game_id: "2026-W01-2@1".to_string(),
            home_team_id: 1,
            away_team_id: 2,
            home_score,
            away_score,
            home_quarters: [home_score, 0, 0, 0],
            away_quarters: [away_score, 0, 0, 0],
            overtime: None,
            home_power: 50.0,
            away_power: 50.0,
            home_stats: TeamStats::default(),
            away_stats: TeamStats::default(),
            player_stats: BTreeMap::new(),
            injuries: Vec::new(),
            player_of_the_game: None,
            narrative: Vec::new(),
        }
    }

    #[test]
    fn test_winner_and_margin() {
        let away_win = result(17, 24);
        assert_eq!(away_win.winner(), Some(2));
        assert_eq!(away_win.margin(), 7);

        let tie = result(20, 20);
        assert_eq!(tie.winner(), None);
        assert!(tie.is_tie());
    }

    #[test]
    fn test_completed_game_leaves_schedule_untouched() {
        let scheduled = Game::regular(2026, 1, 1, 2);

        let completed = result(31, 10).completed_game(&scheduled);

        assert!(completed.is_completed);
        assert_eq!(completed.home_score, 31);
        assert_eq!(completed.winner(), Some(1));
        assert!(!scheduled.is_completed);
    }

    #[test]
    fn test_possession_clock() {
        let stats = TeamStats {
            time_of_possession: 1865,
            ..TeamStats::default()
        };
        assert_eq!(stats.possession_clock(), "31:05");
    }

    #[test]
    fn test_stat_line_counts_every_touchdown() {
        let mut line = PlayerStatLine::new(81, 1, Position::Wr);
        line.receiving_touchdowns = 1;
        line.other_touchdowns = 2;

        assert_eq!(line.position, Position::Wr);
        assert_eq!(line.touchdowns(), 3);
    }
}
