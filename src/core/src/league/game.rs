use crate::league::PlayoffRound;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub season: u16,
    pub week: u8,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub home_score: u16,
    pub away_score: u16,
    pub is_completed: bool,
    pub is_playoff: bool,
    pub round: Option<PlayoffRound>,
}

impl Game {
    pub fn regular(season: u16, week: u8, home_team_id: u32, away_team_id: u32) -> Self {
        Game {
            id: format!("{}-W{:02}-{}@{}", season, week, away_team_id, home_team_id),
            season,
            week,
            home_team_id,
            away_team_id,
            home_score: 0,
            away_score: 0,
            is_completed: false,
            is_playoff: false,
            round: None,
        }
    }

    pub fn playoff(
        season: u16,
        week: u8,
        round: PlayoffRound,
        home_team_id: u32,
        away_team_id: u32,
    ) -> Self {
        Game {
            id: format!("{}-{}-{}@{}", season, round.code(), away_team_id, home_team_id),
            season,
            week,
            home_team_id,
            away_team_id,
            home_score: 0,
            away_score: 0,
            is_completed: false,
            is_playoff: true,
            round: Some(round),
        }
    }

    pub fn involves(&self, team_id: u32) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    pub fn opponent_of(&self, team_id: u32) -> Option<u32> {
        if self.home_team_id == team_id {
            Some(self.away_team_id)
        } else if self.away_team_id == team_id {
            Some(self.home_team_id)
        } else {
            None
        }
    }

    /// Points (scored, conceded) from the perspective of `team_id`
    pub fn score_for(&self, team_id: u32) -> Option<(u16, u16)> {
        if self.home_team_id == team_id {
            Some((self.home_score, self.away_score))
        } else if self.away_team_id == team_id {
            Some((self.away_score, self.home_score))
        } else {
            None
        }
    }

    pub fn winner(&self) -> Option<u32> {
        if !self.is_completed || self.home_score == self.away_score {
            return None;
        }

        if self.home_score > self.away_score {
            Some(self.home_team_id)
        } else {
            Some(self.away_team_id)
        }
    }

    pub fn is_tie(&self) -> bool {
        self.is_completed && self.home_score == self.away_score
    }

    /// Completed copy of this game; the scheduled value is left untouched
    pub fn with_score(&self, home_score: u16, away_score: u16) -> Game {
        Game {
            home_score,
            away_score,
            is_completed: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_game_id() {
        let game = Game::regular(2026, 3, 12, 7);
        assert_eq!(game.id, "2026-W03-7@12");
        assert!(!game.is_playoff);
        assert!(game.involves(7));
        assert_eq!(game.opponent_of(12), Some(7));
        assert_eq!(game.opponent_of(99), None);
    }

    #[test]
    fn test_with_score_leaves_original() {
        let scheduled = Game::playoff(2026, 19, PlayoffRound::WildCard, 4, 9);
        let played = scheduled.with_score(20, 23);

        assert!(!scheduled.is_completed);
        assert!(played.is_completed);
        assert_eq!(played.winner(), Some(9));
        assert_eq!(played.score_for(4), Some((20, 23)));
        assert_eq!(scheduled.winner(), None);
    }

    #[test]
    fn test_tie_has_no_winner() {
        let game = Game::regular(2026, 1, 1, 2).with_score(17, 17);
        assert!(game.is_tie());
        assert_eq!(game.winner(), None);
    }
}
