use crate::league::{Conference, Game, Team};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub wins: u8,
    pub losses: u8,
    pub ties: u8,
}

impl SplitRecord {
    pub fn games(&self) -> u16 {
        self.wins as u16 + self.losses as u16 + self.ties as u16
    }

    pub fn win_percentage(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => (self.wins as f64 + self.ties as f64 * 0.5) / games as f64,
        }
    }

    fn add(&mut self, scored: u16, conceded: u16) {
        match scored.cmp(&conceded) {
            Ordering::Greater => self.wins += 1,
            Ordering::Less => self.losses += 1,
            Ordering::Equal => self.ties += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team_id: u32,
    pub conference: Conference,
    pub division: u8,
    pub overall: SplitRecord,
    pub division_record: SplitRecord,
    pub conference_record: SplitRecord,
    pub points_for: u32,
    pub points_against: u32,
}

impl StandingRow {
    fn new(team: &Team) -> Self {
        StandingRow {
            team_id: team.id,
            conference: team.conference,
            division: team.division,
            overall: SplitRecord::default(),
            division_record: SplitRecord::default(),
            conference_record: SplitRecord::default(),
            points_for: 0,
            points_against: 0,
        }
    }

    pub fn point_differential(&self) -> i32 {
        self.points_for as i32 - self.points_against as i32
    }
}

/// Tiebreak chain inside a division: win% → division record → conference
/// record → point differential → points scored, then team id.
pub fn compare_within_division(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.overall
        .win_percentage()
        .total_cmp(&a.overall.win_percentage())
        .then_with(|| {
            b.division_record
                .win_percentage()
                .total_cmp(&a.division_record.win_percentage())
        })
        .then_with(|| compare_tail(a, b))
}

/// Same chain without the division-record step, used across divisions
pub fn compare_across_divisions(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.overall
        .win_percentage()
        .total_cmp(&a.overall.win_percentage())
        .then_with(|| compare_tail(a, b))
}

fn compare_tail(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.conference_record
        .win_percentage()
        .total_cmp(&a.conference_record.win_percentage())
        .then_with(|| b.point_differential().cmp(&a.point_differential()))
        .then_with(|| b.points_for.cmp(&a.points_for))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

/// Regular-season table built from completed games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueStandings {
    pub rows: Vec<StandingRow>,
}

impl LeagueStandings {
    /// Playoff games, unplayed games and games with unknown teams are ignored
    pub fn from_games(teams: &[Team], games: &[Game]) -> Self {
        let mut rows: Vec<StandingRow> = teams.iter().map(StandingRow::new).collect();
        rows.sort_by_key(|row| row.team_id);

        let index: HashMap<u32, usize> = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.team_id, idx))
            .collect();

        for game in games.iter().filter(|g| g.is_completed && !g.is_playoff) {
            let (Some(&home), Some(&away)) = (
                index.get(&game.home_team_id),
                index.get(&game.away_team_id),
            ) else {
                continue;
            };

            let same_division = rows[home].conference == rows[away].conference
                && rows[home].division == rows[away].division;
            let same_conference = rows[home].conference == rows[away].conference;

            for (idx, scored, conceded) in [
                (home, game.home_score, game.away_score),
                (away, game.away_score, game.home_score),
            ] {
                let row = &mut rows[idx];

                row.overall.add(scored, conceded);
                row.points_for += scored as u32;
                row.points_against += conceded as u32;

                if same_division {
                    row.division_record.add(scored, conceded);
                }
                if same_conference {
                    row.conference_record.add(scored, conceded);
                }
            }
        }

        LeagueStandings { rows }
    }

    pub fn row(&self, team_id: u32) -> Option<&StandingRow> {
        self.rows.iter().find(|row| row.team_id == team_id)
    }

    pub fn division_table(&self, conference: Conference, division: u8) -> Vec<&StandingRow> {
        let mut table: Vec<&StandingRow> = self
            .rows
            .iter()
            .filter(|row| row.conference == conference && row.division == division)
            .collect();

        table.sort_by(|a, b| compare_within_division(a, b));
        table
    }

    pub fn conference_table(&self, conference: Conference) -> Vec<&StandingRow> {
        let mut table: Vec<&StandingRow> = self
            .rows
            .iter()
            .filter(|row| row.conference == conference)
            .collect();

        table.sort_by(|a, b| compare_across_divisions(a, b));
        table
    }

    /// Finishing position (1-based) of every team inside its division, the
    /// input next season's same-standing games are drawn from
    pub fn division_ranks(&self) -> HashMap<u32, u8> {
        let mut divisions: Vec<(Conference, u8)> = self
            .rows
            .iter()
            .map(|row| (row.conference, row.division))
            .collect();
        divisions.sort();
        divisions.dedup();

        divisions
            .into_iter()
            .flat_map(|(conference, division)| {
                self.division_table(conference, division)
                    .into_iter()
                    .enumerate()
                    .map(|(idx, row)| (row.team_id, idx as u8 + 1))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
