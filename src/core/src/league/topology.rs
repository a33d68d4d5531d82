use crate::error::{SimulationError, SimulationResult};
use crate::league::{Conference, Team};
use std::collections::{BTreeMap, HashSet};

pub const TEAMS_PER_DIVISION: usize = 4;
pub const STANDARD_DIVISIONS_PER_CONFERENCE: usize = 4;

/// Conference/division layout of the league, validated once and then queried
/// by the schedule builders. Teams are held in id order.
#[derive(Debug, Clone)]
pub struct LeagueTopology {
    teams: Vec<Team>,
    divisions: BTreeMap<(Conference, u8), Vec<u32>>,
}

impl LeagueTopology {
    pub fn new(teams: &[Team]) -> SimulationResult<Self> {
        if teams.len() < 2 {
            return Err(SimulationError::InvalidTopology(format!(
                "a league needs at least two teams, got {}",
                teams.len()
            )));
        }

        if teams.len() % 2 != 0 {
            return Err(SimulationError::InvalidTopology(format!(
                "odd team count {} cannot fill every week",
                teams.len()
            )));
        }

        let mut seen = HashSet::with_capacity(teams.len());
        if let Some(duplicate) = teams.iter().find(|team| !seen.insert(team.id)) {
            return Err(SimulationError::InvalidTopology(format!(
                "team id {} appears more than once",
                duplicate.id
            )));
        }

        let mut sorted: Vec<Team> = teams.to_vec();
        sorted.sort_by_key(|team| team.id);

        let mut divisions: BTreeMap<(Conference, u8), Vec<u32>> = BTreeMap::new();
        for team in &sorted {
            divisions
                .entry((team.conference, team.division))
                .or_default()
                .push(team.id);
        }

        Ok(LeagueTopology {
            teams: sorted,
            divisions,
        })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, team_id: u32) -> Option<&Team> {
        self.teams
            .binary_search_by_key(&team_id, |team| team.id)
            .ok()
            .map(|idx| &self.teams[idx])
    }

    pub fn team_ids(&self) -> Vec<u32> {
        self.teams.iter().map(|team| team.id).collect()
    }

    pub fn conferences(&self) -> Vec<Conference> {
        Conference::ALL
            .into_iter()
            .filter(|conference| self.teams.iter().any(|team| team.conference == *conference))
            .collect()
    }

    /// Division indexes of a conference in ascending order
    pub fn divisions(&self, conference: Conference) -> Vec<u8> {
        self.divisions
            .keys()
            .filter(|(conf, _)| *conf == conference)
            .map(|(_, division)| *division)
            .collect()
    }

    pub fn division_teams(&self, conference: Conference, division: u8) -> &[u32] {
        self.divisions
            .get(&(conference, division))
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn same_division(&self, a: u32, b: u32) -> bool {
        match (self.team(a), self.team(b)) {
            (Some(a), Some(b)) => a.same_division(b),
            _ => false,
        }
    }

    /// Two conferences of four divisions of four teams each, numbered 0..4
    pub fn is_standard(&self) -> bool {
        Conference::ALL.iter().all(|conference| {
            let divisions = self.divisions(*conference);
            divisions.len() == STANDARD_DIVISIONS_PER_CONFERENCE
                && divisions.iter().enumerate().all(|(idx, division)| {
                    *division as usize == idx
                        && self.division_teams(*conference, *division).len() == TEAMS_PER_DIVISION
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::standard_teams;

    #[test]
    fn test_standard_topology() {
        let teams = standard_teams();
        let topology = LeagueTopology::new(&teams).unwrap();

        assert!(topology.is_standard());
        assert_eq!(topology.conferences(), vec![Conference::Afc, Conference::Nfc]);
        assert_eq!(topology.divisions(Conference::Nfc), vec![0, 1, 2, 3]);
        assert_eq!(topology.division_teams(Conference::Afc, 2).len(), 4);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut teams = standard_teams();
        teams[5].id = teams[4].id;

        assert!(matches!(
            LeagueTopology::new(&teams),
            Err(SimulationError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_rejects_odd_league() {
        let mut teams = standard_teams();
        teams.pop();

        assert!(LeagueTopology::new(&teams).is_err());
        assert!(LeagueTopology::new(&teams[..1]).is_err());
    }

    #[test]
    fn test_small_league_is_not_standard() {
        let teams: Vec<Team> = standard_teams()
            .into_iter()
            .filter(|team| team.division < 2)
            .collect();
        let topology = LeagueTopology::new(&teams).unwrap();

        assert!(!topology.is_standard());
        assert_eq!(topology.teams().len(), 16);
    }
}
