use crate::generators::RosterGenerator;
use crate::{DatabaseEntity, DatabaseResult};
use gridiron_core::league::Team;
use gridiron_core::r#match::TeamRoster;
use gridiron_core::shared::SimRng;
use log::info;
use std::collections::HashMap;

/// Teams and their rosters, ready for the season runner
pub struct LeagueData {
    pub teams: Vec<Team>,
    pub rosters: HashMap<u32, TeamRoster>,
}

pub struct DatabaseGenerator;

impl DatabaseGenerator {
    pub fn generate(data: &DatabaseEntity, rng: &mut SimRng) -> DatabaseResult<LeagueData> {
        let roster_generator = RosterGenerator::with_names(&data.names);

        let mut teams = Vec::with_capacity(data.teams.len());
        let mut rosters = HashMap::with_capacity(data.teams.len());

        for entity in &data.teams {
            teams.push(entity.to_team()?);
            rosters.insert(entity.id, roster_generator.generate(entity, rng));
        }

        let players: usize = rosters.values().map(|roster| roster.players.len()).sum();
        info!("🏈 generated {} teams with {} rostered players", teams.len(), players);

        Ok(LeagueData { teams, rosters })
    }
}
