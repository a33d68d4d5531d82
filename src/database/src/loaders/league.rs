use crate::loaders::load_embedded;
use crate::{DatabaseError, DatabaseResult};
use gridiron_core::league::{Conference, Team};
use serde::Deserialize;

const LEAGUE_FILE: &str = "league.json";

#[derive(Debug, Clone, Deserialize)]
pub struct TeamEntity {
    pub id: u32,
    pub name: String,
    pub abbreviation: String,
    pub conference: String,
    pub division: u8,
    /// Roster strength the generator centres ratings on
    pub quality: u8,
}

impl TeamEntity {
    pub fn to_team(&self) -> DatabaseResult<Team> {
        let conference = match self.conference.as_str() {
            "AFC" => Conference::Afc,
            "NFC" => Conference::Nfc,
            other => {
                return Err(DatabaseError::InvalidTeam {
                    team_id: self.id,
                    reason: format!("unknown conference {}", other),
                });
            }
        };

        Ok(Team::new(
            self.id,
            self.name.clone(),
            self.abbreviation.clone(),
            conference,
            self.division,
        ))
    }
}

#[derive(Deserialize)]
struct LeagueFile {
    teams: Vec<TeamEntity>,
}

pub struct LeagueLoader;

impl LeagueLoader {
    pub fn load() -> DatabaseResult<Vec<TeamEntity>> {
        let league: LeagueFile = load_embedded(LEAGUE_FILE)?;
        Ok(league.teams)
    }
}
