mod error;
mod generators;
mod loaders;

pub use error::*;
pub use generators::*;
pub use loaders::*;

use log::debug;

pub struct DatabaseEntity {
    pub teams: Vec<TeamEntity>,
    pub names: NamesEntity,
}

pub struct DatabaseLoader;

impl DatabaseLoader {
    pub fn load() -> DatabaseResult<DatabaseEntity> {
        let teams = LeagueLoader::load()?;
        let names = NamesLoader::load()?;

        debug!(
            "loaded {} teams, {} first and {} last names",
            teams.len(),
            names.first_names.len(),
            names.last_names.len()
        );

        Ok(DatabaseEntity { teams, names })
    }
}
