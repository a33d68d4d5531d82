use crate::DatabaseResult;
use crate::loaders::load_embedded;
use serde::Deserialize;

const NAMES_FILE: &str = "names.json";

#[derive(Debug, Clone, Deserialize)]
pub struct NamesEntity {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
}

pub struct NamesLoader;

impl NamesLoader {
    pub fn load() -> DatabaseResult<NamesEntity> {
        load_embedded(NAMES_FILE)
    }
}
