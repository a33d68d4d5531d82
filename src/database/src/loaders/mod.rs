mod league;
mod names;

pub use league::*;
pub use names::*;

use crate::{DatabaseError, DatabaseResult};
use include_dir::{Dir, include_dir};
use serde::de::DeserializeOwned;

static DATA_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/data");

/// Parses one of the JSON files embedded from `data/`
fn load_embedded<T: DeserializeOwned>(file: &str) -> DatabaseResult<T> {
    let contents = DATA_DIR
        .get_file(file)
        .and_then(|entry| entry.contents_utf8())
        .ok_or_else(|| DatabaseError::MissingFile(file.to_string()))?;

    serde_json::from_str(contents).map_err(|source| DatabaseError::Json {
        file: file.to_string(),
        source,
    })
}
