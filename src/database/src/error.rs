use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("embedded file {0} is missing or not UTF-8")]
    MissingFile(String),

    #[error("malformed {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("team {team_id}: {reason}")]
    InvalidTeam { team_id: u32, reason: String },
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
