use thiserror::Error;

/// Precondition violations raised by the core. Degraded-but-valid outcomes
/// (a short schedule, an empty bracket round) are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("no roster supplied for team {team_id} in game {game_id}")]
    MissingRoster { game_id: String, team_id: u32 },

    #[error("team {0} is not part of the league")]
    UnknownTeam(u32),

    #[error("invalid league topology: {0}")]
    InvalidTopology(String),

    #[error("week {week} is outside phase {phase} (1..={duration})")]
    InvalidCalendar {
        phase: String,
        week: u8,
        duration: u8,
    },
}

pub type SimulationResult<T> = Result<T, SimulationError>;
