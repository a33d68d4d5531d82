pub mod calendar;
pub mod error;
pub mod league;
pub mod r#match;
pub mod schedule;
pub mod shared;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use calendar::{PhaseTransition, SeasonCalendar, SeasonPhase};
pub use error::{SimulationError, SimulationResult};
pub use league::{Conference, Game, LeagueStandings, PlayoffField, PlayoffRound, PlayoffSeed, Team};
pub use r#match::{GameResult, GameSimulator, SimulationSettings, TeamRoster};
pub use schedule::{ScheduleGenerator, ScheduleSettings, SeasonSchedule};
pub use shared::SimRng;
pub use utils::*;
