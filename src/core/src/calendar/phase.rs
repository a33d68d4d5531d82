use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeasonPhase {
    PostSeason,
    CombineScouting,
    FreeAgency,
    PreDraft,
    Draft,
    PostDraft,
    Preseason,
    RegularSeason,
    Playoffs,
    SuperBowl,
}

impl SeasonPhase {
    pub const ALL: [SeasonPhase; 10] = [
        SeasonPhase::PostSeason,
        SeasonPhase::CombineScouting,
        SeasonPhase::FreeAgency,
        SeasonPhase::PreDraft,
        SeasonPhase::Draft,
        SeasonPhase::PostDraft,
        SeasonPhase::Preseason,
        SeasonPhase::RegularSeason,
        SeasonPhase::Playoffs,
        SeasonPhase::SuperBowl,
    ];

    pub const FIRST: SeasonPhase = SeasonPhase::PostSeason;

    pub fn duration_weeks(self) -> u8 {
        match self {
            SeasonPhase::PostSeason => 2,
            SeasonPhase::CombineScouting => 2,
            SeasonPhase::FreeAgency => 4,
            SeasonPhase::PreDraft => 2,
            SeasonPhase::Draft => 1,
            SeasonPhase::PostDraft => 3,
            SeasonPhase::Preseason => 4,
            SeasonPhase::RegularSeason => 18,
            SeasonPhase::Playoffs => 4,
            SeasonPhase::SuperBowl => 1,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_last(self) -> bool {
        self == SeasonPhase::SuperBowl
    }

    /// Next phase in the fixed cycle; wraps to `PostSeason` after `SuperBowl`
    pub fn next(self) -> SeasonPhase {
        SeasonPhase::ALL[(self.index() + 1) % SeasonPhase::ALL.len()]
    }

    /// Weeks consumed by all phases before this one
    pub fn weeks_before(self) -> u16 {
        SeasonPhase::ALL[..self.index()]
            .iter()
            .map(|phase| phase.duration_weeks() as u16)
            .sum()
    }

    pub fn season_length() -> u16 {
        SeasonPhase::ALL
            .iter()
            .map(|phase| phase.duration_weeks() as u16)
            .sum()
    }

    pub fn is_game_phase(self) -> bool {
        matches!(
            self,
            SeasonPhase::RegularSeason | SeasonPhase::Playoffs | SeasonPhase::SuperBowl
        )
    }
}

impl Display for SeasonPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SeasonPhase::PostSeason => "Post-season",
            SeasonPhase::CombineScouting => "Combine & scouting",
            SeasonPhase::FreeAgency => "Free agency",
            SeasonPhase::PreDraft => "Pre-draft",
            SeasonPhase::Draft => "Draft",
            SeasonPhase::PostDraft => "Post-draft",
            SeasonPhase::Preseason => "Preseason",
            SeasonPhase::RegularSeason => "Regular season",
            SeasonPhase::Playoffs => "Playoffs",
            SeasonPhase::SuperBowl => "Super Bowl",
        };
        write!(f, "{}", name)
    }
}
