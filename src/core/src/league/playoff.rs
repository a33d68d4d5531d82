use crate::league::Conference;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayoffRound {
    WildCard,
    Divisional,
    ConferenceChampionship,
    SuperBowl,
}

impl PlayoffRound {
    pub fn next(self) -> Option<PlayoffRound> {
        match self {
            PlayoffRound::WildCard => Some(PlayoffRound::Divisional),
            PlayoffRound::Divisional => Some(PlayoffRound::ConferenceChampionship),
            PlayoffRound::ConferenceChampionship => Some(PlayoffRound::SuperBowl),
            PlayoffRound::SuperBowl => None,
        }
    }

    /// Season game-week the round is played in (regular season is 1..=18,
    /// the week before the Super Bowl is an off week)
    pub fn game_week(self) -> u8 {
        match self {
            PlayoffRound::WildCard => 19,
            PlayoffRound::Divisional => 20,
            PlayoffRound::ConferenceChampionship => 21,
            PlayoffRound::SuperBowl => 23,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            PlayoffRound::WildCard => "WC",
            PlayoffRound::Divisional => "DIV",
            PlayoffRound::ConferenceChampionship => "CONF",
            PlayoffRound::SuperBowl => "SB",
        }
    }
}

impl Display for PlayoffRound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlayoffRound::WildCard => "Wild Card",
            PlayoffRound::Divisional => "Divisional",
            PlayoffRound::ConferenceChampionship => "Conference Championship",
            PlayoffRound::SuperBowl => "Super Bowl",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffSeed {
    pub team_id: u32,
    pub conference: Conference,
    pub seed: u8,
    pub is_division_winner: bool,
}

/// Seeds of both conferences, each list sorted by seed number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffField {
    pub afc: Vec<PlayoffSeed>,
    pub nfc: Vec<PlayoffSeed>,
}

impl PlayoffField {
    pub fn new(afc: Vec<PlayoffSeed>, nfc: Vec<PlayoffSeed>) -> Self {
        PlayoffField { afc, nfc }
    }

    pub fn conference(&self, conference: Conference) -> &[PlayoffSeed] {
        match conference {
            Conference::Afc => &self.afc,
            Conference::Nfc => &self.nfc,
        }
    }

    pub fn seed_of(&self, team_id: u32) -> Option<&PlayoffSeed> {
        self.afc
            .iter()
            .chain(self.nfc.iter())
            .find(|seed| seed.team_id == team_id)
    }

    /// The lone survivor of a conference once its bracket is decided
    pub fn champion(&self, conference: Conference) -> Option<&PlayoffSeed> {
        match self.conference(conference) {
            [champion] => Some(champion),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.afc.len() + self.nfc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.afc.is_empty() && self.nfc.is_empty()
    }
}
