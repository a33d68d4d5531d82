use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Conference {
    Afc,
    Nfc,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::Afc, Conference::Nfc];
}

impl Display for Conference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Conference::Afc => write!(f, "AFC"),
            Conference::Nfc => write!(f, "NFC"),
        }
    }
}

const DIVISION_NAMES: [&str; 4] = ["East", "North", "South", "West"];

/// Human label for a division index inside a conference
pub fn division_label(conference: Conference, division: u8) -> String {
    match DIVISION_NAMES.get(division as usize) {
        Some(name) => format!("{} {}", conference, name),
        None => format!("{} Division {}", conference, division + 1),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub wins: u8,
    pub losses: u8,
    pub ties: u8,
    pub points_for: u32,
    pub points_against: u32,
}

impl TeamRecord {
    pub fn games(&self) -> u16 {
        self.wins as u16 + self.losses as u16 + self.ties as u16
    }

    /// Ties count as half a win; 0.0 before the first game
    pub fn win_percentage(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => (self.wins as f64 + self.ties as f64 * 0.5) / games as f64,
        }
    }

    pub fn point_differential(&self) -> i32 {
        self.points_for as i32 - self.points_against as i32
    }

    pub fn add_game(&mut self, scored: u16, conceded: u16) {
        self.points_for += scored as u32;
        self.points_against += conceded as u32;

        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => self.wins += 1,
            std::cmp::Ordering::Less => self.losses += 1,
            std::cmp::Ordering::Equal => self.ties += 1,
        }
    }
}

impl Display for TeamRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.ties > 0 {
            write!(f, "{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            write!(f, "{}-{}", self.wins, self.losses)
        }
    }
}

/// Read slice of a franchise: identity, league position and current record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub abbreviation: String,
    pub conference: Conference,
    pub division: u8,
    pub record: TeamRecord,
}

impl Team {
    pub fn new(
        id: u32,
        name: String,
        abbreviation: String,
        conference: Conference,
        division: u8,
    ) -> Self {
        Team {
            id,
            name,
            abbreviation,
            conference,
            division,
            record: TeamRecord::default(),
        }
    }

    pub fn division_label(&self) -> String {
        division_label(self.conference, self.division)
    }

    pub fn same_division(&self, other: &Team) -> bool {
        self.conference == other.conference && self.division == other.division
    }
}
