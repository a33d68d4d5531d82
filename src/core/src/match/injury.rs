use crate::r#match::{Position, RosterPlayer};
use crate::shared::SimRng;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InjurySeverity {
    Minor,
    Moderate,
    Severe,
    SeasonEnding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyPart {
    Head,
    Shoulder,
    Ribs,
    Back,
    Hamstring,
    Groin,
    Knee,
    Ankle,
    Foot,
    Hand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InjuryType {
    // Minor (1-2 weeks)
    Bruise,
    Stinger,
    HandFracture,
    RibContusion,
    // Moderate (2-6 weeks)
    Concussion,
    HamstringStrain,
    HighAnkleSprain,
    GroinStrain,
    TurfToe,
    // Severe (6-12 weeks)
    MclSprain,
    ShoulderSeparation,
    TornMeniscus,
    BrokenCollarbone,
    // Season ending
    AclTear,
    AchillesRupture,
    HerniatedDisc,
}

const MINOR: [InjuryType; 4] = [
    InjuryType::Bruise,
    InjuryType::Stinger,
    InjuryType::HandFracture,
    InjuryType::RibContusion,
];

const MODERATE: [InjuryType; 5] = [
    InjuryType::Concussion,
    InjuryType::HamstringStrain,
    InjuryType::HighAnkleSprain,
    InjuryType::GroinStrain,
    InjuryType::TurfToe,
];

const SEVERE: [InjuryType; 4] = [
    InjuryType::MclSprain,
    InjuryType::ShoulderSeparation,
    InjuryType::TornMeniscus,
    InjuryType::BrokenCollarbone,
];

const SEASON_ENDING: [InjuryType; 3] = [
    InjuryType::AclTear,
    InjuryType::AchillesRupture,
    InjuryType::HerniatedDisc,
];

impl InjuryType {
    /// Returns (min_weeks, max_weeks) out of the lineup
    pub fn weeks_range(&self) -> (u8, u8) {
        match self {
            InjuryType::Bruise => (1, 1),
            InjuryType::Stinger => (1, 2),
            InjuryType::HandFracture => (1, 3),
            InjuryType::RibContusion => (1, 2),
            InjuryType::Concussion => (1, 4),
            InjuryType::HamstringStrain => (2, 5),
            InjuryType::HighAnkleSprain => (3, 6),
            InjuryType::GroinStrain => (2, 4),
            InjuryType::TurfToe => (2, 6),
            InjuryType::MclSprain => (4, 8),
            InjuryType::ShoulderSeparation => (4, 10),
            InjuryType::TornMeniscus => (6, 12),
            InjuryType::BrokenCollarbone => (6, 10),
            InjuryType::AclTear => (36, 52),
            InjuryType::AchillesRupture => (40, 52),
            InjuryType::HerniatedDisc => (12, 26),
        }
    }

    pub fn severity(&self) -> InjurySeverity {
        if MINOR.contains(self) {
            InjurySeverity::Minor
        } else if MODERATE.contains(self) {
            InjurySeverity::Moderate
        } else if SEVERE.contains(self) {
            InjurySeverity::Severe
        } else {
            InjurySeverity::SeasonEnding
        }
    }

    pub fn body_part(&self) -> BodyPart {
        match self {
            InjuryType::Bruise => BodyPart::Knee,
            InjuryType::Stinger => BodyPart::Shoulder,
            InjuryType::HandFracture => BodyPart::Hand,
            InjuryType::RibContusion => BodyPart::Ribs,
            InjuryType::Concussion => BodyPart::Head,
            InjuryType::HamstringStrain => BodyPart::Hamstring,
            InjuryType::HighAnkleSprain => BodyPart::Ankle,
            InjuryType::GroinStrain => BodyPart::Groin,
            InjuryType::TurfToe => BodyPart::Foot,
            InjuryType::MclSprain => BodyPart::Knee,
            InjuryType::ShoulderSeparation => BodyPart::Shoulder,
            InjuryType::TornMeniscus => BodyPart::Knee,
            InjuryType::BrokenCollarbone => BodyPart::Shoulder,
            InjuryType::AclTear => BodyPart::Knee,
            InjuryType::AchillesRupture => BodyPart::Ankle,
            InjuryType::HerniatedDisc => BodyPart::Back,
        }
    }

    pub fn random_weeks_out(&self, rng: &mut SimRng) -> u8 {
        let (min, max) = self.weeks_range();
        rng.range_i32(min as i32, max as i32) as u8
    }

    /// Game injury, skewed toward the severe bands for weaker players
    pub fn random_game_injury(strength: u8, rng: &mut SimRng) -> InjuryType {
        let severity_modifier = (50.0 - strength as f64).max(0.0) * 0.004;
        let roll = rng.next_f64() + severity_modifier;

        let band: &[InjuryType] = if roll < 0.50 {
            &MINOR
        } else if roll < 0.85 {
            &MODERATE
        } else if roll < 0.96 {
            &SEVERE
        } else {
            &SEASON_ENDING
        };

        band[rng.index(band.len())]
    }
}

impl Display for InjuryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let label = match self {
            InjuryType::Bruise => "Bruise",
            InjuryType::Stinger => "Stinger",
            InjuryType::HandFracture => "Hand Fracture",
            InjuryType::RibContusion => "Rib Contusion",
            InjuryType::Concussion => "Concussion",
            InjuryType::HamstringStrain => "Hamstring Strain",
            InjuryType::HighAnkleSprain => "High Ankle Sprain",
            InjuryType::GroinStrain => "Groin Strain",
            InjuryType::TurfToe => "Turf Toe",
            InjuryType::MclSprain => "MCL Sprain",
            InjuryType::ShoulderSeparation => "Shoulder Separation",
            InjuryType::TornMeniscus => "Torn Meniscus",
            InjuryType::BrokenCollarbone => "Broken Collarbone",
            InjuryType::AclTear => "ACL Tear",
            InjuryType::AchillesRupture => "Achilles Rupture",
            InjuryType::HerniatedDisc => "Herniated Disc",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryEvent {
    pub player_id: u32,
    pub team_id: u32,
    pub injury: InjuryType,
    pub severity: InjurySeverity,
    pub weeks_out: u8,
}

/// A player who took the field for a team
#[derive(Debug, Clone, Copy)]
pub struct GameParticipant<'a> {
    pub team_id: u32,
    pub player: &'a RosterPlayer,
}

/// Decides who got hurt in a game. The resolver only reports events; applying
/// them to players is the caller's business.
pub trait InjuryResolver {
    fn process_game_injuries(
        &self,
        home: &[GameParticipant<'_>],
        away: &[GameParticipant<'_>],
        rng: &mut SimRng,
    ) -> Vec<InjuryEvent>;
}

pub struct StandardInjuryResolver {
    /// Chance per participant per game before position exposure
    pub base_rate: f64,
}

impl Default for StandardInjuryResolver {
    fn default() -> Self {
        StandardInjuryResolver { base_rate: 0.012 }
    }
}

impl StandardInjuryResolver {
    fn exposure(position: Position) -> f64 {
        match position {
            Position::Qb => 0.8,
            Position::Rb => 1.5,
            Position::Wr => 1.1,
            Position::Te => 1.2,
            Position::Ol => 1.1,
            Position::Dl => 1.2,
            Position::Lb => 1.3,
            Position::Cb | Position::S => 1.0,
            Position::K | Position::P => 0.2,
        }
    }
}

impl InjuryResolver for StandardInjuryResolver {
    fn process_game_injuries(
        &self,
        home: &[GameParticipant<'_>],
        away: &[GameParticipant<'_>],
        rng: &mut SimRng,
    ) -> Vec<InjuryEvent> {
        let mut events = Vec::new();

        for participant in home.iter().chain(away.iter()) {
            let player = participant.player;
            let durability = 1.0 + (50.0 - player.ratings.strength as f64) / 200.0;
            let chance = self.base_rate * Self::exposure(player.position) * durability;

            if !rng.chance(chance) {
                continue;
            }

            let injury = InjuryType::random_game_injury(player.ratings.strength, rng);

            events.push(InjuryEvent {
                player_id: player.id,
                team_id: participant.team_id,
                injury,
                severity: injury.severity(),
                weeks_out: injury.random_weeks_out(rng),
            });
        }

        events
    }
}

/// Resolver for games that must leave rosters untouched
pub struct NoInjuries;

impl InjuryResolver for NoInjuries {
    fn process_game_injuries(
        &self,
        _home: &[GameParticipant<'_>],
        _away: &[GameParticipant<'_>],
        _rng: &mut SimRng,
    ) -> Vec<InjuryEvent> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::PlayerRatings;
    use crate::shared::FullName;

    fn participants(team_id: u32, players: &[RosterPlayer]) -> Vec<GameParticipant<'_>> {
        players
            .iter()
            .map(|player| GameParticipant { team_id, player })
            .collect()
    }

    fn squad(first_id: u32) -> Vec<RosterPlayer> {
        (0..22)
            .map(|idx| {
                RosterPlayer::new(
                    first_id + idx,
                    FullName::new("Test".to_string(), format!("Player{}", idx)),
                    Position::Lb,
                    PlayerRatings::default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(InjuryType::Bruise.severity(), InjurySeverity::Minor);
        assert_eq!(InjuryType::Concussion.severity(), InjurySeverity::Moderate);
        assert_eq!(InjuryType::TornMeniscus.severity(), InjurySeverity::Severe);
        assert_eq!(InjuryType::AclTear.severity(), InjurySeverity::SeasonEnding);
        assert_eq!(InjuryType::AclTear.body_part(), BodyPart::Knee);
    }

    #[test]
    fn test_weeks_out_in_range() {
        let mut rng = SimRng::seed_from(4);
        for injury in MINOR.iter().chain(&MODERATE).chain(&SEVERE).chain(&SEASON_ENDING) {
            let (min, max) = injury.weeks_range();
            for _ in 0..20 {
                let weeks = injury.random_weeks_out(&mut rng);
                assert!(weeks >= min && weeks <= max, "{} out {} weeks", injury, weeks);
            }
        }
    }

    #[test]
    fn test_no_injuries_resolver_is_empty() {
        let home = squad(1);
        let away = squad(100);
        let mut rng = SimRng::seed_from(1);

        let events = NoInjuries.process_game_injuries(
            &participants(1, &home),
            &participants(2, &away),
            &mut rng,
        );

        assert!(events.is_empty());
    }

    #[test]
    fn test_certain_injury_rate_hurts_everyone_once() {
        let home = squad(1);
        let away = squad(100);
        let resolver = StandardInjuryResolver { base_rate: 10.0 };
        let mut rng = SimRng::seed_from(2);

        let events = resolver.process_game_injuries(
            &participants(1, &home),
            &participants(2, &away),
            &mut rng,
        );

        assert_eq!(events.len(), 44);
        assert!(events.iter().take(22).all(|e| e.team_id == 1));
        assert!(events.iter().skip(22).all(|e| e.team_id == 2));
        assert!(events.iter().all(|e| e.severity == e.injury.severity()));
    }

    #[test]
    fn test_same_seed_same_injuries() {
        let home = squad(1);
        let away = squad(100);
        let resolver = StandardInjuryResolver { base_rate: 0.2 };

        let run = |seed| {
            let mut rng = SimRng::seed_from(seed);
            resolver.process_game_injuries(&participants(1, &home), &participants(2, &away), &mut rng)
        };

        assert_eq!(run(9), run(9));
    }
}
