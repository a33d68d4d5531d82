use crate::r#match::{LineupSlot, Position, TeamRoster};

const REPLACEMENT_FACTOR: f64 = 0.85;
const VACANT_RATING: f64 = 40.0;
const DEPTH_WEIGHT: f64 = 0.05;
/// Reserves per position counted toward depth (2nd and 3rd on the chart)
const DEPTH_SAMPLE: usize = 2;

/// Single number summarising a roster's strength on game day, centred on 50.
pub struct TeamPower;

impl TeamPower {
    pub fn rate(roster: &TeamRoster) -> f64 {
        let lineup: f64 = Position::ALL
            .iter()
            .map(|&position| position.weight() * Self::position_rating(roster, position))
            .sum();

        lineup + Self::depth_bonus(roster) + roster.coach.coaching_modifier()
    }

    fn position_rating(roster: &TeamRoster, position: Position) -> f64 {
        let slots = roster.lineup(position);
        if slots.is_empty() {
            return VACANT_RATING;
        }

        let total: f64 = slots
            .iter()
            .map(|slot| match slot {
                LineupSlot::Starter(player) => player.ratings.overall as f64,
                LineupSlot::Replacement(player) => player.ratings.overall as f64 * REPLACEMENT_FACTOR,
                LineupSlot::Vacant => VACANT_RATING,
            })
            .sum();

        total / slots.len() as f64
    }

    fn depth_bonus(roster: &TeamRoster) -> f64 {
        let backups: Vec<f64> = Position::ALL
            .iter()
            .flat_map(|&position| roster.reserves(position).into_iter().take(DEPTH_SAMPLE))
            .map(|player| player.ratings.overall as f64)
            .collect();

        if backups.is_empty() {
            return 0.0;
        }

        let average = backups.iter().sum::<f64>() / backups.len() as f64;

        (average - 50.0) * DEPTH_WEIGHT
    }
}
