use crate::loaders::{NamesEntity, TeamEntity};
use gridiron_core::r#match::{HeadCoach, PlayerRatings, Position, RosterPlayer, TeamRoster};
use gridiron_core::shared::{FullName, SimRng};

/// Players carried per position, 53 in all
const ROSTER_SPOTS: [(Position, u32); 11] = [
    (Position::Qb, 3),
    (Position::Rb, 4),
    (Position::Wr, 6),
    (Position::Te, 3),
    (Position::Ol, 9),
    (Position::Dl, 9),
    (Position::Lb, 7),
    (Position::Cb, 6),
    (Position::S, 3),
    (Position::K, 1),
    (Position::P, 2),
];

const DEPTH_DROP: f64 = 2.5;
const OVERALL_SPREAD: f64 = 6.0;
const SECONDARY_RATING: i32 = 45;

fn clamp_rating(value: f64) -> u8 {
    value.round().clamp(25.0, 99.0) as u8
}

pub struct RosterGenerator<'n> {
    names: &'n NamesEntity,
}

impl<'n> RosterGenerator<'n> {
    pub fn with_names(names: &'n NamesEntity) -> Self {
        RosterGenerator { names }
    }

    pub fn generate(&self, team: &TeamEntity, rng: &mut SimRng) -> TeamRoster {
        let coach = HeadCoach {
            name: self.generate_name(rng),
            game_management: clamp_rating(team.quality as f64 + rng.range_f64(-15.0, 15.0)),
            scheme_fit: clamp_rating(team.quality as f64 + rng.range_f64(-15.0, 15.0)),
        };

        let mut roster = TeamRoster::new(team.id, team.abbreviation.clone(), coach);
        let mut next_id = team.id * 100;

        for (position, count) in ROSTER_SPOTS {
            let mut group: Vec<RosterPlayer> = (0..count)
                .map(|depth| {
                    next_id += 1;
                    let overall = clamp_rating(rng.gaussian(
                        team.quality as f64 - depth as f64 * DEPTH_DROP,
                        OVERALL_SPREAD,
                    ));

                    RosterPlayer::new(
                        next_id,
                        self.generate_name(rng),
                        position,
                        Self::generate_ratings(position, overall, rng),
                    )
                })
                .collect();

            // best players start
            group.sort_by(|a, b| b.ratings.overall.cmp(&a.ratings.overall).then(a.id.cmp(&b.id)));

            for player in group {
                roster.add_player(player);
            }
        }

        roster
    }

    fn generate_name(&self, rng: &mut SimRng) -> FullName {
        let first = &self.names.first_names;
        let last = &self.names.last_names;

        FullName::new(
            first.get(rng.index(first.len())).cloned().unwrap_or_default(),
            last.get(rng.index(last.len())).cloned().unwrap_or_default(),
        )
    }

    fn generate_ratings(position: Position, overall: u8, rng: &mut SimRng) -> PlayerRatings {
        let mut rate = |primary: bool| {
            let centre = if primary { overall as f64 } else { SECONDARY_RATING as f64 };
            clamp_rating(centre + rng.range_f64(-8.0, 8.0))
        };

        let (passer, carrier, catcher, blocker, rusher, cover, kicker) = match position {
            Position::Qb => (true, false, false, false, false, false, false),
            Position::Rb => (false, true, true, false, false, false, false),
            Position::Wr => (false, true, true, false, false, false, false),
            Position::Te => (false, false, true, true, false, false, false),
            Position::Ol => (false, false, false, true, false, false, false),
            Position::Dl => (false, false, false, true, true, false, false),
            Position::Lb => (false, false, false, false, true, true, false),
            Position::Cb | Position::S => (false, true, false, false, false, true, false),
            Position::K | Position::P => (false, false, false, false, false, false, true),
        };

        PlayerRatings {
            overall,
            speed: rate(carrier || cover),
            strength: rate(blocker || rusher),
            awareness: rate(true),
            throw_accuracy: rate(passer),
            throw_power: rate(passer),
            catching: rate(catcher),
            route_running: rate(catcher),
            ball_security: rate(carrier),
            tackle: rate(rusher || cover),
            pursuit: rate(rusher || cover),
            pass_rush: rate(rusher),
            coverage: rate(cover),
            kick_power: rate(kicker),
            kick_accuracy: rate(kicker),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> NamesEntity {
        NamesEntity {
            first_names: vec!["Jalen".to_string(), "Marcus".to_string()],
            last_names: vec!["Carter".to_string()],
        }
    }

    fn team(quality: u8) -> TeamEntity {
        TeamEntity {
            id: 7,
            name: "Test Club".to_string(),
            abbreviation: "TST".to_string(),
            conference: "AFC".to_string(),
            division: 0,
            quality,
        }
    }

    #[test]
    fn test_full_roster_with_sorted_depth() {
        let names = names();
        let mut rng = SimRng::seed_from(3);

        let roster = RosterGenerator::with_names(&names).generate(&team(65), &mut rng);

        assert_eq!(roster.players.len(), 53);
        assert_eq!(roster.team_id, 7);
        for position in Position::ALL {
            let depth = roster.depth(position);
            assert!(depth.len() >= position.starters());
            assert!(depth.windows(2).all(|pair| pair[0].ratings.overall >= pair[1].ratings.overall));
        }
        assert!(roster.players.keys().all(|id| (701..=753).contains(id)));
    }

    #[test]
    fn test_quality_shows_in_starters() {
        let names = names();
        let mut rng = SimRng::seed_from(8);
        let generator = RosterGenerator::with_names(&names);

        let strong = generator.generate(&team(80), &mut rng);
        let weak = generator.generate(&team(45), &mut rng);

        let average = |roster: &TeamRoster| {
            let starters = roster.game_day_players();
            starters.iter().map(|p| p.ratings.overall as f64).sum::<f64>() / starters.len() as f64
        };

        assert!(average(&strong) > average(&weak) + 20.0);
    }

    #[test]
    fn test_quarterbacks_throw_better_than_linemen() {
        let names = names();
        let mut rng = SimRng::seed_from(1);

        let roster = RosterGenerator::with_names(&names).generate(&team(75), &mut rng);

        let qb = roster.depth(Position::Qb)[0];
        let tackle = roster.depth(Position::Ol)[0];
        assert!(qb.ratings.throw_accuracy > tackle.ratings.throw_accuracy);
    }
}
