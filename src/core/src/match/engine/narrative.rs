use crate::r#match::{PlayerStatLine, TeamRoster};
use crate::shared::SimRng;
use std::collections::BTreeMap;

fn game_clock(rng: &mut SimRng) -> String {
    let quarter = rng.range_i32(1, 4);
    let minutes = rng.range_i32(0, 14);
    let seconds = rng.range_i32(0, 59);

    format!("Q{} {:02}:{:02}", quarter, minutes, seconds)
}

fn highlights(line: &PlayerStatLine, name: &str, team: &str) -> Vec<String> {
    let mut notes = Vec::new();

    if line.passing_touchdowns >= 3 {
        notes.push(format!(
            "{} ({}) threw {} touchdown passes",
            name, team, line.passing_touchdowns
        ));
    }
    if line.rushing_yards >= 100 {
        notes.push(format!("{} ({}) ran for {} yards", name, team, line.rushing_yards));
    }
    if line.receiving_yards >= 100 {
        notes.push(format!(
            "{} ({}) caught {} passes for {} yards",
            name, team, line.receptions, line.receiving_yards
        ));
    }
    if line.sacks >= 2 {
        notes.push(format!("{} ({}) recorded {} sacks", name, team, line.sacks));
    }
    if line.forced_fumbles > 0 {
        notes.push(format!("{} ({}) forced a fumble", name, team));
    }
    if line.interceptions > 0 {
        notes.push(format!("{} ({}) picked off a pass", name, team));
    }

    notes
}

pub struct NarrativeInput<'a> {
    pub lines: &'a BTreeMap<u32, PlayerStatLine>,
    pub rosters: [&'a TeamRoster; 2],
    pub scores: [u16; 2],
    pub cap: usize,
    pub close_margin: u16,
}

/// Highlight lines stamped with a game clock, shuffled and capped, with a
/// closing line for one-score games.
pub fn build_narrative(input: &NarrativeInput<'_>, rng: &mut SimRng) -> Vec<String> {
    let mut narrative = Vec::new();

    for roster in input.rosters {
        for player in roster.game_day_players() {
            let Some(line) = input.lines.get(&player.id) else {
                continue;
            };

            for note in highlights(line, &player.name.short(), &roster.abbreviation) {
                narrative.push(format!("{} {}", game_clock(rng), note));
            }
        }
    }

    rng.shuffle(&mut narrative);
    narrative.truncate(input.cap);

    let [home, away] = input.rosters;
    let [home_score, away_score] = input.scores;

    if home_score.abs_diff(away_score) <= input.close_margin {
        let close = match home_score.cmp(&away_score) {
            std::cmp::Ordering::Greater => format!(
                "{} held off {} {}-{}",
                home.abbreviation, away.abbreviation, home_score, away_score
            ),
            std::cmp::Ordering::Less => format!(
                "{} held off {} {}-{} on the road",
                away.abbreviation, home.abbreviation, away_score, home_score
            ),
            std::cmp::Ordering::Equal => format!(
                "{} and {} played to a {}-{} draw",
                home.abbreviation, away.abbreviation, home_score, away_score
            ),
        };
        narrative.push(close);
    }

    narrative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::Position;
    use crate::test_support::synthetic_roster;

    fn busy_lines(rosters: &[&TeamRoster]) -> BTreeMap<u32, PlayerStatLine> {
        let mut lines = BTreeMap::new();
        for roster in rosters {
            for player in roster.game_day_players() {
                let mut line = PlayerStatLine::new(player.id, roster.team_id, player.position);
                if player.position.is_defense() {
                    line.sacks = 2;
                }
                lines.insert(player.id, line);
            }
        }
        lines
    }

    #[test]
    fn test_narrative_capped_before_close_line() {
        let home = synthetic_roster(1, 60);
        let away = synthetic_roster(2, 60);
        let lines = busy_lines(&[&home, &away]);
        let mut rng = SimRng::seed_from(6);

        let input = NarrativeInput {
            lines: &lines,
            rosters: [&home, &away],
            scores: [20, 17],
            cap: 5,
            close_margin: 7,
        };
        let narrative = build_narrative(&input, &mut rng);

        assert_eq!(narrative.len(), 6);
        assert!(narrative[..5].iter().all(|note| note.starts_with('Q') && note.contains("sacks")));
        assert_eq!(narrative[5], "T01 held off T02 20-17");
    }

    #[test]
    fn test_blowout_has_no_close_line() {
        let home = synthetic_roster(1, 60);
        let away = synthetic_roster(2, 60);
        let mut lines = BTreeMap::new();
        let qb = home.active(Position::Qb)[0];
        let mut line = PlayerStatLine::new(qb.id, 1, Position::Qb);
        line.passing_touchdowns = 4;
        lines.insert(qb.id, line);
        let mut rng = SimRng::seed_from(6);

        let input = NarrativeInput {
            lines: &lines,
            rosters: [&home, &away],
            scores: [35, 3],
            cap: 5,
            close_margin: 7,
        };
        let narrative = build_narrative(&input, &mut rng);

        assert_eq!(narrative.len(), 1);
        assert!(narrative[0].ends_with("threw 4 touchdown passes"), "{}", narrative[0]);
    }
}
