use crate::league::{Game, LeagueTopology};
use crate::schedule::ScheduleSettings;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result};

/// A rule the finished schedule breaks. The schedule is still returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleIssue {
    GameCount { team_id: u32, games: u8, expected: u8 },
    DoubleBooked { team_id: u32, week: u8 },
    MissingBye { team_id: u32 },
    ByeOutsideWindow { team_id: u32, week: u8 },
    ByeOverlapsGame { team_id: u32, week: u8 },
    IdleWeek { team_id: u32, week: u8 },
    OverflowWeek { team_id: u32, week: u8 },
    ByeCapacityExceeded { week: u8, byes: u8, cap: u8 },
}

impl Display for ScheduleIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ScheduleIssue::GameCount {
                team_id,
                games,
                expected,
            } => write!(f, "team {} has {} games, expected {}", team_id, games, expected),
            ScheduleIssue::DoubleBooked { team_id, week } => {
                write!(f, "team {} plays twice in week {}", team_id, week)
            }
            ScheduleIssue::MissingBye { team_id } => write!(f, "team {} has no bye", team_id),
            ScheduleIssue::ByeOutsideWindow { team_id, week } => {
                write!(f, "team {} has its bye in week {}, outside the window", team_id, week)
            }
            ScheduleIssue::ByeOverlapsGame { team_id, week } => {
                write!(f, "team {} plays during its bye week {}", team_id, week)
            }
            ScheduleIssue::IdleWeek { team_id, week } => {
                write!(f, "team {} neither plays nor rests in week {}", team_id, week)
            }
            ScheduleIssue::OverflowWeek { team_id, week } => {
                write!(f, "team {} plays in overflow week {}", team_id, week)
            }
            ScheduleIssue::ByeCapacityExceeded { week, byes, cap } => {
                write!(f, "week {} has {} byes, cap is {}", week, byes, cap)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDiagnostics {
    pub issues: Vec<ScheduleIssue>,
}

impl ScheduleDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Audits a finished schedule against the week and count rules
    pub fn inspect(
        topology: &LeagueTopology,
        games: &[Game],
        byes: &BTreeMap<u32, u8>,
        settings: &ScheduleSettings,
    ) -> Self {
        let mut issues = Vec::new();
        let window = settings.bye_window();

        let mut weeks_by_team: BTreeMap<u32, Vec<u8>> = topology
            .team_ids()
            .into_iter()
            .map(|id| (id, Vec::new()))
            .collect();

        for game in games {
            for team in [game.home_team_id, game.away_team_id] {
                weeks_by_team.entry(team).or_default().push(game.week);
            }
        }

        for (team_id, weeks) in weeks_by_team.iter_mut() {
            let team_id = *team_id;
            weeks.sort_unstable();

            if weeks.len() != settings.games_per_team as usize {
                issues.push(ScheduleIssue::GameCount {
                    team_id,
                    games: weeks.len() as u8,
                    expected: settings.games_per_team,
                });
            }

            for pair in weeks.windows(2) {
                if pair[0] == pair[1] {
                    issues.push(ScheduleIssue::DoubleBooked {
                        team_id,
                        week: pair[0],
                    });
                }
            }

            for week in weeks.iter().filter(|week| **week > settings.regular_season_weeks) {
                issues.push(ScheduleIssue::OverflowWeek {
                    team_id,
                    week: *week,
                });
            }

            let bye = byes.get(&team_id).copied();
            match bye {
                None => issues.push(ScheduleIssue::MissingBye { team_id }),
                Some(week) => {
                    if !window.contains(&week) {
                        issues.push(ScheduleIssue::ByeOutsideWindow { team_id, week });
                    }
                    if weeks.binary_search(&week).is_ok() {
                        issues.push(ScheduleIssue::ByeOverlapsGame { team_id, week });
                    }
                }
            }

            for week in 1..=settings.regular_season_weeks {
                if bye != Some(week) && weeks.binary_search(&week).is_err() {
                    issues.push(ScheduleIssue::IdleWeek { team_id, week });
                }
            }
        }

        let mut load: BTreeMap<u8, u8> = BTreeMap::new();
        for week in byes.values() {
            *load.entry(*week).or_default() += 1;
        }
        for (week, count) in load {
            if count > settings.max_byes_per_week {
                issues.push(ScheduleIssue::ByeCapacityExceeded {
                    week,
                    byes: count,
                    cap: settings.max_byes_per_week,
                });
            }
        }

        ScheduleDiagnostics { issues }
    }

    pub fn log(&self, season: u16) {
        for issue in &self.issues {
            warn!("schedule {}: {}", season, issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::Team;
    use crate::league::Conference;

    fn tiny_league() -> LeagueTopology {
        let teams: Vec<Team> = (1..=4)
            .map(|id| {
                let conference = if id <= 2 { Conference::Afc } else { Conference::Nfc };
                Team::new(id, format!("Team {}", id), format!("T{}", id), conference, 0)
            })
            .collect();
        LeagueTopology::new(&teams).unwrap()
    }

    fn tiny_settings() -> ScheduleSettings {
        ScheduleSettings {
            games_per_team: 2,
            regular_season_weeks: 3,
            bye_window_start: 1,
            bye_window_end: 3,
            max_byes_per_week: 2,
            ..ScheduleSettings::default()
        }
    }

    #[test]
    fn test_clean_schedule() {
        let games = vec![
            Game::regular(2026, 1, 1, 2),
            Game::regular(2026, 1, 3, 4),
            Game::regular(2026, 2, 1, 3),
            Game::regular(2026, 2, 2, 4),
        ];
        let byes: BTreeMap<u32, u8> = [(1, 3), (2, 3), (3, 3), (4, 3)].into_iter().collect();
        let settings = ScheduleSettings {
            max_byes_per_week: 4,
            ..tiny_settings()
        };

        let diagnostics = ScheduleDiagnostics::inspect(&tiny_league(), &games, &byes, &settings);

        assert!(diagnostics.is_clean(), "{:?}", diagnostics.issues);
    }

    #[test]
    fn test_reports_each_violation() {
        let games = vec![
            Game::regular(2026, 1, 1, 2),
            Game::regular(2026, 1, 1, 3),
            Game::regular(2026, 4, 2, 4),
        ];
        let byes: BTreeMap<u32, u8> = [(1, 2), (2, 4), (3, 2), (4, 2)].into_iter().collect();

        let issues = ScheduleDiagnostics::inspect(&tiny_league(), &games, &byes, &tiny_settings()).issues;

        assert!(issues.contains(&ScheduleIssue::DoubleBooked { team_id: 1, week: 1 }));
        assert!(issues.contains(&ScheduleIssue::ByeOutsideWindow { team_id: 2, week: 4 }));
        assert!(issues.contains(&ScheduleIssue::ByeOverlapsGame { team_id: 2, week: 4 }));
        assert!(issues.contains(&ScheduleIssue::OverflowWeek { team_id: 4, week: 4 }));
        assert!(issues.contains(&ScheduleIssue::GameCount {
            team_id: 3,
            games: 1,
            expected: 2
        }));
        assert!(issues.contains(&ScheduleIssue::ByeCapacityExceeded {
            week: 2,
            byes: 3,
            cap: 2
        }));
        assert!(issues.contains(&ScheduleIssue::IdleWeek { team_id: 3, week: 3 }));
    }

    #[test]
    fn test_missing_bye() {
        let issues = ScheduleDiagnostics::inspect(&tiny_league(), &[], &BTreeMap::new(), &tiny_settings()).issues;

        assert!(issues.contains(&ScheduleIssue::MissingBye { team_id: 4 }));
    }
}
