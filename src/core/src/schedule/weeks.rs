use crate::league::{Conference, LeagueTopology};
use crate::schedule::interchange::Interchange;
use crate::schedule::matchups::{season_offset, Matchup, MatchupBucket};
use crate::schedule::ScheduleSettings;
use crate::shared::SimRng;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How the weeks of a schedule were laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStrategy {
    /// Full slates played round by round, byes taken by whole division groups
    Rotation,
    /// Byes taken in pairs, weeks assigned by swapping alternating chains
    Interchange,
    /// Lowest free week per pairing
    Greedy,
}

pub(crate) struct WeekPlan {
    pub placements: Vec<(Matchup, u8)>,
    pub byes: BTreeMap<u32, u8>,
    pub strategy: PlanStrategy,
}

type Slate = (MatchupBucket, u8);

const ROTATION_SLATES: [(MatchupBucket, usize); 5] = [
    (MatchupBucket::Division, 6),
    (MatchupBucket::ConferenceRotation, 4),
    (MatchupBucket::InterConferenceRotation, 4),
    (MatchupBucket::SameStanding, 2),
    (MatchupBucket::SeventeenthGame, 1),
];

/// Slates played while bye groups rotate through. Each one only pairs teams
/// that sit on the same side of the bye boundary that week.
const BYE_STRETCH: [MatchupBucket; 7] = [
    MatchupBucket::Division,
    MatchupBucket::ConferenceRotation,
    MatchupBucket::Division,
    MatchupBucket::SameStanding,
    MatchupBucket::Division,
    MatchupBucket::ConferenceRotation,
    MatchupBucket::Division,
];

const BYE_GROUPS: usize = 8;

pub(crate) struct WeekPlanner<'a> {
    topology: &'a LeagueTopology,
    settings: &'a ScheduleSettings,
}

impl<'a> WeekPlanner<'a> {
    pub fn new(topology: &'a LeagueTopology, settings: &'a ScheduleSettings) -> Self {
        WeekPlanner { topology, settings }
    }

    pub fn plan(&self, matchups: &[Matchup], season: u16, structured: bool, rng: &mut SimRng) -> WeekPlan {
        if structured && self.rotation_applies() {
            if let Some(slates) = self.collect_slates(matchups) {
                if let Some(plan) = self.rotation_plan(&slates, season, rng) {
                    return plan;
                }
            }
            debug!("rotation layout unavailable for {}, trying interchange", season);
        }

        if let Some(plan) = self.interchange_plan(matchups, rng) {
            return plan;
        }

        debug!("interchange layout did not settle for {}, placing greedily", season);
        self.greedy_plan(matchups, rng)
    }

    fn rotation_applies(&self) -> bool {
        let window = self.settings.bye_window();
        let total_slates: usize = ROTATION_SLATES.iter().map(|(_, count)| count).sum();

        self.topology.is_standard()
            && self.settings.games_per_team as usize == total_slates
            && self.settings.regular_season_weeks as usize == total_slates + 1
            && self.settings.max_byes_per_week as usize >= self.topology.teams().len() / BYE_GROUPS
            && (*window.end() - *window.start()) as usize + 1 >= BYE_GROUPS
    }

    /// Groups pairings into slates and checks each is a full league round
    fn collect_slates(&self, matchups: &[Matchup]) -> Option<BTreeMap<Slate, Vec<Matchup>>> {
        let mut slates: BTreeMap<Slate, Vec<Matchup>> = BTreeMap::new();
        for matchup in matchups {
            slates.entry((matchup.bucket, matchup.round)).or_default().push(*matchup);
        }

        let team_count = self.topology.teams().len();

        for (bucket, expected) in ROTATION_SLATES {
            let found = slates.keys().filter(|(kind, _)| *kind == bucket).count();
            if found != expected {
                return None;
            }
        }
        if slates.len() != ROTATION_SLATES.iter().map(|(_, count)| count).sum::<usize>() {
            return None;
        }

        for games in slates.values() {
            let teams: BTreeSet<u32> = games.iter().flat_map(|m| [m.home, m.away]).collect();
            if games.len() * 2 != team_count || teams.len() != team_count {
                return None;
            }
        }

        Some(slates)
    }

    fn rotation_plan(
        &self,
        slates: &BTreeMap<Slate, Vec<Matchup>>,
        season: u16,
        rng: &mut SimRng,
    ) -> Option<WeekPlan> {
        let mut pools: BTreeMap<MatchupBucket, Vec<Slate>> = BTreeMap::new();
        for slate in slates.keys() {
            pools.entry(slate.0).or_default().push(*slate);
        }
        for pool in pools.values_mut() {
            rng.shuffle(pool);
        }

        let window = self.settings.bye_window();
        let latest_start = window.end().checked_sub(BYE_GROUPS as u8 - 1)?;
        let start = rng.range_i32(*window.start() as i32, latest_start as i32) as u8;

        let mut stretch = Vec::with_capacity(BYE_STRETCH.len());
        for bucket in BYE_STRETCH {
            stretch.push(pools.get_mut(&bucket)?.pop()?);
        }

        let mut rest: Vec<Slate> = pools.into_values().flatten().collect();
        rng.shuffle(&mut rest);

        let mut stretch = stretch.into_iter();
        let mut rest = rest.into_iter();
        let stretch_rounds = start..start + BYE_STRETCH.len() as u8;

        let order: Vec<Slate> = (1..=slates.len() as u8)
            .map(|round| {
                if stretch_rounds.contains(&round) {
                    stretch.next()
                } else {
                    rest.next()
                }
            })
            .collect::<Option<Vec<_>>>()?;

        let byes = self.rotation_byes(season, start, rng)?;

        let mut placements = Vec::with_capacity(slates.values().map(Vec::len).sum());
        for (idx, slate) in order.iter().enumerate() {
            let round = idx as u8 + 1;

            for matchup in slates.get(slate)? {
                let home_week = shifted(round, *byes.get(&matchup.home)?);
                let away_week = shifted(round, *byes.get(&matchup.away)?);

                if home_week != away_week {
                    debug!(
                        "slate {:?} splits {} and {} across weeks",
                        slate, matchup.home, matchup.away
                    );
                    return None;
                }

                placements.push((*matchup, home_week));
            }
        }

        Some(WeekPlan {
            placements,
            byes,
            strategy: PlanStrategy::Rotation,
        })
    }

    // Bye groups are whole divisions: conference partners stay adjacent so the
    // bye boundary never cuts through a partner pair.
    fn rotation_byes(&self, season: u16, start: u8, rng: &mut SimRng) -> Option<BTreeMap<u32, u8>> {
        let mut conferences = Conference::ALL;
        rng.shuffle(&mut conferences);

        let mut groups: Vec<(Conference, u8)> = Vec::with_capacity(BYE_GROUPS);

        for conference in conferences {
            let divisions = self.topology.divisions(conference);
            let count = divisions.len();

            let step = season_offset(season, self.settings.base_year, count.checked_sub(1)?) + 1;
            let others: Vec<usize> = (1..count).filter(|position| *position != step).collect();

            let mut pairs = [(0, step), (*others.first()?, *others.get(1)?)];
            rng.shuffle(&mut pairs);

            for (a, b) in pairs {
                let (first, second) = if rng.chance(0.5) { (a, b) } else { (b, a) };
                groups.push((conference, *divisions.get(first)?));
                groups.push((conference, *divisions.get(second)?));
            }
        }

        let mut byes = BTreeMap::new();
        for (idx, (conference, division)) in groups.into_iter().enumerate() {
            for team in self.topology.division_teams(conference, division) {
                byes.insert(*team, start + idx as u8);
            }
        }

        Some(byes)
    }

    /// Byes go out two teams at a time so every week leaves an even number
    /// of teams to pair up, to the least loaded open week of the window. Once
    /// every week is at the cap, a pair lands on any week of the window.
    fn paired_byes(&self, rng: &mut SimRng) -> BTreeMap<u32, u8> {
        let window = self.settings.bye_window();

        let mut teams = self.topology.team_ids();
        rng.shuffle(&mut teams);

        let mut load: BTreeMap<u8, u8> = BTreeMap::new();
        let mut byes = BTreeMap::new();

        for pair in teams.chunks(2) {
            let size = pair.len() as u8;
            let open: Vec<u8> = window
                .clone()
                .filter(|week| load.get(week).copied().unwrap_or(0) + size <= self.settings.max_byes_per_week)
                .collect();

            let lightest = open.iter().map(|week| load.get(week).copied().unwrap_or(0)).min();
            let candidates: Vec<u8> = open
                .into_iter()
                .filter(|week| Some(load.get(week).copied().unwrap_or(0)) == lightest)
                .collect();

            let week = if candidates.is_empty() {
                rng.range_i32(*window.start() as i32, *window.end() as i32) as u8
            } else {
                candidates[rng.index(candidates.len())]
            };

            *load.entry(week).or_default() += size;
            for team in pair {
                byes.insert(*team, week);
            }
        }

        byes
    }

    fn interchange_plan(&self, matchups: &[Matchup], rng: &mut SimRng) -> Option<WeekPlan> {
        let byes = self.paired_byes(rng);
        let pairs: Vec<(u32, u32)> = matchups.iter().map(|m| (m.home, m.away)).collect();

        let weeks = Interchange::new(&pairs, &byes, self.settings.regular_season_weeks).solve(rng)?;

        Some(WeekPlan {
            placements: matchups.iter().copied().zip(weeks).collect(),
            byes,
            strategy: PlanStrategy::Interchange,
        })
    }

    fn greedy_plan(&self, matchups: &[Matchup], rng: &mut SimRng) -> WeekPlan {
        let window = self.settings.bye_window();
        let weeks = self.settings.regular_season_weeks;

        let mut load: BTreeMap<u8, u8> = BTreeMap::new();
        let mut byes: BTreeMap<u32, u8> = BTreeMap::new();

        let mut teams = self.topology.team_ids();
        rng.shuffle(&mut teams);

        for team in teams {
            let open: Vec<u8> = window
                .clone()
                .filter(|week| load.get(week).copied().unwrap_or(0) < self.settings.max_byes_per_week)
                .collect();

            let week = if open.is_empty() {
                rng.range_i32(*window.start() as i32, *window.end() as i32) as u8
            } else {
                open[rng.index(open.len())]
            };

            *load.entry(week).or_default() += 1;
            byes.insert(team, week);
        }

        let mut busy: HashMap<u32, BTreeSet<u8>> = HashMap::new();
        let mut placements = Vec::with_capacity(matchups.len());

        let mut order: Vec<usize> = (0..matchups.len()).collect();
        rng.shuffle(&mut order);

        for idx in order {
            let matchup = matchups[idx];
            let plays = |busy: &HashMap<u32, BTreeSet<u8>>, team: u32, week: u8| {
                busy.get(&team).is_some_and(|weeks| weeks.contains(&week))
            };

            let free_week = (1..=weeks).find(|week| {
                [matchup.home, matchup.away]
                    .iter()
                    .all(|team| !plays(&busy, *team, *week) && byes.get(team) != Some(week))
            });

            let week = match free_week {
                Some(week) => week,
                None => {
                    let over_bye = (1..=weeks).find(|week| {
                        !plays(&busy, matchup.home, *week) && !plays(&busy, matchup.away, *week)
                    });

                    match over_bye {
                        Some(week) => {
                            for team in [matchup.home, matchup.away] {
                                if byes.get(&team) == Some(&week) {
                                    debug!("team {} loses its week {} bye", team, week);
                                    byes.remove(&team);
                                }
                            }
                            week
                        }
                        None => {
                            let overflow = (weeks.saturating_add(1)..=u8::MAX).find(|week| {
                                !plays(&busy, matchup.home, *week) && !plays(&busy, matchup.away, *week)
                            });
                            let Some(week) = overflow else {
                                debug!("no week left for {} @ {}", matchup.away, matchup.home);
                                continue;
                            };
                            week
                        }
                    }
                }
            };

            busy.entry(matchup.home).or_default().insert(week);
            busy.entry(matchup.away).or_default().insert(week);
            placements.push((matchup, week));
        }

        WeekPlan {
            placements,
            byes,
            strategy: PlanStrategy::Greedy,
        }
    }
}

/// Round r is played in week r before a team's bye and week r + 1 from it on
fn shifted(round: u8, bye: u8) -> u8 {
    if round >= bye {
        round + 1
    } else {
        round
    }
}
