use crate::league::{Conference, LeagueTopology, TEAMS_PER_DIVISION};
use crate::schedule::factor::DegreeFactor;
use crate::schedule::ScheduleSettings;
use crate::shared::SimRng;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Which rotation produced a pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchupBucket {
    Division,
    ConferenceRotation,
    InterConferenceRotation,
    SameStanding,
    SeventeenthGame,
    Reconciliation,
}

/// A pairing before it is given a week. `round` groups pairings of one bucket
/// that together form a full league slate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matchup {
    pub home: u32,
    pub away: u32,
    pub bucket: MatchupBucket,
    pub round: u8,
}

impl Matchup {
    pub fn involves(&self, team_id: u32) -> bool {
        self.home == team_id || self.away == team_id
    }

    pub fn opponent_of(&self, team_id: u32) -> u32 {
        if self.home == team_id {
            self.away
        } else {
            self.home
        }
    }
}

/// Single round-robin of a four-team division, each row a full slate
const DIVISION_ROUNDS: [[(usize, usize); 2]; 3] =
    [[(0, 1), (2, 3)], [(0, 2), (1, 3)], [(0, 3), (1, 2)]];

pub(crate) fn season_offset(season: u16, base_year: u16, modulus: usize) -> usize {
    if modulus == 0 {
        return 0;
    }
    (season as i64 - base_year as i64).rem_euclid(modulus as i64) as usize
}

/// Same-conference division a division meets in full this season
pub(crate) fn conference_partner(position: usize, division_count: usize, offset: usize) -> Option<usize> {
    if division_count < 2 || position >= division_count {
        return None;
    }

    let step = offset % (division_count - 1) + 1;

    if division_count.is_power_of_two() {
        Some(position ^ step)
    } else {
        Some((position + step) % division_count)
    }
}

/// Finishing position of every team inside its division. Prior-season ranks
/// are used for a division only when they form a complete 1..=n ordering,
/// otherwise the division is ranked at random.
pub(crate) fn resolve_division_ranks(
    topology: &LeagueTopology,
    prior: Option<&HashMap<u32, u8>>,
    rng: &mut SimRng,
) -> HashMap<u32, u8> {
    let mut ranks = HashMap::with_capacity(topology.teams().len());

    for conference in topology.conferences() {
        for division in topology.divisions(conference) {
            let teams = topology.division_teams(conference, division);

            let known: Option<Vec<u8>> =
                prior.and_then(|prior| teams.iter().map(|id| prior.get(id).copied()).collect());

            let complete = known.as_ref().is_some_and(|known| {
                let sorted: Vec<u8> = known.iter().copied().sorted().collect();
                sorted.iter().copied().eq(1..=teams.len() as u8)
            });

            match known {
                Some(known) if complete => {
                    ranks.extend(teams.iter().copied().zip(known));
                }
                _ => {
                    debug!(
                        "no prior standings for {} {}, drawing ranks",
                        conference, division
                    );
                    let mut shuffled = teams.to_vec();
                    rng.shuffle(&mut shuffled);
                    ranks.extend(
                        shuffled
                            .into_iter()
                            .enumerate()
                            .map(|(idx, id)| (id, idx as u8 + 1)),
                    );
                }
            }
        }
    }

    ranks
}

/// Collects the season's pairings bucket by bucket, skipping any pair that
/// has already met, then evens out per-team totals.
pub(crate) struct MatchupBuilder<'a> {
    topology: &'a LeagueTopology,
    settings: &'a ScheduleSettings,
    season: u16,
    matchups: Vec<Matchup>,
    played: HashSet<(u32, u32)>,
    counts: HashMap<u32, u8>,
}

impl<'a> MatchupBuilder<'a> {
    pub fn new(topology: &'a LeagueTopology, settings: &'a ScheduleSettings, season: u16) -> Self {
        MatchupBuilder {
            topology,
            settings,
            season,
            matchups: Vec::with_capacity(topology.teams().len() * 9),
            played: HashSet::new(),
            counts: HashMap::new(),
        }
    }

    pub fn count(&self, team_id: u32) -> u8 {
        self.counts.get(&team_id).copied().unwrap_or(0)
    }

    pub fn has_met(&self, a: u32, b: u32) -> bool {
        self.played.contains(&(a, b)) || self.played.contains(&(b, a))
    }

    fn push(&mut self, home: u32, away: u32, bucket: MatchupBucket, round: u8) -> bool {
        if home == away {
            return false;
        }

        let duplicate = match bucket {
            MatchupBucket::Division => self.played.contains(&(home, away)),
            _ => self.has_met(home, away),
        };
        if duplicate {
            return false;
        }

        self.played.insert((home, away));
        *self.counts.entry(home).or_default() += 1;
        *self.counts.entry(away).or_default() += 1;
        self.matchups.push(Matchup {
            home,
            away,
            bucket,
            round,
        });

        true
    }

    fn remove(&mut self, idx: usize) {
        let matchup = self.matchups.remove(idx);

        self.played.remove(&(matchup.home, matchup.away));
        for team in [matchup.home, matchup.away] {
            if let Some(count) = self.counts.get_mut(&team) {
                *count = count.saturating_sub(1);
            }
        }
    }

    fn season_parity(&self) -> usize {
        self.season as usize % 2
    }

    /// Home and away against every division rival
    pub fn add_division_games(&mut self) {
        for conference in self.topology.conferences() {
            for division in self.topology.divisions(conference) {
                let teams = self.topology.division_teams(conference, division).to_vec();

                if teams.len() == TEAMS_PER_DIVISION {
                    let legs = DIVISION_ROUNDS.len();
                    for (round, slate) in DIVISION_ROUNDS.iter().enumerate() {
                        for &(a, b) in slate {
                            let (home, away) = if (self.season_parity() + round) % 2 == 0 {
                                (teams[a], teams[b])
                            } else {
                                (teams[b], teams[a])
                            };
                            self.push(home, away, MatchupBucket::Division, round as u8);
                            self.push(away, home, MatchupBucket::Division, (round + legs) as u8);
                        }
                    }
                } else {
                    for (a, b) in teams.iter().copied().tuple_combinations() {
                        self.push(a, b, MatchupBucket::Division, 0);
                        self.push(b, a, MatchupBucket::Division, 0);
                    }
                }
            }
        }
    }

    /// Every team of a same-conference division, rotating yearly
    pub fn add_conference_rotation(&mut self) {
        for conference in self.topology.conferences() {
            let divisions = self.topology.divisions(conference);
            let count = divisions.len();
            if count < 2 {
                continue;
            }

            let offset = season_offset(self.season, self.settings.base_year, count - 1);

            for position in 0..count {
                let Some(partner) = conference_partner(position, count, offset) else {
                    continue;
                };

                let first = self.topology.division_teams(conference, divisions[position]).to_vec();
                let second = self.topology.division_teams(conference, divisions[partner]).to_vec();

                self.add_cross_division(&first, &second, MatchupBucket::ConferenceRotation);
            }
        }
    }

    /// Every team of one division of the other conference, rotating yearly
    pub fn add_inter_conference_rotation(&mut self) {
        let afc = self.topology.divisions(Conference::Afc);
        let nfc = self.topology.divisions(Conference::Nfc);
        if afc.is_empty() || nfc.is_empty() {
            return;
        }

        let offset = season_offset(self.season, self.settings.base_year, nfc.len());

        for (position, division) in afc.iter().enumerate() {
            let target = nfc[(position + offset) % nfc.len()];

            let first = self.topology.division_teams(Conference::Afc, *division).to_vec();
            let second = self.topology.division_teams(Conference::Nfc, target).to_vec();

            self.add_cross_division(&first, &second, MatchupBucket::InterConferenceRotation);
        }
    }

    /// Equal-rank teams of the two same-conference divisions not met in full
    pub fn add_same_standing_games(&mut self, ranks: &HashMap<u32, u8>) {
        for conference in self.topology.conferences() {
            let divisions = self.topology.divisions(conference);
            let count = divisions.len();
            if count < 3 {
                continue;
            }

            let offset = season_offset(self.season, self.settings.base_year, count - 1);

            if count == 4 {
                self.add_same_standing_slates(conference, &divisions, offset, ranks);
                continue;
            }

            for position in 0..count {
                let partner = conference_partner(position, count, offset);
                let remaining: Vec<usize> = (1..count)
                    .map(|step| (position + step) % count)
                    .filter(|other| Some(*other) != partner)
                    .take(2)
                    .collect();

                for other in remaining {
                    let hosts = (position < other) == (self.season_parity() == 0);
                    self.add_rank_games(
                        (conference, divisions[position]),
                        (conference, divisions[other]),
                        ranks,
                        hosts,
                        MatchupBucket::SameStanding,
                        0,
                    );
                }
            }
        }
    }

    // Four divisions split into two XOR slates; the host mask makes every
    // division host exactly one of its two same-standing games.
    fn add_same_standing_slates(
        &mut self,
        conference: Conference,
        divisions: &[u8],
        offset: usize,
        ranks: &HashMap<u32, u8>,
    ) {
        let step = offset % 3 + 1;
        let slates: Vec<usize> = (1..4).filter(|xor| *xor != step).collect();

        let odd = |value: usize| value.count_ones() % 2 == 1;
        let Some(mask) = (1..4).find(|mask| slates.iter().all(|xor| odd(xor & mask))) else {
            return;
        };

        for (round, xor) in slates.iter().enumerate() {
            for position in 0..divisions.len() {
                let other = position ^ xor;
                if other < position || other >= divisions.len() {
                    continue;
                }

                let side = usize::from(odd(position & mask));
                let hosts = (side + round + self.season_parity()) % 2 == 0;

                self.add_rank_games(
                    (conference, divisions[position]),
                    (conference, divisions[other]),
                    ranks,
                    hosts,
                    MatchupBucket::SameStanding,
                    round as u8,
                );
            }
        }
    }

    /// One more interconference game against an equal-rank team
    pub fn add_seventeenth_game(&mut self, ranks: &HashMap<u32, u8>) {
        let afc = self.topology.divisions(Conference::Afc);
        let nfc = self.topology.divisions(Conference::Nfc);
        if afc.is_empty() || nfc.is_empty() {
            return;
        }

        let offset = season_offset(self.season, self.settings.base_year, nfc.len());
        let afc_hosts = self.season_parity() == 0;

        for (position, division) in afc.iter().enumerate() {
            let target = nfc[(position + offset + 2) % nfc.len()];

            self.add_rank_games(
                (Conference::Afc, *division),
                (Conference::Nfc, target),
                ranks,
                afc_hosts,
                MatchupBucket::SeventeenthGame,
                0,
            );
        }
    }

    fn add_cross_division(&mut self, first: &[u32], second: &[u32], bucket: MatchupBucket) {
        let parity = self.season_parity();

        if first.len() == second.len() {
            let size = first.len();
            for round in 0..size {
                for (i, team) in first.iter().enumerate() {
                    let j = (i + round) % size;
                    let (home, away) = if (i + j + parity) % 2 == 0 {
                        (*team, second[j])
                    } else {
                        (second[j], *team)
                    };
                    self.push(home, away, bucket, round as u8);
                }
            }
        } else {
            for (i, a) in first.iter().enumerate() {
                for (j, b) in second.iter().enumerate() {
                    let (home, away) = if (i + j + parity) % 2 == 0 { (*a, *b) } else { (*b, *a) };
                    self.push(home, away, bucket, 0);
                }
            }
        }
    }

    fn add_rank_games(
        &mut self,
        first: (Conference, u8),
        second: (Conference, u8),
        ranks: &HashMap<u32, u8>,
        first_hosts: bool,
        bucket: MatchupBucket,
        round: u8,
    ) {
        let first_teams = self.topology.division_teams(first.0, first.1).to_vec();
        let second_teams = self.topology.division_teams(second.0, second.1).to_vec();

        for team in first_teams {
            let Some(rank) = ranks.get(&team) else {
                continue;
            };
            let Some(opponent) = second_teams.iter().find(|other| ranks.get(*other) == Some(rank)) else {
                continue;
            };

            let (home, away) = if first_hosts { (team, *opponent) } else { (*opponent, team) };
            self.push(home, away, bucket, round);
        }
    }

    /// Trims teams over the target, then tops up teams under it with
    /// pairings that have not met yet. Returns true when anything was added
    /// or removed.
    pub fn reconcile(&mut self, rng: &mut SimRng) -> bool {
        let target = self.settings.games_per_team;

        let trimmed = self.trim_surplus(target, rng);
        let filled = self.fill_shortfall(target, rng);

        trimmed || filled
    }

    fn gaps(&self, gap: impl Fn(u8) -> u8) -> BTreeMap<u32, u8> {
        self.topology
            .team_ids()
            .into_iter()
            .map(|team| (team, gap(self.count(team))))
            .filter(|(_, missing)| *missing > 0)
            .collect()
    }

    fn trim_surplus(&mut self, target: u8, rng: &mut SimRng) -> bool {
        let surplus = self.gaps(|count| count.saturating_sub(target));
        if surplus.is_empty() {
            return false;
        }

        // division series are never trimmed
        let removable: Vec<usize> = self
            .matchups
            .iter()
            .enumerate()
            .filter(|(_, m)| m.bucket != MatchupBucket::Division)
            .map(|(idx, _)| idx)
            .collect();
        let edges: Vec<(u32, u32)> = removable
            .iter()
            .map(|idx| (self.matchups[*idx].home, self.matchups[*idx].away))
            .collect();

        let (picked, _) = DegreeFactor::solve(&edges, &surplus, rng);

        let mut dropped: Vec<usize> = picked.into_iter().map(|idx| removable[idx]).collect();
        dropped.sort_unstable();
        for idx in dropped.into_iter().rev() {
            debug!("dropping surplus game {} @ {}", self.matchups[idx].away, self.matchups[idx].home);
            self.remove(idx);
        }

        // whatever is still over loses its latest games, short opponents are topped up next
        for team in self.topology.team_ids() {
            while self.count(team) > target {
                let latest = self
                    .matchups
                    .iter()
                    .rposition(|m| m.involves(team) && m.bucket != MatchupBucket::Division)
                    .or_else(|| self.matchups.iter().rposition(|m| m.involves(team)));

                let Some(idx) = latest else {
                    break;
                };

                debug!("dropping surplus game for team {}", team);
                self.remove(idx);
            }
        }

        true
    }

    fn fill_shortfall(&mut self, target: u8, rng: &mut SimRng) -> bool {
        let shortfall = self.gaps(|count| target.saturating_sub(count));
        if shortfall.is_empty() {
            return false;
        }

        let edges: Vec<(u32, u32)> = self
            .topology
            .team_ids()
            .into_iter()
            .tuple_combinations()
            .filter(|(a, b)| !self.has_met(*a, *b))
            .collect();

        let (picked, unmet) = DegreeFactor::solve(&edges, &shortfall, rng);

        for idx in picked {
            let (a, b) = edges[idx];
            let (home, away) = if rng.chance(0.5) { (a, b) } else { (b, a) };

            debug!("reconciliation game {} @ {}", away, home);
            self.push(home, away, MatchupBucket::Reconciliation, 0);
        }

        for (team, missing) in unmet {
            debug!("team {} stays {} games short, no unmet opponent left", team, missing);
        }

        true
    }

    pub fn into_matchups(self) -> Vec<Matchup> {
        self.matchups
    }
}
