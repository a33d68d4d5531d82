use crate::shared::SimRng;
use std::collections::BTreeMap;

/// Placement steps per pairing before the layout gives up
const STEPS_PER_PAIRING: usize = 100;
const MIN_STEPS: usize = 1_000;

/// Gives every pairing a week so no team plays twice in a week or during its
/// bye. Pairings are placed one at a time; when the two teams share no open
/// week, an alternating chain of two weeks is swapped to open one, and when
/// no chain works the clashing pairings are unplaced and queued again.
pub(crate) struct Interchange<'a> {
    pairs: &'a [(u32, u32)],
    byes: &'a BTreeMap<u32, u8>,
    weeks: u8,
    week_of: Vec<Option<u8>>,
    slots: BTreeMap<u32, BTreeMap<u8, usize>>,
}

impl<'a> Interchange<'a> {
    pub fn new(pairs: &'a [(u32, u32)], byes: &'a BTreeMap<u32, u8>, weeks: u8) -> Self {
        Interchange {
            pairs,
            byes,
            weeks,
            week_of: vec![None; pairs.len()],
            slots: BTreeMap::new(),
        }
    }

    /// Week of every pairing in input order, or None when the step budget
    /// runs out first
    pub fn solve(mut self, rng: &mut SimRng) -> Option<Vec<u8>> {
        let mut queue: Vec<usize> = (0..self.pairs.len()).collect();
        rng.shuffle(&mut queue);

        let budget = (self.pairs.len() * STEPS_PER_PAIRING).max(MIN_STEPS);

        for _ in 0..budget {
            let Some(idx) = queue.pop() else {
                break;
            };

            if self.place_directly(idx, rng) || self.place_by_chain(idx, rng) {
                continue;
            }

            queue.extend(self.force(idx, rng));
            rng.shuffle(&mut queue);
        }

        if !queue.is_empty() {
            return None;
        }

        self.week_of.into_iter().collect()
    }

    fn allowed(&self, team: u32, week: u8) -> bool {
        self.byes.get(&team) != Some(&week)
    }

    fn busy(&self, team: u32, week: u8) -> Option<usize> {
        self.slots.get(&team).and_then(|weeks| weeks.get(&week)).copied()
    }

    fn open_weeks(&self, team: u32) -> Vec<u8> {
        (1..=self.weeks)
            .filter(|week| self.allowed(team, *week) && self.busy(team, *week).is_none())
            .collect()
    }

    fn other(&self, idx: usize, team: u32) -> u32 {
        let (a, b) = self.pairs[idx];
        if a == team {
            b
        } else {
            a
        }
    }

    fn assign(&mut self, idx: usize, week: u8) {
        let (home, away) = self.pairs[idx];
        self.week_of[idx] = Some(week);
        self.slots.entry(home).or_default().insert(week, idx);
        self.slots.entry(away).or_default().insert(week, idx);
    }

    fn clear(&mut self, idx: usize) {
        let Some(week) = self.week_of[idx].take() else {
            return;
        };

        let (home, away) = self.pairs[idx];
        for team in [home, away] {
            if let Some(weeks) = self.slots.get_mut(&team) {
                weeks.remove(&week);
            }
        }
    }

    fn place_directly(&mut self, idx: usize, rng: &mut SimRng) -> bool {
        let (home, away) = self.pairs[idx];
        let away_open = self.open_weeks(away);

        let shared: Vec<u8> = self
            .open_weeks(home)
            .into_iter()
            .filter(|week| away_open.contains(week))
            .collect();

        if shared.is_empty() {
            return false;
        }

        self.assign(idx, shared[rng.index(shared.len())]);
        true
    }

    /// Home is open in week `a`, away in week `b`. Swapping `a` and `b` along
    /// the chain that starts at away's week-`a` game frees `a` for both.
    fn place_by_chain(&mut self, idx: usize, rng: &mut SimRng) -> bool {
        let (home, away) = self.pairs[idx];
        let away_open = self.open_weeks(away);

        let mut options: Vec<(u8, u8)> = self
            .open_weeks(home)
            .into_iter()
            .filter(|a| self.allowed(away, *a))
            .flat_map(|a| away_open.iter().filter(move |b| **b != a).map(move |b| (a, *b)))
            .collect();
        rng.shuffle(&mut options);

        for (a, b) in options {
            if let Some(chain) = self.chain(home, away, a, b) {
                let swapped: Vec<(usize, u8)> = chain
                    .iter()
                    .filter_map(|link| self.week_of[*link].map(|week| (*link, week)))
                    .collect();

                for (link, _) in &swapped {
                    self.clear(*link);
                }
                for (link, week) in swapped {
                    self.assign(link, if week == a { b } else { a });
                }

                self.assign(idx, a);
                return true;
            }
        }

        false
    }

    /// Pairings alternating weeks `a` and `b` from `start`, if swapping them
    /// leaves every team on the chain inside its own open weeks
    fn chain(&self, home: u32, start: u32, a: u8, b: u8) -> Option<Vec<usize>> {
        let mut links = Vec::new();
        let mut at = start;
        let mut week = a;

        while let Some(link) = self.busy(at, week) {
            if links.contains(&link) {
                return None;
            }
            links.push(link);
            at = self.other(link, at);
            week = if week == a { b } else { a };
        }

        // the far end gains `week`; home must keep `a` open
        if at == home || !self.allowed(at, week) {
            return None;
        }

        Some(links)
    }

    /// Takes a random week both teams may play, unplacing whatever already
    /// sits there. Returns the unplaced pairings.
    fn force(&mut self, idx: usize, rng: &mut SimRng) -> Vec<usize> {
        let (home, away) = self.pairs[idx];

        let weeks: Vec<u8> = (1..=self.weeks)
            .filter(|week| self.allowed(home, *week) && self.allowed(away, *week))
            .collect();
        if weeks.is_empty() {
            return vec![idx];
        }
        let week = weeks[rng.index(weeks.len())];

        let mut bumped = Vec::new();
        for team in [home, away] {
            if let Some(existing) = self.busy(team, week) {
                if !bumped.contains(&existing) {
                    self.clear(existing);
                    bumped.push(existing);
                }
            }
        }

        self.assign(idx, week);
        bumped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn check(pairs: &[(u32, u32)], byes: &BTreeMap<u32, u8>, weeks: &[u8]) {
        let mut booked: BTreeMap<u32, Vec<u8>> = BTreeMap::new();
        for ((home, away), week) in pairs.iter().zip(weeks) {
            booked.entry(*home).or_default().push(*week);
            booked.entry(*away).or_default().push(*week);
        }

        for (team, mut played) in booked {
            played.sort_unstable();
            let len = played.len();
            played.dedup();
            assert_eq!(played.len(), len, "team {} double booked", team);
            assert!(!byes.get(&team).is_some_and(|bye| played.contains(bye)), "team {}", team);
        }
    }

    #[test]
    fn test_round_robin_fills_every_week() {
        // eight teams, seven weeks: a perfect 1-factorization is needed
        let pairs: Vec<(u32, u32)> = (1..=8).tuple_combinations().collect();
        let byes = BTreeMap::new();

        for seed in 0..20 {
            let mut rng = SimRng::seed_from(seed);
            let weeks = Interchange::new(&pairs, &byes, 7).solve(&mut rng).expect("layout");

            check(&pairs, &byes, &weeks);
            assert!(weeks.iter().all(|week| (1..=7).contains(week)));
        }
    }

    #[test]
    fn test_byes_are_respected() {
        // double round robin of six teams over eleven weeks, one bye each
        let pairs: Vec<(u32, u32)> = (1..=6).tuple_combinations().flat_map(|(a, b)| [(a, b), (b, a)]).collect();
        let byes: BTreeMap<u32, u8> = [(1, 3), (2, 3), (3, 6), (4, 6), (5, 9), (6, 9)].into_iter().collect();

        let mut rng = SimRng::seed_from(17);
        let weeks = Interchange::new(&pairs, &byes, 11).solve(&mut rng).expect("layout");

        check(&pairs, &byes, &weeks);
    }

    #[test]
    fn test_impossible_layout_gives_up() {
        // three teams cannot all play each other in one week
        let pairs = vec![(1, 2), (2, 3), (1, 3)];
        let byes = BTreeMap::new();

        let mut rng = SimRng::seed_from(2);
        assert!(Interchange::new(&pairs, &byes, 1).solve(&mut rng).is_none());
    }
}
