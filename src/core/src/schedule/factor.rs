use crate::shared::SimRng;
use std::collections::{BTreeMap, BTreeSet};

/// Longest alternating path tried when trading picked pairings
const MAX_PATH_EDGES: usize = 12;
const REPAIR_ATTEMPTS: usize = 200;
/// Vertices visited per augmenting-path search before giving up
const SEARCH_BUDGET: usize = 4_000;

/// Chooses pairings out of a candidate pool so that every team is picked
/// exactly as often as it needs. A most-constrained-first pass does the bulk
/// of the work; augmenting paths then trade picked pairings for unpicked ones
/// to reach the teams the first pass stranded.
pub(crate) struct DegreeFactor<'a> {
    edges: &'a [(u32, u32)],
    incident: BTreeMap<u32, Vec<usize>>,
    need: BTreeMap<u32, u8>,
    picked: BTreeSet<usize>,
}

impl<'a> DegreeFactor<'a> {
    /// Returns the picked edge indexes in ascending order and the need left
    /// unmet per team (empty when every need was met).
    pub fn solve(
        edges: &'a [(u32, u32)],
        need: &BTreeMap<u32, u8>,
        rng: &mut SimRng,
    ) -> (Vec<usize>, BTreeMap<u32, u8>) {
        let mut factor = DegreeFactor::new(edges, need);

        factor.greedy(rng);
        factor.repair(rng);

        let unmet = factor.need.into_iter().filter(|(_, left)| *left > 0).collect();
        (factor.picked.into_iter().collect(), unmet)
    }

    fn new(edges: &'a [(u32, u32)], need: &BTreeMap<u32, u8>) -> Self {
        let mut incident: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (idx, (a, b)) in edges.iter().enumerate() {
            if a == b {
                continue;
            }
            incident.entry(*a).or_default().push(idx);
            incident.entry(*b).or_default().push(idx);
        }

        DegreeFactor {
            edges,
            incident,
            need: need.clone(),
            picked: BTreeSet::new(),
        }
    }

    fn needs(&self, team: u32) -> u8 {
        self.need.get(&team).copied().unwrap_or(0)
    }

    fn other(&self, idx: usize, team: u32) -> u32 {
        let (a, b) = self.edges[idx];
        if a == team {
            b
        } else {
            a
        }
    }

    fn incident(&self, team: u32) -> &[usize] {
        self.incident.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Unpicked pairings of `team` whose opponent still needs games
    fn open(&self, team: u32) -> Vec<usize> {
        self.incident(team)
            .iter()
            .copied()
            .filter(|idx| !self.picked.contains(idx) && self.needs(self.other(*idx, team)) > 0)
            .collect()
    }

    fn slack(&self, team: u32) -> i32 {
        self.open(team).len() as i32 - self.needs(team) as i32
    }

    fn pick(&mut self, idx: usize) {
        let (a, b) = self.edges[idx];
        self.picked.insert(idx);
        for team in [a, b] {
            if let Some(left) = self.need.get_mut(&team) {
                *left = left.saturating_sub(1);
            }
        }
    }

    fn greedy(&mut self, rng: &mut SimRng) {
        loop {
            let waiting: Vec<u32> = self
                .need
                .iter()
                .filter(|(team, left)| **left > 0 && !self.open(**team).is_empty())
                .map(|(team, _)| *team)
                .collect();

            let Some(team) = Self::tightest(waiting, |team| self.slack(team), rng) else {
                break;
            };

            let open = self.open(team);
            let Some(idx) = Self::tightest(open, |idx| self.slack(self.other(idx, team)), rng) else {
                break;
            };

            self.pick(idx);
        }
    }

    /// Lowest slack first, random among equals
    fn tightest<T: Copy>(items: Vec<T>, slack: impl Fn(T) -> i32, rng: &mut SimRng) -> Option<T> {
        let keyed: Vec<(i32, f64, T)> = items
            .into_iter()
            .map(|item| (slack(item), rng.next_f64(), item))
            .collect();

        keyed
            .into_iter()
            .min_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)))
            .map(|(_, _, item)| item)
    }

    fn repair(&mut self, rng: &mut SimRng) {
        for _ in 0..REPAIR_ATTEMPTS {
            let short: Vec<u32> = self
                .need
                .iter()
                .filter(|(_, left)| **left > 0)
                .map(|(team, _)| *team)
                .collect();
            if short.is_empty() {
                return;
            }

            let start = short[rng.index(short.len())];
            let mut path = Vec::new();
            let mut budget = SEARCH_BUDGET;

            if !self.extend(start, start, &mut path, &mut budget, rng) {
                continue;
            }

            // path alternates unpicked, picked, ..., unpicked
            let mut end = start;
            for (step, idx) in path.iter().enumerate() {
                if step % 2 == 0 {
                    self.picked.insert(*idx);
                } else {
                    self.picked.remove(idx);
                }
                end = self.other(*idx, end);
            }

            for team in [start, end] {
                if let Some(left) = self.need.get_mut(&team) {
                    *left = left.saturating_sub(1);
                }
            }
        }
    }

    fn extend(
        &self,
        start: u32,
        at: u32,
        path: &mut Vec<usize>,
        budget: &mut usize,
        rng: &mut SimRng,
    ) -> bool {
        if path.len() >= MAX_PATH_EDGES || *budget == 0 {
            return false;
        }
        *budget -= 1;

        let take_picked = path.len() % 2 == 1;
        let mut options: Vec<usize> = self
            .incident(at)
            .iter()
            .copied()
            .filter(|idx| !path.contains(idx) && self.picked.contains(idx) == take_picked)
            .collect();
        rng.shuffle(&mut options);

        for idx in options {
            let next = self.other(idx, at);
            path.push(idx);

            let closes = !take_picked && self.needs(next) > 0 && (next != start || self.needs(start) >= 2);
            if closes || self.extend(start, next, path, budget, rng) {
                return true;
            }

            path.pop();
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn degrees(edges: &[(u32, u32)], picked: &[usize]) -> BTreeMap<u32, u8> {
        let mut degrees = BTreeMap::new();
        for idx in picked {
            let (a, b) = edges[*idx];
            *degrees.entry(a).or_default() += 1;
            *degrees.entry(b).or_default() += 1;
        }
        degrees
    }

    #[test]
    fn test_three_factor_of_complete_bipartite() {
        let edges: Vec<(u32, u32)> = (1..=4).cartesian_product(5..=8).collect();
        let need: BTreeMap<u32, u8> = (1..=8).map(|team| (team, 3)).collect();

        for seed in 0..50 {
            let mut rng = SimRng::seed_from(seed);
            let (picked, unmet) = DegreeFactor::solve(&edges, &need, &mut rng);

            assert!(unmet.is_empty(), "seed {}: {:?}", seed, unmet);
            assert_eq!(degrees(&edges, &picked), need);
        }
    }

    #[test]
    fn test_mixed_needs_on_complete_graph() {
        let edges: Vec<(u32, u32)> = (1..=10).tuple_combinations().collect();
        let need: BTreeMap<u32, u8> = (1..=10).map(|team| (team, if team <= 5 { 2 } else { 4 })).collect();

        let mut rng = SimRng::seed_from(3);
        let (picked, unmet) = DegreeFactor::solve(&edges, &need, &mut rng);

        assert!(unmet.is_empty());
        assert_eq!(degrees(&edges, &picked), need);
    }

    #[test]
    fn test_impossible_need_is_reported() {
        let edges = vec![(1, 2)];
        let need: BTreeMap<u32, u8> = [(1, 2), (2, 1)].into_iter().collect();

        let mut rng = SimRng::seed_from(1);
        let (picked, unmet) = DegreeFactor::solve(&edges, &need, &mut rng);

        assert_eq!(picked, vec![0]);
        assert_eq!(unmet, [(1, 1)].into_iter().collect());
    }
}
