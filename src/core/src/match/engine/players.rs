use crate::r#match::engine::score::ScoreBreakdown;
use crate::r#match::{PlayerStatLine, Position, RosterPlayer, TeamRoster, TeamStats};
use crate::shared::SimRng;
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeMap;

const PRIMARY_RUSH_SHARE: f64 = 0.7;
const TE_TARGET_SHARE: f64 = 0.18;
const RB_TARGET_SHARE: f64 = 0.12;
/// Defenders considered for sacks, interceptions and forced fumbles
const PLAYMAKER_POOL: usize = 4;

fn receiver_shares(receivers: usize) -> &'static [f64] {
    match receivers {
        0 => &[],
        1 => &[0.45],
        2 => &[0.33, 0.25],
        3 => &[0.27, 0.21, 0.14],
        _ => &[0.25, 0.19, 0.13, 0.06],
    }
}

/// Average of tackle and pursuit, weighted by how often the position is
/// around the ball
fn tackle_power(player: &RosterPlayer) -> f64 {
    let tackle = player.ratings.tackle as f64;
    let pursuit = player.ratings.pursuit as f64;
    ((tackle + pursuit) / 2.0).max(1.0) * tackle_factor(player.position)
}

fn tackle_factor(position: Position) -> f64 {
    match position {
        Position::Lb => 1.3,
        Position::S => 1.1,
        Position::Cb => 0.9,
        Position::Dl => 0.8,
        _ => 0.0,
    }
}

/// Splits `total` across `weights` by the largest-remainder method, so the
/// parts always sum to `total` when any weight is positive. Ties in the
/// remainder go to the earlier entry.
pub fn apportion(total: u16, weights: &[f64]) -> Vec<u16> {
    let weight_sum: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if weight_sum <= 0.0 {
        return vec![0; weights.len()];
    }

    let quotas: Vec<f64> = weights
        .iter()
        .map(|w| total as f64 * w.max(0.0) / weight_sum)
        .collect();

    let mut parts: Vec<u16> = quotas.iter().map(|q| q.floor() as u16).collect();
    let assigned: u16 = parts.iter().sum();

    let mut by_remainder: Vec<usize> = (0..quotas.len()).filter(|&idx| weights[idx] > 0.0).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = quotas[a] - quotas[a].floor();
        let rb = quotas[b] - quotas[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });

    for idx in by_remainder.into_iter().cycle().take(total.saturating_sub(assigned) as usize) {
        parts[idx] += 1;
    }

    parts
}

/// Share of passes completed by a quarterback
pub fn completion_rate(quarterback: Option<&RosterPlayer>) -> f64 {
    match quarterback {
        Some(qb) => (0.45 + qb.ratings.throw_accuracy as f64 * 0.0035).clamp(0.45, 0.75),
        None => 0.0,
    }
}

fn scramble_share(quarterback: &RosterPlayer) -> f64 {
    ((quarterback.ratings.speed as f64 - 50.0) * 0.002 + 0.05).clamp(0.0, 0.2)
}

/// Who can do what for one side on game day
pub struct Personnel<'r> {
    pub quarterback: Option<&'r RosterPlayer>,
    rushers: Vec<(&'r RosterPlayer, f64)>,
    receivers: Vec<(&'r RosterPlayer, f64)>,
    kicker: Option<&'r RosterPlayer>,
    punter: Option<&'r RosterPlayer>,
    defenders: Vec<&'r RosterPlayer>,
}

impl<'r> Personnel<'r> {
    pub fn new(roster: &'r TeamRoster) -> Self {
        let quarterback = roster.active(Position::Qb).first().copied();

        Personnel {
            quarterback,
            rushers: Self::rushers(roster, quarterback),
            receivers: Self::receivers(roster),
            kicker: roster.active(Position::K).first().copied(),
            punter: roster.active(Position::P).first().copied(),
            defenders: [Position::Dl, Position::Lb, Position::Cb, Position::S]
                .iter()
                .flat_map(|&position| roster.active(position))
                .collect(),
        }
    }

    fn rushers(roster: &'r TeamRoster, quarterback: Option<&'r RosterPlayer>) -> Vec<(&'r RosterPlayer, f64)> {
        let backs: Vec<&RosterPlayer> = roster
            .active(Position::Rb)
            .into_iter()
            .chain(roster.reserves(Position::Rb))
            .take(2)
            .collect();

        let scramble = match (quarterback, backs.is_empty()) {
            (Some(_), true) => 1.0,
            (Some(qb), false) => scramble_share(qb),
            (None, _) => 0.0,
        };

        let mut rushers = Vec::new();
        if let Some(qb) = quarterback {
            rushers.push((qb, scramble));
        }

        let carry_share = 1.0 - scramble;
        match backs.as_slice() {
            [only] => rushers.push((*only, carry_share)),
            [primary, secondary] => {
                rushers.push((*primary, carry_share * PRIMARY_RUSH_SHARE));
                rushers.push((*secondary, carry_share * (1.0 - PRIMARY_RUSH_SHARE)));
            }
            _ => {}
        }

        rushers.retain(|(_, share)| *share > 0.0);
        rushers
    }

    fn receivers(roster: &'r TeamRoster) -> Vec<(&'r RosterPlayer, f64)> {
        let wideouts: Vec<&RosterPlayer> = roster
            .active(Position::Wr)
            .into_iter()
            .chain(roster.reserves(Position::Wr))
            .take(4)
            .collect();

        let mut receivers: Vec<(&RosterPlayer, f64)> = wideouts
            .iter()
            .zip(receiver_shares(wideouts.len()))
            .map(|(player, share)| (*player, *share))
            .collect();

        if let Some(tight_end) = roster.active(Position::Te).first() {
            receivers.push((*tight_end, TE_TARGET_SHARE));
        }
        if let Some(back) = roster.active(Position::Rb).first() {
            receivers.push((*back, RB_TARGET_SHARE));
        }

        receivers
    }

    pub fn can_pass(&self) -> bool {
        self.quarterback.is_some() && !self.receivers.is_empty()
    }

    pub fn can_rush(&self) -> bool {
        !self.rushers.is_empty()
    }

    /// Top defenders by one rating, best first, ids breaking ties
    fn playmakers(&self, rating: impl Fn(&RosterPlayer) -> u8) -> Vec<&'r RosterPlayer> {
        let mut ranked = self.defenders.clone();
        ranked.sort_by(|a, b| match rating(b).cmp(&rating(a)) {
            Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        });
        ranked.truncate(PLAYMAKER_POOL);
        ranked
    }
}

/// Turns one side's team totals into individual lines. Offensive lines come
/// from the side's own stats, defensive lines from the opponent's.
pub struct StatAllocator<'r> {
    team_id: u32,
    personnel: &'r Personnel<'r>,
}

impl<'r> StatAllocator<'r> {
    pub fn new(team_id: u32, personnel: &'r Personnel<'r>) -> Self {
        StatAllocator { team_id, personnel }
    }

    pub fn allocate(
        &self,
        lines: &mut BTreeMap<u32, PlayerStatLine>,
        own: &TeamStats,
        opponent: &TeamStats,
        score: &ScoreBreakdown,
        rng: &mut SimRng,
    ) {
        let (passing_touchdowns, rushing_touchdowns) = self.split_touchdowns(own, score, rng);

        self.allocate_passing(lines, own, passing_touchdowns, rng);
        self.allocate_rushing(lines, own, rushing_touchdowns, rng);

        let credited = passing_touchdowns + rushing_touchdowns;
        self.credit_other_touchdowns(lines, (score.touchdowns as u8).saturating_sub(credited));
        self.allocate_kicking(lines, own, score, rng);
        self.allocate_defense(lines, opponent, rng);
    }

    fn line<'m>(&self, lines: &'m mut BTreeMap<u32, PlayerStatLine>, player: &RosterPlayer) -> &'m mut PlayerStatLine {
        lines
            .entry(player.id)
            .or_insert_with(|| PlayerStatLine::new(player.id, self.team_id, player.position))
    }

    fn split_touchdowns(&self, own: &TeamStats, score: &ScoreBreakdown, rng: &mut SimRng) -> (u8, u8) {
        let can_pass = own.completions > 0 && self.personnel.can_pass();
        let can_rush = own.rush_attempts > 0 && self.personnel.can_rush();

        let pass_share = match (can_pass, can_rush) {
            (true, true) => {
                (own.passing_yards as f64 / own.total_yards.max(1) as f64).clamp(0.35, 0.75)
            }
            (true, false) => 1.0,
            (false, _) => 0.0,
        };

        let mut passing = 0u8;
        let mut rushing = 0u8;

        for _ in 0..score.touchdowns {
            if can_pass && rng.chance(pass_share) && (passing as u16) < own.completions {
                passing += 1;
            } else if can_rush {
                rushing += 1;
            } else if can_pass && (passing as u16) < own.completions {
                passing += 1;
            }
        }

        (passing, rushing)
    }

    /// Scores with no runner or receiver to credit go to the top skill player
    /// left on the field, or the best defender when there is none.
    fn credit_other_touchdowns(&self, lines: &mut BTreeMap<u32, PlayerStatLine>, touchdowns: u8) {
        if touchdowns == 0 {
            return;
        }

        let scorer = self
            .personnel
            .receivers
            .first()
            .map(|(player, _)| *player)
            .or_else(|| {
                self.personnel
                    .defenders
                    .iter()
                    .copied()
                    .max_by(|a, b| a.ratings.overall.cmp(&b.ratings.overall).then(b.id.cmp(&a.id)))
            });

        match scorer {
            Some(player) => self.line(lines, player).other_touchdowns += touchdowns,
            None => debug!("team {}: {} touchdowns with nobody to credit", self.team_id, touchdowns),
        }
    }

    fn allocate_passing(
        &self,
        lines: &mut BTreeMap<u32, PlayerStatLine>,
        own: &TeamStats,
        touchdowns: u8,
        rng: &mut SimRng,
    ) {
        let Some(qb) = self.personnel.quarterback else {
            return;
        };
        if own.pass_attempts == 0 || self.personnel.receivers.is_empty() {
            return;
        }

        let passer = self.line(lines, qb);
        passer.pass_attempts = own.pass_attempts;
        passer.completions = own.completions;
        passer.passing_yards = own.passing_yards;
        passer.passing_touchdowns = touchdowns;
        passer.interceptions_thrown = own.interceptions_thrown;

        let shares: Vec<f64> = self.personnel.receivers.iter().map(|(_, share)| *share).collect();

        let receptions = apportion(own.completions, &shares);
        let incompletions = apportion(own.pass_attempts - own.completions, &shares);

        // yards follow catches, with some players doing more per catch
        let yard_weights: Vec<f64> = receptions
            .iter()
            .map(|caught| {
                if *caught == 0 {
                    0.0
                } else {
                    *caught as f64 * rng.range_f64(0.7, 1.3)
                }
            })
            .collect();
        let yards = apportion(own.passing_yards, &yard_weights);

        let mut scores = vec![0u8; receptions.len()];
        let catch_weights: Vec<f64> = receptions.iter().map(|caught| *caught as f64).collect();
        for _ in 0..touchdowns {
            if let Some(idx) = rng.weighted_index(&catch_weights) {
                scores[idx] += 1;
            }
        }

        for (idx, (receiver, _)) in self.personnel.receivers.iter().enumerate() {
            let line = self.line(lines, receiver);
            line.targets += receptions[idx] + incompletions[idx];
            line.receptions += receptions[idx];
            line.receiving_yards += yards[idx];
            line.receiving_touchdowns += scores[idx];
        }
    }

    fn allocate_rushing(
        &self,
        lines: &mut BTreeMap<u32, PlayerStatLine>,
        own: &TeamStats,
        touchdowns: u8,
        rng: &mut SimRng,
    ) {
        if own.rush_attempts == 0 || self.personnel.rushers.is_empty() {
            return;
        }

        let shares: Vec<f64> = self.personnel.rushers.iter().map(|(_, share)| *share).collect();
        let carries = apportion(own.rush_attempts, &shares);
        let yards = apportion(own.rushing_yards, &shares);

        let mut scores = vec![0u8; shares.len()];
        for _ in 0..touchdowns {
            if let Some(idx) = rng.weighted_index(&shares) {
                scores[idx] += 1;
            }
        }

        for (idx, (rusher, _)) in self.personnel.rushers.iter().enumerate() {
            let line = self.line(lines, rusher);
            line.carries += carries[idx];
            line.rushing_yards += yards[idx];
            line.rushing_touchdowns += scores[idx];
        }
    }

    fn allocate_kicking(
        &self,
        lines: &mut BTreeMap<u32, PlayerStatLine>,
        own: &TeamStats,
        score: &ScoreBreakdown,
        rng: &mut SimRng,
    ) {
        if let Some(kicker) = self.personnel.kicker {
            let miss_chance = (0.35 - kicker.ratings.kick_accuracy as f64 * 0.003).clamp(0.05, 0.35);
            let misses = (0..2).filter(|_| rng.chance(miss_chance)).count() as u8;

            let line = self.line(lines, kicker);
            line.field_goals_made = score.field_goals as u8;
            line.field_goals_attempted = score.field_goals as u8 + misses;
            line.extra_points_made = score.touchdowns as u8;
        }

        if let Some(punter) = self.personnel.punter {
            let stalled_drives = 8.0 - own.total_yards as f64 / 60.0 + rng.range_f64(-1.0, 1.0);
            let punts = stalled_drives.round().clamp(1.0, 9.0) as u8;
            let distance = 38.0 + punter.ratings.kick_power as f64 * 0.12;
            let punt_yards = (0..punts)
                .map(|_| (distance + rng.range_f64(-8.0, 8.0)).round() as u16)
                .sum();

            let line = self.line(lines, punter);
            line.punts = punts;
            line.punt_yards = punt_yards;
        }
    }

    fn allocate_defense(&self, lines: &mut BTreeMap<u32, PlayerStatLine>, opponent: &TeamStats, rng: &mut SimRng) {
        let defenders = &self.personnel.defenders;
        if defenders.is_empty() {
            return;
        }

        let tackle_weights: Vec<f64> = defenders
            .iter()
            .map(|player| tackle_power(player))
            .collect();
        let tackles = apportion(opponent.rush_attempts + opponent.completions, &tackle_weights);

        for (idx, defender) in defenders.iter().enumerate() {
            self.line(lines, defender).tackles += tackles[idx];
        }

        let rushers = self.personnel.playmakers(|player| player.ratings.pass_rush);
        for _ in 0..opponent.sacks_allowed {
            if let Some(player) = Self::pick(&rushers, |player| player.ratings.pass_rush, rng) {
                self.line(lines, player).sacks += 1;
            }
        }

        let cover = self.personnel.playmakers(|player| player.ratings.coverage);
        for _ in 0..opponent.interceptions_thrown {
            if let Some(player) = Self::pick(&cover, |player| player.ratings.coverage, rng) {
                self.line(lines, player).interceptions += 1;
            }
        }

        let hitters = self.personnel.playmakers(|player| player.ratings.tackle);
        for _ in 0..opponent.fumbles_lost {
            if let Some(player) = Self::pick(&hitters, |player| player.ratings.tackle, rng) {
                self.line(lines, player).forced_fumbles += 1;
            }
        }
    }

    fn pick<'p>(
        pool: &[&'p RosterPlayer],
        rating: impl Fn(&RosterPlayer) -> u8,
        rng: &mut SimRng,
    ) -> Option<&'p RosterPlayer> {
        let weights: Vec<f64> = pool.iter().map(|player| rating(player).max(1) as f64).collect();
        rng.weighted_index(&weights).map(|idx| pool[idx])
    }
}
