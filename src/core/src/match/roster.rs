use crate::shared::FullName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Ol,
    Dl,
    Lb,
    Cb,
    S,
    K,
    P,
}

pub const POSITION_COUNT: usize = 11;

const STARTERS: [usize; POSITION_COUNT] = [1, 1, 3, 1, 5, 4, 3, 2, 2, 1, 1];

/// Share of team power carried by each position group, sums to 1.0
const WEIGHTS: [f64; POSITION_COUNT] = [0.18, 0.06, 0.12, 0.05, 0.16, 0.13, 0.09, 0.10, 0.07, 0.02, 0.02];

impl Position {
    pub const ALL: [Position; POSITION_COUNT] = [
        Position::Qb,
        Position::Rb,
        Position::Wr,
        Position::Te,
        Position::Ol,
        Position::Dl,
        Position::Lb,
        Position::Cb,
        Position::S,
        Position::K,
        Position::P,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn starters(self) -> usize {
        STARTERS[self.index()]
    }

    pub fn weight(self) -> f64 {
        WEIGHTS[self.index()]
    }

    pub fn is_defense(self) -> bool {
        matches!(self, Position::Dl | Position::Lb | Position::Cb | Position::S)
    }

    pub fn code(self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::Ol => "OL",
            Position::Dl => "DL",
            Position::Lb => "LB",
            Position::Cb => "CB",
            Position::S => "S",
            Position::K => "K",
            Position::P => "P",
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.code())
    }
}

/// Ratings on a 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRatings {
    pub overall: u8,
    pub speed: u8,
    pub strength: u8,
    pub awareness: u8,
    pub throw_accuracy: u8,
    pub throw_power: u8,
    pub catching: u8,
    pub route_running: u8,
    pub ball_security: u8,
    pub tackle: u8,
    pub pursuit: u8,
    pub pass_rush: u8,
    pub coverage: u8,
    pub kick_power: u8,
    pub kick_accuracy: u8,
}

impl Default for PlayerRatings {
    fn default() -> Self {
        PlayerRatings {
            overall: 50,
            speed: 50,
            strength: 50,
            awareness: 50,
            throw_accuracy: 50,
            throw_power: 50,
            catching: 50,
            route_running: 50,
            ball_security: 50,
            tackle: 50,
            pursuit: 50,
            pass_rush: 50,
            coverage: 50,
            kick_power: 50,
            kick_accuracy: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: u32,
    pub name: FullName,
    pub position: Position,
    pub ratings: PlayerRatings,
    pub injured: bool,
}

impl RosterPlayer {
    pub fn new(id: u32, name: FullName, position: Position, ratings: PlayerRatings) -> Self {
        RosterPlayer {
            id,
            name,
            position,
            ratings,
            injured: false,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.injured
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadCoach {
    pub name: FullName,
    pub game_management: u8,
    pub scheme_fit: u8,
}

impl HeadCoach {
    /// Power points a coach adds (or costs) on game day
    pub fn coaching_modifier(&self) -> f64 {
        (self.game_management as f64 - 50.0) * 0.04 + (self.scheme_fit as f64 - 50.0) * 0.02
    }
}

/// Ordered player ids per position, starters first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthChart {
    slots: [Vec<u32>; POSITION_COUNT],
}

impl DepthChart {
    pub fn at(&self, position: Position) -> &[u32] {
        &self.slots[position.index()]
    }

    pub fn set(&mut self, position: Position, player_ids: Vec<u32>) {
        self.slots[position.index()] = player_ids;
    }

    pub fn push(&mut self, position: Position, player_id: u32) {
        self.slots[position.index()].push(player_id);
    }
}

/// Who fills a starting slot on game day
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineupSlot<'a> {
    Starter(&'a RosterPlayer),
    /// Healthy backup covering an unavailable starter
    Replacement(&'a RosterPlayer),
    Vacant,
}

impl<'a> LineupSlot<'a> {
    pub fn player(&self) -> Option<&'a RosterPlayer> {
        match *self {
            LineupSlot::Starter(player) | LineupSlot::Replacement(player) => Some(player),
            LineupSlot::Vacant => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team_id: u32,
    pub abbreviation: String,
    pub players: BTreeMap<u32, RosterPlayer>,
    pub depth_chart: DepthChart,
    pub coach: HeadCoach,
}

impl TeamRoster {
    pub fn new(team_id: u32, abbreviation: String, coach: HeadCoach) -> Self {
        TeamRoster {
            team_id,
            abbreviation,
            players: BTreeMap::new(),
            depth_chart: DepthChart::default(),
            coach,
        }
    }

    /// Adds a player at the bottom of its position's depth chart
    pub fn add_player(&mut self, player: RosterPlayer) {
        self.depth_chart.push(player.position, player.id);
        self.players.insert(player.id, player);
    }

    pub fn player(&self, player_id: u32) -> Option<&RosterPlayer> {
        self.players.get(&player_id)
    }

    /// Depth chart of a position resolved to players; unknown ids are skipped
    pub fn depth(&self, position: Position) -> Vec<&RosterPlayer> {
        self.depth_chart
            .at(position)
            .iter()
            .filter_map(|id| self.players.get(id))
            .collect()
    }

    /// Starting slots of a position, each unavailable starter covered by the
    /// next healthy backup not already used
    pub fn lineup(&self, position: Position) -> Vec<LineupSlot<'_>> {
        let depth = self.depth(position);
        let count = position.starters();
        let mut backups = depth
            .iter()
            .skip(count)
            .copied()
            .filter(|player| player.is_available());

        (0..count)
            .map(|slot| match depth.get(slot) {
                Some(&player) if player.is_available() => LineupSlot::Starter(player),
                _ => backups
                    .next()
                    .map(LineupSlot::Replacement)
                    .unwrap_or(LineupSlot::Vacant),
            })
            .collect()
    }

    /// Players on the field at a position
    pub fn active(&self, position: Position) -> Vec<&RosterPlayer> {
        self.lineup(position)
            .iter()
            .filter_map(|slot| slot.player())
            .collect()
    }

    /// Healthy players behind the starters who were not pulled into the lineup
    pub fn reserves(&self, position: Position) -> Vec<&RosterPlayer> {
        let active: Vec<u32> = self.active(position).iter().map(|player| player.id).collect();

        self.depth(position)
            .into_iter()
            .skip(position.starters())
            .filter(|player| player.is_available() && !active.contains(&player.id))
            .collect()
    }

    /// Every player taking the field, in position order
    pub fn game_day_players(&self) -> Vec<&RosterPlayer> {
        Position::ALL
            .iter()
            .flat_map(|position| self.active(*position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, position: Position, overall: u8) -> RosterPlayer {
        RosterPlayer::new(
            id,
            FullName::new(format!("First{}", id), format!("Last{}", id)),
            position,
            PlayerRatings {
                overall,
                ..PlayerRatings::default()
            },
        )
    }

    fn roster() -> TeamRoster {
        TeamRoster::new(
            1,
            "TST".to_string(),
            HeadCoach {
                name: FullName::new("Head".to_string(), "Coach".to_string()),
                game_management: 50,
                scheme_fit: 50,
            },
        )
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = Position::ALL.iter().map(|p| p.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(Position::ALL.iter().map(|p| p.starters()).sum::<usize>(), 24);
    }

    #[test]
    fn test_coaching_modifier() {
        let coach = HeadCoach {
            name: FullName::new("A".to_string(), "B".to_string()),
            game_management: 75,
            scheme_fit: 40,
        };
        assert!((coach.coaching_modifier() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_injured_starter_is_replaced_by_healthy_backup() {
        let mut team = roster();
        let mut starter = player(10, Position::Qb, 80);
        starter.injured = true;
        team.add_player(starter);
        let mut hurt_backup = player(11, Position::Qb, 70);
        hurt_backup.injured = true;
        team.add_player(hurt_backup);
        team.add_player(player(12, Position::Qb, 60));

        let lineup = team.lineup(Position::Qb);

        assert_eq!(lineup.len(), 1);
        assert!(matches!(lineup[0], LineupSlot::Replacement(p) if p.id == 12));
        assert!(team.reserves(Position::Qb).is_empty());
    }

    #[test]
    fn test_missing_players_leave_vacant_slots() {
        let mut team = roster();
        team.add_player(player(20, Position::Wr, 70));

        let lineup = team.lineup(Position::Wr);

        assert_eq!(lineup.len(), 3);
        assert!(matches!(lineup[0], LineupSlot::Starter(_)));
        assert_eq!(lineup[1], LineupSlot::Vacant);
        assert_eq!(team.active(Position::Wr).len(), 1);
    }

    #[test]
    fn test_reserves_follow_depth_order() {
        let mut team = roster();
        for id in 30..35 {
            team.add_player(player(id, Position::Rb, 60));
        }

        let reserves: Vec<u32> = team.reserves(Position::Rb).iter().map(|p| p.id).collect();

        assert_eq!(reserves, vec![31, 32, 33, 34]);
    }
}
