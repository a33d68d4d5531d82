use serde::{Deserialize, Serialize};

/// Constants of the game resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Added to the home side's power before expected points are computed
    pub home_field_advantage: f64,
    pub base_points: f64,
    pub points_per_power: f64,
    pub min_expected_points: f64,
    pub max_expected_points: f64,
    pub score_std_dev: f64,
    pub two_point_bonus_chance: f64,
    pub one_point_bonus_chance: f64,
    /// Share of playoff tie-breaks won by the home side
    pub playoff_home_tiebreak: f64,
    pub tiebreak_field_goal_chance: f64,
    pub narrative_cap: usize,
    pub close_game_margin: u16,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            home_field_advantage: 3.0,
            base_points: 17.0,
            points_per_power: 0.25,
            min_expected_points: 10.0,
            max_expected_points: 42.0,
            score_std_dev: 7.0,
            two_point_bonus_chance: 0.04,
            one_point_bonus_chance: 0.03,
            playoff_home_tiebreak: 0.55,
            tiebreak_field_goal_chance: 0.7,
            narrative_cap: 5,
            close_game_margin: 7,
        }
    }
}
