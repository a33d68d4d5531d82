use crate::r#match::{OvertimePoints, SimulationSettings};
use crate::shared::SimRng;

/// How a side's points were made: touchdowns (with the try), field goals
/// and the odd safety or two-point conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub touchdowns: u16,
    pub field_goals: u16,
    pub bonus: u16,
}

impl ScoreBreakdown {
    pub fn points(&self) -> u16 {
        self.touchdowns * 7 + self.field_goals * 3 + self.bonus
    }
}

pub struct ScoreModel<'s> {
    settings: &'s SimulationSettings,
}

impl<'s> ScoreModel<'s> {
    pub fn new(settings: &'s SimulationSettings) -> Self {
        ScoreModel { settings }
    }

    /// Expected regulation points for a side of the given power
    pub fn expected_points(&self, power: f64) -> f64 {
        (self.settings.base_points + (power - 50.0) * self.settings.points_per_power)
            .clamp(self.settings.min_expected_points, self.settings.max_expected_points)
    }

    pub fn draw(&self, power: f64, rng: &mut SimRng) -> ScoreBreakdown {
        let raw = rng
            .gaussian(self.expected_points(power), self.settings.score_std_dev)
            .max(0.0)
            .round() as u16;

        self.snap(raw, rng)
    }

    /// Converts raw points into touchdowns and field goals, then maybe adds
    /// a one or two point bonus.
    fn snap(&self, raw: u16, rng: &mut SimRng) -> ScoreBreakdown {
        let touchdowns = raw / 7;
        let field_goals = (raw % 7 + 1) / 3;

        let bonus = if rng.chance(self.settings.two_point_bonus_chance) {
            2
        } else if rng.chance(self.settings.one_point_bonus_chance) {
            1
        } else {
            0
        };

        ScoreBreakdown {
            touchdowns,
            field_goals,
            bonus,
        }
    }

    /// Settles a level playoff game with one extra score, folded into the
    /// winner's breakdown and returned as overtime points.
    pub fn break_tie(
        &self,
        home: &mut ScoreBreakdown,
        away: &mut ScoreBreakdown,
        rng: &mut SimRng,
    ) -> OvertimePoints {
        let home_wins = rng.chance(self.settings.playoff_home_tiebreak);
        let field_goal = rng.chance(self.settings.tiebreak_field_goal_chance);

        let winner = if home_wins { home } else { away };
        let points = if field_goal {
            winner.field_goals += 1;
            3
        } else {
            winner.touchdowns += 1;
            7
        };

        if home_wins {
            OvertimePoints { home: points, away: 0 }
        } else {
            OvertimePoints { home: 0, away: points }
        }
    }
}
