use crate::r#match::TeamStats;
use crate::shared::SimRng;

const YARDS_PER_POINT: f64 = 13.0;
const BASE_YARDS: f64 = 80.0;
const MIN_YARDS: f64 = 150.0;
const TURNOVER_CHANCES: u32 = 5;
const SACK_CHANCES: u32 = 6;
const GAME_SECONDS: u16 = 3600;

/// What one side brings into the box score
#[derive(Debug, Clone, Copy)]
pub struct SideOutlook {
    pub points: u16,
    pub opponent_points: u16,
    pub power: f64,
    pub opponent_power: f64,
    /// Share of passes caught, set by the quarterback
    pub completion_rate: f64,
}

pub struct TeamStatsModel;

impl TeamStatsModel {
    pub fn build(side: &SideOutlook, rng: &mut SimRng) -> TeamStats {
        let total_yards = (side.points as f64 * YARDS_PER_POINT * rng.range_f64(0.85, 1.15) + BASE_YARDS)
            .max(MIN_YARDS)
            .round() as u16;

        // leading teams run the clock, trailing teams throw
        let margin = side.points as f64 - side.opponent_points as f64;
        let script = (margin.abs() * 0.01).min(0.15) * margin.signum();
        let rush_share = (0.42 + script).clamp(0.25, 0.60);

        let rushing_yards = (total_yards as f64 * rush_share).round() as u16;
        let passing_yards = total_yards - rushing_yards;

        let pass_attempts = ((passing_yards as f64 / rng.range_f64(5.5, 7.5)).round() as u16).max(10);
        let mut completions = (pass_attempts as f64 * side.completion_rate).round() as u16;
        if passing_yards > 0 {
            completions = completions.clamp(1, pass_attempts);
        }
        let rush_attempts = ((rushing_yards as f64 / rng.range_f64(3.6, 4.8)).round() as u16).max(12);

        let turnover_rate = (1.4 - (side.power - 50.0) * 0.02).clamp(0.3, 2.5) / TURNOVER_CHANCES as f64;
        let mut interceptions_thrown = 0;
        let mut fumbles_lost = 0;
        for _ in 0..TURNOVER_CHANCES {
            if rng.chance(turnover_rate) {
                if rng.chance(0.55) {
                    interceptions_thrown += 1;
                } else {
                    fumbles_lost += 1;
                }
            }
        }

        let sack_rate = (0.38 + (side.opponent_power - side.power) * 0.01).clamp(0.1, 0.7);
        let sacks_allowed = (0..SACK_CHANCES).filter(|_| rng.chance(sack_rate)).count() as u8;

        let third_down_attempts = rng.range_i32(10, 16) as u16;
        let third_down_rate = (0.38 + (side.power - 50.0) * 0.004).clamp(0.2, 0.6);
        let third_down_conversions = (0..third_down_attempts)
            .filter(|_| rng.chance(third_down_rate))
            .count() as u16;

        let first_downs = (total_yards as f64 / 16.0 + rng.range_f64(-2.0, 2.0))
            .max(third_down_conversions as f64)
            .round() as u16;

        let penalties = rng.range_i32(3, 9) as u8;
        let penalty_yards = (0..penalties)
            .map(|_| [5u16, 5, 10, 10, 15][rng.index(5)])
            .sum();

        TeamStats {
            total_yards,
            passing_yards,
            rushing_yards,
            pass_attempts,
            completions,
            rush_attempts,
            first_downs,
            third_down_attempts,
            third_down_conversions,
            turnovers: interceptions_thrown + fumbles_lost,
            interceptions_thrown,
            fumbles_lost,
            sacks_allowed,
            penalties,
            penalty_yards,
            time_of_possession: 0,
        }
    }

    /// Hands the 60 minutes out, favouring the side that ran more
    pub fn split_possession(home: &mut TeamStats, away: &mut TeamStats, rng: &mut SimRng) {
        let run_edge = home.rush_attempts as f64 - away.rush_attempts as f64;
        let share = (0.5 + run_edge * 0.006 + rng.range_f64(-0.03, 0.03)).clamp(0.35, 0.65);

        home.time_of_possession = (GAME_SECONDS as f64 * share).round() as u16;
        away.time_of_possession = GAME_SECONDS - home.time_of_possession;
    }

    /// Drops the passing game when nobody can throw or catch, and the running
    /// game when nobody can carry.
    pub fn restrict_to_personnel(stats: &mut TeamStats, can_pass: bool, can_rush: bool) {
        if !can_pass {
            stats.passing_yards = 0;
            stats.pass_attempts = 0;
            stats.completions = 0;
            stats.turnovers -= stats.interceptions_thrown;
            stats.interceptions_thrown = 0;
            stats.sacks_allowed = 0;
        }

        if !can_rush {
            stats.rushing_yards = 0;
            stats.rush_attempts = 0;
        }

        stats.total_yards = stats.passing_yards + stats.rushing_yards;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outlook(points: u16, opponent_points: u16, power: f64) -> SideOutlook {
        SideOutlook {
            points,
            opponent_points,
            power,
            opponent_power: 50.0,
            completion_rate: 0.62,
        }
    }

    #[test]
    fn test_yards_add_up() {
        let mut rng = SimRng::seed_from(5);

        for points in [0, 10, 24, 45] {
            let stats = TeamStatsModel::build(&outlook(points, 17, 50.0), &mut rng);

            assert_eq!(stats.total_yards, stats.passing_yards + stats.rushing_yards);
            assert!(stats.total_yards >= 150);
            assert_eq!(stats.turnovers, stats.interceptions_thrown + stats.fumbles_lost);
            assert!(stats.third_down_conversions <= stats.third_down_attempts);
            assert!(stats.completions <= stats.pass_attempts);
            assert!(stats.sacks_allowed <= 6);
        }
    }

    #[test]
    fn test_strong_teams_turn_it_over_less() {
        let mut rng = SimRng::seed_from(17);
        let mut strong = 0u32;
        let mut weak = 0u32;

        for _ in 0..400 {
            strong += TeamStatsModel::build(&outlook(24, 20, 85.0), &mut rng).turnovers as u32;
            weak += TeamStatsModel::build(&outlook(24, 20, 30.0), &mut rng).turnovers as u32;
        }

        assert!(strong < weak, "strong {} weak {}", strong, weak);
    }

    #[test]
    fn test_possession_fills_the_game() {
        let mut rng = SimRng::seed_from(2);
        let mut home = TeamStatsModel::build(&outlook(31, 10, 60.0), &mut rng);
        let mut away = TeamStatsModel::build(&outlook(10, 31, 40.0), &mut rng);

        TeamStatsModel::split_possession(&mut home, &mut away, &mut rng);

        assert_eq!(home.time_of_possession + away.time_of_possession, 3600);
    }

    #[test]
    fn test_restrict_without_receivers() {
        let mut rng = SimRng::seed_from(9);
        let mut stats = TeamStatsModel::build(&outlook(21, 14, 50.0), &mut rng);
        let rushing = stats.rushing_yards;

        TeamStatsModel::restrict_to_personnel(&mut stats, false, true);

        assert_eq!(stats.passing_yards, 0);
        assert_eq!(stats.completions, 0);
        assert_eq!(stats.interceptions_thrown, 0);
        assert_eq!(stats.total_yards, rushing);
        assert_eq!(stats.turnovers, stats.fumbles_lost);
    }
}
