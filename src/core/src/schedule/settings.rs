use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Tunables of the regular-season builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Season the division rotations are counted from
    pub base_year: u16,
    pub games_per_team: u8,
    pub regular_season_weeks: u8,
    pub bye_window_start: u8,
    pub bye_window_end: u8,
    pub max_byes_per_week: u8,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        ScheduleSettings {
            base_year: 2002,
            games_per_team: 17,
            regular_season_weeks: 18,
            bye_window_start: 5,
            bye_window_end: 14,
            max_byes_per_week: 4,
        }
    }
}

impl ScheduleSettings {
    /// Bye window clamped into the regular season
    pub fn bye_window(&self) -> RangeInclusive<u8> {
        let last = self.bye_window_end.clamp(1, self.regular_season_weeks.max(1));
        let first = self.bye_window_start.clamp(1, last);

        first..=last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        assert_eq!(ScheduleSettings::default().bye_window(), 5..=14);
    }

    #[test]
    fn test_window_is_clamped() {
        let settings = ScheduleSettings {
            bye_window_start: 0,
            bye_window_end: 30,
            ..ScheduleSettings::default()
        };
        assert_eq!(settings.bye_window(), 1..=18);

        let inverted = ScheduleSettings {
            bye_window_start: 12,
            bye_window_end: 6,
            ..ScheduleSettings::default()
        };
        assert_eq!(inverted.bye_window(), 6..=6);
    }
}
