use crate::calendar::SeasonPhase;
use crate::error::{SimulationError, SimulationResult};
use crate::league::PlayoffRound;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Outcome of a calendar tick, consumed by the orchestrator to trigger
/// schedule and bracket generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub advanced: bool,
    pub year_changed: bool,
    pub phase_changed: bool,
    pub new_phase: SeasonPhase,
}

impl PhaseTransition {
    fn blocked(phase: SeasonPhase) -> Self {
        PhaseTransition {
            advanced: false,
            year_changed: false,
            phase_changed: false,
            new_phase: phase,
        }
    }
}

/// Hook deciding whether the calendar may move forward this tick.
pub trait AdvanceGate {
    fn can_advance(&self, calendar: &SeasonCalendar) -> bool;
}

/// Gate used by `advance_week`; never blocks.
pub struct OpenGate;

impl AdvanceGate for OpenGate {
    fn can_advance(&self, _calendar: &SeasonCalendar) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCalendar {
    year: u16,
    phase: SeasonPhase,
    week_in_phase: u8,
}

impl SeasonCalendar {
    /// Calendar positioned at the first week of the cycle for `year`
    pub fn new(year: u16) -> Self {
        SeasonCalendar {
            year,
            phase: SeasonPhase::FIRST,
            week_in_phase: 1,
        }
    }

    pub fn at(year: u16, phase: SeasonPhase, week_in_phase: u8) -> SimulationResult<Self> {
        if week_in_phase == 0 || week_in_phase > phase.duration_weeks() {
            return Err(SimulationError::InvalidCalendar {
                phase: phase.to_string(),
                week: week_in_phase,
                duration: phase.duration_weeks(),
            });
        }

        Ok(SeasonCalendar {
            year,
            phase,
            week_in_phase,
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn phase(&self) -> SeasonPhase {
        self.phase
    }

    pub fn week_in_phase(&self) -> u8 {
        self.week_in_phase
    }

    pub fn can_advance(&self) -> bool {
        OpenGate.can_advance(self)
    }

    pub fn advance_week(&mut self) -> PhaseTransition {
        self.advance_week_with(&OpenGate)
    }

    pub fn advance_week_with(&mut self, gate: &dyn AdvanceGate) -> PhaseTransition {
        if !gate.can_advance(self) {
            debug!("calendar advance blocked at {} week {}", self.phase, self.week_in_phase);
            return PhaseTransition::blocked(self.phase);
        }

        self.week_in_phase += 1;

        if self.week_in_phase > self.phase.duration_weeks() {
            return self.advance_to_next_phase();
        }

        PhaseTransition {
            advanced: true,
            year_changed: false,
            phase_changed: false,
            new_phase: self.phase,
        }
    }

    pub fn advance_to_next_phase(&mut self) -> PhaseTransition {
        let year_changed = self.phase.is_last();

        if year_changed {
            self.year += 1;
        }

        self.phase = self.phase.next();
        self.week_in_phase = 1;

        info!("📅 {} {} begins", self.year, self.phase);

        PhaseTransition {
            advanced: true,
            year_changed,
            phase_changed: true,
            new_phase: self.phase,
        }
    }

    /// Year-relative week counter, 1..=`SeasonPhase::season_length()`
    pub fn absolute_week(&self) -> u16 {
        self.phase.weeks_before() + self.week_in_phase as u16
    }

    pub fn regular_season_week(&self) -> Option<u8> {
        match self.phase {
            SeasonPhase::RegularSeason => Some(self.week_in_phase),
            _ => None,
        }
    }

    /// Bracket round played this week; the fourth playoff week is an off week
    pub fn playoff_round(&self) -> Option<PlayoffRound> {
        match (self.phase, self.week_in_phase) {
            (SeasonPhase::Playoffs, 1) => Some(PlayoffRound::WildCard),
            (SeasonPhase::Playoffs, 2) => Some(PlayoffRound::Divisional),
            (SeasonPhase::Playoffs, 3) => Some(PlayoffRound::ConferenceChampionship),
            (SeasonPhase::SuperBowl, 1) => Some(PlayoffRound::SuperBowl),
            _ => None,
        }
    }

    /// Nominal start date of the current week: the first Monday of February
    /// plus one week per elapsed absolute week.
    pub fn week_start_date(&self) -> Option<NaiveDate> {
        let february = NaiveDate::from_ymd_opt(self.year as i32, 2, 1)?;

        let to_monday = (7 - february.weekday().num_days_from_monday()) % 7;
        let anchor = february.checked_add_days(Days::new(to_monday as u64))?;

        debug_assert_eq!(anchor.weekday(), Weekday::Mon);

        anchor.checked_add_days(Days::new((self.absolute_week() as u64 - 1) * 7))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_within_phase() {
        let mut calendar = SeasonCalendar::new(2026);

        let transition = calendar.advance_week();

        assert!(transition.advanced);
        assert!(!transition.phase_changed);
        assert_eq!(calendar.phase(), SeasonPhase::PostSeason);
        assert_eq!(calendar.week_in_phase(), 2);
    }

    #[test]
    fn test_two_weeks_leave_post_season() {
        let mut calendar = SeasonCalendar::at(2026, SeasonPhase::PostSeason, 1).unwrap();

        calendar.advance_week();
        let transition = calendar.advance_week();

        assert!(transition.advanced);
        assert!(transition.phase_changed);
        assert!(!transition.year_changed);
        assert_eq!(transition.new_phase, SeasonPhase::CombineScouting);
        assert_eq!(calendar.year(), 2026);
        assert_eq!(calendar.phase(), SeasonPhase::CombineScouting);
        assert_eq!(calendar.week_in_phase(), 1);
    }

    #[test]
    fn test_super_bowl_wraps_year() {
        let mut calendar = SeasonCalendar::at(2026, SeasonPhase::SuperBowl, 1).unwrap();

        let transition = calendar.advance_week();

        assert!(transition.year_changed);
        assert_eq!(transition.new_phase, SeasonPhase::PostSeason);
        assert_eq!(calendar.year(), 2027);
        assert_eq!(calendar.week_in_phase(), 1);
    }

    #[test]
    fn test_full_cycle_takes_season_length_ticks() {
        let mut calendar = SeasonCalendar::new(2026);
        let mut ticks = 0;

        loop {
            ticks += 1;
            if calendar.advance_week().year_changed {
                break;
            }
        }

        assert_eq!(ticks, SeasonPhase::season_length());
        assert_eq!(ticks, 41);
        assert_eq!(calendar, SeasonCalendar::new(2027));
    }

    #[test]
    fn test_absolute_week() {
        assert_eq!(SeasonCalendar::new(2026).absolute_week(), 1);

        let regular = SeasonCalendar::at(2026, SeasonPhase::RegularSeason, 1).unwrap();
        assert_eq!(regular.absolute_week(), 19);

        let super_bowl = SeasonCalendar::at(2026, SeasonPhase::SuperBowl, 1).unwrap();
        assert_eq!(super_bowl.absolute_week(), 41);
    }

    #[test]
    fn test_skip_to_next_phase_resets_week() {
        let mut calendar = SeasonCalendar::at(2026, SeasonPhase::FreeAgency, 3).unwrap();

        let transition = calendar.advance_to_next_phase();

        assert_eq!(transition.new_phase, SeasonPhase::PreDraft);
        assert_eq!(calendar.week_in_phase(), 1);
    }

    #[test]
    fn test_invalid_week_rejected() {
        assert!(SeasonCalendar::at(2026, SeasonPhase::Draft, 2).is_err());
        assert!(SeasonCalendar::at(2026, SeasonPhase::Draft, 0).is_err());
    }

    struct ClosedGate;

    impl AdvanceGate for ClosedGate {
        fn can_advance(&self, _calendar: &SeasonCalendar) -> bool {
            false
        }
    }

    #[test]
    fn test_blocked_gate_keeps_state() {
        let mut calendar = SeasonCalendar::at(2026, SeasonPhase::Draft, 1).unwrap();

        let transition = calendar.advance_week_with(&ClosedGate);

        assert!(!transition.advanced);
        assert_eq!(transition.new_phase, SeasonPhase::Draft);
        assert_eq!(calendar.phase(), SeasonPhase::Draft);
        assert!(calendar.can_advance());
    }

    #[test]
    fn test_playoff_round_mapping() {
        let wild_card = SeasonCalendar::at(2026, SeasonPhase::Playoffs, 1).unwrap();
        assert_eq!(wild_card.playoff_round(), Some(PlayoffRound::WildCard));

        let off_week = SeasonCalendar::at(2026, SeasonPhase::Playoffs, 4).unwrap();
        assert_eq!(off_week.playoff_round(), None);

        let final_week = SeasonCalendar::at(2026, SeasonPhase::SuperBowl, 1).unwrap();
        assert_eq!(final_week.playoff_round(), Some(PlayoffRound::SuperBowl));

        assert_eq!(
            SeasonCalendar::at(2026, SeasonPhase::RegularSeason, 7).unwrap().regular_season_week(),
            Some(7)
        );
    }

    #[test]
    fn test_week_start_date_is_monday() {
        let calendar = SeasonCalendar::at(2026, SeasonPhase::RegularSeason, 1).unwrap();
        let date = calendar.week_start_date().unwrap();

        assert_eq!(date.weekday(), Weekday::Mon);
        // 2026-02-02 is the first Monday of February; week 19 is 18 weeks later
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 6, 8).unwrap());
    }
}
