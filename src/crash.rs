// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Crash Scheduler
//
// The warning and crash dates are fixed once per game. The stage model only
// reads them; the peak index is written once, on the first crash tick.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::rng::RandomSource;

/// Historical reference point: March 2000.
pub const REFERENCE_CRASH_YEAR: i32 = 2000;
pub const REFERENCE_CRASH_MONTH: u32 = 3;

/// Years a randomized crash can land in.
pub const LATE_CRASH_YEARS: (u32, u32) = (2002, 2004);

/// The crash never lands closer than this to the game start.
const MIN_LEAD_MONTHS: i32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrashSchedule {
    pub warning_date: NaiveDate,
    pub crash_date: NaiveDate,
    /// Index value captured on the tick the crash fires.
    pub peak_index: Option<f64>,
}

impl CrashSchedule {
    /// Whole months between warning and crash.
    pub fn lead_months(&self) -> i32 {
        month_ordinal(self.crash_date) - month_ordinal(self.warning_date)
    }

    /// Days elapsed since the crash date (0 before it).
    pub fn days_past_crash(&self, date: NaiveDate) -> i64 {
        (date - self.crash_date).num_days().max(0)
    }

    /// Records the pre-crash index. Only the first call sticks.
    pub fn record_peak(&mut self, index: f64) -> bool {
        if self.peak_index.is_some() {
            return false;
        }
        self.peak_index = Some(index);
        true
    }
}

/// Picks the warning and crash dates for a new game.
///
/// A configured `crash_year` only replaces the 2000 default; a successful
/// randomness roll always draws the year from `LATE_CRASH_YEARS`.
///
/// Unlike the plain historical formula, the crash is pushed to at least
/// `MIN_LEAD_MONTHS` after the game start. Games starting after late 1999
/// therefore get a later crash than the reference date.
pub fn determine_crash_timing(config: &SimulationConfig, rng: &mut dyn RandomSource) -> CrashSchedule {
    let mut year = config.crash_year.unwrap_or(REFERENCE_CRASH_YEAR);
    let mut month = REFERENCE_CRASH_MONTH;

    if rng.chance(config.crash_randomness) {
        year = rng.pick(LATE_CRASH_YEARS.0, LATE_CRASH_YEARS.1) as i32;
        month = rng.pick(1, 12);
    }

    let start = month_ordinal(month_start(config.start_year, config.start_month));
    let crash = month_ordinal(month_start(year, month)).max(start + MIN_LEAD_MONTHS);
    let lead = rng.pick(1, 3) as i32;

    let schedule = CrashSchedule {
        warning_date: from_ordinal(crash - lead),
        crash_date: from_ordinal(crash),
        peak_index: None,
    };
    tracing::debug!(
        warning = %schedule.warning_date,
        crash = %schedule.crash_date,
        "crash scheduled"
    );
    schedule
}

// ─── Month arithmetic ───────────────────────────────────────────────────────

fn month_start(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month.clamp(1, 12), 1).unwrap_or(NaiveDate::MIN)
}

/// Months since year 0, so subtraction wraps year boundaries for free.
fn month_ordinal(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

fn from_ordinal(ordinal: i32) -> NaiveDate {
    month_start(ordinal.div_euclid(12), ordinal.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRandom, SeededRandom};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reference_crash_without_randomness() {
        let config = SimulationConfig::default();
        // randomness 0.0 never succeeds; 0.0 picks a 1-month lead
        let mut rng = ScriptedRandom::constant(0.0);
        let schedule = determine_crash_timing(&config, &mut rng);
        assert_eq!(schedule.crash_date, date(2000, 3, 1));
        assert_eq!(schedule.warning_date, date(2000, 2, 1));
        assert_eq!(schedule.peak_index, None);
    }

    #[test]
    fn test_randomized_crash_lands_late() {
        let config = SimulationConfig { crash_randomness: 1.0, ..Default::default() };
        // chance, year pick (high), month pick (low), lead pick (high)
        let mut rng = ScriptedRandom::new(vec![0.0, 0.99, 0.0, 0.99]);
        let schedule = determine_crash_timing(&config, &mut rng);
        assert_eq!(schedule.crash_date, date(2004, 1, 1));
        // 3-month lead wraps into the previous year
        assert_eq!(schedule.warning_date, date(2003, 10, 1));
        assert_eq!(schedule.lead_months(), 3);
    }

    #[test]
    fn test_fixed_crash_year_replaces_default() {
        let config = SimulationConfig { crash_year: Some(2001), ..Default::default() };
        let mut rng = ScriptedRandom::constant(0.0);
        let schedule = determine_crash_timing(&config, &mut rng);
        assert_eq!(schedule.crash_date, date(2001, 3, 1));
    }

    #[test]
    fn test_randomized_year_overrides_fixed_year() {
        let config = SimulationConfig { crash_year: Some(2001), crash_randomness: 1.0, ..Default::default() };
        // chance, year pick (mid), month pick (low), lead pick (low)
        let mut rng = ScriptedRandom::new(vec![0.0, 0.5, 0.0, 0.0]);
        let schedule = determine_crash_timing(&config, &mut rng);
        assert_eq!(schedule.crash_date, date(2003, 1, 1));
        assert_eq!(schedule.warning_date, date(2002, 12, 1));
    }

    #[test]
    fn test_crash_pushed_past_late_start() {
        let config = SimulationConfig { start_year: 2001, start_month: 6, ..Default::default() };
        let mut rng = ScriptedRandom::constant(0.0);
        let schedule = determine_crash_timing(&config, &mut rng);
        assert_eq!(schedule.crash_date, date(2001, 10, 1));
        assert!(schedule.warning_date > date(2001, 6, 1));
    }

    #[test]
    fn test_warning_always_one_to_three_months_ahead() {
        let config = SimulationConfig { crash_randomness: 0.5, ..Default::default() };
        for seed in 0..200 {
            let mut rng = SeededRandom::new(seed);
            let schedule = determine_crash_timing(&config, &mut rng);
            let lead = schedule.lead_months();
            assert!((1..=3).contains(&lead), "seed {} lead {}", seed, lead);
            assert!(schedule.warning_date < schedule.crash_date);
            let year = schedule.crash_date.year();
            assert!(year == 2000 || (2002..=2004).contains(&year), "seed {} year {}", seed, year);
        }
    }

    #[test]
    fn test_days_past_crash() {
        let schedule = CrashSchedule {
            warning_date: date(2000, 1, 1),
            crash_date: date(2000, 3, 1),
            peak_index: None,
        };
        assert_eq!(schedule.days_past_crash(date(2000, 2, 15)), 0);
        assert_eq!(schedule.days_past_crash(date(2000, 3, 31)), 30);
    }

    #[test]
    fn test_peak_recorded_once() {
        let mut schedule = CrashSchedule {
            warning_date: date(2000, 1, 1),
            crash_date: date(2000, 3, 1),
            peak_index: None,
        };
        assert!(schedule.record_peak(5000.0));
        assert!(!schedule.record_peak(100.0));
        assert_eq!(schedule.peak_index, Some(5000.0));
    }
}
