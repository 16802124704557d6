// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Stage Model
//
// Two independent crash signals feed one state machine:
//   * the scheduled ramp, driven purely by the calendar and the CrashSchedule
//   * a Bernoulli trial per tick against the resulting crash probability
// Crash is absorbing. Nothing in this module moves the stage out of it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::crash::CrashSchedule;
use crate::news;
use crate::rng::RandomSource;
use crate::types::{BubbleStage, MarketState, NewsItem};

/// Crash probability set when the warning fires.
pub const WARNING_PROBABILITY: f64 = 0.3;
/// Per-tick increase once the crash date has passed.
pub const RAMP_STEP: f64 = 0.1;
pub const MAX_CRASH_PROBABILITY: f64 = 0.95;
/// Scales crash probability into the per-tick trigger chance.
pub const TRIGGER_SCALE: f64 = 0.1;
/// Half-width of the per-tick sentiment jitter.
pub const SENTIMENT_JITTER: f64 = 0.05;

// ---------------------------------------------------------------------------
// Calendar ladder
// ---------------------------------------------------------------------------

/// Stage implied by the calendar alone.
///
/// Everything from March 2000 onward is `Decline` until the trigger fires,
/// whether or not the scheduled crash date has passed.
pub fn calendar_stage(date: NaiveDate) -> BubbleStage {
    let (year, month) = (date.year(), date.month());
    if year < 1999 {
        BubbleStage::Early
    } else if year == 1999 && month < 6 {
        BubbleStage::Growth
    } else if year == 1999 {
        BubbleStage::Mania
    } else if year == 2000 && month < 3 {
        BubbleStage::Peak
    } else {
        BubbleStage::Decline
    }
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Warning signal: fires once, on the first tick at or after the warning date.
pub fn apply_warning_signal(market: &mut MarketState, schedule: &CrashSchedule) -> Option<NewsItem> {
    if market.crash_warning_shown || market.date < schedule.warning_date {
        return None;
    }
    market.crash_warning_shown = true;
    market.crash_probability = WARNING_PROBABILITY;
    let item = news::bubble_warning(market.date);
    market.news.push(item.clone());
    tracing::info!(date = %market.date, "bubble warning issued");
    Some(item)
}

/// Scheduled ramp: past the crash date probability climbs and severity grows.
pub fn apply_scheduled_ramp(market: &mut MarketState, schedule: &CrashSchedule) {
    if market.date < schedule.crash_date {
        return;
    }
    market.crash_probability = (market.crash_probability + RAMP_STEP).min(MAX_CRASH_PROBABILITY);
    market.crash_severity = crash_severity(schedule.days_past_crash(market.date));
}

/// `min(0.5 + days/30 * 0.5, 1.0)`
pub fn crash_severity(days_past_crash: i64) -> f64 {
    (0.5 + days_past_crash as f64 / 30.0 * 0.5).min(1.0)
}

/// Bernoulli trial against the current crash probability. Draws only when the
/// probability is positive.
pub fn crash_trigger_fires(crash_probability: f64, rng: &mut dyn RandomSource) -> bool {
    crash_probability > 0.0 && rng.chance(crash_probability * TRIGGER_SCALE)
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageOutcome {
    pub previous: BubbleStage,
    pub stage: BubbleStage,
    pub warning_issued: bool,
    pub crash_triggered: bool,
    pub news: Vec<NewsItem>,
}

/// Runs one tick of the stage machine against `market.date`.
pub fn evaluate(
    market: &mut MarketState,
    schedule: &mut CrashSchedule,
    rng: &mut dyn RandomSource,
) -> StageOutcome {
    let previous = market.stage;
    let mut news = Vec::new();

    let warning = apply_warning_signal(market, schedule);
    let warning_issued = warning.is_some();
    news.extend(warning);

    apply_scheduled_ramp(market, schedule);

    let mut crash_triggered = false;
    if !market.stage.is_crash() && crash_trigger_fires(market.crash_probability, rng) {
        crash_triggered = true;
        market.stage = BubbleStage::Crash;
        market.volatility = BubbleStage::Crash.volatility();
        market.sentiment = BubbleStage::Crash.sentiment_baseline() + rng.uniform(0.0, 0.1);
        schedule.record_peak(market.index);
        let item = news::market_crash(market.date);
        market.news.push(item.clone());
        news.push(item);
        tracing::warn!(date = %market.date, index = market.index, "market crash triggered");
    } else if !market.stage.is_crash() {
        let stage = calendar_stage(market.date);
        market.stage = stage;
        market.volatility = stage.volatility();
        market.sentiment = jittered_sentiment(stage, rng);
    }

    if market.stage != previous {
        tracing::debug!(from = previous.label(), to = market.stage.label(), "stage transition");
    }

    StageOutcome { previous, stage: market.stage, warning_issued, crash_triggered, news }
}

fn jittered_sentiment(stage: BubbleStage, rng: &mut dyn RandomSource) -> f64 {
    (stage.sentiment_baseline() + rng.uniform(-SENTIMENT_JITTER, SENTIMENT_JITTER)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;
    use crate::types::NewsKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule() -> CrashSchedule {
        CrashSchedule {
            warning_date: date(2000, 1, 1),
            crash_date: date(2000, 3, 1),
            peak_index: None,
        }
    }

    fn market_at(d: NaiveDate) -> MarketState {
        MarketState {
            date: d,
            index: 1000.0,
            index_history: Vec::new(),
            stage: BubbleStage::Early,
            volatility: BubbleStage::Early.volatility(),
            sentiment: 0.6,
            news: Vec::new(),
            crash_warning_shown: false,
            crash_probability: 0.0,
            crash_severity: 0.0,
        }
    }

    #[test]
    fn test_calendar_ladder() {
        assert_eq!(calendar_stage(date(1998, 12, 31)), BubbleStage::Early);
        assert_eq!(calendar_stage(date(1999, 5, 31)), BubbleStage::Growth);
        assert_eq!(calendar_stage(date(1999, 6, 1)), BubbleStage::Mania);
        assert_eq!(calendar_stage(date(2000, 2, 29)), BubbleStage::Peak);
        assert_eq!(calendar_stage(date(2000, 3, 1)), BubbleStage::Decline);
    }

    #[test]
    fn test_post_ladder_window_defaults_to_decline() {
        // before and after a late crash date alike
        assert_eq!(calendar_stage(date(2001, 8, 1)), BubbleStage::Decline);
        assert_eq!(calendar_stage(date(2003, 6, 1)), BubbleStage::Decline);
    }

    #[test]
    fn test_early_stage_before_warning() {
        let mut s = schedule();
        let mut market = market_at(date(1998, 1, 2));
        let mut rng = ScriptedRandom::constant(0.5);
        let outcome = evaluate(&mut market, &mut s, &mut rng);
        assert_eq!(outcome.stage, BubbleStage::Early);
        assert!(!outcome.warning_issued);
        assert!(outcome.news.is_empty());
        assert!((market.sentiment - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_warning_fires_once() {
        let mut s = schedule();
        let mut market = market_at(date(2000, 1, 1));
        // never trigger: draws of 0.99 stay above 0.3 * 0.1
        let mut rng = ScriptedRandom::constant(0.99);

        let first = evaluate(&mut market, &mut s, &mut rng);
        assert!(first.warning_issued);
        assert_eq!(market.crash_probability, WARNING_PROBABILITY);
        assert_eq!(first.news[0].kind, NewsKind::BubbleWarning);

        market.date = date(2000, 1, 2);
        let second = evaluate(&mut market, &mut s, &mut rng);
        assert!(!second.warning_issued);
        assert_eq!(market.warnings_emitted(), 1);
    }

    #[test]
    fn test_ramp_caps_probability_and_grows_severity() {
        let s = schedule();
        let mut market = market_at(date(2000, 3, 1));
        market.crash_probability = 0.9;
        apply_scheduled_ramp(&mut market, &s);
        assert!((market.crash_probability - 0.95).abs() < 1e-12);
        assert!((market.crash_severity - 0.5).abs() < 1e-12);

        market.date = date(2000, 3, 16);
        apply_scheduled_ramp(&mut market, &s);
        assert!((market.crash_probability - 0.95).abs() < 1e-12);
        assert!((market.crash_severity - 0.75).abs() < 1e-12);

        market.date = date(2000, 6, 1);
        apply_scheduled_ramp(&mut market, &s);
        assert_eq!(market.crash_severity, 1.0);
    }

    #[test]
    fn test_ramp_inactive_before_crash_date() {
        let s = schedule();
        let mut market = market_at(date(2000, 2, 1));
        market.crash_probability = 0.3;
        apply_scheduled_ramp(&mut market, &s);
        assert_eq!(market.crash_probability, 0.3);
        assert_eq!(market.crash_severity, 0.0);
    }

    #[test]
    fn test_trigger_needs_positive_probability() {
        let mut rng = ScriptedRandom::constant(0.0);
        assert!(!crash_trigger_fires(0.0, &mut rng));
        assert_eq!(rng.draws(), 0);
        assert!(crash_trigger_fires(0.3, &mut rng));
        let mut high = ScriptedRandom::constant(0.03);
        assert!(!crash_trigger_fires(0.3, &mut high));
    }

    #[test]
    fn test_crash_captures_peak_and_is_absorbing() {
        let mut s = schedule();
        let mut market = market_at(date(2000, 1, 1));
        market.index = 4200.0;
        // 0.0 trips the trigger, then sentiment draw
        let mut rng = ScriptedRandom::constant(0.0);
        let outcome = evaluate(&mut market, &mut s, &mut rng);
        assert!(outcome.crash_triggered);
        assert_eq!(market.stage, BubbleStage::Crash);
        assert_eq!(market.volatility, 1.0);
        assert!((market.sentiment - 0.1).abs() < 1e-12);
        assert_eq!(s.peak_index, Some(4200.0));
        assert!(market.news.iter().any(|n| n.kind == NewsKind::MarketCrash));

        // later ticks in ladder territory stay crashed and emit no more crash news
        let mut quiet = ScriptedRandom::constant(0.99);
        for day in 2..20 {
            market.date = date(2000, 1, day);
            market.index = 900.0;
            let outcome = evaluate(&mut market, &mut s, &mut quiet);
            assert_eq!(outcome.stage, BubbleStage::Crash);
            assert!(!outcome.crash_triggered);
        }
        assert_eq!(s.peak_index, Some(4200.0));
        let crashes = market.news.iter().filter(|n| n.kind == NewsKind::MarketCrash).count();
        assert_eq!(crashes, 1);
    }

    #[test]
    fn test_severity_formula() {
        assert_eq!(crash_severity(0), 0.5);
        assert!((crash_severity(15) - 0.75).abs() < 1e-12);
        assert_eq!(crash_severity(30), 1.0);
        assert_eq!(crash_severity(365), 1.0);
    }
}
