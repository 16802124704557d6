// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Type Definitions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Bubble Stage ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BubbleStage {
    Early = 0,
    Growth = 1,
    Mania = 2,
    Peak = 3,
    Decline = 4,
    Crash = 5, // absorbing: never left once entered
}

impl Default for BubbleStage {
    fn default() -> Self { BubbleStage::Early }
}

impl BubbleStage {
    pub const ALL: [BubbleStage; 6] = [
        Self::Early,
        Self::Growth,
        Self::Mania,
        Self::Peak,
        Self::Decline,
        Self::Crash,
    ];

    /// Market-wide volatility while in this stage.
    pub fn volatility(&self) -> f64 {
        match self {
            Self::Early => 0.20,
            Self::Growth => 0.35,
            Self::Mania => 0.60,
            Self::Peak => 0.80,
            Self::Decline => 0.70,
            Self::Crash => 1.00,
        }
    }

    /// Sentiment baseline (0-1) before per-tick jitter.
    pub fn sentiment_baseline(&self) -> f64 {
        match self {
            Self::Early => 0.60,
            Self::Growth => 0.70,
            Self::Mania => 0.90,
            Self::Peak => 0.80,
            Self::Decline => 0.40,
            Self::Crash => 0.10,
        }
    }

    /// Interval the per-tick index change is drawn from.
    pub fn index_change_range(&self) -> (f64, f64) {
        match self {
            Self::Early => (-0.010, 0.020),
            Self::Growth => (-0.015, 0.040),
            Self::Mania => (-0.020, 0.080),
            Self::Peak => (-0.040, 0.050),
            Self::Decline => (-0.060, 0.020),
            Self::Crash => (-0.150, 0.010),
        }
    }

    pub fn is_crash(&self) -> bool {
        matches!(self, Self::Crash)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Growth => "growth",
            Self::Mania => "mania",
            Self::Peak => "peak",
            Self::Decline => "decline",
            Self::Crash => "crash",
        }
    }
}

// ─── Volatility Tier ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityTier {
    Low = 0,
    Medium = 1,
    High = 2,
    Extreme = 3,
}

impl VolatilityTier {
    /// Multiplier applied to a stock's random price perturbation.
    pub fn factor(&self) -> f64 {
        match self {
            Self::Low => 0.5,
            Self::Medium => 1.0,
            Self::High => 2.0,
            Self::Extreme => 3.5,
        }
    }
}

// ─── Survival Tier ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalTier {
    VeryLow = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    VeryHigh = 4,
}

impl SurvivalTier {
    /// Share of the crash penalty a stock shrugs off.
    pub fn factor(&self) -> f64 {
        match self {
            Self::VeryLow => 0.2,
            Self::Low => 0.4,
            Self::Medium => 0.6,
            Self::High => 0.8,
            Self::VeryHigh => 0.95,
        }
    }
}

// ─── History points ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IndexPoint {
    pub date: NaiveDate,
    pub value: f64,
}

// ─── Stock ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub category: String,
    pub initial_price: f64,
    pub peak_price: f64,
    pub volatility: VolatilityTier,
    pub survival_chance: SurvivalTier,
    pub price: f64,
    pub history: Vec<PricePoint>,
}

impl Stock {
    /// Percent move from the listing price.
    pub fn change_since_listing(&self) -> f64 {
        if self.initial_price > 0.0 {
            (self.price / self.initial_price - 1.0) * 100.0
        } else {
            0.0
        }
    }
}

// ─── News ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NewsKind {
    Welcome,
    Headline,
    BubbleWarning,
    MarketCrash,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub date: NaiveDate,
    pub headline: String,
    pub body: String,
    pub kind: NewsKind,
}

// ─── MarketState ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketState {
    pub date: NaiveDate,
    pub index: f64,
    pub index_history: Vec<IndexPoint>,
    pub stage: BubbleStage,
    pub volatility: f64,
    pub sentiment: f64,
    pub news: Vec<NewsItem>,
    pub crash_warning_shown: bool,
    pub crash_probability: f64,
    pub crash_severity: f64,
}

impl MarketState {
    pub fn warnings_emitted(&self) -> usize {
        self.news.iter().filter(|n| n.kind == NewsKind::BubbleWarning).count()
    }
}

// ─── Game speed ─────────────────────────────────────────────────────────────

/// Timer presets the front-end can pick from. No arbitrary intervals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameSpeed {
    Slow = 0,
    Normal = 1,
    Fast = 2,
    Turbo = 3,
}

impl Default for GameSpeed {
    fn default() -> Self { GameSpeed::Normal }
}

impl GameSpeed {
    pub fn interval_ms(&self) -> u64 {
        match self {
            Self::Slow => 2000,
            Self::Normal => 1000,
            Self::Fast => 500,
            Self::Turbo => 250,
        }
    }

    pub fn from_preset(preset: u8) -> Option<Self> {
        match preset {
            0 => Some(Self::Slow),
            1 => Some(Self::Normal),
            2 => Some(Self::Fast),
            3 => Some(Self::Turbo),
            _ => None,
        }
    }
}

// ─── TickResult ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    pub date: NaiveDate,
    pub stage: BubbleStage,
    pub previous_stage: BubbleStage,
    pub index: f64,
    pub previous_index: f64,
    pub sentiment: f64,
    pub crash_probability: f64,
    pub crash_severity: f64,
    pub news: Vec<NewsItem>,
    pub stock_updates: Vec<StockUpdate>,
    pub game_over: bool,
}

impl TickResult {
    pub fn stage_changed(&self) -> bool {
        self.stage != self.previous_stage
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockUpdate {
    pub id: String,
    pub price: f64,
    pub change: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mania_range_matches_reference() {
        assert_eq!(BubbleStage::Mania.index_change_range(), (-0.02, 0.08));
    }

    #[test]
    fn test_stage_serializes_lowercase() {
        let json = serde_json::to_string(&BubbleStage::Decline).unwrap();
        assert_eq!(json, "\"decline\"");
        let back: BubbleStage = serde_json::from_str("\"crash\"").unwrap();
        assert_eq!(back, BubbleStage::Crash);
    }

    #[test]
    fn test_tier_factors() {
        assert_eq!(VolatilityTier::Low.factor(), 0.5);
        assert_eq!(VolatilityTier::Extreme.factor(), 3.5);
        assert_eq!(SurvivalTier::VeryLow.factor(), 0.2);
        assert_eq!(SurvivalTier::VeryHigh.factor(), 0.95);
    }

    #[test]
    fn test_sentiment_baselines_in_unit_interval() {
        for stage in BubbleStage::ALL {
            let s = stage.sentiment_baseline();
            assert!((0.0..=1.0).contains(&s), "{:?} baseline {}", stage, s);
            let (lo, hi) = stage.index_change_range();
            assert!(lo < hi);
        }
    }

    #[test]
    fn test_speed_presets() {
        assert_eq!(GameSpeed::from_preset(0), Some(GameSpeed::Slow));
        assert_eq!(GameSpeed::from_preset(3).map(|s| s.interval_ms()), Some(250));
        assert_eq!(GameSpeed::from_preset(4), None);
        assert_eq!(GameSpeed::default().interval_ms(), 1000);
    }
}
