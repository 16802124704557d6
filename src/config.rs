// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Configuration

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::GameSpeed;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("start month must be in 1..=12, got {0}")]
    InvalidMonth(u32),

    #[error("start year {0} is outside the supported range {min}..={max}", min = MIN_YEAR, max = MAX_YEAR)]
    YearOutOfRange(i32),

    #[error("crash year {0} is outside the supported range {min}..={max}", min = MIN_YEAR, max = MAX_YEAR)]
    CrashYearOutOfRange(i32),

    #[error("crash randomness must be within [0, 1], got {0}")]
    InvalidRandomness(f64),

    #[error("volatility multiplier must be positive and finite, got {0}")]
    InvalidVolatility(f64),

    #[error("initial cash cannot be negative, got {0}")]
    NegativeCash(Decimal),

    #[error("initial index must be at least {floor}, got {0}", floor = crate::market::INDEX_FLOOR)]
    IndexBelowFloor(f64),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

const MIN_YEAR: i32 = 1995;
const MAX_YEAR: i32 = 2010;

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

/// Everything needed to (re)build a game. Missing JSON fields take defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub start_year: i32,
    pub start_month: u32,
    /// Pins the crash to this year instead of the 2000 reference point.
    pub crash_year: Option<i32>,
    /// Probability (0-1) that the crash is pushed into 2002-2004.
    pub crash_randomness: f64,
    /// Scales both index and stock perturbations.
    pub volatility_multiplier: f64,
    pub initial_cash: Decimal,
    pub initial_index: f64,
    pub speed: GameSpeed,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_year: 1998,
            start_month: 1,
            crash_year: None,
            crash_randomness: 0.0,
            volatility_multiplier: 1.0,
            initial_cash: dec!(10000),
            initial_index: 1000.0,
            speed: GameSpeed::Normal,
        }
    }
}

impl SimulationConfig {
    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.start_year) {
            return Err(ConfigError::YearOutOfRange(self.start_year));
        }
        if let Some(year) = self.crash_year {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(ConfigError::CrashYearOutOfRange(year));
            }
        }
        if !(0.0..=1.0).contains(&self.crash_randomness) {
            return Err(ConfigError::InvalidRandomness(self.crash_randomness));
        }
        if !self.volatility_multiplier.is_finite() || self.volatility_multiplier <= 0.0 {
            return Err(ConfigError::InvalidVolatility(self.volatility_multiplier));
        }
        if self.initial_cash < Decimal::ZERO {
            return Err(ConfigError::NegativeCash(self.initial_cash));
        }
        if !(self.initial_index >= crate::market::INDEX_FLOOR) {
            return Err(ConfigError::IndexBelowFloor(self.initial_index));
        }
        self.start_date().map(|_| ())
    }

    /// First day of the configured start month.
    pub fn start_date(&self) -> Result<NaiveDate, ConfigError> {
        NaiveDate::from_ymd_opt(self.start_year, self.start_month, 1)
            .ok_or(ConfigError::InvalidMonth(self.start_month))
    }
}
