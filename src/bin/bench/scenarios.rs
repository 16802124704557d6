// Scenario Definitions
// Every scenario is a config override; the engine is never patched.

use bubble_engine::SimulationConfig;
use rust_decimal_macros::dec;

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: String,
    pub label: String,
    pub ticks: u64,
    pub config: SimulationConfig,
}

impl Scenario {
    /// A single scenario loaded from `--config`.
    pub fn custom(config: SimulationConfig, ticks: u64) -> Self {
        Self {
            name: "CUSTOM".to_string(),
            label: "Custom config".to_string(),
            ticks,
            config,
        }
    }
}

fn scenario(name: &str, label: &str, ticks: u64, config: SimulationConfig) -> Scenario {
    Scenario { name: name.to_string(), label: label.to_string(), ticks, config }
}

// ─── Scenario Registry ──────────────────────────────────────────────────────

/// `ticks` overrides the default horizon when given.
pub fn scenarios(ticks: Option<u64>) -> Vec<Scenario> {
    // Jan 1998 to the end of 2004.
    let full = ticks.unwrap_or(2557);
    vec![
        scenario("BASELINE", "Historical timing (Mar 2000)", full, SimulationConfig::default()),
        scenario(
            "LATE_START",
            "Start in Jan 1999",
            full,
            SimulationConfig { start_year: 1999, ..Default::default() },
        ),
        scenario(
            "FIXED_2001",
            "Crash pinned to 2001",
            full,
            SimulationConfig { crash_year: Some(2001), ..Default::default() },
        ),
        scenario(
            "RANDOM_TIMING",
            "Randomized crash timing",
            full,
            SimulationConfig { crash_randomness: 1.0, ..Default::default() },
        ),
        scenario(
            "HIGH_VOLATILITY",
            "Volatility x2.5",
            full,
            SimulationConfig { volatility_multiplier: 2.5, ..Default::default() },
        ),
        scenario(
            "SMALL_ACCOUNT",
            "Start with $1,000",
            full,
            SimulationConfig { initial_cash: dec!(1000), ..Default::default() },
        ),
    ]
}
