// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim")

pub mod types;
pub mod config;
pub mod rng;
pub mod crash;
pub mod stage;
pub mod market;
pub mod stocks;
pub mod companies;
pub mod news;
pub mod portfolio;
pub mod simulation;

// Outer-service seams (persistence, advice text)
pub mod store;
pub mod advisor;
pub mod adapter;

pub use types::*;
pub use config::{ConfigError, SimulationConfig};
pub use simulation::{BubbleSimulation, SimulationState};

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl BubbleSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self::with_config(SimulationConfig::default(), u64::from(seed))
            .unwrap_or_else(|e| wasm_bindgen::throw_str(&e.to_string()))
    }

    /// Builds a simulation from a JSON config document.
    pub fn from_config(config_json: &str, seed: u32) -> Result<BubbleSimulation, JsError> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config = SimulationConfig::from_json(config_json)?;
        Ok(Self::with_config(config, u64::from(seed))?)
    }

    /// One simulated day. `null` once the game is over.
    pub fn tick(&mut self) -> JsValue {
        match self.tick_core() {
            Some(result) => serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Manual single step; ignores the timer.
    pub fn step(&mut self) -> JsValue {
        self.tick()
    }

    /// Feeds elapsed wall time to the timer. Returns the number of ticks fired.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        let elapsed = if elapsed_ms.is_finite() && elapsed_ms > 0.0 { elapsed_ms as u64 } else { 0 };
        self.advance_by(elapsed).len() as u32
    }

    pub fn start(&mut self) {
        if !self.state.game_over {
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
        self.pending_ms = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Preset 0..=3 (slow, normal, fast, turbo). Unknown presets are ignored.
    pub fn set_speed(&mut self, preset: u8) -> bool {
        match GameSpeed::from_preset(preset) {
            Some(speed) => {
                self.set_speed_preset(speed);
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.reset_game();
    }

    pub fn buy(&mut self, stock_id: &str, shares: u32) -> bool {
        self.buy_stock(stock_id, u64::from(shares)).is_some()
    }

    pub fn sell(&mut self, stock_id: &str, shares: u32) -> bool {
        self.sell_stock(stock_id, u64::from(shares)).is_some()
    }

    pub fn get_stocks(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.state.stocks).unwrap_or(JsValue::NULL)
    }

    pub fn get_market(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.state.market).unwrap_or(JsValue::NULL)
    }

    pub fn get_portfolio(&self) -> JsValue {
        let summary = self.state.portfolio.summary(&self.state.stocks);
        serde_wasm_bindgen::to_value(&summary).unwrap_or(JsValue::NULL)
    }

    pub fn ask(&self, message: &str) -> String {
        self.ask_advisor(&advisor::OfflineAdvisor, message)
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_default()
    }

    /// Replaces the game with a saved document. `false` leaves it untouched.
    pub fn load_json(&mut self, json: &str) -> bool {
        let value = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "load_json: not valid JSON");
                return false;
            }
        };
        match self.restore(value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "load_json rejected");
                false
            }
        }
    }
}
