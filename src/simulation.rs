// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Simulation Core

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::advisor::{self, AdviceRequest, Advisor, HeadlineRequest};
use crate::companies;
use crate::config::{ConfigError, SimulationConfig};
use crate::crash::{self, CrashSchedule};
use crate::market;
use crate::news;
use crate::portfolio::{Portfolio, Trade};
use crate::rng::{RandomSource, SeededRandom};
use crate::stage;
use crate::stocks::{self, StockTickContext};
use crate::store::{GameStore, SavedGameInfo};
use crate::types::*;

/// Ticks fired at most per `advance` call; older backlog is dropped.
pub const MAX_CATCH_UP_TICKS: u64 = 8;

/// Game over needs the index below this share of the previous tick's index.
const GAME_OVER_DRAWDOWN: f64 = 0.7;
const GAME_OVER_MIN_YEAR: i32 = 2002;
const GAME_OVER_DRAW: f64 = 0.95;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to decode simulation snapshot: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ─── SimulationState ─────────────────────────────────────────────────────────

/// Everything a running game owns. This is also the persisted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub config: SimulationConfig,
    pub stocks: Vec<Stock>,
    pub market: MarketState,
    pub schedule: CrashSchedule,
    pub portfolio: Portfolio,
    pub initial_index: f64,
    pub game_over: bool,
    pub tick_count: u64,
}

impl SimulationState {
    /// Builds a fresh game from `config`.
    pub fn new(config: SimulationConfig, rng: &mut dyn RandomSource) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = config.start_date()?;
        Ok(Self::seeded(config, start, rng))
    }

    fn seeded(config: SimulationConfig, start: NaiveDate, rng: &mut dyn RandomSource) -> Self {
        let schedule = crash::determine_crash_timing(&config, rng);
        let initial_index = config.initial_index;
        let market = MarketState {
            date: start,
            index: initial_index,
            index_history: vec![IndexPoint { date: start, value: initial_index }],
            stage: BubbleStage::Early,
            volatility: BubbleStage::Early.volatility(),
            sentiment: BubbleStage::Early.sentiment_baseline(),
            news: vec![news::welcome(start)],
            crash_warning_shown: false,
            crash_probability: 0.0,
            crash_severity: 0.0,
        };
        Self {
            stocks: companies::initial_stocks(start),
            market,
            schedule,
            portfolio: Portfolio::new(config.initial_cash),
            initial_index,
            game_over: false,
            tick_count: 0,
            config,
        }
    }

    pub fn stock(&self, stock_id: &str) -> Option<&Stock> {
        self.stocks.iter().find(|s| s.id == stock_id)
    }

    /// Advances one simulated day. Returns `None` once the game is over.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) -> Option<TickResult> {
        if self.game_over {
            return None;
        }

        let previous_index = self.market.index;
        let next_day = self.market.date.checked_add_days(Days::new(1))?;
        self.market.date = next_day;

        let outcome = stage::evaluate(&mut self.market, &mut self.schedule, rng);

        market::update_index(&mut self.market, self.config.volatility_multiplier, rng);

        let ctx = StockTickContext {
            date: self.market.date,
            stage: self.market.stage,
            index: self.market.index,
            initial_index: self.initial_index,
            crash_severity: self.market.crash_severity,
            volatility_multiplier: self.config.volatility_multiplier,
        };
        let stock_updates = stocks::update_stocks(&mut self.stocks, &ctx, rng);

        if check_game_over(self.market.stage, self.market.index, previous_index, self.market.date, rng) {
            self.game_over = true;
            tracing::info!(date = %self.market.date, index = self.market.index, "game over");
        }
        self.tick_count += 1;

        Some(TickResult {
            date: self.market.date,
            stage: self.market.stage,
            previous_stage: outcome.previous,
            index: self.market.index,
            previous_index,
            sentiment: self.market.sentiment,
            crash_probability: self.market.crash_probability,
            crash_severity: self.market.crash_severity,
            news: outcome.news,
            stock_updates,
            game_over: self.game_over,
        })
    }
}

/// End-of-tick heuristic: in the crash, a one-day fall of more than 30%,
/// 2002 or later, and a lucky draw. Draws only when the other conditions hold.
pub fn check_game_over(
    stage: BubbleStage,
    index: f64,
    previous_index: f64,
    date: NaiveDate,
    rng: &mut dyn RandomSource,
) -> bool {
    stage.is_crash()
        && index < GAME_OVER_DRAWDOWN * previous_index
        && date.year() >= GAME_OVER_MIN_YEAR
        && rng.next_unit() > GAME_OVER_DRAW
}

// ─── BubbleSimulation controller ─────────────────────────────────────────────

#[wasm_bindgen]
pub struct BubbleSimulation {
    pub(crate) state: SimulationState,
    pub(crate) rng: SeededRandom,
    pub(crate) running: bool,
    pub(crate) speed: GameSpeed,
    /// Time accumulated toward the next timer tick.
    pub(crate) pending_ms: u64,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl BubbleSimulation {
    pub fn with_config(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = SeededRandom::new(seed);
        let speed = config.speed;
        let state = SimulationState::new(config, &mut rng)?;
        Ok(Self { state, rng, running: false, speed, pending_ms: 0 })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn tick_core(&mut self) -> Option<TickResult> {
        let result = self.state.tick(&mut self.rng);
        if self.state.game_over {
            self.running = false;
            self.pending_ms = 0;
        }
        result
    }

    /// Cooperative timer: feeds elapsed wall time and fires every tick that
    /// has come due. Paused controllers accumulate nothing.
    pub fn advance_by(&mut self, elapsed_ms: u64) -> Vec<TickResult> {
        if !self.running {
            return Vec::new();
        }
        let interval = self.speed.interval_ms();
        self.pending_ms = self.pending_ms.saturating_add(elapsed_ms);
        let due = (self.pending_ms / interval).min(MAX_CATCH_UP_TICKS);
        self.pending_ms %= interval;

        let mut results = Vec::with_capacity(due as usize);
        for _ in 0..due {
            match self.tick_core() {
                Some(result) => results.push(result),
                None => break,
            }
        }
        results
    }

    pub fn set_speed_preset(&mut self, speed: GameSpeed) {
        if self.speed != speed {
            self.speed = speed;
            self.pending_ms = 0;
        }
    }

    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    /// Rebuilds the game from its config. Stops the timer.
    pub fn reset_game(&mut self) {
        self.running = false;
        self.pending_ms = 0;
        let config = self.state.config.clone();
        match SimulationState::new(config, &mut self.rng) {
            Ok(state) => self.state = state,
            Err(e) => tracing::error!(error = %e, "reset failed; keeping current state"),
        }
        tracing::debug!(start = %self.state.market.date, "simulation reset");
    }

    pub fn buy_stock(&mut self, stock_id: &str, shares: u64) -> Option<Trade> {
        let price = self.state.stock(stock_id)?.price;
        let date = self.state.market.date;
        self.state.portfolio.buy(stock_id, shares, price, date)
    }

    pub fn sell_stock(&mut self, stock_id: &str, shares: u64) -> Option<Trade> {
        let price = self.state.stock(stock_id)?.price;
        let date = self.state.market.date;
        self.state.portfolio.sell(stock_id, shares, price, date)
    }

    // ── Snapshots & saved games ──────────────────────────────────────────

    pub fn snapshot(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.state)
    }

    /// Replaces the running game with a snapshot. Pauses the timer.
    pub fn restore(&mut self, snapshot: serde_json::Value) -> Result<(), SnapshotError> {
        let state: SimulationState = serde_json::from_value(snapshot)?;
        state.config.validate()?;
        self.state = state;
        self.speed = self.state.config.speed;
        self.running = false;
        self.pending_ms = 0;
        Ok(())
    }

    pub fn save_to(&self, store: &mut dyn GameStore, user_id: &str, name: &str) -> Option<String> {
        let snapshot = match self.snapshot() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "snapshot failed");
                return None;
            }
        };
        match store.save(user_id, name, snapshot) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, user_id, name, "save failed");
                None
            }
        }
    }

    pub fn list_saves(&self, store: &dyn GameStore, user_id: &str) -> Vec<SavedGameInfo> {
        store.list(user_id).unwrap_or_else(|e| {
            tracing::warn!(error = %e, user_id, "listing saves failed");
            Vec::new()
        })
    }

    pub fn load_from(&mut self, store: &dyn GameStore, id: &str) -> bool {
        let game = match store.load(id) {
            Ok(game) => game,
            Err(e) => {
                tracing::warn!(error = %e, id, "load failed");
                return false;
            }
        };
        match self.restore(game.state) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, id, "saved game rejected");
                false
            }
        }
    }

    pub fn delete_from(&self, store: &mut dyn GameStore, id: &str) -> bool {
        match store.delete(id) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, id, "delete failed");
                false
            }
        }
    }

    // ── Advisor ──────────────────────────────────────────────────────────

    pub fn ask_advisor(&self, advisor: &dyn Advisor, message: &str) -> String {
        let request = AdviceRequest {
            message,
            stocks: &self.state.stocks,
            market: &self.state.market,
            portfolio: &self.state.portfolio,
            cash: self.state.portfolio.cash,
        };
        advisor::advise_or_fallback(advisor, &request)
    }

    /// Asks for headlines about the current day and appends them to the feed.
    pub fn publish_headlines(&mut self, advisor: &dyn Advisor) -> Vec<NewsItem> {
        let history = &self.state.market.index_history;
        let previous_index = history
            .len()
            .checked_sub(2)
            .map(|i| history[i].value)
            .unwrap_or(self.state.market.index);
        let request = HeadlineRequest {
            date: self.state.market.date,
            stage: self.state.market.stage,
            stocks: &self.state.stocks,
            index: self.state.market.index,
            previous_index,
        };
        let items = advisor::headlines_or_fallback(advisor, &request, &mut self.rng);
        self.state.market.news.extend(items.iter().cloned());
        items
    }
}
