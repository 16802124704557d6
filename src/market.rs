// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Index Updater

use crate::rng::RandomSource;
use crate::types::{BubbleStage, IndexPoint, MarketState};

/// The index never drops below this.
pub const INDEX_FLOOR: f64 = 100.0;

/// Draws this tick's fractional index change for `stage`.
pub fn index_change(stage: BubbleStage, volatility_multiplier: f64, rng: &mut dyn RandomSource) -> f64 {
    let (lo, hi) = stage.index_change_range();
    rng.uniform(lo, hi) * volatility_multiplier
}

/// `max(100, index * (1 + change))`
pub fn apply_index_change(index: f64, change: f64) -> f64 {
    (index * (1.0 + change)).max(INDEX_FLOOR)
}

/// Moves the index one tick and appends it to the history. Returns the change
/// that was drawn.
pub fn update_index(market: &mut MarketState, volatility_multiplier: f64, rng: &mut dyn RandomSource) -> f64 {
    let change = index_change(market.stage, volatility_multiplier, rng);
    market.index = apply_index_change(market.index, change);
    market.index_history.push(IndexPoint { date: market.date, value: market.index });
    change
}

/// Movement of the index relative to where the game started, scaled harder
/// during the crash.
pub fn market_change(index: f64, initial_index: f64, stage: BubbleStage) -> f64 {
    let coupling = if stage.is_crash() { 0.7 } else { 0.4 };
    (index / initial_index - 1.0) * coupling
}
