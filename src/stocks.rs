// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Stock Updater

use chrono::NaiveDate;

use crate::market;
use crate::rng::RandomSource;
use crate::types::{BubbleStage, PricePoint, Stock, StockUpdate, SurvivalTier};

/// No stock trades below this.
pub const PRICE_FLOOR: f64 = 0.1;

/// Category that gets an extra push during the mania.
pub const MANIA_CATEGORY: &str = "E-commerce";

/// Wipeout applied to a very-low-survival stock that goes under.
const WIPEOUT_CHANGE: f64 = -0.5;

/// Market-level inputs shared by every stock in one tick.
#[derive(Debug, Clone, Copy)]
pub struct StockTickContext {
    pub date: NaiveDate,
    pub stage: BubbleStage,
    pub index: f64,
    pub initial_index: f64,
    pub crash_severity: f64,
    pub volatility_multiplier: f64,
}

impl StockTickContext {
    fn market_change(&self) -> f64 {
        market::market_change(self.index, self.initial_index, self.stage)
    }
}

/// Fractional price change for one stock this tick.
pub fn price_change(stock: &Stock, ctx: &StockTickContext, rng: &mut dyn RandomSource) -> f64 {
    let mut change = rng.uniform(-0.05, 0.05) * stock.volatility.factor() * ctx.volatility_multiplier;
    change += ctx.market_change() * rng.uniform(0.5, 1.5);

    if ctx.stage == BubbleStage::Mania && stock.category == MANIA_CATEGORY {
        change += rng.uniform(0.0, 0.05);
    }

    if ctx.stage.is_crash() {
        let exposure = 1.0 - stock.survival_chance.factor();
        change -= exposure * rng.uniform(0.01, 0.1) * ctx.crash_severity;
        if stock.survival_chance == SurvivalTier::VeryLow
            && rng.chance(0.05 * ctx.crash_severity)
        {
            change = WIPEOUT_CHANGE;
        }
    }
    change
}

/// Applies `change` with the floor and, outside the crash, the bubble cap.
pub fn apply_price_change(stock: &Stock, change: f64, stage: BubbleStage, rng: &mut dyn RandomSource) -> f64 {
    let mut price = (stock.price * (1.0 + change)).max(PRICE_FLOOR);
    if !stage.is_crash() {
        let cap = stock.peak_price * (1.0 + rng.uniform(0.0, 0.5));
        price = price.min(cap);
    }
    price.max(PRICE_FLOOR)
}

/// Moves one stock and appends the new price to its history.
pub fn update_stock(stock: &mut Stock, ctx: &StockTickContext, rng: &mut dyn RandomSource) -> StockUpdate {
    let change = price_change(stock, ctx, rng);
    let price = apply_price_change(stock, change, ctx.stage, rng);
    let realized = if stock.price > 0.0 { price / stock.price - 1.0 } else { 0.0 };
    stock.price = price;
    stock.history.push(PricePoint { date: ctx.date, price });
    StockUpdate { id: stock.id.clone(), price, change: realized }
}

pub fn update_stocks(stocks: &mut [Stock], ctx: &StockTickContext, rng: &mut dyn RandomSource) -> Vec<StockUpdate> {
    stocks.iter_mut().map(|stock| update_stock(stock, ctx, rng)).collect()
}
