// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Portfolio Ledger
//
// Cash and cost basis are Decimal so buy/sell arithmetic is exact. Holdings
// never go negative and zero entries are pruned.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapter::{from_decimal, notional, to_decimal};
use crate::types::Stock;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub stock_id: String,
    pub side: TradeSide,
    pub shares: u64,
    pub price: Decimal,
    pub total: Decimal,
}

/// Valuation of one holding at a given price.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Position {
    pub stock_id: String,
    pub shares: u64,
    pub market_value: Decimal,
    pub cost_basis: Decimal,
    pub unrealized_profit: Decimal,
    /// Profit relative to cost basis, in percent.
    pub unrealized_pct: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioSummary {
    pub cash: Decimal,
    pub holdings_value: Decimal,
    pub total_value: Decimal,
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Portfolio {
    pub cash: Decimal,
    pub holdings: BTreeMap<String, u64>,
    /// Total cost paid for the shares currently held, per stock.
    #[serde(default)]
    pub cost_basis: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub trades: Vec<Trade>,
}

impl Portfolio {
    pub fn new(cash: Decimal) -> Self {
        Self {
            cash: cash.max(Decimal::ZERO),
            holdings: BTreeMap::new(),
            cost_basis: BTreeMap::new(),
            trades: Vec::new(),
        }
    }

    pub fn shares(&self, stock_id: &str) -> u64 {
        self.holdings.get(stock_id).copied().unwrap_or(0)
    }

    /// Buys `shares` at `price`. Returns `None` and leaves the portfolio
    /// untouched when the cash does not cover the order.
    pub fn buy(&mut self, stock_id: &str, shares: u64, price: f64, date: NaiveDate) -> Option<Trade> {
        if shares == 0 || !(price > 0.0) {
            return None;
        }
        let cost = notional(shares, price);
        if cost > self.cash {
            tracing::debug!(stock_id, shares, %cost, cash = %self.cash, "buy rejected: insufficient cash");
            return None;
        }

        self.cash -= cost;
        *self.holdings.entry(stock_id.to_string()).or_insert(0) += shares;
        *self.cost_basis.entry(stock_id.to_string()).or_insert(Decimal::ZERO) += cost;

        let trade = Trade {
            date,
            stock_id: stock_id.to_string(),
            side: TradeSide::Buy,
            shares,
            price: to_decimal(price),
            total: cost,
        };
        self.trades.push(trade.clone());
        tracing::debug!(stock_id, shares, %cost, "bought");
        Some(trade)
    }

    /// Sells up to `shares`, capped at what is held. Returns `None` when
    /// nothing is held.
    pub fn sell(&mut self, stock_id: &str, shares: u64, price: f64, date: NaiveDate) -> Option<Trade> {
        let held = self.shares(stock_id);
        let quantity = shares.min(held);
        if quantity == 0 {
            return None;
        }
        let proceeds = notional(quantity, price.max(0.0));
        self.cash += proceeds;

        let basis = self.cost_basis.get(stock_id).copied().unwrap_or(Decimal::ZERO);
        let remaining = held - quantity;
        if remaining == 0 {
            self.holdings.remove(stock_id);
            self.cost_basis.remove(stock_id);
        } else {
            self.holdings.insert(stock_id.to_string(), remaining);
            let kept = basis * Decimal::from(remaining) / Decimal::from(held);
            self.cost_basis.insert(stock_id.to_string(), kept);
        }

        let trade = Trade {
            date,
            stock_id: stock_id.to_string(),
            side: TradeSide::Sell,
            shares: quantity,
            price: to_decimal(price.max(0.0)),
            total: proceeds,
        };
        self.trades.push(trade.clone());
        tracing::debug!(stock_id, shares = quantity, %proceeds, "sold");
        Some(trade)
    }

    /// Σ shares × current price over held stocks.
    pub fn holdings_value(&self, stocks: &[Stock]) -> Decimal {
        stocks
            .iter()
            .filter_map(|s| self.holdings.get(&s.id).map(|&n| notional(n, s.price)))
            .sum()
    }

    pub fn total_value(&self, stocks: &[Stock]) -> Decimal {
        self.cash + self.holdings_value(stocks)
    }

    pub fn position(&self, stock: &Stock) -> Option<Position> {
        let shares = self.shares(&stock.id);
        if shares == 0 {
            return None;
        }
        let market_value = notional(shares, stock.price);
        let cost_basis = self.cost_basis.get(&stock.id).copied().unwrap_or(Decimal::ZERO);
        let unrealized_profit = market_value - cost_basis;
        let unrealized_pct = if cost_basis > Decimal::ZERO {
            from_decimal(unrealized_profit / cost_basis) * 100.0
        } else {
            0.0
        };
        Some(Position {
            stock_id: stock.id.clone(),
            shares,
            market_value,
            cost_basis,
            unrealized_profit,
            unrealized_pct,
        })
    }

    pub fn positions(&self, stocks: &[Stock]) -> Vec<Position> {
        stocks.iter().filter_map(|s| self.position(s)).collect()
    }

    pub fn summary(&self, stocks: &[Stock]) -> PortfolioSummary {
        let holdings_value = self.holdings_value(stocks);
        PortfolioSummary {
            cash: self.cash,
            holdings_value,
            total_value: self.cash + holdings_value,
            positions: self.positions(stocks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SurvivalTier, VolatilityTier};
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(1999, 1, 4).unwrap()
    }

    fn stock(id: &str, price: f64) -> Stock {
        Stock {
            id: id.to_string(),
            symbol: id.to_uppercase(),
            name: id.to_string(),
            category: "Portal".to_string(),
            initial_price: price,
            peak_price: price * 10.0,
            volatility: VolatilityTier::Medium,
            survival_chance: SurvivalTier::Medium,
            price,
            history: Vec::new(),
        }
    }

    #[test]
    fn test_buy_exact_cost() {
        let mut p = Portfolio::new(dec!(10000));
        let trade = p.buy("a", 10, 50.0, day()).unwrap();
        assert_eq!(trade.total, dec!(500));
        assert_eq!(p.cash, dec!(9500));
        assert_eq!(p.shares("a"), 10);
    }

    #[test]
    fn test_buy_insufficient_cash_is_noop() {
        let mut p = Portfolio::new(dec!(100));
        let before = p.clone();
        assert!(p.buy("a", 3, 50.0, day()).is_none());
        assert_eq!(p, before);
    }

    #[test]
    fn test_buy_exactly_all_cash() {
        let mut p = Portfolio::new(dec!(500));
        assert!(p.buy("a", 10, 50.0, day()).is_some());
        assert_eq!(p.cash, Decimal::ZERO);
    }

    #[test]
    fn test_zero_share_orders_are_noops() {
        let mut p = Portfolio::new(dec!(500));
        assert!(p.buy("a", 0, 50.0, day()).is_none());
        assert!(p.sell("a", 0, 50.0, day()).is_none());
        assert!(p.trades.is_empty());
    }

    #[test]
    fn test_oversell_capped_at_holdings() {
        let mut p = Portfolio::new(dec!(1000));
        p.buy("a", 5, 10.0, day());
        let trade = p.sell("a", 50, 12.0, day()).unwrap();
        assert_eq!(trade.shares, 5);
        assert_eq!(p.shares("a"), 0);
        assert!(!p.holdings.contains_key("a"));
        assert!(!p.cost_basis.contains_key("a"));
        assert_eq!(p.cash, dec!(1010));
    }

    #[test]
    fn test_sell_unheld_is_noop() {
        let mut p = Portfolio::new(dec!(1000));
        let before = p.clone();
        assert!(p.sell("ghost", 3, 10.0, day()).is_none());
        assert_eq!(p, before);
    }

    #[test]
    fn test_partial_sell_keeps_pro_rata_basis() {
        let mut p = Portfolio::new(dec!(1000));
        p.buy("a", 10, 20.0, day());
        p.sell("a", 4, 30.0, day());
        assert_eq!(p.shares("a"), 6);
        assert_eq!(p.cost_basis["a"], dec!(120));
    }

    #[test]
    fn test_position_profit() {
        let mut p = Portfolio::new(dec!(10000));
        p.buy("a", 10, 50.0, day());
        let pos = p.position(&stock("a", 80.0)).unwrap();
        assert_eq!(pos.market_value, dec!(800));
        assert_eq!(pos.unrealized_profit, dec!(300));
        assert!((pos.unrealized_pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_value() {
        let mut p = Portfolio::new(dec!(10000));
        p.buy("a", 10, 50.0, day());
        p.buy("b", 2, 100.0, day());
        let stocks = vec![stock("a", 80.0), stock("b", 90.0), stock("c", 5.0)];
        assert_eq!(p.holdings_value(&stocks), dec!(980));
        assert_eq!(p.total_value(&stocks), dec!(10280));
        let summary = p.summary(&stocks);
        assert_eq!(summary.positions.len(), 2);
        assert_eq!(summary.total_value, dec!(10280));
    }

    #[test]
    fn test_serde_roundtrip_keeps_cash_exact() {
        let mut p = Portfolio::new(dec!(10000));
        p.buy("a", 3, 33.33, day());
        let json = serde_json::to_string(&p).unwrap();
        let back: Portfolio = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
