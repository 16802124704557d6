// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Company Catalogue
//
// Static listing every game starts from. Prices are loosely based on the
// real listings; peak prices bound how far the bubble can carry each stock.

use chrono::NaiveDate;

use crate::types::{PricePoint, Stock, SurvivalTier, VolatilityTier};
use crate::types::SurvivalTier as S;
use crate::types::VolatilityTier as V;

#[derive(Debug, Clone, Copy)]
pub struct Company {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub initial_price: f64,
    pub peak_price: f64,
    pub volatility: VolatilityTier,
    pub survival: SurvivalTier,
}

pub const COMPANIES: &[Company] = &[
    Company { id: "amzn", symbol: "AMZN", name: "Amazon.com", category: "E-commerce", initial_price: 18.0, peak_price: 113.0, volatility: V::High, survival: S::High },
    Company { id: "ebay", symbol: "EBAY", name: "eBay", category: "E-commerce", initial_price: 18.0, peak_price: 120.0, volatility: V::High, survival: S::VeryHigh },
    Company { id: "pets", symbol: "IPET", name: "Pets.com", category: "E-commerce", initial_price: 11.0, peak_price: 14.0, volatility: V::Extreme, survival: S::VeryLow },
    Company { id: "wbvn", symbol: "WBVN", name: "Webvan", category: "E-commerce", initial_price: 15.0, peak_price: 34.0, volatility: V::Extreme, survival: S::VeryLow },
    Company { id: "etys", symbol: "ETYS", name: "eToys", category: "E-commerce", initial_price: 20.0, peak_price: 86.0, volatility: V::Extreme, survival: S::VeryLow },
    Company { id: "pcln", symbol: "PCLN", name: "Priceline.com", category: "E-commerce", initial_price: 16.0, peak_price: 165.0, volatility: V::Extreme, survival: S::Medium },
    Company { id: "yhoo", symbol: "YHOO", name: "Yahoo!", category: "Portal", initial_price: 25.0, peak_price: 237.0, volatility: V::High, survival: S::High },
    Company { id: "xcit", symbol: "ATHM", name: "Excite@Home", category: "Portal", initial_price: 35.0, peak_price: 99.0, volatility: V::High, survival: S::Low },
    Company { id: "tglo", symbol: "TGLO", name: "theglobe.com", category: "Community", initial_price: 9.0, peak_price: 97.0, volatility: V::Extreme, survival: S::VeryLow },
    Company { id: "gcty", symbol: "GCTY", name: "GeoCities", category: "Community", initial_price: 17.0, peak_price: 100.0, volatility: V::High, survival: S::Low },
    Company { id: "aol", symbol: "AOL", name: "America Online", category: "ISP", initial_price: 30.0, peak_price: 95.0, volatility: V::Medium, survival: S::Medium },
    Company { id: "inkt", symbol: "INKT", name: "Inktomi", category: "Software", initial_price: 36.0, peak_price: 241.0, volatility: V::High, survival: S::Low },
    Company { id: "mstr", symbol: "MSTR", name: "MicroStrategy", category: "Software", initial_price: 20.0, peak_price: 333.0, volatility: V::Extreme, survival: S::Medium },
    Company { id: "csco", symbol: "CSCO", name: "Cisco Systems", category: "Networking", initial_price: 20.0, peak_price: 80.0, volatility: V::Medium, survival: S::VeryHigh },
    Company { id: "qcom", symbol: "QCOM", name: "Qualcomm", category: "Telecom", initial_price: 12.0, peak_price: 200.0, volatility: V::High, survival: S::High },
    Company { id: "wcom", symbol: "WCOM", name: "WorldCom", category: "Telecom", initial_price: 40.0, peak_price: 64.0, volatility: V::Medium, survival: S::VeryLow },
    Company { id: "ibm", symbol: "IBM", name: "IBM", category: "Hardware", initial_price: 100.0, peak_price: 140.0, volatility: V::Low, survival: S::VeryHigh },
];

impl Company {
    /// Fresh stock at its listing price with a single seed history entry.
    pub fn list(&self, date: NaiveDate) -> Stock {
        Stock {
            id: self.id.to_string(),
            symbol: self.symbol.to_string(),
            name: self.name.to_string(),
            category: self.category.to_string(),
            initial_price: self.initial_price,
            peak_price: self.peak_price,
            volatility: self.volatility,
            survival_chance: self.survival,
            price: self.initial_price,
            history: vec![PricePoint { date, price: self.initial_price }],
        }
    }
}

/// Lists every catalogue company as of `date`.
pub fn initial_stocks(date: NaiveDate) -> Vec<Stock> {
    COMPANIES.iter().map(|c| c.list(date)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_and_symbols_unique() {
        let ids: HashSet<_> = COMPANIES.iter().map(|c| c.id).collect();
        let symbols: HashSet<_> = COMPANIES.iter().map(|c| c.symbol).collect();
        assert_eq!(ids.len(), COMPANIES.len());
        assert_eq!(symbols.len(), COMPANIES.len());
    }

    #[test]
    fn test_peak_above_listing() {
        for c in COMPANIES {
            assert!(c.peak_price > c.initial_price, "{} peak below listing", c.id);
            assert!(c.initial_price >= crate::stocks::PRICE_FLOOR);
        }
    }

    #[test]
    fn test_initial_stocks_seeded() {
        let d = NaiveDate::from_ymd_opt(1998, 1, 1).unwrap();
        let stocks = initial_stocks(d);
        assert_eq!(stocks.len(), COMPANIES.len());
        for s in &stocks {
            assert_eq!(s.history.len(), 1);
            assert_eq!(s.history[0].date, d);
            assert_eq!(s.price, s.initial_price);
        }
        assert!(stocks.iter().any(|s| s.category == crate::stocks::MANIA_CATEGORY));
    }
}
