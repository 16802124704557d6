// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - News Items

use chrono::NaiveDate;

use crate::rng::RandomSource;
use crate::types::{BubbleStage, NewsItem, NewsKind};

/// Seed entry for a fresh game's news feed.
pub fn welcome(date: NaiveDate) -> NewsItem {
    NewsItem {
        date,
        headline: "Welcome to the Information Superhighway".to_string(),
        body: "The web is booming and every company with a .com is going public. \
               Buy low, sell high, and try not to be the last one holding the bag."
            .to_string(),
        kind: NewsKind::Welcome,
    }
}

pub fn bubble_warning(date: NaiveDate) -> NewsItem {
    NewsItem {
        date,
        headline: "Fed Chairman Warns of \"Irrational Exuberance\"".to_string(),
        body: "Analysts question sky-high valuations of companies with no profits. \
               Some investors are quietly moving to cash."
            .to_string(),
        kind: NewsKind::BubbleWarning,
    }
}

pub fn market_crash(date: NaiveDate) -> NewsItem {
    NewsItem {
        date,
        headline: "MARKET CRASH: Tech Stocks in Freefall".to_string(),
        body: "Panic selling grips the market as investors flee internet stocks. \
               Companies burning cash face a funding drought."
            .to_string(),
        kind: NewsKind::MarketCrash,
    }
}

fn stage_headlines(stage: BubbleStage) -> &'static [&'static str] {
    match stage {
        BubbleStage::Early => &[
            "Netscape IPO Sparks Interest in Internet Companies",
            "Analysts Debate Whether the Web Is a Fad",
            "Dial-Up Subscriptions Double Year Over Year",
        ],
        BubbleStage::Growth => &[
            "Venture Capital Floods Into Silicon Valley",
            "Online Retail Sales Beat Holiday Forecasts",
            "Another Dotcom Doubles on First Day of Trading",
        ],
        BubbleStage::Mania => &[
            "Day Traders Quit Their Jobs to Trade Full Time",
            "Sock Puppet Mascot Stars in Super Bowl Ad",
            "\"Eyeballs\" Replace Earnings as Key Valuation Metric",
        ],
        BubbleStage::Peak => &[
            "NASDAQ Crosses 5,000 for the First Time",
            "Mega-Merger Values Web Portal Above Media Giant",
            "Analysts Raise Targets Again: \"This Time Is Different\"",
        ],
        BubbleStage::Decline => &[
            "Tech Earnings Miss Estimates Across the Board",
            "Layoffs Hit Startups as Funding Dries Up",
            "Investors Rotate Out of Internet Stocks",
        ],
        BubbleStage::Crash => &[
            "Dotcom Bankruptcies Mount",
            "Pink Slip Parties Become a Silicon Valley Staple",
            "Former High-Flyer Delisted After Shares Hit Pennies",
        ],
    }
}

/// Static headline for the current stage, used when the headline service has
/// nothing to offer.
pub fn fallback_headline(stage: BubbleStage, date: NaiveDate, rng: &mut dyn RandomSource) -> NewsItem {
    let pool = stage_headlines(stage);
    let idx = rng.pick(0, pool.len() as u32 - 1) as usize;
    NewsItem {
        date,
        headline: pool[idx].to_string(),
        body: String::new(),
        kind: NewsKind::Headline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;

    #[test]
    fn test_fixed_items_have_kinds() {
        let d = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(welcome(d).kind, NewsKind::Welcome);
        assert_eq!(bubble_warning(d).kind, NewsKind::BubbleWarning);
        assert_eq!(market_crash(d).kind, NewsKind::MarketCrash);
    }

    #[test]
    fn test_fallback_headline_for_every_stage() {
        let d = NaiveDate::from_ymd_opt(1999, 7, 1).unwrap();
        let mut rng = ScriptedRandom::constant(0.999);
        for stage in BubbleStage::ALL {
            let item = fallback_headline(stage, d, &mut rng);
            assert_eq!(item.kind, NewsKind::Headline);
            assert!(!item.headline.is_empty());
            assert_eq!(item.date, d);
        }
    }
}
