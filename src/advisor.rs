// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Dotcom Bubble Simulation ("Bubble Sim") - Advisor & Headlines
//
// Flavor text only. Whatever the text service does, the simulation never sees
// an error: the `*_or_fallback` helpers swallow it and log.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::news;
use crate::portfolio::Portfolio;
use crate::rng::RandomSource;
use crate::types::{BubbleStage, MarketState, NewsItem, NewsKind, Stock};

pub const FALLBACK_ADVICE: &str =
    "Sorry, I'm having trouble connecting to the market data right now. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("advisor service unavailable: {0}")]
    Unavailable(String),

    #[error("advisor returned an empty response")]
    EmptyResponse,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AdviceRequest<'a> {
    pub message: &'a str,
    pub stocks: &'a [Stock],
    pub market: &'a MarketState,
    pub portfolio: &'a Portfolio,
    pub cash: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadlineRequest<'a> {
    pub date: NaiveDate,
    pub stage: BubbleStage,
    pub stocks: &'a [Stock],
    pub index: f64,
    pub previous_index: f64,
}

pub trait Advisor {
    fn advise(&self, request: &AdviceRequest<'_>) -> Result<String, AdvisorError>;

    fn headlines(&self, request: &HeadlineRequest<'_>) -> Result<Vec<NewsItem>, AdvisorError>;
}

// ---------------------------------------------------------------------------
// Fail-soft wrappers
// ---------------------------------------------------------------------------

pub fn advise_or_fallback(advisor: &dyn Advisor, request: &AdviceRequest<'_>) -> String {
    match advisor.advise(request) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::warn!(error = %AdvisorError::EmptyResponse, "advice degraded to fallback");
            FALLBACK_ADVICE.to_string()
        }
        Err(e) => {
            tracing::warn!(error = %e, "advice degraded to fallback");
            FALLBACK_ADVICE.to_string()
        }
    }
}

pub fn headlines_or_fallback(
    advisor: &dyn Advisor,
    request: &HeadlineRequest<'_>,
    rng: &mut dyn RandomSource,
) -> Vec<NewsItem> {
    match advisor.headlines(request) {
        Ok(items) if !items.is_empty() => items,
        Ok(_) => vec![news::fallback_headline(request.stage, request.date, rng)],
        Err(e) => {
            tracing::warn!(error = %e, "headlines degraded to fallback");
            vec![news::fallback_headline(request.stage, request.date, rng)]
        }
    }
}

// ---------------------------------------------------------------------------
// OfflineAdvisor
// ---------------------------------------------------------------------------

/// Rule-based advisor that needs no network. Reads the market like a
/// late-90s analyst would.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineAdvisor;

impl OfflineAdvisor {
    fn stage_take(stage: BubbleStage) -> &'static str {
        match stage {
            BubbleStage::Early => "It's early days for the web. Quality names bought now could run for years.",
            BubbleStage::Growth => "Money is pouring into tech. Ride the trend, but know what you own.",
            BubbleStage::Mania => "Everyone's a genius in a bull market. Consider taking some profits off the table.",
            BubbleStage::Peak => "Valuations are stretched to the limit. Cash is a position too.",
            BubbleStage::Decline => "The tide is going out. Companies without earnings will struggle to raise money.",
            BubbleStage::Crash => "Capital preservation first. Only the strongest balance sheets survive this.",
        }
    }
}

impl Advisor for OfflineAdvisor {
    fn advise(&self, request: &AdviceRequest<'_>) -> Result<String, AdvisorError> {
        let mut text = Self::stage_take(request.market.stage).to_string();

        let positions = request.portfolio.positions(request.stocks);
        if positions.is_empty() {
            text.push_str(" You're all cash right now.");
        } else if let Some(best) = positions
            .iter()
            .max_by(|a, b| a.unrealized_pct.total_cmp(&b.unrealized_pct))
        {
            text.push_str(&format!(
                " Your best position is {} at {:+.1}%.",
                best.stock_id.to_uppercase(),
                best.unrealized_pct
            ));
        }
        Ok(text)
    }

    fn headlines(&self, request: &HeadlineRequest<'_>) -> Result<Vec<NewsItem>, AdvisorError> {
        let mover = request
            .stocks
            .iter()
            .max_by(|a, b| a.change_since_listing().total_cmp(&b.change_since_listing()));
        let Some(mover) = mover else {
            return Ok(Vec::new());
        };
        let direction = if request.index >= request.previous_index { "climbs" } else { "slips" };
        Ok(vec![NewsItem {
            date: request.date,
            headline: format!("{} Leads the Market as Index {}", mover.name, direction),
            body: format!(
                "{} trades at ${:.2}, {:+.0}% since listing.",
                mover.symbol,
                mover.price,
                mover.change_since_listing()
            ),
            kind: NewsKind::Headline,
        }])
    }
}
