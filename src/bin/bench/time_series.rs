// Per-Tick JSONL Time Series Recorder
// Outputs one JSON line per simulated day for independent analysis

use bubble_engine::{BubbleStage, TickResult};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub date: String,
    pub stage: BubbleStage,
    pub index: f64,
    pub index_change_pct: f64,
    pub sentiment: f64,
    pub crash_probability: f64,
    pub crash_severity: f64,
    pub mean_stock_change: f64,
    pub min_stock_price: f64,
    pub news_count: usize,
    pub game_over: bool,
}

impl TickSnapshot {
    pub fn from_result(tick: u64, result: &TickResult) -> Self {
        let index_change_pct = if result.previous_index > 0.0 {
            (result.index / result.previous_index - 1.0) * 100.0
        } else {
            0.0
        };
        let n = result.stock_updates.len().max(1) as f64;
        let mean_stock_change = result.stock_updates.iter().map(|u| u.change).sum::<f64>() / n;
        let min_stock_price = result
            .stock_updates
            .iter()
            .map(|u| u.price)
            .fold(f64::INFINITY, f64::min);

        Self {
            tick,
            date: result.date.to_string(),
            stage: result.stage,
            index: result.index,
            index_change_pct,
            sentiment: result.sentiment,
            crash_probability: result.crash_probability,
            crash_severity: result.crash_severity,
            mean_stock_change,
            min_stock_price,
            news_count: result.news.len(),
            game_over: result.game_over,
        }
    }
}

/// Accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, tick: u64, result: &TickResult) {
        self.snapshots.push(TickSnapshot::from_result(tick, result));
    }

    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
