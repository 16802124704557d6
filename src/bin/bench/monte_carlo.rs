// Monte Carlo Infrastructure: N runs per scenario with statistical aggregation
// Each scenario runs N times with seeds base..base+N, computing mean ± 95% CI

use bubble_engine::adapter::from_decimal;
use bubble_engine::stocks::PRICE_FLOOR;
use bubble_engine::market::INDEX_FLOOR;
use bubble_engine::*;

use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

/// Invariant tracker fed once per tick.
struct RunChecks {
    crash_tick: Option<u64>,
    left_crash: bool,
    min_index: f64,
    min_stock_price: f64,
}

impl RunChecks {
    fn new(initial_index: f64) -> Self {
        Self { crash_tick: None, left_crash: false, min_index: initial_index, min_stock_price: f64::INFINITY }
    }

    fn record(&mut self, tick: u64, result: &TickResult) {
        if result.stage.is_crash() {
            self.crash_tick.get_or_insert(tick);
        } else if self.crash_tick.is_some() {
            self.left_crash = true;
        }
        self.min_index = self.min_index.min(result.index);
        for update in &result.stock_updates {
            self.min_stock_price = self.min_stock_price.min(update.price);
        }
    }
}

/// Spreads the starting cash evenly over every listed stock.
fn buy_equal_weight(sim: &mut BubbleSimulation) {
    let state = sim.state();
    let budget = from_decimal(state.portfolio.cash) / state.stocks.len().max(1) as f64;
    let orders: Vec<(String, u64)> = state
        .stocks
        .iter()
        .map(|s| (s.id.clone(), (budget / s.price).floor() as u64))
        .collect();
    for (id, shares) in orders {
        sim.buy_stock(&id, shares);
    }
}

/// Run a single scenario iteration with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> Result<BenchResult, ConfigError> {
    let start = Instant::now();
    let mut sim = BubbleSimulation::with_config(scenario.config.clone(), seed)?;
    let initial_cash = from_decimal(scenario.config.initial_cash);
    buy_equal_weight(&mut sim);

    let mut checks = RunChecks::new(sim.state().initial_index);
    let mut time_series = time_series_dir.map(|_| TimeSeriesRecorder::new());

    let mut ticks = 0;
    while ticks < scenario.ticks {
        let Some(result) = sim.tick_core() else { break };
        ticks += 1;
        checks.record(ticks, &result);
        if let Some(ts) = time_series.as_mut() {
            ts.record(ticks, &result);
        }
    }

    if let (Some(ts), Some(dir)) = (&time_series, time_series_dir) {
        let path = dir.join(format!("{}-seed{}.jsonl", scenario.name.to_lowercase(), seed));
        match ts.write_jsonl(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), rows = ts.len(), "time series written"),
            Err(e) => tracing::warn!(error = %e, path = %path.display(), "time series write failed"),
        }
    }

    let state = sim.state();
    let market = &state.market;
    let warning_count = market.warnings_emitted();
    let crash_news_count = market.news.iter().filter(|n| n.kind == NewsKind::MarketCrash).count();
    let peak_index = market.index_history.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    let total_value = from_decimal(state.portfolio.total_value(&state.stocks));

    let pass = warning_count <= 1
        && crash_news_count <= 1
        && !checks.left_crash
        && checks.min_index >= INDEX_FLOOR
        && checks.min_stock_price >= PRICE_FLOOR;

    Ok(BenchResult {
        scenario: scenario.name.clone(),
        seed,
        pass,
        ticks,
        warning_date: state.schedule.warning_date.to_string(),
        scheduled_crash_date: state.schedule.crash_date.to_string(),
        crash_tick: checks.crash_tick,
        warning_count,
        crash_news_count,
        final_stage: market.stage.label().to_string(),
        final_index: market.index,
        peak_index,
        min_index: checks.min_index,
        min_stock_price: checks.min_stock_price,
        game_over: state.game_over,
        buy_and_hold_return: if initial_cash > 0.0 { total_value / initial_cash } else { 0.0 },
        elapsed_ms: start.elapsed().as_millis(),
    })
}

fn stats_of(runs: &[BenchResult], metric: impl Fn(&BenchResult) -> f64) -> Stats {
    let samples: Vec<f64> = runs.iter().map(metric).collect();
    Stats::from_samples(&samples)
}

/// Run N iterations of a scenario and aggregate.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> Result<MonteCarloReport, ConfigError> {
    let mut runs = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        runs.push(run_single(scenario, base_seed + i as u64, time_series_dir)?);
    }

    let n = runs.len().max(1) as f64;
    let crash_ticks: Vec<f64> = runs.iter().filter_map(|r| r.crash_tick).map(|t| t as f64).collect();

    Ok(MonteCarloReport {
        scenario_name: scenario.name.clone(),
        label: scenario.label.clone(),
        n_runs,
        pass_rate: runs.iter().filter(|r| r.pass).count() as f64 / n,
        crash_rate: crash_ticks.len() as f64 / n,
        game_over_rate: runs.iter().filter(|r| r.game_over).count() as f64 / n,
        crash_tick: Stats::from_samples(&crash_ticks),
        final_index: stats_of(&runs, |r| r.final_index),
        peak_index: stats_of(&runs, |r| r.peak_index),
        min_stock_price: stats_of(&runs, |r| r.min_stock_price),
        buy_and_hold_return: stats_of(&runs, |r| r.buy_and_hold_return),
        elapsed_ms: stats_of(&runs, |r| r.elapsed_ms as f64),
        individual_runs: runs,
    })
}
