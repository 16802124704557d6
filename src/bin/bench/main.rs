// Bubble Bench Runner v0.1.0: Monte Carlo over seeded bubble runs
// Seedable PRNG, per-run invariant checks, optional per-tick JSONL
//
// Usage:
//   cargo run --release --bin bench                        # All scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 5            # Quick mode
//   cargo run --release --bin bench -- HIGH_VOL            # Filter by name
//   cargo run --release --bin bench -- --ticks 800         # Shorter horizon
//   cargo run --release --bin bench -- --config run.json   # Single custom config
//   cargo run --release --bin bench -- --time-series       # Enable JSONL output
//   cargo run --release --bin bench -- --seed 42           # Custom base seed
//
// RUST_LOG=bubble_engine=debug surfaces stage transitions and crashes.

mod report;
mod scenarios;
mod monte_carlo;
mod time_series;

use bubble_engine::SimulationConfig;
use report::*;
use scenarios::*;
use std::error::Error;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    ticks: Option<u64>,
    config: Option<PathBuf>,
    time_series: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        ticks: None,
        config: None,
        time_series: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--ticks" => {
                i += 1;
                if i < args.len() {
                    cli.ticks = args[i].parse().ok();
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    cli.config = Some(PathBuf::from(&args[i]));
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn load_scenarios(cli: &CliArgs) -> Result<Vec<Scenario>, Box<dyn Error>> {
    if let Some(path) = &cli.config {
        let json = std::fs::read_to_string(path)?;
        let config = SimulationConfig::from_json(&json)?;
        config.validate()?;
        return Ok(vec![Scenario::custom(config, cli.ticks.unwrap_or(2557))]);
    }

    let all = scenarios(cli.ticks);
    Ok(match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all.into_iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all,
    })
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "bubble_engine=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = parse_args();
    let to_run = load_scenarios(&cli)?;

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let ts_dir = cli.time_series.then(|| PathBuf::from("benchmark-results/time-series"));

    println!("\n  Bubble Bench Runner v0.1.0");
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<32} {:>5} {:>7} {:>6} {:>10} {:>10} {:>8} {:>7}",
        "Scenario", "Pass%", "Crash%", "Over%", "CrashTick", "FinalIdx", "B&H", "Time");
    println!("  {}", "-".repeat(94));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, cli.runs, cli.seed, ts_dir.as_deref())?;

        let pass_pct = report.pass_rate * 100.0;
        let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };

        println!("  {:<32} {:>4}% {:>6.1}% {:>5.1}% {:>10.0} {:>10.1} {:>7.2}x {:>5.0}ms  {}",
            report.label,
            pass_pct as u32,
            report.crash_rate * 100.0,
            report.game_over_rate * 100.0,
            report.crash_tick.mean,
            report.final_index.mean,
            report.buy_and_hold_return.mean,
            report.elapsed_ms.mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(94));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.1.0",
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: mc_reports,
    };

    let dir = std::path::Path::new("benchmark-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("bench-{}.json", timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
