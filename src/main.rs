use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use breakout_scanner::config::SCANNER;
use breakout_scanner::utils::time_utils::now_as_timestamp_secs;
use breakout_scanner::{Cli, MultiPairMonitor, ScanEngine, ScanReport, build_source};

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Data source
    let source = build_source(&args)?;
    let pairs = args.pairs()?;
    let settings = args.settings();

    if args.watch {
        return watch(source, &pairs, &args);
    }

    // D. One-shot scan
    let mut monitor = MultiPairMonitor::new();
    let summary = monitor.scan_all(source.as_ref(), &pairs, args.limit, &settings);
    log::info!(
        "Scanned {} pairs: {} analysed, {} failed, {} breakouts",
        pairs.len(),
        summary.analysed,
        summary.failed,
        summary.new_alerts.len()
    );

    let report = ScanReport::from_monitor(&monitor, args.timeframe, now_as_timestamp_secs());
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

/// Poll forever, printing each new breakout as one JSON line.
fn watch(
    source: std::sync::Arc<dyn breakout_scanner::CandleSource>,
    pairs: &[breakout_scanner::PairInterval],
    args: &Cli,
) -> Result<()> {
    let mut engine = ScanEngine::new(source, pairs, args.settings()).with_fetch_limit(args.limit);
    let tick = Duration::from_millis(SCANNER.engine.tick_ms);
    log::info!(
        "Watching {} pairs every {}s",
        engine.get_active_pair_count(),
        SCANNER.engine.poll_interval_secs
    );

    loop {
        engine.update();
        for alert in engine.take_new_alerts() {
            let line = serde_json::to_string(&alert).context("Failed to serialize alert")?;
            println!("{}", line);
        }
        std::thread::sleep(tick);
    }
}
