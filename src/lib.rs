#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod utils;

// The polling scan engine
pub mod engine;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::Serialize;

// Re-export commonly used types
pub use analysis::{AnalysisSettings, BreakoutAnalysis, MultiPairMonitor, analyze, analyze_with_settings};
pub use data::{CacheFile, CandleSource, FallbackSource, JsonDirSource, MemorySource, SeriesCollection};
pub use domain::{Candle, PairInterval, Timeframe};
pub use engine::ScanEngine;
pub use models::{Breakout, CandleSeries, Direction, SeriesError, Strength, Trendline};

use config::{ANALYSIS, PERSISTENCE, SCANNER};
use utils::time_utils::epoch_sec_to_utc;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Trendline breakout scanner", long_about = None)]
pub struct Cli {
    /// Bincode cache file (defaults to the cache for --timeframe under candle_data/)
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Directory of <SYMBOL>_<timeframe>.json row files, tried before the cache
    #[arg(long)]
    pub json_dir: Option<PathBuf>,

    /// Comma-separated symbols, e.g. BTC/USDT,ETH/USDT
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    #[arg(long, default_value_t = ANALYSIS.default_timeframe)]
    pub timeframe: Timeframe,

    /// Bars each side a pivot must beat
    #[arg(long, default_value_t = ANALYSIS.pivots.window)]
    pub pivot_window: usize,

    /// Comma-separated EMA periods
    #[arg(long, value_delimiter = ',')]
    pub ema: Vec<usize>,

    /// Most recent bars fetched per pair
    #[arg(long, default_value_t = ANALYSIS.fetch_limit)]
    pub limit: usize,

    /// Keep polling and print alerts as they appear
    #[arg(long, default_value_t = false)]
    pub watch: bool,
}

impl Cli {
    pub fn settings(&self) -> AnalysisSettings {
        let settings = AnalysisSettings::default().with_pivot_window(self.pivot_window);
        if self.ema.is_empty() {
            settings
        } else {
            settings.with_ema_periods(self.ema.clone())
        }
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache
            .clone()
            .unwrap_or_else(|| CacheFile::default_cache_path(self.timeframe))
    }

    /// Pairs to scan: --symbols, else the configured defaults
    pub fn pairs(&self) -> Result<Vec<PairInterval>> {
        let symbols: Vec<&str> = if self.symbols.is_empty() {
            SCANNER.default_symbols.to_vec()
        } else {
            self.symbols.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect()
        };
        if symbols.len() > SCANNER.max_pairs {
            bail!(
                "{} symbols requested, at most {} are supported",
                symbols.len(),
                SCANNER.max_pairs
            );
        }
        Ok(symbols
            .into_iter()
            .map(|s| PairInterval::new(s, self.timeframe))
            .collect())
    }
}

/// Build the candle source chain: JSON directory first (if given), then the cache.
pub fn build_source(args: &Cli) -> Result<Arc<dyn CandleSource>> {
    let mut sources: Vec<Box<dyn CandleSource>> = Vec::new();

    if let Some(dir) = &args.json_dir {
        sources.push(Box::new(JsonDirSource::new(dir)));
    }

    let cache_path = args.cache_path();
    match CacheFile::load_checked(&cache_path, PERSISTENCE.cache.version) {
        Ok(cache) => {
            log::info!(
                "Loaded cache {} ({} series, {}): {}",
                cache_path.display(),
                cache.data.series_data.len(),
                epoch_sec_to_utc(cache.timestamp_secs),
                cache.data.unique_pair_names().join(", ")
            );
            sources.push(Box::new(MemorySource::new(cache.data)));
        }
        Err(e) if !sources.is_empty() => {
            log::warn!("Cache unavailable, using JSON files only: {:#}", e);
        }
        Err(e) => {
            return Err(e).context("No candle source available (pass --json-dir or --cache)");
        }
    }

    Ok(Arc::new(FallbackSource { sources }))
}

/// JSON report printed by the CLI
#[derive(Serialize, Debug)]
pub struct ScanReport<'a> {
    pub generated_at: String,
    pub timeframe: Timeframe,
    pub analysed: usize,
    pub failed: Vec<FailedPair<'a>>,
    pub alerts: Vec<&'a Breakout>,
    pub analyses: Vec<&'a BreakoutAnalysis>,
}

#[derive(Serialize, Debug)]
pub struct FailedPair<'a> {
    pub pair: &'a PairInterval,
    pub error: &'a str,
}

impl<'a> ScanReport<'a> {
    pub fn from_monitor(monitor: &'a MultiPairMonitor, timeframe: Timeframe, now_secs: i64) -> Self {
        let mut analyses: Vec<&BreakoutAnalysis> = monitor
            .get_all_contexts()
            .into_iter()
            .filter_map(|ctx| ctx.analysis.as_deref())
            .collect();
        analyses.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let mut failed: Vec<FailedPair> = monitor
            .failed_pairs()
            .into_iter()
            .map(|(pair, error)| FailedPair { pair, error })
            .collect();
        failed.sort_by(|a, b| a.pair.symbol.cmp(&b.pair.symbol));

        Self {
            generated_at: epoch_sec_to_utc(now_secs),
            timeframe,
            analysed: analyses.len(),
            failed,
            alerts: monitor.recent_alerts().collect(),
            analyses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = Cli::parse_from(["breakout-scanner"]);
        assert_eq!(args.timeframe, Timeframe::M15);
        assert_eq!(args.pivot_window, 10);
        assert_eq!(args.limit, 100);
        assert!(!args.watch);
        assert_eq!(args.settings().ema_periods, vec![50, 100, 200]);
        assert_eq!(args.pairs().unwrap().len(), SCANNER.default_symbols.len());
    }

    #[test]
    fn test_cli_overrides() {
        let args = Cli::parse_from([
            "breakout-scanner",
            "--symbols",
            "BTC/USDT, ETH/USDT",
            "--timeframe",
            "1h",
            "--pivot-window",
            "5",
            "--ema",
            "9,21",
        ]);
        let pairs = args.pairs().unwrap();
        assert_eq!(pairs[1], PairInterval::new("ETH/USDT", Timeframe::H1));
        assert_eq!(args.settings().pivot_window, 5);
        assert_eq!(args.settings().ema_periods, vec![9, 21]);
    }

    #[test]
    fn test_missing_sources_is_an_error() {
        let args = Cli::parse_from([
            "breakout-scanner",
            "--cache",
            "/nonexistent/breakout_scanner/cache.bin",
        ]);
        assert!(build_source(&args).is_err());
    }
}
