use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::analysis::pair_analysis::{AnalysisSettings, BreakoutAnalysis, analyze_with_settings};
use crate::config::SCANNER;
use crate::data::timeseries::CandleSource;
use crate::domain::pair_interval::PairInterval;
use crate::models::breakout::{Breakout, Direction};
use crate::models::pair_context::PairContext;
use crate::utils::time_utils::now_as_timestamp_secs;

/// Fetch one snapshot and run the pipeline on it.
pub fn fetch_and_analyze(
    source: &dyn CandleSource,
    pair: &PairInterval,
    limit: usize,
    settings: &AnalysisSettings,
) -> Result<BreakoutAnalysis> {
    let series = source
        .fetch_ohlcv(pair, limit)
        .context(format!("Fetching candles for {}", pair))?;
    let analysis = analyze_with_settings(&pair.symbol, &series, settings)
        .context(format!("Analysing {}", pair))?;
    Ok(analysis)
}

/// Outcome counts of one `scan_all` pass
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    pub analysed: usize,
    pub failed: usize,
    /// Breakouts not seen on a previous pass, newest bar first
    pub new_alerts: Vec<Breakout>,
}

/// Multi-pair monitoring system for breakout detection.
/// Tracks the latest analysis per pair and a bounded list of recent alerts.
pub struct MultiPairMonitor {
    contexts: HashMap<String, PairContext>,
    recent_alerts: VecDeque<Breakout>,
    alert_capacity: usize,
}

impl MultiPairMonitor {
    /// Create a new empty monitor
    pub fn new() -> Self {
        Self::with_alert_capacity(SCANNER.recent_alerts_capacity)
    }

    pub fn with_alert_capacity(alert_capacity: usize) -> Self {
        Self {
            contexts: HashMap::new(),
            recent_alerts: VecDeque::with_capacity(alert_capacity),
            alert_capacity,
        }
    }

    /// Add a pair to monitoring (no-op if already present)
    pub fn add_pair(&mut self, pair: PairInterval) {
        self.contexts
            .entry(pair.key())
            .or_insert_with(|| PairContext::new(pair));
    }

    /// Store one analysis outcome. Returns the breakouts that were not already in
    /// the recent-alerts list; polling the same bar twice does not re-alert.
    pub fn record_result(
        &mut self,
        pair: &PairInterval,
        result: Result<Arc<BreakoutAnalysis>, String>,
        now_secs: i64,
    ) -> Vec<Breakout> {
        self.add_pair(pair.clone());
        let Some(context) = self.contexts.get_mut(&pair.key()) else {
            return Vec::new();
        };

        match result {
            Ok(analysis) => {
                let fresh: Vec<Breakout> = analysis
                    .breakouts
                    .iter()
                    .filter(|b| !self.recent_alerts.iter().any(|seen| same_alert(seen, b)))
                    .cloned()
                    .collect();
                context.record_analysis(analysis, now_secs);
                for breakout in &fresh {
                    log::info!("Breakout: {}", breakout.description());
                    self.push_alert(breakout.clone());
                }
                fresh
            }
            Err(e) => {
                log::warn!("{}: analysis failed: {}", pair, e);
                context.record_error(e);
                Vec::new()
            }
        }
    }

    fn push_alert(&mut self, breakout: Breakout) {
        if self.alert_capacity == 0 {
            return;
        }
        self.recent_alerts.push_front(breakout);
        self.recent_alerts.truncate(self.alert_capacity);
    }

    /// Analyse every pair in parallel against `source` and record the results.
    /// One pair failing (bad data, missing file) does not affect the others.
    pub fn scan_all(
        &mut self,
        source: &dyn CandleSource,
        pairs: &[PairInterval],
        limit: usize,
        settings: &AnalysisSettings,
    ) -> ScanSummary {
        let results: Vec<(&PairInterval, Result<BreakoutAnalysis>)> = pairs
            .par_iter()
            .map(|pair| (pair, fetch_and_analyze(source, pair, limit, settings)))
            .collect();

        let now_secs = now_as_timestamp_secs();
        let mut summary = ScanSummary::default();
        for (pair, result) in results {
            match result {
                Ok(analysis) => {
                    summary.analysed += 1;
                    let fresh = self.record_result(pair, Ok(Arc::new(analysis)), now_secs);
                    summary.new_alerts.extend(fresh);
                }
                Err(e) => {
                    summary.failed += 1;
                    self.record_result(pair, Err(format!("{:#}", e)), now_secs);
                }
            }
        }
        summary
            .new_alerts
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        summary
    }

    /// Get all pairs whose latest analysis has a breakout
    pub fn get_signals(&self) -> Vec<&PairContext> {
        self.contexts
            .values()
            .filter(|ctx| ctx.has_signals())
            .collect()
    }

    /// Get context for a specific pair
    pub fn get_context(&self, pair: &PairInterval) -> Option<&PairContext> {
        self.contexts.get(&pair.key())
    }

    /// Get all contexts
    pub fn get_all_contexts(&self) -> Vec<&PairContext> {
        self.contexts.values().collect()
    }

    /// Get count of monitored pairs
    pub fn pair_count(&self) -> usize {
        self.contexts.len()
    }

    /// Newest first
    pub fn recent_alerts(&self) -> impl Iterator<Item = &Breakout> {
        self.recent_alerts.iter()
    }

    pub fn failed_pairs(&self) -> Vec<(&PairInterval, &str)> {
        self.contexts
            .values()
            .filter_map(|ctx| ctx.last_error.as_deref().map(|e| (&ctx.pair, e)))
            .collect()
    }

    /// Symbols grouped by the direction of their current breakout(s)
    pub fn pairs_by_direction(&self) -> HashMap<Direction, Vec<String>> {
        let mut grouped: HashMap<Direction, Vec<String>> = HashMap::new();

        for context in self.contexts.values() {
            for direction in context.directions() {
                grouped
                    .entry(direction)
                    .or_default()
                    .push(context.pair.symbol.clone());
            }
        }
        for symbols in grouped.values_mut() {
            symbols.sort();
        }

        grouped
    }
}

impl Default for MultiPairMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn same_alert(a: &Breakout, b: &Breakout) -> bool {
    a.symbol == b.symbol && a.direction == b.direction && a.timestamp == b.timestamp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::timeseries::SeriesCollection;
    use crate::data::timeseries::memory::MemorySource;
    use crate::domain::candle::Candle;
    use crate::domain::pair_interval::Timeframe;
    use crate::models::series::CandleSeries;

    /// Flat market with two falling high pivots; the last bar pushes through
    /// the resistance when `breakout` is set.
    fn series(symbol: &str, breakout: bool, start_time: i64) -> CandleSeries {
        let mut candles: Vec<Candle> = (0..40)
            .map(|i| Candle::new(start_time + i * 900, 95.0, 100.0, 90.0, 95.0, 10.0))
            .collect();
        candles[10].high = 120.0;
        candles[20].high = 115.0;
        if breakout {
            let last = candles.len() - 1;
            candles[last] = Candle::new(start_time + 39 * 900, 98.0, 108.0, 97.0, 107.0, 40.0);
        }
        CandleSeries::from_candles(PairInterval::new(symbol, Timeframe::M15), &candles).unwrap()
    }

    fn source(series_data: Vec<CandleSeries>) -> MemorySource {
        MemorySource::new(SeriesCollection {
            name: "test".to_string(),
            version: 1.0,
            series_data,
        })
    }

    fn settings() -> AnalysisSettings {
        AnalysisSettings::default()
            .with_pivot_window(3)
            .with_ema_periods(vec![])
    }

    fn pair(symbol: &str) -> PairInterval {
        PairInterval::new(symbol, Timeframe::M15)
    }

    #[test]
    fn test_scan_all_isolates_failures() {
        let source = source(vec![series("BTC/USDT", true, 0), series("ETH/USDT", false, 0)]);
        let pairs = vec![pair("BTC/USDT"), pair("ETH/USDT"), pair("MISSING/USDT")];

        let mut monitor = MultiPairMonitor::new();
        let summary = monitor.scan_all(&source, &pairs, 100, &settings());

        assert_eq!(summary.analysed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.new_alerts.len(), 1);
        assert_eq!(summary.new_alerts[0].symbol, "BTC/USDT");
        assert_eq!(monitor.pair_count(), 3);
        assert_eq!(monitor.get_signals().len(), 1);
        assert_eq!(monitor.failed_pairs().len(), 1);
        assert_eq!(monitor.failed_pairs()[0].0.symbol, "MISSING/USDT");

        let grouped = monitor.pairs_by_direction();
        assert_eq!(grouped.get(&Direction::Upward), Some(&vec!["BTC/USDT".to_string()]));
        assert!(grouped.get(&Direction::Downward).is_none());
    }

    #[test]
    fn test_same_bar_does_not_realert() {
        let source = source(vec![series("BTC/USDT", true, 0)]);
        let pairs = vec![pair("BTC/USDT")];
        let mut monitor = MultiPairMonitor::new();

        assert_eq!(monitor.scan_all(&source, &pairs, 100, &settings()).new_alerts.len(), 1);
        assert!(monitor.scan_all(&source, &pairs, 100, &settings()).new_alerts.is_empty());
        assert_eq!(monitor.recent_alerts().count(), 1);
        // Still flagged as a live signal
        assert_eq!(monitor.get_signals().len(), 1);
    }

    #[test]
    fn test_recent_alerts_are_bounded_newest_first() {
        let mut monitor = MultiPairMonitor::with_alert_capacity(2);
        let settings = settings();
        for (n, start) in [0_i64, 100_000, 200_000].into_iter().enumerate() {
            let snapshot = series("BTC/USDT", true, start);
            let analysis = analyze_with_settings("BTC/USDT", &snapshot, &settings).unwrap();
            let fresh = monitor.record_result(&pair("BTC/USDT"), Ok(Arc::new(analysis)), n as i64);
            assert_eq!(fresh.len(), 1);
        }
        let times: Vec<i64> = monitor.recent_alerts().map(|b| b.timestamp).collect();
        assert_eq!(times, vec![200_000 + 39 * 900, 100_000 + 39 * 900]);
    }

    #[test]
    fn test_error_keeps_previous_analysis() {
        let mut monitor = MultiPairMonitor::new();
        let snapshot = series("BTC/USDT", true, 0);
        let analysis = analyze_with_settings("BTC/USDT", &snapshot, &settings()).unwrap();
        monitor.record_result(&pair("BTC/USDT"), Ok(Arc::new(analysis)), 1);
        monitor.record_result(&pair("BTC/USDT"), Err("timeout".to_string()), 2);

        let ctx = monitor.get_context(&pair("BTC/USDT")).unwrap();
        assert_eq!(ctx.last_error.as_deref(), Some("timeout"));
        assert_eq!(ctx.last_updated, Some(1));
        assert!(ctx.current_breakout().is_some());
    }
}
