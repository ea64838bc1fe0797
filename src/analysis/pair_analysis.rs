use serde::{Deserialize, Serialize};

use crate::analysis::breakout::classify_breakout;
use crate::analysis::ema::{EmaSeries, compute_emas};
use crate::analysis::pivots::{detect_pivots, find_fractals};
use crate::analysis::trendlines::build_trendlines;
use crate::config::{ANALYSIS, AnalysisConfig, BreakoutSettings};
#[cfg(debug_assertions)]
use crate::config::{PRINT_ANALYSIS_FOR_SYMBOL, PRINT_TRENDLINES};
use crate::domain::pair_interval::Timeframe;
use crate::models::breakout::{Breakout, BreakoutSignals};
use crate::models::series::{CandleSeries, SeriesError};
use crate::models::trendline::{Fractal, Pivot, Trendline, TrendlineKind};

/// Knobs for one analysis run. Defaults come from `config::ANALYSIS`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub pivot_window: usize,
    pub fractal_period: usize,
    pub breakout: BreakoutSettings,
    pub ema_periods: Vec<usize>,
}

impl AnalysisSettings {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            pivot_window: config.pivots.window,
            fractal_period: config.pivots.fractal_period,
            breakout: config.breakout,
            ema_periods: config.ema_periods.to_vec(),
        }
    }

    pub fn with_pivot_window(mut self, pivot_window: usize) -> Self {
        self.pivot_window = pivot_window;
        self
    }

    pub fn with_ema_periods(mut self, ema_periods: Vec<usize>) -> Self {
        self.ema_periods = ema_periods;
        self
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self::from_config(&ANALYSIS)
    }
}

/// Everything one analysis call derives from a series snapshot.
/// Trendlines, EMA overlays and fractals are for chart collaborators; the
/// breakouts feed alerting.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BreakoutAnalysis {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub bars: usize,
    pub last_time: Option<i64>,
    pub high_pivots: Vec<Pivot>,
    pub low_pivots: Vec<Pivot>,
    pub trendlines: Vec<Trendline>,
    pub breakouts: BreakoutSignals,
    pub emas: Vec<EmaSeries>,
    pub fractals: Vec<Fractal>,
}

impl BreakoutAnalysis {
    /// The headline breakout for alerting. If both lines broke on the same bar the
    /// downward one is reported.
    pub fn summary(&self) -> Option<&Breakout> {
        self.breakouts
            .downward
            .as_ref()
            .or(self.breakouts.upward.as_ref())
    }

    pub fn has_breakout(&self) -> bool {
        !self.breakouts.is_empty()
    }

    pub fn trendline(&self, kind: TrendlineKind) -> Option<&Trendline> {
        self.trendlines.iter().find(|line| line.kind == kind)
    }
}

/// Run the full pipeline with default settings and the given pivot window.
pub fn analyze(
    symbol: &str,
    series: &CandleSeries,
    pivot_window: usize,
) -> Result<BreakoutAnalysis, SeriesError> {
    let settings = AnalysisSettings::default().with_pivot_window(pivot_window);
    analyze_with_settings(symbol, series, &settings)
}

/// pivots -> trendlines -> breakout, plus EMA overlays and fractal markers.
///
/// Pure: nothing is cached between calls, so the same snapshot always gives the
/// same result. Short series give an analysis with nothing in it; only a
/// malformed series is an error.
pub fn analyze_with_settings(
    symbol: &str,
    series: &CandleSeries,
    settings: &AnalysisSettings,
) -> Result<BreakoutAnalysis, SeriesError> {
    series.validate()?;

    if let Some(last) = series.last_candle().filter(|c| !c.is_well_formed()) {
        // Tolerated, but a range that misses its own body weakens the crossing test
        log::debug!(
            "{}: last bar body {:?} lies outside its range {}..{}",
            symbol,
            last.body_range(),
            last.low,
            last.high
        );
    }

    let (high_pivots, low_pivots) = detect_pivots(series, settings.pivot_window);
    let trendlines = build_trendlines(series, &high_pivots, &low_pivots);
    let breakouts = classify_breakout(symbol, series, &trendlines, &settings.breakout);

    #[cfg(debug_assertions)]
    if PRINT_TRENDLINES || PRINT_ANALYSIS_FOR_SYMBOL == symbol {
        log::info!(
            "{}: {} bars, pivots H{:?} L{:?}, trendlines {:?}",
            symbol,
            series.len(),
            high_pivots.iter().map(|p| p.index).collect::<Vec<_>>(),
            low_pivots.iter().map(|p| p.index).collect::<Vec<_>>(),
            trendlines
        );
    }

    Ok(BreakoutAnalysis {
        symbol: symbol.to_string(),
        timeframe: series.pair_interval.timeframe,
        bars: series.len(),
        last_time: series.last_candle().map(|c| c.time),
        high_pivots,
        low_pivots,
        trendlines,
        breakouts,
        emas: compute_emas(series, &settings.ema_periods),
        fractals: find_fractals(series, settings.fractal_period),
    })
}
