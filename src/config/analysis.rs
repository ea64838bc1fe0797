//! Analysis and computation configuration

use crate::domain::pair_interval::Timeframe;

/// Thresholds used to grade a breakout. Comparisons are strict (`>`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthThresholds {
    pub strong_pct_change: f64,
    pub strong_volume_ratio: f64,
    pub medium_pct_change: f64,
    pub medium_volume_ratio: f64,
}

/// Settings for pivot/fractal detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotSettings {
    // Bars required strictly either side of a pivot used for trendlines
    pub window: usize,
    // Smaller window used for the chart fractal markers
    pub fractal_period: usize,
}

/// Settings for the breakout classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakoutSettings {
    // Below this many bars the classifier reports nothing
    pub min_bars: usize,
    // Bars preceding the breakout bar used for the volume baseline
    pub prior_volume_window: usize,
    pub strength: StrengthThresholds,
}

/// The Master Analysis Configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    // Timeframe the scanner requests when none is given
    pub default_timeframe: Timeframe,
    // How many bars to request per fetch
    pub fetch_limit: usize,
    // EMA overlays computed alongside each analysis
    pub ema_periods: &'static [usize],

    // Sub-groups
    pub pivots: PivotSettings,
    pub breakout: BreakoutSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    default_timeframe: Timeframe::M15,
    fetch_limit: 100,
    ema_periods: &[50, 100, 200],

    pivots: PivotSettings {
        window: 10,
        fractal_period: 5,
    },

    breakout: BreakoutSettings {
        min_bars: 30,
        prior_volume_window: 20,
        strength: StrengthThresholds {
            strong_pct_change: 3.0,
            strong_volume_ratio: 1.5,
            medium_pct_change: 1.5,
            medium_volume_ratio: 1.2,
        },
    },
};
