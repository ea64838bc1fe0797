//! Breakout classification against extrapolated trendlines.
//!
//! A line counts as broken when it passes strictly through the last bar's
//! low..high range. This reacts on the bar whose range engulfs the line, without
//! waiting for a close on the other side.

#[cfg(debug_assertions)]
use crate::config::PRINT_STRENGTH_INPUTS;
use crate::config::{BreakoutSettings, StrengthThresholds};
use crate::models::breakout::{Breakout, BreakoutSignals, Direction, Strength};
use crate::models::series::CandleSeries;
use crate::models::trendline::Trendline;
use crate::utils::maths_utils::{mean, pct_change};

/// Grade a breakout from its bar-on-bar % change and volume ratio.
/// Both thresholds of a tier must be exceeded strictly.
pub fn classify_strength(
    percent_change: f64,
    volume_ratio: f64,
    thresholds: &StrengthThresholds,
) -> Strength {
    let move_size = percent_change.abs();
    if move_size > thresholds.strong_pct_change && volume_ratio > thresholds.strong_volume_ratio {
        Strength::Strong
    } else if move_size > thresholds.medium_pct_change
        && volume_ratio > thresholds.medium_volume_ratio
    {
        Strength::Medium
    } else {
        Strength::Weak
    }
}

/// Volume at `idx` relative to the mean volume of up to `prior_window` bars before it.
/// Uses however many prior bars exist (at least one). With no prior bars, or a
/// zero-volume baseline, there is nothing to compare against and the ratio is 0.
pub fn volume_ratio(series: &CandleSeries, idx: usize, prior_window: usize) -> f64 {
    let start = idx.saturating_sub(prior_window.max(1));
    let baseline = match mean(&series.volumes[start..idx]) {
        Some(baseline) if baseline > 0.0 => baseline,
        _ => return 0.0,
    };
    series.volumes[idx] / baseline
}

/// Test each trendline against the last bar and build at most one breakout per
/// direction. Resistance crossings are upward, support crossings downward.
///
/// Series shorter than `settings.min_bars` never produce a breakout.
pub fn classify_breakout(
    symbol: &str,
    series: &CandleSeries,
    trendlines: &[Trendline],
    settings: &BreakoutSettings,
) -> BreakoutSignals {
    let mut signals = BreakoutSignals::default();

    // Need at least two bars for a % change regardless of configuration
    if series.len() < settings.min_bars.max(2) {
        return signals;
    }
    let Some(last) = series.last_index() else {
        return signals;
    };
    let bar = series.get_candle(last);

    let crossed: Vec<&Trendline> = trendlines
        .iter()
        .filter(|line| bar.range_straddles(line.line_value()))
        .collect();
    if crossed.is_empty() {
        return signals;
    }

    let percent_change = pct_change(series.close_prices[last - 1], bar.close);
    let ratio = volume_ratio(series, last, settings.prior_volume_window);
    let strength = classify_strength(percent_change, ratio, &settings.strength);

    #[cfg(debug_assertions)]
    if PRINT_STRENGTH_INPUTS {
        log::info!(
            "{}: {} line(s) crossed, change {:.3}%, volume ratio {:.3} -> {}",
            symbol,
            crossed.len(),
            percent_change,
            ratio,
            strength
        );
    }

    for line in crossed {
        let direction = Direction::from(line.kind);
        let slot = match direction {
            Direction::Upward => &mut signals.upward,
            Direction::Downward => &mut signals.downward,
        };
        if slot.is_some() {
            continue;
        }
        let (line_start_time, line_end_time) = line.anchor_times(series);
        *slot = Some(Breakout {
            symbol: symbol.to_string(),
            direction,
            strength,
            price: bar.close,
            percent_change,
            volume: bar.volume,
            volume_ratio: ratio,
            timestamp: bar.time,
            broken_line: *line,
            line_start_time,
            line_end_time,
        });
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ANALYSIS;
    use crate::domain::candle::Candle;
    use crate::domain::pair_interval::{PairInterval, Timeframe};
    use crate::models::trendline::TrendlineKind;

    const THRESHOLDS: StrengthThresholds = ANALYSIS.breakout.strength;

    /// `len` quiet bars around 140 with volume 10, then the supplied last bar.
    fn series_ending_with(len: usize, last: Candle) -> CandleSeries {
        let mut candles: Vec<Candle> = (0..len - 1)
            .map(|i| Candle::new(i as i64 * 900, 139.5, 140.5, 139.0, 140.0, 10.0))
            .collect();
        candles.push(Candle { time: (len as i64 - 1) * 900, ..last });
        CandleSeries::from_candles(PairInterval::new("BTC/USDT", Timeframe::M15), &candles)
            .unwrap()
    }

    fn line(kind: TrendlineKind, value: f64, last_index: usize) -> Trendline {
        Trendline {
            kind,
            x1: 2,
            y1: value,
            x2: last_index,
            y2: value,
        }
    }

    #[test]
    fn test_range_through_resistance_is_upward() {
        let series = series_ending_with(40, Candle::new(0, 139.0, 142.0, 138.0, 141.0, 10.0));
        let lines = [line(TrendlineKind::Resistance, 140.0, 39)];
        let signals = classify_breakout("BTC/USDT", &series, &lines, &ANALYSIS.breakout);

        let up = signals.upward.expect("upward breakout");
        assert!(signals.downward.is_none());
        assert_eq!(up.direction, Direction::Upward);
        assert_eq!(up.symbol, "BTC/USDT");
        assert_eq!(up.price, 141.0);
        assert_eq!(up.timestamp, 39 * 900);
        assert_eq!(up.broken_line, lines[0]);
        assert_eq!(up.line_start_time, Some(2 * 900));
        assert_eq!(up.line_end_time, Some(39 * 900));
    }

    #[test]
    fn test_line_below_bar_does_not_fire() {
        let series = series_ending_with(40, Candle::new(0, 142.0, 145.0, 141.0, 144.0, 10.0));
        let lines = [line(TrendlineKind::Resistance, 140.0, 39)];
        let signals = classify_breakout("BTC/USDT", &series, &lines, &ANALYSIS.breakout);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_touching_the_wick_tip_does_not_fire() {
        let series = series_ending_with(40, Candle::new(0, 139.0, 140.0, 138.0, 139.5, 10.0));
        let lines = [line(TrendlineKind::Resistance, 140.0, 39)];
        assert!(classify_breakout("X", &series, &lines, &ANALYSIS.breakout).is_empty());
    }

    #[test]
    fn test_support_crossing_is_downward() {
        let series = series_ending_with(35, Candle::new(0, 140.0, 140.5, 136.0, 136.5, 10.0));
        let lines = [line(TrendlineKind::Support, 138.0, 34)];
        let signals = classify_breakout("X", &series, &lines, &ANALYSIS.breakout);
        assert!(signals.upward.is_none());
        assert_eq!(signals.downward.unwrap().direction, Direction::Downward);
    }

    #[test]
    fn test_both_directions_can_fire() {
        let series = series_ending_with(35, Candle::new(0, 140.0, 145.0, 135.0, 141.0, 10.0));
        let lines = [
            line(TrendlineKind::Resistance, 143.0, 34),
            line(TrendlineKind::Support, 137.0, 34),
        ];
        let signals = classify_breakout("X", &series, &lines, &ANALYSIS.breakout);
        assert!(signals.upward.is_some());
        assert!(signals.downward.is_some());
        assert_eq!(signals.iter().count(), 2);
    }

    #[test]
    fn test_too_few_bars_never_fires() {
        let series = series_ending_with(29, Candle::new(0, 139.0, 142.0, 138.0, 141.0, 10.0));
        let lines = [line(TrendlineKind::Resistance, 140.0, 28)];
        assert!(classify_breakout("X", &series, &lines, &ANALYSIS.breakout).is_empty());
    }

    #[test]
    fn test_strong_breakout_from_move_and_volume() {
        // prior close 140, last close 145 -> +3.57%, volume 30 vs baseline 10 -> 3.0
        let series = series_ending_with(40, Candle::new(0, 140.0, 146.0, 139.5, 145.0, 30.0));
        let lines = [line(TrendlineKind::Resistance, 142.0, 39)];
        let up = classify_breakout("X", &series, &lines, &ANALYSIS.breakout)
            .upward
            .unwrap();
        assert!((up.percent_change - 3.5714285714).abs() < 1e-6);
        assert!((up.volume_ratio - 3.0).abs() < 1e-12);
        assert_eq!(up.volume, 30.0);
        assert_eq!(up.strength, Strength::Strong);
    }

    #[test]
    fn test_big_move_on_silent_baseline_is_weak() {
        let mut candles: Vec<Candle> = (0..39)
            .map(|i| Candle::new(i * 900, 139.5, 140.5, 139.0, 140.0, 0.0))
            .collect();
        candles.push(Candle::new(39 * 900, 140.0, 146.0, 139.5, 145.0, 30.0));
        let series =
            CandleSeries::from_candles(PairInterval::new("X", Timeframe::M15), &candles).unwrap();
        let lines = [line(TrendlineKind::Resistance, 142.0, 39)];
        let up = classify_breakout("X", &series, &lines, &ANALYSIS.breakout)
            .upward
            .unwrap();
        assert_eq!(up.volume_ratio, 0.0);
        assert_eq!(up.strength, Strength::Weak);
    }

    #[test]
    fn test_volume_ratio_excludes_breakout_bar() {
        let series = series_ending_with(40, Candle::new(0, 140.0, 141.0, 139.0, 140.0, 25.0));
        assert!((volume_ratio(&series, 39, 20) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_volume_ratio_uses_available_prior_bars() {
        let candles = vec![
            Candle::new(0, 10.0, 11.0, 9.0, 10.0, 4.0),
            Candle::new(1, 10.0, 11.0, 9.0, 10.0, 8.0),
            Candle::new(2, 10.0, 11.0, 9.0, 10.0, 12.0),
        ];
        let series =
            CandleSeries::from_candles(PairInterval::new("X", Timeframe::M1), &candles).unwrap();
        // Only two prior bars: mean 6
        assert!((volume_ratio(&series, 2, 20) - 2.0).abs() < 1e-12);
        // Nothing before the first bar
        assert_eq!(volume_ratio(&series, 0, 20), 0.0);
    }

    #[test]
    fn test_zero_volume_baseline() {
        let candles = vec![
            Candle::new(0, 10.0, 11.0, 9.0, 10.0, 0.0),
            Candle::new(1, 10.0, 11.0, 9.0, 10.0, 5.0),
        ];
        let series =
            CandleSeries::from_candles(PairInterval::new("X", Timeframe::M1), &candles).unwrap();
        assert_eq!(volume_ratio(&series, 1, 20), 0.0);
    }

    #[test]
    fn test_strength_thresholds_are_strict() {
        assert_eq!(classify_strength(3.0, 2.0, &THRESHOLDS), Strength::Medium);
        assert_eq!(classify_strength(3.01, 1.51, &THRESHOLDS), Strength::Strong);
        assert_eq!(classify_strength(3.5, 1.5, &THRESHOLDS), Strength::Medium);
        assert_eq!(classify_strength(1.5, 2.0, &THRESHOLDS), Strength::Weak);
        assert_eq!(classify_strength(2.0, 1.2, &THRESHOLDS), Strength::Weak);
        assert_eq!(classify_strength(-3.5, 1.6, &THRESHOLDS), Strength::Strong);
        assert_eq!(classify_strength(-1.6, 1.3, &THRESHOLDS), Strength::Medium);
    }
}
