//! Pivot ("fractal") detection over a candle series.
//!
//! A bar is a high pivot when its high is strictly greater than the highs of the
//! `window` bars on each side (lows and "strictly less" for a low pivot). Ties
//! disqualify, so flat tops never produce ambiguous trendline anchors.

use crate::models::series::CandleSeries;
use crate::models::trendline::{Fractal, Pivot, PivotKind};

/// How many pivots of each kind feed the trendline builder
pub const PIVOT_HISTORY_LEN: usize = 2;

/// Fixed-capacity ring of the most recent pivots of one kind.
/// Pushing into a full history overwrites the oldest entry.
#[derive(Debug, Clone)]
pub struct PivotHistory<const N: usize> {
    slots: [Option<Pivot>; N],
    next: usize,
    len: usize,
}

pub type RecentPivots = PivotHistory<PIVOT_HISTORY_LEN>;

impl<const N: usize> PivotHistory<N> {
    pub fn new() -> Self {
        Self {
            slots: [None; N],
            next: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, pivot: Pivot) {
        if N == 0 {
            return;
        }
        self.slots[self.next] = Some(pivot);
        self.next = (self.next + 1) % N;
        self.len = (self.len + 1).min(N);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Oldest first, most recent last
    pub fn to_vec(&self) -> Vec<Pivot> {
        if N == 0 {
            return Vec::new();
        }
        let start = (self.next + N - self.len) % N;
        (0..self.len)
            .filter_map(|offset| self.slots[(start + offset) % N])
            .collect()
    }
}

impl<const N: usize> Default for PivotHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Does `values[i]` beat every neighbour within `window` on both sides?
fn is_pivot(values: &[f64], i: usize, window: usize, kind: PivotKind) -> bool {
    if window == 0 || i < window || i.checked_add(window).is_none_or(|end| end >= values.len()) {
        return false;
    }
    let candidate = values[i];
    (1..=window).all(|j| match kind {
        PivotKind::High => candidate > values[i - j] && candidate > values[i + j],
        PivotKind::Low => candidate < values[i - j] && candidate < values[i + j],
    })
}

/// At least one candidate index: `len >= 2 * window + 1`, without overflowing.
fn has_room(len: usize, window: usize) -> bool {
    window != 0 && len > window.saturating_mul(2)
}

/// Scan the series for pivots and keep the two most recent of each kind.
///
/// Returns `(high_pivots, low_pivots)`, each in index order with the most recent
/// last. A series shorter than `2 * window + 1` (or `window == 0`) has no
/// candidates and yields two empty lists. Any window size is accepted.
pub fn detect_pivots(series: &CandleSeries, window: usize) -> (Vec<Pivot>, Vec<Pivot>) {
    let len = series.len();
    if !has_room(len, window) {
        return (Vec::new(), Vec::new());
    }

    let mut highs = RecentPivots::new();
    let mut lows = RecentPivots::new();

    for i in window..len - window {
        if is_pivot(&series.high_prices, i, window, PivotKind::High) {
            highs.push(Pivot {
                index: i,
                price: series.high_prices[i],
                kind: PivotKind::High,
            });
        }
        if is_pivot(&series.low_prices, i, window, PivotKind::Low) {
            lows.push(Pivot {
                index: i,
                price: series.low_prices[i],
                kind: PivotKind::Low,
            });
        }
    }

    (highs.to_vec(), lows.to_vec())
}

/// Every fractal in the series (not just the two most recent), for chart markers.
/// Where a bar is both a high and a low fractal the high comes first.
pub fn find_fractals(series: &CandleSeries, period: usize) -> Vec<Fractal> {
    let len = series.len();
    if !has_room(len, period) {
        return Vec::new();
    }

    let mut fractals = Vec::new();
    for i in period..len - period {
        for (kind, values) in [
            (PivotKind::High, &series.high_prices),
            (PivotKind::Low, &series.low_prices),
        ] {
            if is_pivot(values, i, period, kind) {
                fractals.push(Fractal {
                    time: series.times[i],
                    index: i,
                    price: values[i],
                    kind,
                });
            }
        }
    }
    fractals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::Candle;
    use crate::domain::pair_interval::{PairInterval, Timeframe};

    /// Series where bar i has the given high and low; open/close sit between them.
    fn series_from(highs: &[f64], lows: &[f64]) -> CandleSeries {
        let candles: Vec<Candle> = highs
            .iter()
            .zip(lows)
            .enumerate()
            .map(|(i, (&h, &l))| {
                let mid = (h + l) / 2.0;
                Candle::new(i as i64 * 60, mid, h, l, mid, 1.0)
            })
            .collect();
        CandleSeries::from_candles(PairInterval::new("TEST/USDT", Timeframe::M1), &candles)
            .unwrap()
    }

    fn flat(len: usize, value: f64) -> Vec<f64> {
        vec![value; len]
    }

    #[test]
    fn test_short_series_has_no_pivots() {
        let window = 3;
        // 2w bars: one short of the minimum
        let mut highs = flat(2 * window, 10.0);
        highs[window] = 50.0;
        let series = series_from(&highs, &flat(2 * window, 5.0));
        let (h, l) = detect_pivots(&series, window);
        assert!(h.is_empty());
        assert!(l.is_empty());
    }

    #[test]
    fn test_minimum_length_series_can_pivot() {
        let window = 3;
        let mut highs = flat(2 * window + 1, 10.0);
        highs[window] = 50.0;
        let series = series_from(&highs, &flat(2 * window + 1, 5.0));
        let (h, _) = detect_pivots(&series, window);
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].index, window);
    }

    #[test]
    fn test_monotonic_highs_have_no_high_pivots() {
        let highs: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let lows: Vec<f64> = highs.iter().map(|h| h - 2.0).collect();
        let series = series_from(&highs, &lows);
        let (h, l) = detect_pivots(&series, 5);
        assert!(h.is_empty());
        assert!(l.is_empty());
    }

    #[test]
    fn test_single_planted_maximum() {
        let window = 5;
        let k = 15;
        let mut highs = flat(31, 10.0);
        highs[k] = 20.0;
        let series = series_from(&highs, &flat(31, 5.0));
        let (h, l) = detect_pivots(&series, window);
        assert_eq!(
            h,
            vec![Pivot {
                index: k,
                price: 20.0,
                kind: PivotKind::High
            }]
        );
        // Flat lows are all ties, so none qualify
        assert!(l.is_empty());
    }

    #[test]
    fn test_ties_disqualify() {
        let window = 2;
        let mut highs = flat(11, 10.0);
        highs[5] = 20.0;
        highs[7] = 20.0; // within window of index 5, equal
        let series = series_from(&highs, &flat(11, 5.0));
        let (h, _) = detect_pivots(&series, window);
        assert!(h.is_empty());
    }

    #[test]
    fn test_keeps_two_most_recent_in_index_order() {
        let window = 3;
        let mut highs = flat(70, 10.0);
        highs[10] = 20.0;
        highs[30] = 25.0;
        highs[50] = 30.0;
        let mut lows = flat(70, 5.0);
        lows[20] = 1.0;
        lows[40] = 2.0;
        lows[60] = 3.0;
        let series = series_from(&highs, &lows);

        let (h, l) = detect_pivots(&series, window);
        let high_idx: Vec<usize> = h.iter().map(|p| p.index).collect();
        let low_idx: Vec<usize> = l.iter().map(|p| p.index).collect();
        assert_eq!(high_idx, vec![30, 50]);
        assert_eq!(low_idx, vec![40, 60]);
        assert_eq!(l[1].price, 3.0);
        assert!(l.iter().all(|p| p.kind == PivotKind::Low));
    }

    #[test]
    fn test_pivot_too_close_to_the_end_is_unconfirmed() {
        let window = 4;
        let mut highs = flat(20, 10.0);
        highs[17] = 99.0; // only 2 bars after it
        let series = series_from(&highs, &flat(20, 5.0));
        let (h, _) = detect_pivots(&series, window);
        assert!(h.is_empty());
    }

    #[test]
    fn test_zero_window_yields_nothing() {
        let series = series_from(&[1.0, 3.0, 2.0], &[0.5, 0.4, 0.6]);
        assert_eq!(detect_pivots(&series, 0), (Vec::new(), Vec::new()));
        assert!(find_fractals(&series, 0).is_empty());
    }

    #[test]
    fn test_huge_window_yields_nothing() {
        let window = usize::MAX / 2 + 1;
        let mut highs = flat(40, 10.0);
        highs[20] = 50.0;
        let series = series_from(&highs, &flat(40, 5.0));
        assert_eq!(detect_pivots(&series, window), (Vec::new(), Vec::new()));
        assert!(find_fractals(&series, window).is_empty());
        assert!(!is_pivot(&series.high_prices, 20, usize::MAX, PivotKind::High));
    }

    #[test]
    fn test_history_ring_overwrites_oldest() {
        let mut history = PivotHistory::<2>::new();
        assert!(history.is_empty());
        for index in [3, 8, 12] {
            history.push(Pivot {
                index,
                price: index as f64,
                kind: PivotKind::High,
            });
        }
        assert_eq!(history.len(), 2);
        let kept: Vec<usize> = history.to_vec().iter().map(|p| p.index).collect();
        assert_eq!(kept, vec![8, 12]);
    }

    #[test]
    fn test_fractals_returns_all() {
        let period = 2;
        let mut highs = flat(20, 10.0);
        highs[4] = 15.0;
        highs[9] = 16.0;
        highs[14] = 17.0;
        let mut lows = flat(20, 5.0);
        lows[9] = 1.0;
        let series = series_from(&highs, &lows);

        let fractals = find_fractals(&series, period);
        let summary: Vec<(usize, PivotKind)> =
            fractals.iter().map(|f| (f.index, f.kind)).collect();
        assert_eq!(
            summary,
            vec![
                (4, PivotKind::High),
                (9, PivotKind::High),
                (9, PivotKind::Low),
                (14, PivotKind::High)
            ]
        );
        assert_eq!(fractals[1].time, 9 * 60);
    }
}
