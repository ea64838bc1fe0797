use crate::models::series::CandleSeries;
use crate::models::trendline::{Pivot, Trendline, TrendlineKind};
use crate::utils::maths_utils::{extrapolate, slope};

/// Build a resistance line from two high pivots and a support line from two low
/// pivots, each extended to the last bar of `series`.
///
/// A kind with fewer (or more) than exactly two pivots emits no line. The line's
/// kind comes from the pivot kind alone; slope sign is not filtered, so a
/// rising resistance or falling support is normal.
pub fn build_trendlines(
    series: &CandleSeries,
    high_pivots: &[Pivot],
    low_pivots: &[Pivot],
) -> Vec<Trendline> {
    let Some(last_index) = series.last_index() else {
        return Vec::new();
    };

    [
        (TrendlineKind::Resistance, high_pivots),
        (TrendlineKind::Support, low_pivots),
    ]
    .into_iter()
    .filter_map(|(kind, pivots)| line_through(kind, pivots, last_index))
    .collect()
}

fn line_through(kind: TrendlineKind, pivots: &[Pivot], last_index: usize) -> Option<Trendline> {
    let [first, second] = pivots else {
        return None;
    };
    // Anchor on the earlier pivot whatever order they were handed over in
    let (a, b) = if first.index <= second.index {
        (first, second)
    } else {
        (second, first)
    };

    // Same index twice: no direction to extrapolate in
    let m = slope(a.index, a.price, b.index, b.price)?;

    Some(Trendline {
        kind,
        x1: a.index,
        y1: a.price,
        x2: last_index,
        y2: extrapolate(b.index, b.price, m, last_index),
    })
}
