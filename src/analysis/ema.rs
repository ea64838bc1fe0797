use serde::{Deserialize, Serialize};

use crate::models::series::CandleSeries;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EmaPoint {
    pub time: i64,
    pub value: f64,
}

/// One EMA overlay for a chart
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmaSeries {
    pub period: usize,
    pub points: Vec<EmaPoint>,
}

/// Exponential moving average of closes, seeded with the simple average of the
/// first `period` closes.
///
/// The first point is emitted at bar `period - 1`, so the result has
/// `len - period + 1` points aligned to the tail of the series. Empty when
/// `period == 0` or the series is shorter than `period`.
pub fn compute_ema(series: &CandleSeries, period: usize) -> Vec<EmaPoint> {
    let closes = &series.close_prices;
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed = closes[..period].iter().sum::<f64>() / period as f64;

    let mut points = Vec::with_capacity(closes.len() - period + 1);
    points.push(EmaPoint {
        time: series.times[period - 1],
        value: seed,
    });

    let mut prev = seed;
    for i in period..closes.len() {
        prev = (closes[i] - prev) * k + prev;
        points.push(EmaPoint {
            time: series.times[i],
            value: prev,
        });
    }
    points
}

/// EMA for each requested period; periods with too little data give empty overlays.
pub fn compute_emas(series: &CandleSeries, periods: &[usize]) -> Vec<EmaSeries> {
    periods
        .iter()
        .map(|&period| EmaSeries {
            period,
            points: compute_ema(series, period),
        })
        .collect()
}
