use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::candle::Candle;
use crate::domain::pair_interval::PairInterval;

/// Data-quality failures in a candle series supplied by a collaborator.
/// Not enough bars is never one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    #[error("row {index}: has {width} fields, expected [time, open, high, low, close, volume]")]
    RowWidth { index: usize, width: usize },

    #[error("row {index}: missing {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("bar {index}: {field} is not finite ({value})")]
    NonFinite {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("bar {index}: {field} must be positive, got {value}")]
    NonPositivePrice {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("row {index}: time {value} is not a whole number of unix seconds")]
    InvalidTime { index: usize, value: f64 },

    #[error("bar {index}: volume must not be negative, got {value}")]
    NegativeVolume { index: usize, value: f64 },

    #[error("bar {index}: time {time} is earlier than previous bar time {previous}")]
    TimeOutOfOrder {
        index: usize,
        time: i64,
        previous: i64,
    },

    #[error("column {field} has {found} values, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

// ============================================================================
// CandleSeries: Raw time series data for one symbol/timeframe
// ============================================================================

/// Columnar OHLCV snapshot. Index order is the only ordering the analysis uses;
/// `times` is carried along purely as a label for output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CandleSeries {
    pub pair_interval: PairInterval,

    pub times: Vec<i64>,

    // Prices
    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,

    pub volumes: Vec<f64>,
}

impl CandleSeries {
    /// Build from row-shaped candles, validating every bar.
    pub fn from_candles(
        pair_interval: PairInterval,
        candles: &[Candle],
    ) -> Result<Self, SeriesError> {
        let series = CandleSeries {
            pair_interval,
            times: candles.iter().map(|c| c.time).collect(),
            open_prices: candles.iter().map(|c| c.open).collect(),
            high_prices: candles.iter().map(|c| c.high).collect(),
            low_prices: candles.iter().map(|c| c.low).collect(),
            close_prices: candles.iter().map(|c| c.close).collect(),
            volumes: candles.iter().map(|c| c.volume).collect(),
        };
        series.validate()?;
        Ok(series)
    }

    /// Check the collaborator contract: equal column lengths, finite positive
    /// prices, finite non-negative volume, non-decreasing time.
    /// The low <= body <= high relation is NOT checked (only degrades detection).
    pub fn validate(&self) -> Result<(), SeriesError> {
        let expected = self.times.len();
        let columns: [(&'static str, usize); 5] = [
            ("open", self.open_prices.len()),
            ("high", self.high_prices.len()),
            ("low", self.low_prices.len()),
            ("close", self.close_prices.len()),
            ("volume", self.volumes.len()),
        ];
        for (field, found) in columns {
            if found != expected {
                return Err(SeriesError::LengthMismatch {
                    field,
                    expected,
                    found,
                });
            }
        }

        for index in 0..expected {
            let prices = [
                ("open", self.open_prices[index]),
                ("high", self.high_prices[index]),
                ("low", self.low_prices[index]),
                ("close", self.close_prices[index]),
            ];
            for (field, value) in prices {
                if !value.is_finite() {
                    return Err(SeriesError::NonFinite {
                        index,
                        field,
                        value,
                    });
                }
                if value <= 0.0 {
                    return Err(SeriesError::NonPositivePrice {
                        index,
                        field,
                        value,
                    });
                }
            }

            let volume = self.volumes[index];
            if !volume.is_finite() {
                return Err(SeriesError::NonFinite {
                    index,
                    field: "volume",
                    value: volume,
                });
            }
            if volume < 0.0 {
                return Err(SeriesError::NegativeVolume {
                    index,
                    value: volume,
                });
            }

            if index > 0 && self.times[index] < self.times[index - 1] {
                return Err(SeriesError::TimeOutOfOrder {
                    index,
                    time: self.times[index],
                    previous: self.times[index - 1],
                });
            }
        }

        Ok(())
    }

    pub fn get_candle(&self, idx: usize) -> Candle {
        Candle::new(
            self.times[idx],
            self.open_prices[idx],
            self.high_prices[idx],
            self.low_prices[idx],
            self.close_prices[idx],
            self.volumes[idx],
        )
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    pub fn last_candle(&self) -> Option<Candle> {
        self.last_index().map(|idx| self.get_candle(idx))
    }

    pub fn time_at(&self, idx: usize) -> Option<i64> {
        self.times.get(idx).copied()
    }

    /// The most recent `limit` bars as a new series (the whole series if shorter).
    pub fn tail(&self, limit: usize) -> CandleSeries {
        let start = self.len().saturating_sub(limit);
        CandleSeries {
            pair_interval: self.pair_interval.clone(),
            times: self.times[start..].to_vec(),
            open_prices: self.open_prices[start..].to_vec(),
            high_prices: self.high_prices[start..].to_vec(),
            low_prices: self.low_prices[start..].to_vec(),
            close_prices: self.close_prices[start..].to_vec(),
            volumes: self.volumes[start..].to_vec(),
        }
    }

    /// Bars as row-shaped candles, oldest first
    pub fn candles(&self) -> impl Iterator<Item = Candle> + '_ {
        (0..self.len()).map(|idx| self.get_candle(idx))
    }
}
