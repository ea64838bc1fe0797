use serde::{Deserialize, Serialize};

use crate::domain::candle::Candle;
use crate::domain::pair_interval::PairInterval;
use crate::models::series::{CandleSeries, SeriesError};

const ROW_FIELDS: [&str; 6] = ["time", "open", "high", "low", "close", "volume"];

/// Exchange-shaped rows: `[[time, open, high, low, close, volume], ...]`, oldest
/// first. `time` is whole unix seconds (exchange milliseconds must be divided by
/// 1000 before writing). Cells may be `null` when the exchange omitted them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RawOhlcvRows(pub Vec<Vec<Option<f64>>>);

/// Rows plus the pair they were fetched for
pub struct RawOhlcvBatch {
    pub pair_interval: PairInterval,
    pub rows: RawOhlcvRows,
}

fn decode_row(index: usize, row: &[Option<f64>]) -> Result<Candle, SeriesError> {
    if row.len() != ROW_FIELDS.len() {
        return Err(SeriesError::RowWidth {
            index,
            width: row.len(),
        });
    }

    let mut values = [0.0; 6];
    for (slot, (cell, field)) in values.iter_mut().zip(row.iter().zip(ROW_FIELDS)) {
        *slot = cell.ok_or(SeriesError::MissingField { index, field })?;
    }

    let time = values[0];
    if !time.is_finite() {
        return Err(SeriesError::NonFinite {
            index,
            field: "time",
            value: time,
        });
    }

    // Whole seconds within i64 range
    if time.fract() != 0.0 || time < i64::MIN as f64 || time >= i64::MAX as f64 {
        return Err(SeriesError::InvalidTime { index, value: time });
    }

    Ok(Candle::new(
        time as i64,
        values[1],
        values[2],
        values[3],
        values[4],
        values[5],
    ))
}

impl TryFrom<RawOhlcvBatch> for CandleSeries {
    type Error = SeriesError;

    fn try_from(batch: RawOhlcvBatch) -> Result<Self, Self::Error> {
        let candles = batch
            .rows
            .0
            .iter()
            .enumerate()
            .map(|(index, row)| decode_row(index, row))
            .collect::<Result<Vec<_>, _>>()?;
        CandleSeries::from_candles(batch.pair_interval, &candles)
    }
}

impl From<&CandleSeries> for RawOhlcvRows {
    fn from(series: &CandleSeries) -> Self {
        RawOhlcvRows(
            series
                .candles()
                .map(|c| {
                    vec![
                        Some(c.time as f64),
                        Some(c.open),
                        Some(c.high),
                        Some(c.low),
                        Some(c.close),
                        Some(c.volume),
                    ]
                })
                .collect(),
        )
    }
}
