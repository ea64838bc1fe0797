use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::timeseries::CandleSource;
use crate::data::timeseries::raw_ohlcv::{RawOhlcvBatch, RawOhlcvRows};
use crate::domain::pair_interval::PairInterval;
use crate::models::series::CandleSeries;

/// Reads raw exchange rows from `<directory>/<SYMBOL>_<timeframe>.json`,
/// e.g. `data/BTCUSDT_15m.json`. Each file is a JSON array of
/// `[time, open, high, low, close, volume]` rows with `time` in whole unix
/// seconds, not milliseconds. Files are re-read on every fetch, so an external
/// process can keep them fresh.
pub struct JsonDirSource {
    pub directory: PathBuf,
}

impl JsonDirSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_for(&self, pair: &PairInterval) -> PathBuf {
        self.directory.join(format!("{}.json", pair.key()))
    }

    /// Write a series in the same row format this source reads.
    pub fn write_series(directory: &Path, series: &CandleSeries) -> Result<PathBuf> {
        fs::create_dir_all(directory)
            .context(format!("Failed to create directory: {}", directory.display()))?;
        let source = JsonDirSource::new(directory);
        let path = source.path_for(&series.pair_interval);
        let json = serde_json::to_string(&RawOhlcvRows::from(series))?;
        fs::write(&path, json).context(format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

impl CandleSource for JsonDirSource {
    fn fetch_ohlcv(&self, pair: &PairInterval, limit: usize) -> Result<CandleSeries> {
        let path = self.path_for(pair);
        let text =
            fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))?;
        let rows: RawOhlcvRows = serde_json::from_str(&text)
            .context(format!("Failed to parse candle rows in {}", path.display()))?;
        let series = CandleSeries::try_from(RawOhlcvBatch {
            pair_interval: pair.clone(),
            rows,
        })
        .context(format!("Malformed candles in {}", path.display()))?;
        Ok(series.tail(limit))
    }

    fn signature(&self) -> &'static str {
        "JSON row files"
    }
}
