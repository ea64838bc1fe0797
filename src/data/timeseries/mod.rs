pub mod cache_file;
pub mod json_dir;
pub mod memory;
pub mod raw_ohlcv;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::pair_interval::PairInterval;
use crate::models::series::CandleSeries;

/// Where candle snapshots come from. Implementations are constructed explicitly
/// and handed to the monitor/engine; the analysis core never sees them.
pub trait CandleSource: Send + Sync {
    /// The most recent `limit` bars for `pair`, oldest first
    fn fetch_ohlcv(&self, pair: &PairInterval, limit: usize) -> Result<CandleSeries>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Tries each source in order and returns the first success.
pub struct FallbackSource {
    pub sources: Vec<Box<dyn CandleSource>>,
}

impl CandleSource for FallbackSource {
    fn fetch_ohlcv(&self, pair: &PairInterval, limit: usize) -> Result<CandleSeries> {
        for source in &self.sources {
            match source.fetch_ohlcv(pair, limit) {
                Ok(series) => return Ok(series),
                Err(e) => {
                    log::info!("{} failed for {}: {:#}", source.signature(), pair, e);
                    // Continue to the next implementation
                }
            }
        }
        Err(anyhow!("All candle sources failed for {}", pair))
    }

    fn signature(&self) -> &'static str {
        "Fallback chain"
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct SeriesCollection {
    pub name: String, // Metadata e.g. "Demo Series Collection".
    pub version: f64,
    pub series_data: Vec<CandleSeries>,
}

impl SeriesCollection {
    pub fn unique_pair_names(&self) -> Vec<String> {
        // BTreeSet maintains sorted order and ensures uniqueness
        self.series_data
            .iter()
            .map(|s| s.pair_interval.name().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn find(&self, pair: &PairInterval) -> Result<&CandleSeries> {
        self.series_data
            .iter()
            .find(|s| &s.pair_interval == pair)
            .ok_or_else(|| anyhow!("No candle data found for {}", pair))
    }
}
