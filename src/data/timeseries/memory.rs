use anyhow::Result;

use crate::data::timeseries::{CandleSource, SeriesCollection};
use crate::domain::pair_interval::PairInterval;
use crate::models::series::CandleSeries;

/// Serves snapshots out of an in-memory collection (loaded cache, tests, demos).
pub struct MemorySource {
    collection: SeriesCollection,
}

impl MemorySource {
    pub fn new(collection: SeriesCollection) -> Self {
        Self { collection }
    }
}

impl CandleSource for MemorySource {
    fn fetch_ohlcv(&self, pair: &PairInterval, limit: usize) -> Result<CandleSeries> {
        Ok(self.collection.find(pair)?.tail(limit))
    }

    fn signature(&self) -> &'static str {
        "In-memory collection"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::Candle;
    use crate::domain::pair_interval::Timeframe;

    #[test]
    fn test_returns_most_recent_bars() {
        let pair = PairInterval::new("BTC/USDT", Timeframe::M15);
        let candles: Vec<Candle> = (0..10)
            .map(|i| Candle::new(i * 900, 1.0, 2.0, 0.5, 1.5, i as f64))
            .collect();
        let source = MemorySource::new(SeriesCollection {
            name: "t".to_string(),
            version: 1.0,
            series_data: vec![CandleSeries::from_candles(pair.clone(), &candles).unwrap()],
        });

        let snapshot = source.fetch_ohlcv(&pair, 4).unwrap();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.times.first(), Some(&(6 * 900)));
        assert_eq!(snapshot.volumes.last(), Some(&9.0));
    }
}
