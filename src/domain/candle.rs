use serde::{Deserialize, Serialize};

// Define the CandleType enum
#[derive(Debug, PartialEq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// One OHLCV bar. `time` is the bar's open time in unix seconds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

// Implement methods for the Candle struct
impl Candle {
    // A constructor for convenience (same field order as exchange rows)
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Candle {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    // A method to determine the type of candle
    pub fn get_type(&self) -> CandleType {
        if self.close >= self.open {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open, self.close),
            CandleType::Bearish => (self.close, self.open),
        }
    }

    /// True when `price` lies strictly inside the bar's low..high range.
    /// A line touching the wick tip exactly does not count.
    pub fn range_straddles(&self, price: f64) -> bool {
        self.low < price && price < self.high
    }

    /// low <= body <= high. Not enforced on input; `analyze_with_settings` logs
    /// when the last bar breaks it.
    pub fn is_well_formed(&self) -> bool {
        let (body_low, body_high) = self.body_range();
        self.low <= body_low && body_high <= self.high
    }
}
