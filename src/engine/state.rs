use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::analysis::pair_analysis::BreakoutAnalysis;
use crate::domain::pair_interval::PairInterval;

/// Represents the state of a single pair in the engine.
#[derive(Debug, Clone)]
pub struct PairState {
    pub pair: PairInterval,

    /// The front buffer. Readers clone the Arc; a finished job replaces it.
    pub analysis: Option<Arc<BreakoutAnalysis>>,

    /// When the last result (success or failure) came back
    pub last_update_time: Option<Instant>,

    /// Is a worker currently crunching this pair?
    pub is_calculating: bool,

    pub last_error: Option<String>,
    pub last_duration_ms: Option<u128>,
}

impl PairState {
    pub fn new(pair: PairInterval) -> Self {
        Self {
            pair,
            analysis: None,
            last_update_time: None,
            is_calculating: false,
            last_error: None,
            last_duration_ms: None,
        }
    }

    /// Promote a finished analysis to the front buffer.
    pub fn update_buffer(&mut self, analysis: Arc<BreakoutAnalysis>) {
        self.analysis = Some(analysis);
        self.is_calculating = false;
        self.last_update_time = Some(Instant::now());
        self.last_error = None;
    }

    /// Failures keep the previous front buffer.
    pub fn record_error(&mut self, error: String) {
        self.last_error = Some(error);
        self.is_calculating = false;
        self.last_update_time = Some(Instant::now());
    }

    /// True once the pair has never been analysed or its last result is older
    /// than `interval`.
    pub fn is_due(&self, interval: Duration) -> bool {
        match self.last_update_time {
            None => true,
            Some(at) => at.elapsed() >= interval,
        }
    }
}
