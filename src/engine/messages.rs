use std::sync::Arc;

use crate::analysis::pair_analysis::{AnalysisSettings, BreakoutAnalysis};
use crate::data::timeseries::CandleSource;
use crate::domain::pair_interval::PairInterval;

/// A request to analyse one pair
#[derive(Clone)]
pub struct JobRequest {
    pub pair: PairInterval,
    pub settings: AnalysisSettings,
    pub limit: usize,
    // Shared handle to wherever the candles come from
    pub source: Arc<dyn CandleSource>,
    /// Settings generation the job was dispatched under
    pub generation: u64,
}

/// The result returned by a worker
#[derive(Debug, Clone)]
pub struct JobResult {
    pub pair: PairInterval,
    pub duration_ms: u128,

    // Success: the new front buffer
    // Failure: the error string
    pub result: Result<Arc<BreakoutAnalysis>, String>,

    pub generation: u64,
}
