use std::sync::Arc;

use crate::analysis::pair_analysis::BreakoutAnalysis;
use crate::domain::pair_interval::PairInterval;
use crate::models::breakout::{Breakout, Direction};

/// Latest known state of one monitored pair
#[derive(Debug, Clone)]
pub struct PairContext {
    pub pair: PairInterval,
    pub analysis: Option<Arc<BreakoutAnalysis>>,
    /// Unix seconds of the last successful analysis
    pub last_updated: Option<i64>,
    pub last_error: Option<String>,
}

impl PairContext {
    pub fn new(pair: PairInterval) -> Self {
        Self {
            pair,
            analysis: None,
            last_updated: None,
            last_error: None,
        }
    }

    pub fn record_analysis(&mut self, analysis: Arc<BreakoutAnalysis>, now_secs: i64) {
        self.analysis = Some(analysis);
        self.last_updated = Some(now_secs);
        self.last_error = None;
    }

    /// Failures keep the previous analysis around; the error is shown alongside it.
    pub fn record_error(&mut self, error: String) {
        self.last_error = Some(error);
    }

    pub fn current_breakout(&self) -> Option<&Breakout> {
        self.analysis.as_ref().and_then(|a| a.summary())
    }

    pub fn has_signals(&self) -> bool {
        self.analysis.as_ref().is_some_and(|a| a.has_breakout())
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.analysis
            .as_ref()
            .map(|a| a.breakouts.iter().map(|b| b.direction).collect())
            .unwrap_or_default()
    }
}
