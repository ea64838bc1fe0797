use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::analysis::MultiPairMonitor;
use crate::analysis::pair_analysis::{AnalysisSettings, BreakoutAnalysis};
#[cfg(debug_assertions)]
use crate::config::PRINT_ENGINE_QUEUE;
use crate::config::{ANALYSIS, SCANNER};
use crate::data::timeseries::CandleSource;
use crate::domain::pair_interval::PairInterval;
use crate::models::breakout::Breakout;
use crate::models::pair_context::PairContext;
use crate::utils::time_utils::now_as_timestamp_secs;

use super::messages::{JobRequest, JobResult};
use super::state::PairState;
use super::worker;

pub struct ScanEngine {
    /// Registry of all pairs, keyed by `PairInterval::key()`
    pub pairs: HashMap<String, PairState>,

    /// Shared candle source handed to every job
    pub source: Arc<dyn CandleSource>,

    /// Owned monitor
    pub multi_pair_monitor: MultiPairMonitor,

    /// Worker Communication
    job_tx: Sender<JobRequest>,
    result_rx: Receiver<JobResult>,
    workers: Vec<JoinHandle<()>>,
    worker_count: usize,

    /// Queue of pair keys waiting for a worker
    pub queue: VecDeque<String>,

    /// The live settings. Results computed under older settings are dropped.
    pub current_settings: AnalysisSettings,
    pub fetch_limit: usize,
    generation: u64,

    poll_interval: Duration,
    new_alerts: Vec<Breakout>,
}

impl ScanEngine {
    /// Initialize the engine and spawn workers.
    pub fn new(
        source: Arc<dyn CandleSource>,
        pairs: &[PairInterval],
        settings: AnalysisSettings,
    ) -> Self {
        let (job_tx, job_rx) = channel::<JobRequest>();
        let (result_tx, result_rx) = channel::<JobResult>();

        let worker_count = SCANNER.engine.worker_threads.max(1);
        let workers = worker::spawn_worker_threads(worker_count, job_rx, result_tx);

        let mut multi_pair_monitor = MultiPairMonitor::new();
        let mut registry = HashMap::new();
        for pair in pairs.iter().take(SCANNER.max_pairs) {
            multi_pair_monitor.add_pair(pair.clone());
            registry.insert(pair.key(), PairState::new(pair.clone()));
        }
        if pairs.len() > SCANNER.max_pairs {
            log::warn!(
                "{} pairs requested, monitoring the first {}",
                pairs.len(),
                SCANNER.max_pairs
            );
        }

        log::info!(
            "Scan engine: {} pairs, {} workers, source: {}",
            registry.len(),
            worker_count,
            source.signature()
        );

        Self {
            pairs: registry,
            source,
            multi_pair_monitor,
            job_tx,
            result_rx,
            workers,
            worker_count,
            queue: VecDeque::new(),
            current_settings: settings,
            fetch_limit: ANALYSIS.fetch_limit,
            generation: 0,
            poll_interval: Duration::from_secs(SCANNER.engine.poll_interval_secs),
            new_alerts: Vec::new(),
        }
    }

    pub fn with_fetch_limit(mut self, fetch_limit: usize) -> Self {
        self.fetch_limit = fetch_limit;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// One engine tick.
    /// Returns TRUE if the engine is busy (queue not empty OR workers calculating).
    pub fn update(&mut self) -> bool {
        // 1. Process results (swap buffers)
        while let Ok(result) = self.result_rx.try_recv() {
            self.handle_job_result(result);
        }

        // 2. Check triggers (poll interval)
        self.check_automatic_triggers();

        // 3. Dispatch jobs
        self.process_queue();

        !self.queue.is_empty() || self.has_active_workers()
    }

    /// Tick until nothing is queued or calculating. Returns false on timeout.
    pub fn run_until_idle(&mut self, tick: Duration, timeout: Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        while self.update() {
            if std::time::Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(tick);
        }
        true
    }

    /// Accessor for readers
    pub fn get_analysis(&self, pair: &PairInterval) -> Option<Arc<BreakoutAnalysis>> {
        self.pairs
            .get(&pair.key())
            .and_then(|state| state.analysis.clone())
    }

    pub fn get_signals(&self) -> Vec<&PairContext> {
        self.multi_pair_monitor.get_signals()
    }

    /// Breakouts first seen since the previous call
    pub fn take_new_alerts(&mut self) -> Vec<Breakout> {
        std::mem::take(&mut self.new_alerts)
    }

    pub fn get_all_pairs(&self) -> Vec<PairInterval> {
        let mut pairs: Vec<PairInterval> = self.pairs.values().map(|s| s.pair.clone()).collect();
        pairs.sort_by_key(|p| p.key());
        pairs
    }

    // --- TELEMETRY ---

    pub fn get_queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn get_worker_status_msg(&self) -> Option<String> {
        let calculating = self.calculating_count();
        if calculating > 0 {
            Some(format!("Processing {} (queued: {})", calculating, self.queue.len()))
        } else if !self.queue.is_empty() {
            Some(format!("Queued: {}", self.queue.len()))
        } else {
            None
        }
    }

    pub fn get_active_pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn get_pair_status(&self, pair: &PairInterval) -> (bool, Option<String>) {
        if let Some(state) = self.pairs.get(&pair.key()) {
            (state.is_calculating, state.last_error.clone())
        } else {
            (false, None)
        }
    }

    // --- SETTINGS UPDATES ---

    /// Swap the live settings. In-flight jobs still finish but their results
    /// are discarded, and every pair is queued again.
    pub fn update_settings(&mut self, settings: AnalysisSettings) {
        if settings == self.current_settings {
            return;
        }
        self.current_settings = settings;
        self.generation += 1;
        log::info!("Settings changed (generation {})", self.generation);
        self.trigger_global_recalc(None);
    }

    /// Smart global invalidation.
    /// Clears queue, adds all pairs, puts the priority pair first.
    pub fn trigger_global_recalc(&mut self, priority_pair: Option<&PairInterval>) {
        // Don't process stale jobs
        self.queue.clear();

        let mut all_keys: Vec<String> = self.get_all_pairs().iter().map(|p| p.key()).collect();

        if let Some(vip) = priority_pair.map(|p| p.key()) {
            if let Some(pos) = all_keys.iter().position(|k| k == &vip) {
                all_keys.remove(pos);
                self.queue.push_back(vip);
            }
        }
        self.queue.extend(all_keys);

        log::info!(
            "Global invalidation: queue rebuilt ({} pairs). Head: {:?}",
            self.queue.len(),
            self.queue.front()
        );
    }

    /// Force a single recalc. Ignored if the pair is unknown, queued or busy.
    pub fn force_recalc(&mut self, pair: &PairInterval) {
        let key = pair.key();
        let Some(state) = self.pairs.get(&key) else {
            log::warn!("force_recalc: {} is not monitored", pair);
            return;
        };
        if !state.is_calculating && !self.queue.contains(&key) {
            // Priority: front of queue
            self.queue.push_front(key);
        }
    }

    /// Stop accepting work and wait for the workers to exit.
    pub fn shutdown(self) {
        let ScanEngine {
            job_tx, workers, ..
        } = self;
        drop(job_tx);
        for handle in workers {
            let _ = handle.join();
        }
    }

    // --- INTERNAL LOGIC ---

    fn calculating_count(&self) -> usize {
        self.pairs.values().filter(|s| s.is_calculating).count()
    }

    fn has_active_workers(&self) -> bool {
        self.pairs.values().any(|s| s.is_calculating)
    }

    fn handle_job_result(&mut self, result: JobResult) {
        let Some(state) = self.pairs.get_mut(&result.pair.key()) else {
            return;
        };

        if result.generation != self.generation {
            // Computed under old settings; the pair is already re-queued
            state.is_calculating = false;
            #[cfg(debug_assertions)]
            if PRINT_ENGINE_QUEUE {
                log::info!(
                    "Dropping stale result for {} (gen {} != {})",
                    result.pair,
                    result.generation,
                    self.generation
                );
            }
            return;
        }

        state.last_duration_ms = Some(result.duration_ms);
        match &result.result {
            Ok(analysis) => state.update_buffer(Arc::clone(analysis)),
            Err(e) => {
                log::error!("Worker failed for {}: {}", result.pair, e);
                state.record_error(e.clone());
            }
        }

        let fresh =
            self.multi_pair_monitor
                .record_result(&result.pair, result.result, now_as_timestamp_secs());
        self.new_alerts.extend(fresh);
    }

    fn check_automatic_triggers(&mut self) {
        let mut due: Vec<String> = self
            .pairs
            .iter()
            .filter(|(key, state)| {
                !state.is_calculating
                    && state.is_due(self.poll_interval)
                    && !self.queue.contains(key)
            })
            .map(|(key, _)| key.clone())
            .collect();
        due.sort();

        #[cfg(debug_assertions)]
        if PRINT_ENGINE_QUEUE && !due.is_empty() {
            log::info!("Poll trigger: {:?}", due);
        }
        self.queue.extend(due);
    }

    fn process_queue(&mut self) {
        let mut deferred = Vec::new();

        while self.calculating_count() < self.worker_count {
            let Some(key) = self.queue.pop_front() else {
                break;
            };
            let busy = self.pairs.get(&key).is_some_and(|s| s.is_calculating);
            if busy {
                // Still running from before a global recalc; retry next tick
                deferred.push(key);
                continue;
            }
            self.dispatch_job(key);
        }

        for key in deferred.into_iter().rev() {
            self.queue.push_front(key);
        }
    }

    fn dispatch_job(&mut self, key: String) {
        let Some(state) = self.pairs.get_mut(&key) else {
            return;
        };
        state.is_calculating = true;

        let req = JobRequest {
            pair: state.pair.clone(),
            settings: self.current_settings.clone(),
            limit: self.fetch_limit,
            source: Arc::clone(&self.source),
            generation: self.generation,
        };

        #[cfg(debug_assertions)]
        if PRINT_ENGINE_QUEUE {
            log::info!("Dispatch {} (gen {})", key, self.generation);
        }

        // If every worker is gone we cannot make progress; surface it on the pair.
        if self.job_tx.send(req).is_err() {
            state.record_error("No workers available".to_string());
        }
    }
}
