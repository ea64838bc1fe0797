use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use super::messages::{JobRequest, JobResult};
use crate::analysis::multi_pair_monitor::fetch_and_analyze;
#[cfg(debug_assertions)]
use crate::config::PRINT_WORKER_TIMINGS;

/// Spawn `count` workers sharing one job queue. Workers exit once the engine
/// drops its job sender or stops listening for results.
pub fn spawn_worker_threads(
    count: usize,
    rx: Receiver<JobRequest>,
    tx: Sender<JobResult>,
) -> Vec<thread::JoinHandle<()>> {
    let rx = Arc::new(Mutex::new(rx));
    (0..count.max(1))
        .map(|id| {
            let rx = Arc::clone(&rx);
            let tx = tx.clone();
            thread::spawn(move || worker_loop(id, rx, tx))
        })
        .collect()
}

fn worker_loop(id: usize, rx: Arc<Mutex<Receiver<JobRequest>>>, tx: Sender<JobResult>) {
    loop {
        let req = {
            let Ok(guard) = rx.lock() else { break };
            match guard.recv() {
                Ok(req) => req,
                Err(_) => break,
            }
        };

        let start = Instant::now();
        let result = fetch_and_analyze(req.source.as_ref(), &req.pair, req.limit, &req.settings)
            .map(Arc::new)
            .map_err(|e| format!("{:#}", e));
        let elapsed = start.elapsed().as_millis();

        #[cfg(debug_assertions)]
        if PRINT_WORKER_TIMINGS {
            log::info!("[worker {}] {} took {} ms", id, req.pair, elapsed);
        }
        #[cfg(not(debug_assertions))]
        let _ = id;

        let sent = tx.send(JobResult {
            pair: req.pair,
            duration_ms: elapsed,
            result,
            generation: req.generation,
        });
        if sent.is_err() {
            // Engine is gone
            break;
        }
    }
}
