//! Worker pool management.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use tracing::debug;

use crate::crypto::{self, Network};
use crate::wallet::WalletRecord;

use super::cpu::{CpuWorker, WorkerStats};

/// A wallet produced by the pool.
#[derive(Debug, Clone)]
pub struct GeneratedWallet {
    /// The generated wallet
    pub record: WalletRecord,
    /// The ID of the worker that generated it
    pub worker_id: usize,
}

/// Outcome of waiting on the pool.
#[derive(Debug)]
pub enum PoolEvent {
    /// A worker finished one wallet (or failed to)
    Result(crypto::Result<GeneratedWallet>),
    /// Nothing arrived before the timeout
    Timeout,
    /// All workers have exited and every result has been received
    Finished,
}

/// Generates a batch of independent wallets across threads.
///
/// Results arrive in no particular order.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Number of wallets requested
    count: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for results
    result_rx: Receiver<crypto::Result<GeneratedWallet>>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Creates a pool that generates `count` wallets with `num_workers`
    /// threads.
    pub fn new(num_workers: usize, count: usize, network: Network) -> Self {
        let num_workers = num_workers.clamp(1, count.max(1));
        // Room for every result, so workers never block on send
        let (result_tx, result_rx) = bounded(count.max(1));
        let remaining = Arc::new(AtomicUsize::new(count));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());

        let handles = Self::spawn_workers(
            num_workers,
            network,
            remaining,
            result_tx,
            stop_flag.clone(),
            stats.clone(),
        );

        debug!(workers = num_workers, count, %network, "worker pool started");

        Self {
            num_workers,
            count,
            handles: Some(handles),
            result_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        }
    }

    /// Spawns worker threads.
    fn spawn_workers(
        num_workers: usize,
        network: Network,
        remaining: Arc<AtomicUsize>,
        result_tx: Sender<crypto::Result<GeneratedWallet>>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Vec<JoinHandle<()>> {
        (0..num_workers)
            .map(|id| {
                let remaining = remaining.clone();
                let result_tx = result_tx.clone();
                let stop_flag = stop_flag.clone();
                let stats = stats.clone();

                thread::Builder::new()
                    .name(format!("wallet-worker-{}", id))
                    .spawn(move || {
                        let worker =
                            CpuWorker::new(id, network, remaining, result_tx, stop_flag, stats);
                        worker.run();
                    })
                    .expect("Failed to spawn worker thread")
            })
            .collect()
    }

    /// Waits for the next result, up to `timeout`.
    pub fn wait_for_result(&self, timeout: Duration) -> PoolEvent {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => PoolEvent::Result(result),
            Err(RecvTimeoutError::Timeout) => PoolEvent::Timeout,
            Err(RecvTimeoutError::Disconnected) => PoolEvent::Finished,
        }
    }

    /// Blocks until every worker has exited and returns the wallets produced.
    ///
    /// Stops the remaining workers and returns the first error if any
    /// generation fails. If the pool was stopped externally (see
    /// [`stop`](Self::stop)), the batch is cut short and fewer than
    /// [`count`](Self::count) wallets are returned.
    pub fn collect(self) -> crypto::Result<Vec<WalletRecord>> {
        let mut records = Vec::with_capacity(self.count);

        for result in self.result_rx.iter() {
            match result {
                Ok(wallet) => records.push(wallet.record),
                Err(e) => {
                    self.stop();
                    return Err(e);
                }
            }
        }

        Ok(records)
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Waits for all workers to complete.
    pub fn join(mut self) {
        self.stop();
        self.join_handles();
    }

    fn join_handles(&mut self) {
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the number of wallets requested.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the total wallets generated across all workers.
    pub fn total_wallets(&self) -> u64 {
        self.stats.total_wallets()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current generation rate (wallets per second).
    pub fn wallets_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_wallets() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        self.join_handles();
    }
}
