//! CPU worker for batch wallet generation.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, error};

use crate::crypto::{self, KeyPairGenerator, Network};
use crate::wallet::generate_wallet_with;

use super::GeneratedWallet;

/// Statistics shared by all workers.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Wallets generated
    pub wallets_generated: AtomicU64,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total wallets generated.
    pub fn total_wallets(&self) -> u64 {
        self.wallets_generated.load(Ordering::Relaxed)
    }
}

/// A CPU worker that claims units from a shared counter and generates one
/// wallet per unit.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// Address network
    network: Network,
    /// Units not yet claimed by any worker
    remaining: Arc<AtomicUsize>,
    /// Channel to send results
    result_tx: Sender<crypto::Result<GeneratedWallet>>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        network: Network,
        remaining: Arc<AtomicUsize>,
        result_tx: Sender<crypto::Result<GeneratedWallet>>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            network,
            remaining,
            result_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker loop.
    ///
    /// Generates wallets until:
    /// - No units remain
    /// - Stop flag is set
    /// - Generation fails (the error is sent and the pool is stopped)
    pub fn run(&self) {
        let mut generator = KeyPairGenerator::new();

        while !self.stop_flag.load(Ordering::Relaxed) && self.claim() {
            match generate_wallet_with(&mut generator, self.network) {
                Ok(record) => {
                    self.stats.wallets_generated.fetch_add(1, Ordering::Relaxed);
                    let _ = self.result_tx.send(Ok(GeneratedWallet {
                        record,
                        worker_id: self.id,
                    }));
                }
                Err(e) => {
                    error!(worker = self.id, error = %e, "wallet generation failed");
                    self.stop_flag.store(true, Ordering::Relaxed);
                    let _ = self.result_tx.send(Err(e));
                    break;
                }
            }
        }

        debug!(worker = self.id, "worker finished");
    }

    /// Claims one unit of work; false once the batch is exhausted.
    fn claim(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }
}
