//! Worker pool for batch wallet generation.
//!
//! Every wallet is independent, so a batch splits across threads with no
//! coordination beyond a shared work counter. This module provides:
//! - Multi-threaded CPU workers
//! - Work distribution through an atomic counter
//! - Progress tracking and reporting

mod cpu;
mod pool;

pub use cpu::CpuWorker;
pub use pool::{GeneratedWallet, PoolEvent, WorkerPool};
