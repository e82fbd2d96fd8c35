//! Runtime configuration for the wallet generator.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use crate::crypto::Network;
use crate::wallet::DEFAULT_WALLET_FILE;

/// TRU Wallet Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Number of wallets to generate
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// File the generated wallet(s) are written to
    #[arg(short = 'o', long, default_value = DEFAULT_WALLET_FILE)]
    pub output: PathBuf,

    /// Print the wallet(s) without writing a file
    #[arg(long, default_value = "false")]
    pub no_save: bool,

    /// Address network: mainnet or testnet
    #[arg(long, default_value = "mainnet")]
    pub network: Network,

    /// Validate an address and exit
    #[arg(long, value_name = "ADDRESS")]
    pub check: Option<String>,

    /// Load a wallet file, verify every record, and exit
    #[arg(long, value_name = "FILE")]
    pub verify: Option<PathBuf>,

    /// Progress report interval in seconds (batch mode)
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count and never
    /// exceeding the number of wallets requested.
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(num_cpus::get)
            .min(self.count)
            .max(1)
    }

    /// Returns the configured tracing level.
    pub fn log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::WARN)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::InvalidValue(
                "Count must be at least 1".into(),
            ));
        }

        if self.workers == Some(0) {
            return Err(ConfigError::InvalidValue(
                "Worker count must be at least 1".into(),
            ));
        }

        if self.report_interval == 0 {
            return Err(ConfigError::InvalidValue(
                "Report interval must be at least 1 second".into(),
            ));
        }

        if !self.no_save && self.output.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue("Output path cannot be empty".into()));
        }

        if self.log_level.parse::<Level>().is_err() {
            return Err(ConfigError::InvalidValue(format!(
                "Unknown log level: {}",
                self.log_level
            )));
        }

        if self.check.is_some() && self.verify.is_some() {
            return Err(ConfigError::Conflict(
                "--check and --verify cannot be used together".into(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Conflicting options: {0}")]
    Conflict(String),
}
