//! TRU Wallet Generator CLI
//!
//! Usage:
//!   tru_wallet                       # Generate one wallet into tru_wallet.json
//!   tru_wallet -n 100 -o batch.json  # Generate 100 wallets across all cores
//!   tru_wallet --check <ADDRESS>     # Validate an address
//!   tru_wallet --verify wallet.json  # Re-derive and check a saved wallet

use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::warn;

use tru_wallet::wallet::{load_wallets, save_wallets};
use tru_wallet::{Address, Config, PoolEvent, WalletFile, WalletRecord, WorkerPool};

fn main() {
    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(ref address) = config.check {
        check_address(address, &config);
        return;
    }

    if let Some(ref path) = config.verify {
        verify_file(path, &config);
        return;
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("     TRU BLOCKCHAIN WALLET GENERATOR");
    println!("{}", "=".repeat(50));
    println!();

    let records = if config.count == 1 {
        println!("Generating TRU address...");
        match tru_wallet::generate_wallet(config.network) {
            Ok(record) => vec![record],
            Err(e) => fail(&e),
        }
    } else {
        generate_batch(&config)
    };

    if records.is_empty() {
        eprintln!("No wallets generated.");
        process::exit(1);
    }

    println!();
    println!("SUCCESS!");
    print_records(&records);

    if config.no_save {
        println!("Wallet not saved (--no-save). Copy the private key now.");
    } else {
        let files: Vec<WalletFile> = records.into_iter().map(WalletFile::new).collect();
        if let Err(e) = save_wallets(&config.output, &files) {
            fail(&e);
        }
        println!("Wallet saved to {}", config.output.display());
    }

    println!();
    println!("IMPORTANT:");
    println!("* Never share your private key");
    println!("* Backup {} safely", config.output.display());
    println!("* This address works on the TRU blockchain ({})", config.network);
    println!();
}

fn generate_batch(config: &Config) -> Vec<WalletRecord> {
    println!("Network:    {}", config.network);
    println!("Workers:    {}", config.worker_count());
    println!("Target:     {} wallet(s)", config.count);
    println!();

    let pool = WorkerPool::new(config.worker_count(), config.count, config.network);
    ctrlc_handler(pool.stop_flag_clone());

    println!("Generating... (Press Ctrl+C to stop)\n");

    let mut records = Vec::with_capacity(config.count);
    let report_interval = Duration::from_secs(config.report_interval);

    loop {
        match pool.wait_for_result(report_interval) {
            PoolEvent::Result(Ok(wallet)) => records.push(wallet.record),
            PoolEvent::Result(Err(e)) => fail(&e),
            PoolEvent::Timeout => print_progress(&pool),
            PoolEvent::Finished => break,
        }
    }

    if records.len() < config.count {
        warn!(
            generated = records.len(),
            requested = config.count,
            "batch interrupted"
        );
        println!("\nStopped by user after {} wallet(s).", records.len());
    }

    println!(
        "Generated {} wallet(s) in {:.2}s ({:.0}/s)",
        records.len(),
        pool.elapsed().as_secs_f64(),
        pool.wallets_per_second()
    );

    pool.join();
    records
}

fn print_records(records: &[WalletRecord]) {
    if let [record] = records {
        println!("{}", "-".repeat(50));
        println!("YOUR TRU ADDRESS: {}", record.address);
        println!("{}", "-".repeat(50));
        println!();
        println!("Share this address to receive TRU coins!");
        println!();
        return;
    }

    println!("{}", "-".repeat(50));
    for (i, record) in records.iter().enumerate() {
        println!("{:>6}  {}", i + 1, record.address);
    }
    println!("{}", "-".repeat(50));
    println!();
}

fn print_progress(pool: &WorkerPool) {
    println!(
        "[{:>4}s] Generated {}/{} wallets ({:.0}/s)",
        pool.elapsed().as_secs(),
        pool.total_wallets(),
        pool.count(),
        pool.wallets_per_second()
    );
}

fn check_address(address: &str, config: &Config) {
    match Address::decode(address.trim(), config.network) {
        Ok(address) => {
            println!("Valid {} address: {}", config.network, address);
            println!("Public key hash: {}", hex::encode(address.hash160()));
        }
        Err(e) => {
            eprintln!("Invalid address: {}", e);
            process::exit(1);
        }
    }
}

fn verify_file(path: &Path, config: &Config) {
    match load_wallets(path, config.network) {
        Ok(wallets) => {
            for wallet in &wallets {
                println!("OK  {}  (created {})", wallet.record.address, wallet.created);
            }
            println!("{} wallet(s) verified in {}", wallets.len(), path.display());
        }
        Err(e) => {
            eprintln!("Verification failed: {}", e);
            process::exit(1);
        }
    }
}

fn fail(e: &dyn std::error::Error) -> ! {
    eprintln!("Error: {}", e);
    process::exit(1);
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    }) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }
}
