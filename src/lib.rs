//! # tru_wallet
//!
//! TRU wallet generator: a secp256k1 keypair and its Base58Check address.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation, point compression, and address encoding
//! - `wallet`: Wallet records and JSON persistence
//! - `worker`: Parallel batch generation
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod wallet;
pub mod worker;

pub use config::Config;
pub use crypto::{Address, KeyPair, KeyPairGenerator, Network, PrivateKey, PublicKey};
pub use wallet::{derive_wallet, generate_wallet, WalletError, WalletFile, WalletRecord};
pub use worker::{GeneratedWallet, PoolEvent, WorkerPool};
